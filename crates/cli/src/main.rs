//! Mobile Shop CLI - browse the catalog, manage the cart, place orders.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! mshop products --query pixel
//! mshop products --brand samsung --max-price 900
//! mshop show 3
//!
//! # Cart
//! mshop add 1
//! mshop update 1 -1
//! mshop cart
//!
//! # Orders
//! mshop login ada@example.com hunter2
//! mshop checkout
//! ```
//!
//! Every invocation loads the catalog (falling back to the built-in list when
//! the backend is down), restores the persisted cart, runs the command, and
//! prints any notifications it raised. `--html` renders HTML fragments
//! instead of text.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mobile_shop_core::{Price, ProductId};
use mobile_shop_storefront::config::ShopConfig;
use mobile_shop_storefront::error::AppError;
use mobile_shop_storefront::render::Surface;
use mobile_shop_storefront::state::AppState;
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "mshop")]
#[command(author, version, about = "Mobile Shop terminal client")]
struct Cli {
    /// Render HTML fragments instead of plain text
    #[arg(long, global = true)]
    html: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Case-insensitive text matched against name, brand, and description
        #[arg(short, long)]
        query: Option<String>,

        /// Only this brand (case-insensitive)
        #[arg(short, long)]
        brand: Option<String>,

        /// Lowest price, inclusive
        #[arg(long)]
        min_price: Option<Price>,

        /// Highest price, inclusive
        #[arg(long)]
        max_price: Option<Price>,
    },
    /// Show one product
    Show { id: ProductId },
    /// List brands
    Brands,
    /// Add one unit of a product to the cart
    Add { id: ProductId },
    /// Remove a product from the cart
    Remove { id: ProductId },
    /// Change a product's quantity by a positive or negative amount
    Update {
        id: ProductId,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Show the cart
    Cart,
    /// Place an order for the cart
    Checkout,
    /// Log in
    Login { email: String, password: String },
    /// Log out
    Logout,
    /// Show session, cart, and catalog status
    Status,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ShopConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mobile_shop_storefront=info,mobile_shop_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ShopConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            AppError::from(e).report();
            return ExitCode::from(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let surface = if cli.html { Surface::Html } else { Surface::Text };
    let state = AppState::open(config, surface);

    let result = run(&state, cli.command).await;
    if let Err(e) = &result {
        e.report();
        if !e.is_notified() {
            state.notifier().error(e.user_message());
        }
    }
    if let Err(e) = commands::flush_notifications(&state) {
        e.report();
    }

    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run(state: &AppState, command: Commands) -> Result<(), CliError> {
    state.catalog().load().await;

    match command {
        Commands::Products {
            query,
            brand,
            min_price,
            max_price,
        } => commands::catalog::list(state, query, brand, min_price, max_price)?,
        Commands::Show { id } => commands::catalog::show(state, id).await?,
        Commands::Brands => commands::catalog::brands(state),
        Commands::Add { id } => commands::cart::add(state, id)?,
        Commands::Remove { id } => commands::cart::remove(state, id)?,
        Commands::Update { id, delta } => commands::cart::update(state, id, delta)?,
        Commands::Cart => commands::cart::show(state)?,
        Commands::Checkout => commands::checkout::run(state).await?,
        Commands::Login { email, password } => {
            commands::session::login(state, &email, &SecretString::from(password)).await?;
        }
        Commands::Logout => commands::session::logout(state)?,
        Commands::Status => commands::session::status(state)?,
    }
    Ok(())
}
