//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Formats an item count with its noun.
///
/// Usage in templates: `{{ item_count|items_label }}` renders `1 item` or `3 items`.
#[askama::filter_fn]
pub fn items_label(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let count = count.to_string();
    let noun = if count == "1" { "item" } else { "items" };
    Ok(format!("{count} {noun}"))
}

/// Collapses runs of whitespace so multi-line text fits a single output line.
///
/// Usage in templates: `{{ card.description|one_line }}`
#[askama::filter_fn]
pub fn one_line(text: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(text.to_string().split_whitespace().collect::<Vec<_>>().join(" "))
}
