//! The authenticated user persisted by the login flow.

use serde::{Deserialize, Serialize};

/// User identity as stored under the `user` key.
///
/// The auth backend owns this shape; fields the shop does not read are kept
/// in `extra` so a round-trip through the client never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// `"<first> <last>"`, as sent with orders.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Name shown in the navigation bar; `"User"` when no first name is known.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.first_name.is_empty() {
            "User"
        } else {
            &self.first_name
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_camel_case_and_keeps_extra_fields() {
        let json = r#"{"id":1,"firstName":"Ada","lastName":"Lovelace","email":"ada@example.com","phone":"555"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.full_name(), "Ada Lovelace");
        assert_eq!(user.extra["phone"], "555");

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["firstName"], "Ada");
        assert_eq!(back["id"], 1);
    }

    #[test]
    fn test_display_name_falls_back() {
        let user: User = serde_json::from_str(r#"{"email":"x@y.z"}"#).unwrap();
        assert_eq!(user.display_name(), "User");
    }
}
