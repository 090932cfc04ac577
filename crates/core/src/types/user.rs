//! Authenticated shopper identity.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::UserId;
use super::wire::blank_as_none;

/// Identity of the logged-in shopper, as returned by login and session checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// User's ID.
    pub id: UserId,
    /// First name; used as the display name.
    pub first_name: String,
    /// Last name.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub last_name: Option<String>,
    /// Email address.
    pub email: Email,
    /// Login handle.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub username: Option<String>,
}

impl Identity {
    /// Name shown in greetings.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.first_name
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_login_user() {
        let user: Identity = serde_json::from_str(
            r#"{"id": 5, "first_name": "Ada", "last_name": "", "email": "ada@example.com", "username": "ada"}"#,
        )
        .unwrap();
        assert_eq!(user.display_name(), "Ada");
        assert_eq!(user.last_name, None);
        assert_eq!(user.username.as_deref(), Some("ada"));
    }

    #[test]
    fn test_string_user_id() {
        let user: Identity = serde_json::from_str(
            r#"{"id": "5", "first_name": "Ada", "email": "ada@example.com"}"#,
        )
        .unwrap();
        assert_eq!(user.id, UserId::new(5));
    }
}
