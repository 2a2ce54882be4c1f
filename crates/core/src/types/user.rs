//! Auth wire models.

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// An authenticated storefront user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-side user id.
    pub id: UserId,
    /// Email address the account was registered with.
    pub email: String,
}

/// Response of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Opaque bearer credential.
    pub access_token: String,
    /// Token scheme, `"bearer"` in practice.
    pub token_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_round_trip() {
        let user = User {
            id: UserId::new(3),
            email: "shopper@example.com".to_string(),
        };
        let json = serde_json::to_string(&user).expect("serialize");
        let back: User = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, user);
    }

    #[test]
    fn test_access_token_decodes() {
        let token: AccessToken =
            serde_json::from_str(r#"{"access_token":"abc123","token_type":"bearer"}"#)
                .expect("decode token");
        assert_eq!(token.access_token, "abc123");
        assert_eq!(token.token_type, "bearer");
    }
}
