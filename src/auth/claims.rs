/// Session claim set
///
/// The identity fields embedded in a signed session token, plus the standard
/// time claims (RFC 7519). Tokens are stateless: nothing here is ever
/// persisted server-side.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Session token lifetime in seconds.
pub const TOKEN_TTL_SECONDS: i64 = 3600;

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// User email
    pub email: String,
    /// Username
    pub username: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Create claims for a freshly authenticated identity, valid for one hour.
    pub fn new(user_id: Uuid, email: String, username: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            email,
            username,
            exp: now + TOKEN_TTL_SECONDS,
            iat: now,
        }
    }

    /// Extract the owning user ID from the claims.
    ///
    /// # Errors
    /// Returns an error if the subject is not a valid UUID.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::Internal("invalid user ID in token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_carry_identity_and_one_hour_expiry() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(
            user_id,
            "zhila@gmail.com".to_string(),
            "zhila".to_string(),
        );

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "zhila@gmail.com");
        assert_eq!(claims.username, "zhila");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECONDS);
    }

    #[test]
    fn user_id_round_trips_through_subject() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "a@b.com".to_string(), "ab".to_string());

        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn malformed_subject_is_an_error() {
        let mut claims = Claims::new(Uuid::new_v4(), "a@b.com".to_string(), "ab".to_string());
        claims.sub = "not-a-uuid".to_string();

        assert!(claims.user_id().is_err());
    }
}
