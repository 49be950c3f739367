/// Session Token Codec
///
/// Issues and verifies the signed, time-bound session tokens that are the
/// sole authentication boundary of the service.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::configuration::AuthSettings;
use crate::error::AppError;

/// Encode a claim set into a signed token.
///
/// # Errors
/// Returns an error if token encoding fails.
pub fn issue_token(claims: &Claims, config: &AuthSettings) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("token generation failed: {}", e)))
}

/// Verify a token's signature and expiry, recovering the claim set.
///
/// Malformed, tampered, and expired tokens all fail with the same error:
/// the caller must not be able to tell them apart.
pub fn verify_token(token: &str, config: &AuthSettings) -> Result<Claims, AppError> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("token verification failed: {}", e);
        AppError::unauthenticated("Session is expired or invalid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::TOKEN_TTL_SECONDS;
    use uuid::Uuid;

    fn get_test_config() -> AuthSettings {
        AuthSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
        }
    }

    fn test_claims() -> Claims {
        Claims::new(
            Uuid::new_v4(),
            "zhila@gmail.com".to_string(),
            "zhila".to_string(),
        )
    }

    #[test]
    fn issued_token_verifies_to_same_claims() {
        let config = get_test_config();
        let claims = test_claims();

        let token = issue_token(&claims, &config).expect("Failed to issue token");
        let decoded = verify_token(&token, &config).expect("Failed to verify token");

        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.email, claims.email);
        assert_eq!(decoded.username, claims.username);
        assert_eq!(decoded.exp, claims.exp);
    }

    #[test]
    fn garbage_token_is_rejected() {
        let config = get_test_config();

        assert!(verify_token("not.a.token", &config).is_err());
        assert!(verify_token("", &config).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let config = get_test_config();
        let token = issue_token(&test_claims(), &config).expect("Failed to issue token");

        let tampered = format!("{}d", token);
        assert!(verify_token(&tampered, &config).is_err());
    }

    #[test]
    fn token_signed_with_different_secret_is_rejected() {
        let config = get_test_config();
        let token = issue_token(&test_claims(), &config).expect("Failed to issue token");

        let other = AuthSettings {
            secret: "a-completely-different-secret-value-here".to_string(),
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = get_test_config();

        // Back-date the claims far past the decoder's leeway.
        let mut claims = test_claims();
        claims.iat -= 2 * TOKEN_TTL_SECONDS;
        claims.exp -= 2 * TOKEN_TTL_SECONDS;

        let token = issue_token(&claims, &config).expect("Failed to issue token");
        assert!(verify_token(&token, &config).is_err());
    }
}
