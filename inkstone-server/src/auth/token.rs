//! Signed, time-limited bearer tokens (HS256)
//!
//! Tokens embed the user's id, email, and role. There is no refresh
//! flow and no revocation list: a token stays valid until expiry
//! regardless of later server-side changes to the user row.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Claims carried by a bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub id: i64,
    pub email: String,
    pub role: String,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
}

/// Sign a token for the given user identity.
pub fn sign(
    id: i64,
    email: &str,
    role: &str,
    secret: &str,
    ttl: Duration,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        id,
        email: email.to_owned(),
        role: role.to_owned(),
        iat: now,
        exp: now + ttl.as_secs() as i64,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::Sign)
}

/// Verify a token's signature and expiry, returning its claims.
pub fn verify(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";
    const TTL: Duration = Duration::from_secs(3600);

    #[test]
    fn sign_then_verify_round_trips_claims() {
        let token = sign(7, "admin@example.com", "admin", SECRET, TTL).unwrap();
        let claims = verify(&token, SECRET).unwrap();

        assert_eq!(claims.id, 7);
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = sign(7, "admin@example.com", "admin", SECRET, TTL).unwrap();

        // Flip one character of the payload segment.
        let mut bytes = token.into_bytes();
        let mid = bytes.len() / 2;
        bytes[mid] = if bytes[mid] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(matches!(
            verify(&tampered, SECRET),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign(7, "admin@example.com", "admin", SECRET, TTL).unwrap();
        assert!(verify(&token, "a-different-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now().timestamp();
        let stale = Claims {
            id: 7,
            email: "admin@example.com".into(),
            role: "admin".into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &stale,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            verify(&token, SECRET),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify("not-a-token", SECRET).is_err());
        assert!(verify("", SECRET).is_err());
    }
}
