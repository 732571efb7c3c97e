/// JWT Claims structure
///
/// Payload carried by both access and refresh tokens (RFC 7519 registered
/// claims plus the identity's email and the token kind).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AuthError};

/// Which half of a token pair a JWT is
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (identity ID as UUID string)
    pub sub: String,
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub iss: String,
    /// Unique token ID
    pub jti: String,
    pub typ: TokenKind,
}

impl Claims {
    /// Create claims for `user_id` valid for `expiry_seconds` from now
    pub fn new(
        user_id: Uuid,
        email: String,
        kind: TokenKind,
        expiry_seconds: i64,
        issuer: String,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            email,
            exp: now + expiry_seconds,
            iat: now,
            iss: issuer,
            jti: Uuid::new_v4().to_string(),
            typ: kind,
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// A token whose subject is not a UUID was not minted by us
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::Auth(AuthError::TokenInvalid))
    }
}
