/// JWT Token Issuance and Validation
///
/// Tokens are stateless HS256 JWTs. Nothing is stored server-side, so a token
/// stays valid until its `exp` passes.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::claims::{Claims, TokenKind};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

/// Access and refresh token issued together at signup and login
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

fn encode_token(
    user_id: &Uuid,
    email: &str,
    kind: TokenKind,
    expiry_seconds: i64,
    config: &JwtSettings,
) -> Result<String, AppError> {
    let claims = Claims::new(
        *user_id,
        email.to_string(),
        kind,
        expiry_seconds,
        config.issuer.clone(),
    );

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Verifies signature, issuer and expiry (no leeway). Does not check the kind.
fn decode_token(token: &str, config: &JwtSettings) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::Auth(AuthError::TokenExpired),
        _ => {
            tracing::debug!("JWT validation error: {}", e);
            AppError::Auth(AuthError::TokenInvalid)
        }
    })
}

pub fn generate_access_token(
    user_id: &Uuid,
    email: &str,
    config: &JwtSettings,
) -> Result<String, AppError> {
    encode_token(user_id, email, TokenKind::Access, config.access_token_expiry, config)
}

pub fn generate_refresh_token(
    user_id: &Uuid,
    email: &str,
    config: &JwtSettings,
) -> Result<String, AppError> {
    encode_token(user_id, email, TokenKind::Refresh, config.refresh_token_expiry, config)
}

/// Issue a fresh access/refresh pair for a verified identity
pub fn issue_token_pair(
    user_id: &Uuid,
    email: &str,
    config: &JwtSettings,
) -> Result<TokenPair, AppError> {
    Ok(TokenPair {
        access_token: generate_access_token(user_id, email, config)?,
        refresh_token: generate_refresh_token(user_id, email, config)?,
        expires_in: config.access_token_expiry,
    })
}

/// Validate an access token presented on an API request
///
/// # Errors
/// - `TokenExpired` / `TokenInvalid` when the JWT does not verify
/// - `WrongTokenType` when a refresh token is presented
pub fn validate_access_token(token: &str, config: &JwtSettings) -> Result<Claims, AppError> {
    let claims = decode_token(token, config)?;
    if claims.typ != TokenKind::Access {
        return Err(AppError::Auth(AuthError::WrongTokenType));
    }
    Ok(claims)
}

/// Validate a refresh token. Any failure, including a token of the wrong
/// kind, is reported as `TokenInvalid`/`TokenExpired` (401).
pub fn validate_refresh_token(token: &str, config: &JwtSettings) -> Result<Claims, AppError> {
    let claims = decode_token(token, config)?;
    if claims.typ != TokenKind::Refresh {
        return Err(AppError::Auth(AuthError::TokenInvalid));
    }
    Ok(claims)
}

/// Mint a new access token with a full validity window from a refresh token.
/// The refresh token itself is not rotated.
pub fn refresh_access_token(refresh_token: &str, config: &JwtSettings) -> Result<String, AppError> {
    let claims = validate_refresh_token(refresh_token, config)?;
    let user_id = claims.user_id()?;
    generate_access_token(&user_id, &claims.email, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_config() -> JwtSettings {
        JwtSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
            issuer: "test".to_string(),
        }
    }

    #[test]
    fn test_generate_and_validate_token() {
        let config = get_test_config();
        let user_id = Uuid::new_v4();
        let email = "test@example.com";

        let token = generate_access_token(&user_id, email, &config).expect("Failed to generate token");
        let claims = validate_access_token(&token, &config).expect("Failed to validate token");

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, email);
        assert_eq!(claims.iss, "test");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_pair_windows() {
        let config = get_test_config();
        let user_id = Uuid::new_v4();

        let pair = issue_token_pair(&user_id, "a@b.com", &config).unwrap();
        let access = validate_access_token(&pair.access_token, &config).unwrap();
        let refresh = validate_refresh_token(&pair.refresh_token, &config).unwrap();

        assert_eq!(pair.expires_in, 3600);
        assert_eq!(access.exp - access.iat, 3600);
        assert_eq!(refresh.exp - refresh.iat, 604800);
        assert_eq!(access.sub, refresh.sub);
    }

    #[test]
    fn test_invalid_token() {
        let config = get_test_config();
        let result = validate_access_token("invalid.token.here", &config);

        assert!(matches!(result, Err(AppError::Auth(AuthError::TokenInvalid))));
    }

    #[test]
    fn test_tampered_token() {
        let config = get_test_config();
        let token = generate_access_token(&Uuid::new_v4(), "test@example.com", &config)
            .expect("Failed to generate token");

        let tampered = format!("{}X", token);
        assert!(validate_access_token(&tampered, &config).is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let config = get_test_config();
        let token = generate_access_token(&Uuid::new_v4(), "test@example.com", &config).unwrap();

        let mut other = get_test_config();
        other.secret = "another-secret-key-at-least-32-characters".to_string();
        assert!(validate_access_token(&token, &other).is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let mut config = get_test_config();
        let token = generate_access_token(&Uuid::new_v4(), "test@example.com", &config)
            .expect("Failed to generate token");

        config.issuer = "wrong-issuer".to_string();
        assert!(validate_access_token(&token, &config).is_err());
    }

    #[test]
    fn test_expired_access_token_is_rejected() {
        let mut config = get_test_config();
        config.access_token_expiry = -10;
        let token = generate_access_token(&Uuid::new_v4(), "a@b.com", &config).unwrap();

        let result = validate_access_token(&token, &config);
        assert!(matches!(result, Err(AppError::Auth(AuthError::TokenExpired))));
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let config = get_test_config();
        let pair = issue_token_pair(&Uuid::new_v4(), "a@b.com", &config).unwrap();

        assert!(matches!(
            validate_access_token(&pair.refresh_token, &config),
            Err(AppError::Auth(AuthError::WrongTokenType))
        ));
        assert!(matches!(
            validate_refresh_token(&pair.access_token, &config),
            Err(AppError::Auth(AuthError::TokenInvalid))
        ));
    }

    #[test]
    fn test_refresh_mints_access_token_with_same_identity() {
        let config = get_test_config();
        let user_id = Uuid::new_v4();
        let pair = issue_token_pair(&user_id, "a@b.com", &config).unwrap();

        let access = refresh_access_token(&pair.refresh_token, &config).unwrap();
        let claims = validate_access_token(&access, &config).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.exp - claims.iat, config.access_token_expiry);
    }

    #[test]
    fn test_expired_refresh_token_cannot_refresh() {
        let mut config = get_test_config();
        config.refresh_token_expiry = -10;
        let token = generate_refresh_token(&Uuid::new_v4(), "a@b.com", &config).unwrap();

        assert!(refresh_access_token(&token, &config).is_err());
    }
}
