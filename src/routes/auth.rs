/// Authentication Routes
///
/// Signup, login, access-token refresh and token validation.

use actix_web::{web, HttpResponse};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{credentials, issue_token_pair, refresh_access_token, Claims, TokenPair};
use crate::configuration::JwtSettings;
use crate::error::{AppError, ErrorContext};
use crate::store::{self, DEFAULT_BOARD_DESCRIPTION, DEFAULT_BOARD_NAME};
use crate::validators::{is_valid_email, require};

/// Signup and login body
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Token pair plus the board the client should open
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub board_id: Option<Uuid>,
}

impl SessionResponse {
    fn new(tokens: TokenPair, board_id: Option<Uuid>) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            board_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    pub user_id: Uuid,
    pub email: String,
    pub expires_at: String,
}

/// POST /api/auth/signup
///
/// Creates the identity, its default board and the three seed tasks in one
/// transaction, then issues a token pair.
///
/// # Errors
/// - 400: missing field, malformed email, password length out of bounds
/// - 409: email already registered
pub async fn signup(
    form: web::Json<CredentialsRequest>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("signup");
    let form = form.into_inner();

    let email = is_valid_email(&require("email", form.email)?)?;
    let password = require("password", form.password)?;
    let password_hash = credentials::hash_new_password(&password).await?;

    let mut transaction = pool.begin().await?;
    let identity = credentials::register(&mut transaction, &email, &password_hash).await?;
    let board = store::insert_board_with_defaults(
        &mut transaction,
        identity.id,
        DEFAULT_BOARD_NAME,
        DEFAULT_BOARD_DESCRIPTION,
    )
    .await
    .map_err(|e| context.record(e))?;
    transaction.commit().await?;

    let tokens = issue_token_pair(&identity.id, &identity.email, jwt_config.get_ref())?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %identity.id,
        board_id = %board.id,
        "User signed up"
    );

    Ok(HttpResponse::Created().json(SessionResponse::new(tokens, Some(board.id))))
}

/// POST /api/auth/login
///
/// # Errors
/// - 400: missing field or malformed email
/// - 401: unknown email or wrong password (indistinguishable)
pub async fn login(
    form: web::Json<CredentialsRequest>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("login");
    let form = form.into_inner();

    let email = is_valid_email(&require("email", form.email)?)?;
    let password = require("password", form.password)?;

    let identity = credentials::verify(pool.get_ref(), &email, &password).await?;
    let board_id = store::default_board_id(pool.get_ref(), identity.id).await?;
    let tokens = issue_token_pair(&identity.id, &identity.email, jwt_config.get_ref())?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %identity.id,
        "User logged in"
    );

    Ok(HttpResponse::Ok().json(SessionResponse::new(tokens, board_id)))
}

/// POST /api/auth/refresh
///
/// Exchanges a valid refresh token for a new access token with a full window.
/// The refresh token is not rotated.
///
/// # Errors
/// - 400: refreshToken missing
/// - 401: refresh token invalid, expired, or not a refresh token
pub async fn refresh(
    form: web::Json<RefreshRequest>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = require("refreshToken", form.into_inner().refresh_token)?;

    let access_token = refresh_access_token(&refresh_token, jwt_config.get_ref())?;

    tracing::debug!("Access token refreshed");

    Ok(HttpResponse::Ok().json(RefreshResponse {
        access_token,
        expires_in: jwt_config.access_token_expiry,
    }))
}

/// GET /api/auth/validate
///
/// Reaching the handler means the access guard accepted the token.
pub async fn validate(claims: web::ReqData<Claims>) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let expires_at = Utc
        .timestamp_opt(claims.exp, 0)
        .single()
        .map(|t| t.to_rfc3339())
        .unwrap_or_default();

    Ok(HttpResponse::Ok().json(ValidateResponse {
        valid: true,
        user_id,
        email: claims.email.clone(),
        expires_at,
    }))
}
