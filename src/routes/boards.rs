/// Board Routes
///
/// Every handler scopes its query to the caller's user id. A board owned by
/// someone else is reported exactly like a missing one (404).

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::{AppError, ErrorContext, ValidationError};
use crate::routes::tasks::TaskRequest;
use crate::store::{self, DEFAULT_BOARD_DESCRIPTION, DEFAULT_BOARD_NAME};
use crate::validators::{is_valid_description, is_valid_name, require};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BoardRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl BoardRequest {
    /// An empty body means "all defaults"; anything else must be a valid request
    pub fn from_optional_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::Validation(ValidationError::MalformedBody(e.to_string())))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBoardResponse {
    pub board_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// GET /api/boards
pub async fn list_boards(
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let boards = store::list_boards(pool.get_ref(), user_id).await?;

    Ok(HttpResponse::Ok().json(boards))
}

/// GET /api/boards/{board_id}
///
/// The board with its tasks ordered by position.
pub async fn get_board(
    claims: web::ReqData<Claims>,
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let board = store::get_board_detail(pool.get_ref(), user_id, path.into_inner())
        .await?
        .ok_or(AppError::NotFound("Board"))?;

    Ok(HttpResponse::Ok().json(board))
}

/// POST /api/boards
///
/// Body is optional; name and description fall back to the defaults. The new
/// board is seeded with the three default tasks.
pub async fn create_board(
    claims: web::ReqData<Claims>,
    body: web::Bytes,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let context = ErrorContext::new("create_board").with_user_id(user_id);
    let form = BoardRequest::from_optional_body(&body)?;

    let name = match form.name {
        Some(name) => is_valid_name("name", &name)?,
        None => DEFAULT_BOARD_NAME.to_string(),
    };
    let description = match form.description {
        Some(description) => is_valid_description(&description)?,
        None => DEFAULT_BOARD_DESCRIPTION.to_string(),
    };

    let board = store::create_board(pool.get_ref(), user_id, &name, &description)
        .await
        .map_err(|e| context.record(e))?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user_id,
        board_id = %board.id,
        "Board created"
    );

    Ok(HttpResponse::Created().json(CreatedBoardResponse { board_id: board.id }))
}

/// PUT /api/boards/{board_id}
///
/// `name` is required; an absent `description` is left unchanged.
pub async fn update_board(
    claims: web::ReqData<Claims>,
    path: web::Path<Uuid>,
    form: web::Json<BoardRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let board_id = path.into_inner();
    let form = form.into_inner();

    let name = is_valid_name("name", &require("name", form.name)?)?;
    let description = form
        .description
        .map(|d| is_valid_description(&d))
        .transpose()?;

    let board = store::update_board(
        pool.get_ref(),
        user_id,
        board_id,
        &name,
        description.as_deref(),
    )
    .await?
    .ok_or(AppError::NotFound("Board"))?;

    tracing::info!(user_id = %user_id, board_id = %board_id, "Board updated");

    Ok(HttpResponse::Ok().json(board))
}

/// DELETE /api/boards/{board_id}
///
/// Tasks are removed by the foreign key cascade.
pub async fn delete_board(
    claims: web::ReqData<Claims>,
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let board_id = path.into_inner();

    if !store::delete_board(pool.get_ref(), user_id, board_id).await? {
        return Err(AppError::NotFound("Board"));
    }

    tracing::info!(user_id = %user_id, board_id = %board_id, "Board deleted");

    Ok(HttpResponse::Ok().json(MessageResponse::new("Board deleted successfully")))
}

/// POST /api/boards/{board_id}/tasks
///
/// Appends a task after the current last position.
pub async fn create_task(
    claims: web::ReqData<Claims>,
    path: web::Path<Uuid>,
    form: web::Json<TaskRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let board_id = path.into_inner();
    let fields = form.into_inner().into_new_task_fields()?;

    let task = store::create_task(pool.get_ref(), user_id, board_id, &fields)
        .await?
        .ok_or(AppError::NotFound("Board"))?;

    tracing::info!(
        user_id = %user_id,
        board_id = %board_id,
        task_id = %task.id,
        position = task.position,
        "Task created"
    );

    Ok(HttpResponse::Created().json(task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_means_defaults() {
        for body in [&b""[..], &b"  \n"[..]] {
            let form = BoardRequest::from_optional_body(body).unwrap();
            assert!(form.name.is_none());
            assert!(form.description.is_none());
        }
    }

    #[test]
    fn test_body_fields_are_read() {
        let form = BoardRequest::from_optional_body(br#"{"name":"Work"}"#).unwrap();
        assert_eq!(form.name.as_deref(), Some("Work"));
        assert!(form.description.is_none());
    }

    #[test]
    fn test_malformed_or_mistyped_body_is_rejected() {
        for body in [&br#"{"name":123}"#[..], &br#"{"name": "#[..], &b"[]"[..]] {
            assert!(matches!(
                BoardRequest::from_optional_body(body),
                Err(AppError::Validation(ValidationError::MalformedBody(_)))
            ));
        }
    }
}
