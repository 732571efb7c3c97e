/// Task Routes
///
/// A task is reachable only through a board owned by the caller; anything
/// else is a 404.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::AppError;
use crate::routes::boards::MessageResponse;
use crate::store::{self, TaskFields, TaskStatus, DEFAULT_TASK_ICON};
use crate::validators::{is_valid_description, is_valid_icon, is_valid_name, require};

/// Task create/replace body. Status travels as text so an unknown value is a
/// validation error rather than a body-parse failure.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TaskRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub icon: Option<String>,
}

impl TaskRequest {
    /// Fields for a new task: only `name` is required
    pub fn into_new_task_fields(self) -> Result<TaskFields, AppError> {
        let name = is_valid_name("name", &require("name", self.name)?)?;
        let description = is_valid_description(self.description.as_deref().unwrap_or(""))?;
        let status = match self.status {
            Some(status) => status.parse::<TaskStatus>()?,
            None => TaskStatus::default(),
        };
        let icon = is_valid_icon(self.icon.as_deref().unwrap_or(DEFAULT_TASK_ICON))?;

        Ok(TaskFields {
            name,
            description,
            status,
            icon,
        })
    }

    /// Fields for a full replacement: `name`, `status` and `icon` are required,
    /// an absent description becomes empty
    pub fn into_replacement_fields(self) -> Result<TaskFields, AppError> {
        let name = is_valid_name("name", &require("name", self.name)?)?;
        let description = is_valid_description(self.description.as_deref().unwrap_or(""))?;
        let status = require("status", self.status)?.parse::<TaskStatus>()?;
        let icon = is_valid_icon(&require("icon", self.icon)?)?;

        Ok(TaskFields {
            name,
            description,
            status,
            icon,
        })
    }
}

/// PUT /api/tasks/{task_id}
pub async fn update_task(
    claims: web::ReqData<Claims>,
    path: web::Path<Uuid>,
    form: web::Json<TaskRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let task_id = path.into_inner();
    let fields = form.into_inner().into_replacement_fields()?;

    let task = store::update_task(pool.get_ref(), user_id, task_id, &fields)
        .await?
        .ok_or(AppError::NotFound("Task"))?;

    tracing::info!(
        user_id = %user_id,
        task_id = %task_id,
        status = %task.status,
        "Task updated"
    );

    Ok(HttpResponse::Ok().json(task))
}

/// DELETE /api/tasks/{task_id}
///
/// Positions of the remaining tasks are left as they are.
pub async fn delete_task(
    claims: web::ReqData<Claims>,
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let task_id = path.into_inner();

    if !store::delete_task(pool.get_ref(), user_id, task_id).await? {
        return Err(AppError::NotFound("Task"));
    }

    tracing::info!(user_id = %user_id, task_id = %task_id, "Task deleted");

    Ok(HttpResponse::Ok().json(MessageResponse::new("Task deleted successfully")))
}
