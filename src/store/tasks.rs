use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Task, TaskFields};
use crate::error::AppError;

/// Tasks of a board by ascending position. Callers check board ownership first.
pub async fn list_tasks(pool: &PgPool, board_id: Uuid) -> Result<Vec<Task>, AppError> {
    let tasks = sqlx::query_as::<_, Task>(
        r#"
        SELECT id, board_id, name, description, status, icon, position, created_at, updated_at
        FROM tasks
        WHERE board_id = $1
        ORDER BY position ASC, created_at ASC
        "#,
    )
    .bind(board_id)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

/// Appends a task to a board owned by `user_id` at position max + 1 (1 when empty).
/// Ownership check, position lookup and insert are one statement; `None` means
/// the board does not exist for this user.
pub async fn create_task(
    pool: &PgPool,
    user_id: Uuid,
    board_id: Uuid,
    fields: &TaskFields,
) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(
        r#"
        INSERT INTO tasks (id, board_id, name, description, status, icon, position)
        SELECT $1, b.id, $4, $5, $6, $7,
               COALESCE((SELECT MAX(position) FROM tasks WHERE board_id = b.id), 0) + 1
        FROM boards b
        WHERE b.id = $2 AND b.user_id = $3
        RETURNING id, board_id, name, description, status, icon, position, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(board_id)
    .bind(user_id)
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.status)
    .bind(&fields.icon)
    .fetch_optional(pool)
    .await?;

    Ok(task)
}

/// Replaces every editable field of a task on a board owned by `user_id`.
/// Position and board are left untouched.
pub async fn update_task(
    pool: &PgPool,
    user_id: Uuid,
    task_id: Uuid,
    fields: &TaskFields,
) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(
        r#"
        UPDATE tasks t
        SET name = $3, description = $4, status = $5, icon = $6, updated_at = NOW()
        FROM boards b
        WHERE t.id = $1 AND t.board_id = b.id AND b.user_id = $2
        RETURNING t.id, t.board_id, t.name, t.description, t.status, t.icon, t.position,
                  t.created_at, t.updated_at
        "#,
    )
    .bind(task_id)
    .bind(user_id)
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.status)
    .bind(&fields.icon)
    .fetch_optional(pool)
    .await?;

    Ok(task)
}

/// Returns false when no task on a board of `user_id` has that id
pub async fn delete_task(pool: &PgPool, user_id: Uuid, task_id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        DELETE FROM tasks t
        USING boards b
        WHERE t.id = $1 AND t.board_id = b.id AND b.user_id = $2
        "#,
    )
    .bind(task_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
