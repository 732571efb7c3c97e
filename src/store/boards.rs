use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::models::{Board, BoardDetail, BoardSummary, DEFAULT_TASKS};
use super::tasks::list_tasks;
use crate::error::AppError;

const BOARD_COLUMNS: &str = "id, user_id, name, description, created_at, updated_at";

/// Inserts a board and its three default tasks (positions 1..=3) inside `transaction`.
/// The caller commits.
pub async fn insert_board_with_defaults(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    name: &str,
    description: &str,
) -> Result<Board, AppError> {
    let board = sqlx::query_as::<_, Board>(&format!(
        r#"
        INSERT INTO boards (id, user_id, name, description)
        VALUES ($1, $2, $3, $4)
        RETURNING {}
        "#,
        BOARD_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(name)
    .bind(description)
    .fetch_one(&mut *transaction)
    .await?;

    for (index, (task_name, task_description, status, icon)) in DEFAULT_TASKS.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, board_id, name, description, status, icon, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(board.id)
        .bind(*task_name)
        .bind(*task_description)
        .bind(*status)
        .bind(*icon)
        .bind(index as i32 + 1)
        .execute(&mut *transaction)
        .await?;
    }

    Ok(board)
}

/// Creates a board with its default tasks atomically
pub async fn create_board(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
    description: &str,
) -> Result<Board, AppError> {
    let mut transaction = pool.begin().await?;
    let board = insert_board_with_defaults(&mut transaction, user_id, name, description).await?;
    transaction.commit().await?;
    Ok(board)
}

/// All boards of `user_id`, newest first, each with its task count
pub async fn list_boards(pool: &PgPool, user_id: Uuid) -> Result<Vec<BoardSummary>, AppError> {
    let boards = sqlx::query_as::<_, BoardSummary>(
        r#"
        SELECT b.id, b.user_id, b.name, b.description, b.created_at, b.updated_at,
               COUNT(t.id) AS task_count
        FROM boards b
        LEFT JOIN tasks t ON t.board_id = b.id
        WHERE b.user_id = $1
        GROUP BY b.id
        ORDER BY b.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(boards)
}

pub async fn find_board(
    pool: &PgPool,
    user_id: Uuid,
    board_id: Uuid,
) -> Result<Option<Board>, AppError> {
    let board = sqlx::query_as::<_, Board>(&format!(
        "SELECT {} FROM boards WHERE id = $1 AND user_id = $2",
        BOARD_COLUMNS
    ))
    .bind(board_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(board)
}

pub async fn get_board_detail(
    pool: &PgPool,
    user_id: Uuid,
    board_id: Uuid,
) -> Result<Option<BoardDetail>, AppError> {
    let board = match find_board(pool, user_id, board_id).await? {
        Some(board) => board,
        None => return Ok(None),
    };
    let tasks = list_tasks(pool, board.id).await?;

    Ok(Some(BoardDetail { board, tasks }))
}

/// The board a client opens after login: the user's earliest board
pub async fn default_board_id(pool: &PgPool, user_id: Uuid) -> Result<Option<Uuid>, AppError> {
    let board_id = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM boards WHERE user_id = $1 ORDER BY created_at ASC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(board_id)
}

/// Renames a board. `description: None` keeps the current description.
pub async fn update_board(
    pool: &PgPool,
    user_id: Uuid,
    board_id: Uuid,
    name: &str,
    description: Option<&str>,
) -> Result<Option<Board>, AppError> {
    let board = sqlx::query_as::<_, Board>(&format!(
        r#"
        UPDATE boards
        SET name = $3, description = COALESCE($4, description), updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING {}
        "#,
        BOARD_COLUMNS
    ))
    .bind(board_id)
    .bind(user_id)
    .bind(name)
    .bind(description)
    .fetch_optional(pool)
    .await?;

    Ok(board)
}

/// Deletes a board; its tasks go with it (ON DELETE CASCADE).
/// Returns false when no board of `user_id` has that id.
pub async fn delete_board(pool: &PgPool, user_id: Uuid, board_id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM boards WHERE id = $1 AND user_id = $2")
        .bind(board_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
