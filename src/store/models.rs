use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;

/// A registered user. The password hash never leaves the server.
#[derive(Debug, Clone, FromRow)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task status, stored as the Postgres enum `task_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    InProgress,
    Completed,
    WontDo,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::WontDo => "wont-do",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::InProgress
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "wont-do" => Ok(TaskStatus::WontDo),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Board row as listed, with the number of tasks it holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    #[serde(flatten)]
    pub board: Board,
    pub task_count: i64,
}

impl<'r> FromRow<'r, PgRow> for BoardSummary {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            board: Board::from_row(row)?,
            task_count: row.try_get("task_count")?,
        })
    }
}

/// Board with its tasks in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDetail {
    #[serde(flatten)]
    pub board: Board,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub board_id: Uuid,
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
    pub icon: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, user-editable task fields
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFields {
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
    pub icon: String,
}

pub const DEFAULT_BOARD_NAME: &str = "My Task Board";
pub const DEFAULT_BOARD_DESCRIPTION: &str = "Tasks to keep organised";
pub const DEFAULT_TASK_ICON: &str = "📝";

/// (name, description, status, icon) seeded at positions 1..=3 on every new board
pub const DEFAULT_TASKS: [(&str, &str, TaskStatus, &str); 3] = [
    (
        "Task in Progress",
        "This is a task that is currently in progress",
        TaskStatus::InProgress,
        "⏰",
    ),
    (
        "Task Completed",
        "This is a completed task",
        TaskStatus::Completed,
        "🎉",
    ),
    (
        "Task Won't Do",
        "This is a task that won't be done",
        TaskStatus::WontDo,
        "☕",
    ),
];
