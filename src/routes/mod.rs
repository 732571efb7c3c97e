mod auth;
mod boards;
mod health_check;
mod tasks;

pub use auth::{
    login, refresh, signup, validate, CredentialsRequest, RefreshRequest, RefreshResponse,
    SessionResponse, ValidateResponse,
};
pub use boards::{
    create_board, create_task, delete_board, get_board, list_boards, update_board, BoardRequest,
    CreatedBoardResponse, MessageResponse,
};
pub use health_check::health_check;
pub use tasks::{delete_task, update_task, TaskRequest};
