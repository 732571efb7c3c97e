/// Persistence layer
///
/// Every query that touches a board or task takes the requesting user's id and
/// joins on `boards.user_id`, so rows owned by someone else behave as absent.

mod boards;
mod models;
mod tasks;

pub use boards::{
    create_board, default_board_id, delete_board, find_board, get_board_detail,
    insert_board_with_defaults, list_boards, update_board,
};
pub use models::{
    Board, BoardDetail, BoardSummary, Identity, Task, TaskFields, TaskStatus,
    DEFAULT_BOARD_DESCRIPTION, DEFAULT_BOARD_NAME, DEFAULT_TASKS, DEFAULT_TASK_ICON,
};
pub use tasks::{create_task, delete_task, list_tasks, update_task};
