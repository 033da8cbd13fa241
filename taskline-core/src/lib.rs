//! taskline-core: task model and file-backed task list for the taskline CLI.

pub mod error;
pub mod manager;
pub mod task;
pub mod time;

pub use error::TaskError;
pub use manager::{Change, TaskManager};
pub use task::{Task, TaskUpdate, DEFAULT_STATUS};
pub use time::{format_due_date, parse_due_date};
