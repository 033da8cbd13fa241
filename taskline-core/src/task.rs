//! Task model and its JSON record form.
//!
//! Records are plain JSON objects with the keys `task_id`, `title`,
//! `description`, `due_date` (ISO-8601) and `status`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TaskError;

/// Status assigned when the caller does not supply one.
pub const DEFAULT_STATUS: &str = "Pending";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: u64,
    pub title: String,
    pub description: String,

    #[serde(with = "crate::time::iso8601")]
    pub due_date: NaiveDateTime,

    /// Free-form label. Filtering compares it byte-for-byte.
    pub status: String,
}

impl Task {
    pub fn new(
        task_id: u64,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: NaiveDateTime,
    ) -> Self {
        Self {
            task_id,
            title: title.into(),
            description: description.into(),
            due_date,
            status: DEFAULT_STATUS.to_string(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn to_serializable(&self) -> Map<String, Value> {
        let value = serde_json::to_value(self).expect("task fields always serialize");
        match value {
            Value::Object(m) => m,
            _ => unreachable!("struct serializes to a JSON object"),
        }
    }

    pub fn from_serializable(data: &Value) -> Result<Self, TaskError> {
        Self::deserialize(data).map_err(TaskError::from_record)
    }
}

/// Field overrides for [`crate::TaskManager::update`]. `None` leaves a field as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub status: Option<String>,
}

impl TaskUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDateTime) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
    }

    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}
