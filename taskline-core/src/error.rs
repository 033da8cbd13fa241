//! Error type shared by the task model and the JSON store.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task record is missing field `{field}`")]
    MissingField { field: String },

    #[error("invalid task record: {0}")]
    InvalidRecord(#[source] serde_json::Error),

    #[error("invalid ISO-8601 date-time '{value}'")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("malformed task store {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("failed to read task store {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write task store {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TaskError {
    /// Classify a serde failure on a single task record.
    pub(crate) fn from_record(e: serde_json::Error) -> Self {
        let msg = e.to_string();
        match msg
            .strip_prefix("missing field `")
            .and_then(|rest| rest.split_once('`'))
        {
            Some((field, _)) => Self::MissingField {
                field: field.to_string(),
            },
            None => Self::InvalidRecord(e),
        }
    }

    /// True for errors caused by bad stored data rather than I/O.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::InvalidRecord(_)
                | Self::InvalidDate { .. }
                | Self::Malformed { .. }
        )
    }
}
