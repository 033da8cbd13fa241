//! TaskManager: the in-memory task list plus its JSON file store.
//!
//! The store is read once when the manager is opened and written only when
//! `save` is called. Ids are assigned as `len + 1`, so after a delete the next
//! added task can share an id with an existing one; `update` touches the first
//! match and `delete` removes every match.

use chrono::NaiveDateTime;
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::TaskError;
use crate::task::{Task, TaskUpdate, DEFAULT_STATUS};

/// Result of an operation that may match no task. Not matching is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Applied,
    NoMatch,
}

#[derive(Debug)]
pub struct TaskManager {
    store_path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskManager {
    /// Open the store at `store_path`, loading any tasks already saved there.
    ///
    /// A missing file yields an empty manager.
    pub fn open(store_path: impl Into<PathBuf>) -> Result<Self, TaskError> {
        let store_path = store_path.into();
        let tasks = load(&store_path)?;
        debug!(path = %store_path.display(), count = tasks.len(), "loaded tasks");
        Ok(Self { store_path, tasks })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// First task carrying `task_id`.
    pub fn get(&self, task_id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }

    pub fn add(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: NaiveDateTime,
        status: Option<&str>,
    ) -> &Task {
        let task_id = self.tasks.len() as u64 + 1;
        let task = Task::new(task_id, title, description, due_date)
            .with_status(status.unwrap_or(DEFAULT_STATUS));
        debug!(task_id, "add task");
        self.tasks.push(task);
        &self.tasks[self.tasks.len() - 1]
    }

    /// Tasks in insertion order, optionally restricted to an exact status.
    pub fn list<'a>(&'a self, status: Option<&'a str>) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks
            .iter()
            .filter(move |t| status.is_none_or(|s| t.status == s))
    }

    pub fn update(&mut self, task_id: u64, patch: TaskUpdate) -> Change {
        match self.tasks.iter_mut().find(|t| t.task_id == task_id) {
            Some(task) => {
                patch.apply(task);
                debug!(task_id, "updated task");
                Change::Applied
            }
            None => {
                debug!(task_id, "update matched no task");
                Change::NoMatch
            }
        }
    }

    /// Remove every task carrying `task_id`; returns how many were removed.
    pub fn delete(&mut self, task_id: u64) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.task_id != task_id);
        let removed = before - self.tasks.len();
        debug!(task_id, removed, "delete");
        removed
    }

    /// Replace the store file with the current task list.
    pub fn save(&self) -> Result<(), TaskError> {
        let json = serde_json::to_string_pretty(&self.tasks).map_err(|e| TaskError::Write {
            path: self.store_path.clone(),
            source: e.into(),
        })?;

        write_replace(&self.store_path, json.as_bytes()).map_err(|source| TaskError::Write {
            path: self.store_path.clone(),
            source,
        })?;

        debug!(path = %self.store_path.display(), count = self.tasks.len(), "saved tasks");
        Ok(())
    }
}

fn load(path: &Path) -> Result<Vec<Task>, TaskError> {
    let content = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(TaskError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<Value> = serde_json::from_str(&content).map_err(|e| TaskError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    records.iter().map(Task::from_serializable).collect()
}

/// Write to a sibling temp file, then rename it over `path`.
fn write_replace(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
