//! Task records and the per-account task store.
//!
//! Each account owns one JSON file under `tasks/`, holding its full task
//! list newest-first. Every mutation is a locked read-modify-write that
//! persists before returning, so callers can mirror the returned record
//! without ever running ahead of durable state.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};
use crate::storage::Storage;

const TASKS_SCHEMA_VERSION: &str = "td.tasks.v1";

fn tasks_schema_version() -> String {
    TASKS_SCHEMA_VERSION.to_string()
}

/// Lifecycle stage of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    InProgress,
    Completed,
}

impl Status {
    /// All statuses, in lifecycle order
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Completed];

    /// Next status in the cycle pending -> in_progress -> completed -> pending
    pub fn advanced(self) -> Status {
        match self {
            Status::Pending => Status::InProgress,
            Status::InProgress => Status::Completed,
            Status::Completed => Status::Pending,
        }
    }

    /// Human label, e.g. for list output
    pub fn label(self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pending => write!(f, "pending"),
            Status::InProgress => write!(f, "in_progress"),
            Status::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "pending" => Ok(Status::Pending),
            "in_progress" => Ok(Status::InProgress),
            "completed" => Ok(Status::Completed),
            other => Err(Error::InvalidArgument(format!(
                "invalid status '{other}' (expected pending|in_progress|completed)"
            ))),
        }
    }
}

/// Urgency tag, used for display and filtering only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(Error::InvalidArgument(format!(
                "invalid priority '{other}' (expected low|medium|high)"
            ))),
        }
    }
}

/// A single task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique within the owning account, assigned by the store
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    /// Set once at creation, never modified
    pub created_at: DateTime<Utc>,
    /// Account the task is scoped to
    pub owner: String,
}

/// Input for creating a task; status starts as `pending`
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

/// Partial update: `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }
}

/// On-disk shape of one account's task file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaskFile {
    #[serde(default = "tasks_schema_version")]
    schema_version: String,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl Default for TaskFile {
    fn default() -> Self {
        Self {
            schema_version: tasks_schema_version(),
            tasks: Vec::new(),
        }
    }
}

/// Durable task collection for one account
#[derive(Debug, Clone)]
pub struct TaskStore {
    storage: Storage,
    account: String,
}

impl TaskStore {
    pub fn open(storage: Storage, account: impl Into<String>) -> Self {
        Self {
            storage,
            account: account.into(),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    /// Path to this account's task file
    pub fn file(&self) -> PathBuf {
        self.storage.tasks_file(&self.account)
    }

    /// Full task list in stored order (newest first)
    pub fn get_all(&self) -> Result<Vec<Task>> {
        let path = self.file();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file: TaskFile = self.storage.read_json(&path)?;
        Ok(file.tasks)
    }

    /// Single record by id
    pub fn get(&self, id: &str) -> Result<Task> {
        self.get_all()?
            .into_iter()
            .find(|task| task.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    /// Create a task; persists before returning the new record
    pub fn create(&self, draft: TaskDraft) -> Result<Task> {
        let title = non_empty("title", &draft.title)?;
        let description = non_empty("description", &draft.description)?;

        let task = Task {
            id: new_task_id(),
            title,
            description,
            status: Status::Pending,
            priority: draft.priority,
            created_at: Utc::now(),
            owner: self.account.clone(),
        };

        let created = task.clone();
        self.update_tasks(move |tasks| {
            // Newest first
            tasks.insert(0, task);
            Ok(())
        })?;

        Ok(created)
    }

    /// Apply a partial update; id, created_at, and owner are never touched
    pub fn update(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        let title = patch
            .title
            .as_deref()
            .map(|value| non_empty("title", value))
            .transpose()?;
        let description = patch
            .description
            .as_deref()
            .map(|value| non_empty("description", value))
            .transpose()?;

        let id = id.to_string();
        self.update_tasks(move |tasks| {
            let task = tasks
                .iter_mut()
                .find(|task| task.id == id)
                .ok_or_else(|| Error::TaskNotFound(id.clone()))?;

            if let Some(title) = title {
                task.title = title;
            }
            if let Some(description) = description {
                task.description = description;
            }
            if let Some(status) = patch.status {
                task.status = status;
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
            }

            Ok(task.clone())
        })
    }

    /// Remove a task; `Ok(false)` when the id does not exist
    pub fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.update_tasks(move |tasks| {
            let before = tasks.len();
            tasks.retain(|task| task.id != id);
            Ok(tasks.len() < before)
        })
    }

    fn update_tasks<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<Task>) -> Result<R>,
    {
        self.storage
            .update_json::<TaskFile, _, _>(&self.file(), |file| f(&mut file.tasks))
    }
}

fn new_task_id() -> String {
    Ulid::new().to_string().to_lowercase()
}

fn non_empty(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}
