use api_client::dto::{CreateTaskBody, TaskRecord, UpdateTaskBody};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted task. Tasks always belong to exactly one user; `user_id`
/// never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            completed: record.completed,
            user_id: record.user_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// The unpersisted form of a task: no id yet, and submission always starts
/// it pending regardless of what the caller might have in mind.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub user_id: String,
}

impl NewTask {
    pub(crate) fn into_body(self) -> CreateTaskBody {
        CreateTaskBody::new(self.title, self.description, self.user_id)
    }
}

/// Partial update: `None` means "leave the field alone" and is never sent
/// on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl From<TaskPatch> for UpdateTaskBody {
    fn from(patch: TaskPatch) -> Self {
        Self {
            title: patch.title,
            description: patch.description,
            completed: patch.completed,
        }
    }
}

/// Server-side filter for the list operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub completed: Option<bool>,
}

impl TaskFilter {
    pub fn completed_only() -> Self {
        Self {
            completed: Some(true),
        }
    }

    pub fn pending_only() -> Self {
        Self {
            completed: Some(false),
        }
    }
}
