use std::sync::Arc;

use api_client::dto::UpdateTaskBody;
use api_client::{ApiClient, ApiError};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::contract::model::{NewTask, Task, TaskFilter, TaskPatch};

/// Client-side cache of one user's task list.
///
/// Reads come from the in-memory snapshot; writes round-trip through the
/// remote API and are applied to the snapshot only after the server
/// confirms them, using the server's returned object. Concurrent writes
/// against the same task race; whichever response resolves last wins.
pub struct TaskStore {
    api: Arc<ApiClient>,
    tasks: watch::Sender<Vec<Task>>,
    loading: watch::Sender<bool>,
}

impl TaskStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        let (tasks, _) = watch::channel(Vec::new());
        let (loading, _) = watch::channel(false);
        Self {
            api,
            tasks,
            loading,
        }
    }

    /// Fetch the user's tasks and replace the snapshot with the result,
    /// sorted most-recent-first. The loading flag is raised for the whole
    /// round-trip and lowered on both the success and the failure path.
    #[instrument(name = "tasks.list", skip(self))]
    pub async fn list(&self, user_id: &str, filter: TaskFilter) -> Result<Vec<Task>, ApiError> {
        self.loading.send_replace(true);

        match self.api.list_tasks(user_id, filter.completed).await {
            Ok(records) => {
                let mut tasks: Vec<Task> = records.into_iter().map(Task::from).collect();
                sort_by_created_desc(&mut tasks);
                self.tasks.send_replace(tasks.clone());
                self.loading.send_replace(false);
                debug!(count = tasks.len(), "task list refreshed");
                Ok(tasks)
            }
            Err(err) => {
                self.loading.send_replace(false);
                Err(err)
            }
        }
    }

    /// Direct fetch of a single task; the snapshot is not touched.
    #[instrument(name = "tasks.get_by_id", skip(self))]
    pub async fn get_by_id(&self, task_id: &str) -> Result<Task, ApiError> {
        Ok(self.api.get_task(task_id).await?.into())
    }

    /// Create a task (always submitted pending) and slot the server's
    /// returned object into the snapshot by creation time.
    #[instrument(name = "tasks.create", skip(self, new_task), fields(user_id = %new_task.user_id))]
    pub async fn create(&self, new_task: NewTask) -> Result<Task, ApiError> {
        let task = Task::from(self.api.create_task(&new_task.into_body()).await?);

        self.tasks.send_modify(|tasks| {
            tasks.insert(0, task.clone());
            sort_by_created_desc(tasks);
        });
        info!(task_id = %task.id, "task created");
        Ok(task)
    }

    /// Apply a partial update and replace the matching snapshot entry with
    /// the server's returned object. A task missing from the snapshot is
    /// left alone (not an error): the store may simply never have listed it.
    #[instrument(name = "tasks.update", skip(self, patch))]
    pub async fn update(&self, task_id: &str, patch: TaskPatch) -> Result<Task, ApiError> {
        let body = UpdateTaskBody::from(patch);
        let updated = Task::from(self.api.update_task(task_id, &body).await?);

        let cached = self.tasks.borrow().iter().any(|t| t.id == task_id);
        if cached {
            self.tasks.send_modify(|tasks| {
                if let Some(slot) = tasks.iter_mut().find(|t| t.id == task_id) {
                    *slot = updated.clone();
                }
            });
        }
        Ok(updated)
    }

    /// Delete remotely, then drop the entry from the snapshot.
    #[instrument(name = "tasks.delete", skip(self))]
    pub async fn delete(&self, task_id: &str) -> Result<(), ApiError> {
        self.api.delete_task(task_id).await?;

        let cached = self.tasks.borrow().iter().any(|t| t.id == task_id);
        if cached {
            self.tasks
                .send_modify(|tasks| tasks.retain(|t| t.id != task_id));
        }
        info!(%task_id, "task deleted");
        Ok(())
    }

    /// Flip a task's completion state.
    pub async fn toggle_completion(&self, task: &Task) -> Result<Task, ApiError> {
        self.update(
            &task.id,
            TaskPatch {
                completed: Some(!task.completed),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn complete(&self, task_id: &str) -> Result<Task, ApiError> {
        self.update(
            task_id,
            TaskPatch {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn uncomplete(&self, task_id: &str) -> Result<Task, ApiError> {
        self.update(
            task_id,
            TaskPatch {
                completed: Some(false),
                ..Default::default()
            },
        )
        .await
    }

    /// Fire-and-forget reload; failures are logged, never surfaced.
    pub fn refresh(self: &Arc<Self>, user_id: &str) {
        let store = Arc::clone(self);
        let user_id = user_id.to_string();
        tokio::spawn(async move {
            if let Err(err) = store.list(&user_id, TaskFilter::default()).await {
                warn!(error = %err, "background task refresh failed");
            }
        });
    }

    // --- derived read-only views, no I/O ---

    pub fn current_tasks(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    pub fn total_count(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.borrow().iter().filter(|t| t.completed).count()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.borrow().iter().filter(|t| !t.completed).count()
    }

    pub fn completed_tasks(&self) -> Vec<Task> {
        self.tasks
            .borrow()
            .iter()
            .filter(|t| t.completed)
            .cloned()
            .collect()
    }

    pub fn pending_tasks(&self) -> Vec<Task> {
        self.tasks
            .borrow()
            .iter()
            .filter(|t| !t.completed)
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over title and description. An
    /// empty (or all-whitespace) term returns the full snapshot.
    pub fn search(&self, term: &str) -> Vec<Task> {
        let term = term.trim().to_lowercase();
        let tasks = self.tasks.borrow();
        if term.is_empty() {
            return tasks.clone();
        }

        tasks
            .iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&term)
                    || t.description.to_lowercase().contains(&term)
            })
            .cloned()
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Wipe the snapshot without any network call (used on logout).
    pub fn clear(&self) {
        self.tasks.send_replace(Vec::new());
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Task>> {
        self.tasks.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }
}

fn sort_by_created_desc(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
