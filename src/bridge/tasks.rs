// In: src/bridge/tasks.rs

//! Background collection tasks.
//!
//! A caller registers a request, gets a task id back at once, and polls the
//! registry until the task reaches a terminal status. Each task runs on its
//! own thread; tasks share nothing but the registry.

use std::fmt;
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::bridge::format::{CollectOutcome, Summary};
use crate::bridge::stateless_api::collect_assets;
use crate::chunk_pipeline::orchestrator::CollectRequest;
use crate::config::CollectConfig;
use crate::error::CollectError;
use crate::recipes::AssetType;
use crate::source::SourceConnector;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    /// `Pending -> Running -> {Completed | Failed}`, plus `Pending -> Failed`.
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Pending, TaskStatus::Running)
                | (TaskStatus::Pending, TaskStatus::Failed)
                | (TaskStatus::Running, TaskStatus::Completed)
                | (TaskStatus::Running, TaskStatus::Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub repo_id: String,
    pub asset: AssetType,
    pub patterns: Vec<String>,
    pub status: TaskStatus,
    /// The failure message, or a note such as "no results".
    pub message: Option<String>,
    pub summary: Option<Summary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 32 random hex digits.
fn new_task_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}

/// A cloneable handle to the shared task table.
///
/// Finished tasks stay until `remove` or `prune_finished` drops them; the
/// embedding service decides when.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: Arc<RwLock<HashMap<String, Task>>>,
}

fn poisoned() -> CollectError {
    CollectError::InternalError("task registry lock poisoned".to_string())
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new `Pending` task for `request`.
    pub fn create(&self, request: &CollectRequest) -> Result<Task, CollectError> {
        let now = Utc::now();
        let task = Task {
            id: new_task_id(),
            repo_id: request.repo_id.clone(),
            asset: request.asset,
            patterns: request.patterns.clone(),
            status: TaskStatus::Pending,
            message: None,
            summary: None,
            created_at: now,
            updated_at: now,
        };
        let mut tasks = self.tasks.write().map_err(|_| poisoned())?;
        tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    pub fn get(&self, task_id: &str) -> Result<Task, CollectError> {
        let tasks = self.tasks.read().map_err(|_| poisoned())?;
        tasks
            .get(task_id)
            .cloned()
            .ok_or_else(|| CollectError::TaskNotFound(task_id.to_string()))
    }

    /// Moves a task to `status`, rejecting transitions the lifecycle forbids.
    pub fn update_status(
        &self,
        task_id: &str,
        status: TaskStatus,
        message: Option<String>,
        summary: Option<Summary>,
    ) -> Result<Task, CollectError> {
        let mut tasks = self.tasks.write().map_err(|_| poisoned())?;
        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| CollectError::TaskNotFound(task_id.to_string()))?;
        if !task.status.can_transition_to(status) {
            return Err(CollectError::InvalidTransition {
                task_id: task_id.to_string(),
                from: task.status.to_string(),
                to: status.to_string(),
            });
        }
        task.status = status;
        task.message = message;
        task.summary = summary;
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    /// Drops a finished task. Pending and running tasks cannot be removed,
    /// since their worker still has to record an outcome.
    pub fn remove(&self, task_id: &str) -> Result<Task, CollectError> {
        let mut tasks = self.tasks.write().map_err(|_| poisoned())?;
        let status = tasks
            .get(task_id)
            .map(|t| t.status)
            .ok_or_else(|| CollectError::TaskNotFound(task_id.to_string()))?;
        if !status.is_terminal() {
            return Err(CollectError::InvalidTransition {
                task_id: task_id.to_string(),
                from: status.to_string(),
                to: "REMOVED".to_string(),
            });
        }
        tasks
            .remove(task_id)
            .ok_or_else(|| CollectError::TaskNotFound(task_id.to_string()))
    }

    /// Drops finished tasks last updated more than `max_age` ago. Returns how
    /// many were dropped.
    pub fn prune_finished(&self, max_age: chrono::Duration) -> Result<usize, CollectError> {
        let cutoff = Utc::now() - max_age;
        let mut tasks = self.tasks.write().map_err(|_| poisoned())?;
        let before = tasks.len();
        tasks.retain(|_, t| !(t.status.is_terminal() && t.updated_at < cutoff));
        Ok(before - tasks.len())
    }

    pub fn len(&self) -> usize {
        self.tasks.read().map(|t| t.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn run_task(
    registry: &TaskRegistry,
    task_id: &str,
    connector: &dyn SourceConnector,
    request: &CollectRequest,
    config: &CollectConfig,
) -> Result<Task, CollectError> {
    registry.update_status(task_id, TaskStatus::Running, None, None)?;
    match collect_assets(connector, request, config) {
        Ok(CollectOutcome::Completed(summary)) => {
            registry.update_status(task_id, TaskStatus::Completed, None, Some(summary))
        }
        Ok(CollectOutcome::NoResults) => registry.update_status(
            task_id,
            TaskStatus::Completed,
            Some("no results".to_string()),
            None,
        ),
        Err(e) => registry.update_status(task_id, TaskStatus::Failed, Some(e.to_string()), None),
    }
}

/// Registers `request` and runs it on a background thread.
///
/// Returns the `Pending` task at once. Poll `registry.get(&task.id)` for
/// progress; the join handle is only needed by callers that want to block.
pub fn spawn_collection(
    registry: &TaskRegistry,
    connector: Arc<dyn SourceConnector>,
    request: CollectRequest,
    config: Arc<CollectConfig>,
) -> Result<(Task, JoinHandle<()>), CollectError> {
    let task = registry.create(&request)?;
    let worker_registry = registry.clone();
    let task_id = task.id.clone();

    let spawned = thread::Builder::new()
        .name(format!("collect-{}", &task_id[..8]))
        .spawn(move || {
            match run_task(&worker_registry, &task_id, connector.as_ref(), &request, &config) {
                Ok(task) => log::info!("Task {} finished as {}", task.id, task.status),
                Err(e) => log::error!("Task {} could not record its status: {}", task_id, e),
            }
        });

    match spawned {
        Ok(handle) => Ok((task, handle)),
        Err(e) => {
            registry.update_status(&task.id, TaskStatus::Failed, Some(e.to_string()), None)?;
            Err(e.into())
        }
    }
}
