//! Task and context persistence.
//!
//! The workflows only ever talk to the [`TaskStore`] and [`ContextStore`]
//! traits. [`HttpTaskStore`] talks to the backend REST API and
//! [`InMemoryTaskStore`] keeps everything in process.

pub mod http;
pub mod memory;
pub mod types;

#[cfg(test)]
mod tests;

pub use http::HttpTaskStore;
pub use memory::InMemoryTaskStore;
pub use types::*;

use crate::task::{NewTask, Task, TaskId};
use async_trait::async_trait;

/// Store error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("Task {0} not found")]
    NotFound(TaskId),
    #[error("Store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            StoreError::Timeout(error.to_string())
        } else if error.is_decode() {
            StoreError::InvalidResponse(error.to_string())
        } else {
            StoreError::Network(error.to_string())
        }
    }
}

/// CRUD access to task records
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks, in the store's order
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError>;

    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError>;

    /// Replace the task carrying `task.id`
    async fn update_task(&self, task: Task) -> Result<Task, StoreError>;

    async fn delete_task(&self, id: TaskId) -> Result<(), StoreError>;
}

/// Free-text context notes fed to the enrichment service
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Context entries, newest first
    async fn list_contexts(&self) -> Result<Vec<ContextEntry>, StoreError>;

    async fn create_context(
        &self,
        content: String,
        source_type: SourceType,
    ) -> Result<ContextEntry, StoreError>;
}
