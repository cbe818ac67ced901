//! REST client for the task backend.
//!
//! Endpoints are resolved relative to the configured base URL:
//!
//! | Operation | Request |
//! |---|---|
//! | list tasks | `GET tasks/` |
//! | create task | `POST tasks/create/` |
//! | update task | `PUT tasks/{id}/` |
//! | delete task | `DELETE tasks/{id}/` |
//! | list categories | `GET categories/` |
//! | list context | `GET context/` |
//! | create context | `POST context/create/` |

use crate::config::StoreConfig;
use crate::store::types::{Category, ContextEntry, NewContextEntry, SourceType};
use crate::store::{ContextStore, StoreError, TaskStore};
use crate::task::{NewTask, Task, TaskId};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Task store backed by the REST API
#[derive(Debug, Clone)]
pub struct HttpTaskStore {
    client: Client,
    base_url: Url,
}

impl HttpTaskStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Configuration(e.to_string()))?;

        let base_url = Url::parse(&config.base_url).map_err(|e| {
            StoreError::Configuration(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;

        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Categories known to the store
    pub async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let response = self.client.get(self.endpoint("categories/")?).send().await?;
        Self::read_json(response).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        self.base_url
            .join(path)
            .map_err(|e| StoreError::Configuration(format!("Invalid endpoint '{}': {}", path, e)))
    }

    fn task_endpoint(&self, id: TaskId) -> Result<Url, StoreError> {
        self.endpoint(&format!("tasks/{}/", id))
    }

    async fn check_status(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".into());
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let response = self.client.get(self.endpoint("tasks/")?).send().await?;
        let tasks: Vec<Task> = Self::read_json(response).await?;
        debug!("Listed {} tasks", tasks.len());
        Ok(tasks)
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError> {
        let response = self
            .client
            .post(self.endpoint("tasks/create/")?)
            .json(&task)
            .send()
            .await?;
        let created: Task = Self::read_json(response).await?;
        debug!("Created task {} '{}'", created.id, created.title);
        Ok(created)
    }

    async fn update_task(&self, task: Task) -> Result<Task, StoreError> {
        let response = self
            .client
            .put(self.task_endpoint(task.id)?)
            .json(&task)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(task.id));
        }
        Self::read_json(response).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), StoreError> {
        let response = self.client.delete(self.task_endpoint(id)?).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id));
        }
        Self::check_status(response).await?;
        debug!("Deleted task {}", id);
        Ok(())
    }
}

#[async_trait]
impl ContextStore for HttpTaskStore {
    async fn list_contexts(&self) -> Result<Vec<ContextEntry>, StoreError> {
        let response = self.client.get(self.endpoint("context/")?).send().await?;
        Self::read_json(response).await
    }

    async fn create_context(
        &self,
        content: String,
        source_type: SourceType,
    ) -> Result<ContextEntry, StoreError> {
        let response = self
            .client
            .post(self.endpoint("context/create/")?)
            .json(&NewContextEntry {
                content,
                source_type,
            })
            .send()
            .await?;
        Self::read_json(response).await
    }
}

/// `Url::join` drops the last path segment unless the base ends with '/'
pub(crate) fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
