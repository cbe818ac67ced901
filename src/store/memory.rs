use crate::store::types::{ContextEntry, SourceType};
use crate::store::{ContextStore, StoreError, TaskStore};
use crate::task::{NewTask, Task, TaskId};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

/// Process-local store.
///
/// Tasks are listed newest first, matching the REST backend. Individual
/// operations can be made to fail, which the workflow tests rely on.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: DashMap<TaskId, Task>,
    contexts: DashMap<i64, ContextEntry>,
    next_id: AtomicI64,
    writes: AtomicUsize,
    failing_updates: DashSet<TaskId>,
    failing_deletes: DashSet<TaskId>,
    fail_creates: AtomicBool,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `tasks`, keeping their ids
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let store = Self::new();
        for task in tasks {
            store.next_id.fetch_max(task.id, Ordering::SeqCst);
            store.tasks.insert(task.id, task);
        }
        store
    }

    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.tasks.get(&id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of successful or attempted create/update/delete calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_update_of(&self, id: TaskId) {
        self.failing_updates.insert(id);
    }

    pub fn fail_delete_of(&self, id: TaskId) {
        self.failing_deletes.insert(id);
    }

    pub fn fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn injected_failure(operation: &str) -> StoreError {
        StoreError::Rejected {
            status: 500,
            message: format!("injected {} failure", operation),
        }
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let mut tasks: Vec<Task> = self.tasks.iter().map(|e| e.value().clone()).collect();
        tasks.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(tasks)
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(Self::injected_failure("create"));
        }

        let created = task.into_task(self.allocate_id());
        self.tasks.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_task(&self, task: Task) -> Result<Task, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.failing_updates.contains(&task.id) {
            return Err(Self::injected_failure("update"));
        }

        match self.tasks.get_mut(&task.id) {
            Some(mut entry) => {
                *entry = task.clone();
                Ok(task)
            }
            None => Err(StoreError::NotFound(task.id)),
        }
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.failing_deletes.contains(&id) {
            return Err(Self::injected_failure("delete"));
        }

        self.tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}

#[async_trait]
impl ContextStore for InMemoryTaskStore {
    async fn list_contexts(&self) -> Result<Vec<ContextEntry>, StoreError> {
        let mut entries: Vec<ContextEntry> =
            self.contexts.iter().map(|e| e.value().clone()).collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(entries)
    }

    async fn create_context(
        &self,
        content: String,
        source_type: SourceType,
    ) -> Result<ContextEntry, StoreError> {
        let entry = ContextEntry {
            id: self.contexts.len() as i64 + 1,
            content,
            source_type,
            timestamp: Utc::now(),
            processed_insights: String::new(),
        };
        self.contexts.insert(entry.id, entry.clone());
        Ok(entry)
    }
}
