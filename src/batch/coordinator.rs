use crate::store::{StoreError, TaskStore};
use crate::task::TaskId;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

/// Per-id result of a batch delete, in request order
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<(TaskId, Result<(), StoreError>)>,
}

impl BatchReport {
    pub fn succeeded(&self) -> Vec<TaskId> {
        self.outcomes
            .iter()
            .filter(|(_, r)| r.is_ok())
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn failed(&self) -> Vec<(TaskId, &StoreError)> {
        self.outcomes
            .iter()
            .filter_map(|(id, r)| r.as_ref().err().map(|e| (*id, e)))
            .collect()
    }

    pub fn is_complete_success(&self) -> bool {
        self.outcomes.iter().all(|(_, r)| r.is_ok())
    }
}

/// Fans out deletions for a selection of tasks.
///
/// Not transactional: deletions that succeeded stay deleted when others fail.
/// Callers should reload the task list afterwards.
pub struct BatchOperationCoordinator {
    store: Arc<dyn TaskStore>,
}

impl BatchOperationCoordinator {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn delete_many(&self, ids: &[TaskId]) -> BatchReport {
        let results = join_all(ids.iter().map(|&id| self.store.delete_task(id))).await;

        let report = BatchReport {
            outcomes: ids.iter().copied().zip(results).collect(),
        };
        for (id, error) in report.failed() {
            warn!("Deleting task {} failed: {}", id, error);
        }
        info!(
            "Deleted {} of {} tasks",
            report.succeeded().len(),
            ids.len()
        );
        report
    }
}
