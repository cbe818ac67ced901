use crate::config::ImportConfig;
use crate::enrichment::EnrichmentClient;
use crate::import::types::*;
use crate::store::TaskStore;
use crate::task::{NewTask, Task};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

enum RecordOutcome {
    Created(Task),
    Skipped(usize),
    Failed(RecordFailure),
}

/// Persists externally supplied records through the enrichment path.
///
/// At most `concurrency` records are in flight; with the default of one the
/// batch runs strictly in sequence. A failing record never stops the batch.
pub struct ImportPipeline {
    store: Arc<dyn TaskStore>,
    enrichment: EnrichmentClient,
    concurrency: usize,
}

impl ImportPipeline {
    pub fn new(
        store: Arc<dyn TaskStore>,
        enrichment: EnrichmentClient,
        config: &ImportConfig,
    ) -> Self {
        Self {
            store,
            enrichment,
            concurrency: config.concurrency.max(1),
        }
    }

    pub async fn import_batch(&self, records: Vec<TaskRecord>) -> ImportSummary {
        info!(
            "Importing {} records ({} at a time)",
            records.len(),
            self.concurrency
        );

        let outcomes: Vec<RecordOutcome> = stream::iter(records.into_iter().enumerate())
            .map(|(index, record)| self.import_record(index, record))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut summary = ImportSummary::default();
        for outcome in outcomes {
            match outcome {
                RecordOutcome::Created(task) => summary.created.push(task),
                RecordOutcome::Skipped(index) => summary.skipped.push(index),
                RecordOutcome::Failed(failure) => summary.failed.push(failure),
            }
        }

        info!(
            "Import finished ({:?}): {} created, {} skipped, {} failed",
            summary.status(),
            summary.created.len(),
            summary.skipped.len(),
            summary.failed.len()
        );
        summary
    }

    async fn import_record(&self, index: usize, record: TaskRecord) -> RecordOutcome {
        if record.title.trim().is_empty() {
            debug!("Record {} has no title, skipping", index);
            return RecordOutcome::Skipped(index);
        }

        let title = record.title.clone();
        match self.persist(record).await {
            Ok(task) => {
                debug!("Record {} imported as task {}", index, task.id);
                RecordOutcome::Created(task)
            }
            Err(error) => {
                warn!("Record {} '{}' failed: {}", index, title, error);
                RecordOutcome::Failed(RecordFailure {
                    index,
                    title,
                    error,
                })
            }
        }
    }

    async fn persist(&self, record: TaskRecord) -> Result<Task, ImportError> {
        let new_task = self.prepare(record).await?;
        Ok(self.store.create_task(new_task).await?)
    }

    async fn prepare(&self, record: TaskRecord) -> Result<NewTask, ImportError> {
        if record.is_complete() {
            let status = record.status.unwrap_or(0);
            return Ok(NewTask::new(
                record.title,
                record.description,
                record.priority_score.unwrap_or_default(),
                record.deadline,
                record.category,
            )
            .with_status(status));
        }

        let suggestion = self
            .enrichment
            .suggest(&record.title, &record.description, &record.context)
            .await?;
        Ok(suggestion.to_new_task(&record.title, &record.description))
    }
}
