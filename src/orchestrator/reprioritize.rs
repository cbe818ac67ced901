use crate::config::OrchestratorConfig;
use crate::enrichment::{EnrichmentClient, EnrichmentSuggestion, ProposedTask};
use crate::orchestrator::reconcile::reconcile;
use crate::orchestrator::types::*;
use crate::store::TaskStore;
use crate::task::{ConflictDetector, Task};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Creates one new task at a time, rescoring the existing tasks it collides with.
///
/// The steps always run in this order: load tasks, detect conflicts, confirm,
/// rescore, reconcile, create. Below the confirmation threshold the middle
/// three are skipped. The flow suspends at the confirmation gate
/// ([`Step::AwaitingConfirmation`]) and continues in [`Self::resume`].
pub struct ReprioritizationOrchestrator {
    store: Arc<dyn TaskStore>,
    enrichment: EnrichmentClient,
    detector: ConflictDetector,
    confirmation_threshold: usize,
}

impl ReprioritizationOrchestrator {
    pub fn new(
        store: Arc<dyn TaskStore>,
        enrichment: EnrichmentClient,
        config: &OrchestratorConfig,
    ) -> Self {
        Self {
            store,
            enrichment,
            detector: ConflictDetector::new(config.conflict_window()),
            confirmation_threshold: config.confirmation_threshold,
        }
    }

    /// Ask the enrichment service for a suggestion for `form`
    pub async fn suggest(
        &self,
        form: &TaskForm,
    ) -> Result<EnrichmentSuggestion, OrchestratorError> {
        self.enrichment
            .suggest(&form.title, &form.description, &form.context)
            .await
            .map_err(|e| {
                error!("Suggestion for '{}' failed: {}", form.title, e);
                OrchestratorError::Suggestion(e)
            })
    }

    /// Run the submission up to the confirmation gate.
    ///
    /// Without a title or a suggestion nothing happens. With fewer conflicts
    /// than the threshold the task is created right away.
    pub async fn begin(
        &self,
        form: TaskForm,
        suggestion: Option<&EnrichmentSuggestion>,
    ) -> Result<Step, OrchestratorError> {
        if form.title.trim().is_empty() {
            warn!("Submission ignored: task title is blank");
            return Ok(Step::Finished(SubmissionOutcome::Aborted(
                AbortReason::MissingTitle,
            )));
        }
        let Some(suggestion) = suggestion else {
            debug!("Submission of '{}' ignored: no suggestion yet", form.title);
            return Ok(Step::Finished(SubmissionOutcome::Aborted(
                AbortReason::MissingSuggestion,
            )));
        };

        let new_task = suggestion.to_new_task(&form.title, &form.description);
        let snapshot = self
            .store
            .list_tasks()
            .await
            .map_err(OrchestratorError::TaskList)?;

        let conflicts = self.detector.detect_conflicts(new_task.deadline, &snapshot);
        info!(
            "'{}' due {:?} conflicts with {} existing tasks",
            new_task.title,
            new_task.deadline,
            conflicts.len()
        );

        let pending = PendingSubmission {
            id: Uuid::new_v4(),
            form,
            new_task,
            conflicts,
            snapshot,
        };

        if pending.conflicts.len() < self.confirmation_threshold {
            let task = self.create(&pending, None).await?;
            return Ok(Step::Finished(SubmissionOutcome::Created {
                task,
                reconciliation: None,
            }));
        }

        debug!("Submission {} awaiting confirmation", pending.id);
        Ok(Step::AwaitingConfirmation(pending))
    }

    /// Continue a suspended submission with the user's decision
    pub async fn resume(
        &self,
        pending: PendingSubmission,
        decision: Decision,
    ) -> Result<SubmissionOutcome, OrchestratorError> {
        if decision == Decision::Decline {
            info!("Submission {} declined, nothing written", pending.id);
            return Ok(SubmissionOutcome::Aborted(AbortReason::UserDeclined));
        }

        let proposed = ProposedTask {
            title: pending.new_task.title.clone(),
            description: pending.new_task.description.clone(),
            context: pending.form.context.clone(),
            deadline: pending.new_task.deadline,
        };

        let results = self
            .enrichment
            .rescore(proposed, pending.conflicts.clone())
            .await
            .map_err(|e| {
                error!("Rescoring for submission {} failed: {}", pending.id, e);
                OrchestratorError::Rescore(e)
            })?;

        let report = reconcile(
            self.store.as_ref(),
            results,
            &pending.snapshot,
            &pending.new_task.title,
        )
        .await;
        if report.failed() > 0 {
            warn!(
                "{} priority updates failed; creating '{}' anyway",
                report.failed(),
                pending.new_task.title
            );
        }

        let task = self.create(&pending, Some(&report)).await?;
        Ok(SubmissionOutcome::Created {
            task,
            reconciliation: Some(report),
        })
    }

    /// Drive a submission end to end, asking `gate` at the confirmation step
    pub async fn submit_new_task(
        &self,
        form: TaskForm,
        suggestion: Option<&EnrichmentSuggestion>,
        gate: &dyn ConfirmationGate,
    ) -> Result<SubmissionOutcome, OrchestratorError> {
        match self.begin(form, suggestion).await? {
            Step::Finished(outcome) => Ok(outcome),
            Step::AwaitingConfirmation(pending) => {
                let decision = gate.confirm(&pending).await;
                self.resume(pending, decision).await
            }
        }
    }

    async fn create(
        &self,
        pending: &PendingSubmission,
        reconciliation: Option<&ReconciliationReport>,
    ) -> Result<Task, OrchestratorError> {
        let task = self
            .store
            .create_task(pending.new_task.clone())
            .await
            .map_err(|e| {
                error!("Creating '{}' failed: {}", pending.new_task.title, e);
                if let Some(report) = reconciliation.filter(|r| r.applied() > 0) {
                    warn!(
                        "{} priority updates were already written for submission {}",
                        report.applied(),
                        pending.id
                    );
                }
                OrchestratorError::Create {
                    error: e,
                    reconciliation: reconciliation.cloned(),
                }
            })?;

        info!("Created task {} '{}'", task.id, task.title);
        Ok(task)
    }
}
