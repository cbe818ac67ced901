use crate::enrichment::RescoreResult;
use crate::orchestrator::types::{
    ReconcileOutcome, ReconcileSkip, ReconciliationEntry, ReconciliationReport,
};
use crate::store::TaskStore;
use crate::task::{Task, TaskId};
use tracing::{debug, info, warn};

/// Find the existing task a rescore result refers to.
///
/// An echoed id is authoritative. Without one the title must identify exactly
/// one task; titles are not unique, so anything else is skipped.
pub(crate) fn resolve<'a>(
    result: &RescoreResult,
    snapshot: &'a [Task],
    new_task_title: &str,
) -> Result<&'a Task, ReconcileSkip> {
    if let Some(id) = result.id {
        return snapshot
            .iter()
            .find(|task| task.id == id)
            .ok_or(ReconcileSkip::UnknownId(id));
    }

    let mut matches = snapshot.iter().filter(|task| task.title == result.title);
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task),
        (None, _) if result.title == new_task_title => Err(ReconcileSkip::NewTask),
        (None, _) => Err(ReconcileSkip::NoMatch),
        (Some(first), Some(second)) => {
            let mut ids: Vec<TaskId> = vec![first.id, second.id];
            ids.extend(matches.map(|task| task.id));
            Err(ReconcileSkip::Ambiguous(ids))
        }
    }
}

/// Apply rescore results one by one.
///
/// Each update is independent: a skipped or failed entry is recorded and the
/// rest still run. Only the priority of the matched task changes.
pub(crate) async fn reconcile(
    store: &dyn TaskStore,
    results: Vec<RescoreResult>,
    snapshot: &[Task],
    new_task_title: &str,
) -> ReconciliationReport {
    let mut report = ReconciliationReport::default();

    for result in results {
        let outcome = match resolve(&result, snapshot, new_task_title) {
            Err(skip) => {
                if skip == ReconcileSkip::NewTask {
                    debug!("Rescore result for new task '{}' not applied", result.title);
                } else {
                    warn!("Skipping rescore result '{}': {:?}", result.title, skip);
                }
                ReconcileOutcome::Skipped(skip)
            }
            Ok(existing) => {
                let updated = existing.with_priority(result.new_priority_score);
                match store.update_task(updated).await {
                    Ok(_) => {
                        debug!(
                            "Task {} '{}' priority {} -> {}",
                            existing.id,
                            existing.title,
                            existing.priority_score,
                            result.new_priority_score
                        );
                        ReconcileOutcome::Applied {
                            task_id: existing.id,
                            previous_priority: existing.priority_score,
                            new_priority: result.new_priority_score,
                        }
                    }
                    Err(error) => {
                        warn!(
                            "Failed to persist new priority for task {}: {}",
                            existing.id, error
                        );
                        ReconcileOutcome::Failed {
                            task_id: existing.id,
                            error,
                        }
                    }
                }
            }
        };

        report.entries.push(ReconciliationEntry { result, outcome });
    }

    info!(
        "Reconciliation finished: {} applied, {} skipped, {} failed",
        report.applied(),
        report.skipped(),
        report.failed()
    );
    report
}
