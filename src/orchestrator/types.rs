use crate::enrichment::{EnrichmentError, RescoreResult};
use crate::store::StoreError;
use crate::task::{NewTask, Task, TaskId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User-supplied fields for a new task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Free-text notes passed to the enrichment service
    #[serde(default)]
    pub context: String,
}

impl TaskForm {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            context: String::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}

/// Answer to the overload confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Decline,
}

/// A submission suspended at the confirmation gate.
///
/// Nothing has been written yet; hand it back to
/// [`ReprioritizationOrchestrator::resume`](super::ReprioritizationOrchestrator::resume)
/// together with the user's [`Decision`].
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub(crate) id: Uuid,
    pub(crate) form: TaskForm,
    pub(crate) new_task: NewTask,
    pub(crate) conflicts: Vec<Task>,
    pub(crate) snapshot: Vec<Task>,
}

impl PendingSubmission {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The task that will be created if the submission proceeds
    pub fn new_task(&self) -> &NewTask {
        &self.new_task
    }

    /// Existing tasks whose deadlines collide with the new one
    pub fn conflicts(&self) -> &[Task] {
        &self.conflicts
    }
}

/// Where [`ReprioritizationOrchestrator::begin`](super::ReprioritizationOrchestrator::begin) stopped
#[derive(Debug)]
pub enum Step {
    Finished(SubmissionOutcome),
    AwaitingConfirmation(PendingSubmission),
}

/// Terminal, non-error result of a submission
#[derive(Debug)]
pub enum SubmissionOutcome {
    Created {
        task: Task,
        /// Present when conflicting tasks were rescored
        reconciliation: Option<ReconciliationReport>,
    },
    Aborted(AbortReason),
}

impl SubmissionOutcome {
    pub fn created_task(&self) -> Option<&Task> {
        match self {
            SubmissionOutcome::Created { task, .. } => Some(task),
            SubmissionOutcome::Aborted(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The form's title is empty or whitespace
    MissingTitle,
    /// No suggestion was obtained before submitting
    MissingSuggestion,
    /// The user declined to proceed despite the conflicts
    UserDeclined,
}

/// Fatal submission errors. None of them leaves a new task behind, but a
/// failed [`OrchestratorError::Create`] after an accepted confirmation may
/// follow priority updates that were already written; its `reconciliation`
/// lists them.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OrchestratorError {
    #[error("Could not obtain a suggestion: {0}")]
    Suggestion(EnrichmentError),
    #[error("Rescoring failed, the new task was not created: {0}")]
    Rescore(EnrichmentError),
    #[error("Could not load existing tasks: {0}")]
    TaskList(StoreError),
    #[error("Failed to create task: {error}")]
    Create {
        error: StoreError,
        reconciliation: Option<ReconciliationReport>,
    },
}

impl OrchestratorError {
    /// Priority updates written before the failure, if any ran
    pub fn reconciliation(&self) -> Option<&ReconciliationReport> {
        match self {
            OrchestratorError::Create {
                reconciliation: Some(report),
                ..
            } => Some(report),
            _ => None,
        }
    }
}

/// Why a rescore result was not applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileSkip {
    /// No existing task carries the result's title
    NoMatch,
    /// Several existing tasks carry the result's title
    Ambiguous(Vec<TaskId>),
    /// The echoed id is not among the known tasks
    UnknownId(TaskId),
    /// The result scores the task being submitted, which does not exist yet
    NewTask,
}

#[derive(Debug, Clone)]
pub enum ReconcileOutcome {
    Applied {
        task_id: TaskId,
        previous_priority: u8,
        new_priority: u8,
    },
    Skipped(ReconcileSkip),
    Failed {
        task_id: TaskId,
        error: StoreError,
    },
}

#[derive(Debug, Clone)]
pub struct ReconciliationEntry {
    pub result: RescoreResult,
    pub outcome: ReconcileOutcome,
}

/// Every rescore result and what became of it, in response order
#[derive(Debug, Clone, Default)]
pub struct ReconciliationReport {
    pub entries: Vec<ReconciliationEntry>,
}

impl ReconciliationReport {
    pub fn applied(&self) -> usize {
        self.count(|o| matches!(o, ReconcileOutcome::Applied { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ReconcileOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ReconcileOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&ReconcileOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| predicate(&e.outcome)).count()
    }
}

/// Answers the confirmation prompt for callers that can decide inline
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    async fn confirm(&self, pending: &PendingSubmission) -> Decision;
}

/// Gate that always gives the same answer
#[derive(Debug, Clone, Copy)]
pub struct FixedDecision(pub Decision);

#[async_trait]
impl ConfirmationGate for FixedDecision {
    async fn confirm(&self, _pending: &PendingSubmission) -> Decision {
        self.0
    }
}
