//! # Smart Todo
//!
//! Task list backend client whose tasks are enriched (priority, deadline,
//! category) by an external AI service, and whose existing tasks are
//! reprioritized when a new task's deadline collides with them.
//!
//! ## Architecture Overview
//!
//! - **[`task`]**: Task types, deadline conflict detection and list filtering
//! - **[`store`]**: Task and context persistence behind async traits (REST or in-memory)
//! - **[`enrichment`]**: Suggestion and rescoring calls to the AI enrichment service
//! - **[`orchestrator`]**: New-task submission with confirmation, rescoring and reconciliation
//! - **[`import`]**: Bulk import of external task records through the enrichment path
//! - **[`batch`]**: Multi-task deletion and selection state
//! - **[`config`]**: TOML configuration with discovery and environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smart_todo::config::AppConfig;
//! use smart_todo::enrichment::{EnrichmentClient, HttpEnrichmentClient};
//! use smart_todo::orchestrator::{Decision, FixedDecision, ReprioritizationOrchestrator, TaskForm};
//! use smart_todo::store::HttpTaskStore;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::default();
//!     let store = Arc::new(HttpTaskStore::new(&config.store)?);
//!     let service = Arc::new(HttpEnrichmentClient::new(&config.enrichment)?);
//!     let enrichment = EnrichmentClient::new(service, Duration::from_secs(60));
//!     let orchestrator =
//!         ReprioritizationOrchestrator::new(store, enrichment, &config.orchestrator);
//!
//!     let form = TaskForm::new("Prepare slides", "Quarterly review");
//!     let suggestion = orchestrator.suggest(&form).await?;
//!     let outcome = orchestrator
//!         .submit_new_task(form, Some(&suggestion), &FixedDecision(Decision::Accept))
//!         .await?;
//!
//!     println!("{:?}", outcome.created_task());
//!     Ok(())
//! }
//! ```

/// Task model, conflict detection and filtering.
pub mod task;

/// Task and context persistence.
pub mod store;

/// AI enrichment service access.
pub mod enrichment;

/// Reprioritizing task submission.
pub mod orchestrator;

/// Bulk record import.
pub mod import;

/// Batch deletion and selection.
pub mod batch;

/// Configuration management.
pub mod config;

/// File names, environment variables and defaults.
pub mod env;

/// Command line interface support for the `smart-todo` binary.
pub mod cli;

pub use batch::{BatchOperationCoordinator, BatchReport, Selection};
pub use config::{AppConfig, ConfigDiscovery, ConfigError};
pub use enrichment::{
    EnrichmentClient, EnrichmentError, EnrichmentService, EnrichmentSuggestion,
    HttpEnrichmentClient, RescoreResult,
};
pub use import::{ImportPipeline, ImportStatus, ImportSummary, TaskRecord};
pub use orchestrator::{
    ConfirmationGate, Decision, OrchestratorError, ReconciliationReport,
    ReprioritizationOrchestrator, Step, SubmissionOutcome, TaskForm,
};
pub use store::{ContextStore, HttpTaskStore, InMemoryTaskStore, StoreError, TaskStore};
pub use task::{ConflictDetector, NewTask, Task, TaskId};
