//! Reprioritizing task submission.
//!
//! A new task whose deadline lands among too many unfinished tasks triggers a
//! confirmation, a remote rescoring of the colliding tasks and a best-effort
//! update of their priorities before the new task is created.

pub mod reconcile;
pub mod reprioritize;
pub mod types;


pub use reprioritize::ReprioritizationOrchestrator;
pub use types::*;
