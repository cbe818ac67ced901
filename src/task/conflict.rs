//! Deadline conflict detection.
//!
//! A candidate deadline conflicts with an existing task when the two deadlines
//! are at most [`ConflictWindow::max_days_apart`] days apart and the existing
//! task is still below [`ConflictWindow::completion_exemption`] percent done.

use crate::env::defaults;
use crate::task::types::Task;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Proximity rule used to decide whether two tasks compete for the same days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictWindow {
    pub max_days_apart: i64,
    pub completion_exemption: u8,
}

impl Default for ConflictWindow {
    fn default() -> Self {
        Self {
            max_days_apart: defaults::CONFLICT_WINDOW_DAYS,
            completion_exemption: defaults::COMPLETION_EXEMPTION,
        }
    }
}

impl ConflictWindow {
    /// Whether `task` conflicts with a task due on `candidate`.
    ///
    /// Tasks without a deadline never conflict.
    pub fn conflicts_with(&self, candidate: NaiveDate, task: &Task) -> bool {
        let Some(deadline) = task.deadline else {
            return false;
        };

        let days_apart = (deadline - candidate).num_days().abs();
        days_apart <= self.max_days_apart && !task.is_effectively_done(self.completion_exemption)
    }
}

/// Pure conflict detector over a snapshot of the task list
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector {
    window: ConflictWindow,
}

impl ConflictDetector {
    pub fn new(window: ConflictWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> ConflictWindow {
        self.window
    }

    /// Return the existing tasks in conflict with `candidate`, in list order.
    ///
    /// An absent candidate deadline never conflicts with anything.
    pub fn detect_conflicts(&self, candidate: Option<NaiveDate>, existing: &[Task]) -> Vec<Task> {
        let Some(candidate) = candidate else {
            return Vec::new();
        };

        existing
            .iter()
            .filter(|task| self.window.conflicts_with(candidate, task))
            .cloned()
            .collect()
    }
}

/// [`ConflictDetector::detect_conflicts`] with the default window
pub fn detect_conflicts(candidate: Option<NaiveDate>, existing: &[Task]) -> Vec<Task> {
    ConflictDetector::default().detect_conflicts(candidate, existing)
}
