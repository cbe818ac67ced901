//! Interactive answers to the overload confirmation

use super::args::ConfirmationMode;
use crate::orchestrator::{ConfirmationGate, Decision, PendingSubmission};
use async_trait::async_trait;
use std::io::{self, BufRead, Write};
use tracing::warn;

/// Asks on the terminal unless the command line already decided
pub struct TerminalGate {
    mode: ConfirmationMode,
}

impl TerminalGate {
    pub fn new(mode: ConfirmationMode) -> Self {
        Self { mode }
    }

    fn describe(pending: &PendingSubmission) -> String {
        let mut text = format!(
            "'{}' (due {}) lands close to {} unfinished tasks:\n",
            pending.new_task().title,
            pending
                .new_task()
                .deadline
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            pending.conflicts().len()
        );
        for task in pending.conflicts() {
            text.push_str(&format!(
                "  #{} {} (priority {}, due {}, {}% done)\n",
                task.id,
                task.title,
                task.priority_score,
                task.deadline.map(|d| d.to_string()).unwrap_or_default(),
                task.status
            ));
        }
        text.push_str("Rescore these tasks and continue? [y/N] ");
        text
    }

    fn ask(prompt: String) -> io::Result<String> {
        let mut stdout = io::stdout();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer)
    }
}

/// Only an explicit yes proceeds
pub fn parse_answer(answer: &str) -> Decision {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Decision::Accept,
        _ => Decision::Decline,
    }
}

#[async_trait]
impl ConfirmationGate for TerminalGate {
    async fn confirm(&self, pending: &PendingSubmission) -> Decision {
        match self.mode {
            ConfirmationMode::AlwaysAccept => return Decision::Accept,
            ConfirmationMode::AlwaysDecline => return Decision::Decline,
            ConfirmationMode::Ask => {}
        }

        let prompt = Self::describe(pending);
        match tokio::task::spawn_blocking(move || Self::ask(prompt)).await {
            Ok(Ok(answer)) => parse_answer(&answer),
            Ok(Err(e)) => {
                warn!("Could not read confirmation: {}", e);
                Decision::Decline
            }
            Err(e) => {
                warn!("Confirmation prompt failed: {}", e);
                Decision::Decline
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("y\n"), Decision::Accept);
        assert_eq!(parse_answer(" YES "), Decision::Accept);
        assert_eq!(parse_answer("n"), Decision::Decline);
        assert_eq!(parse_answer(""), Decision::Decline);
        assert_eq!(parse_answer("maybe"), Decision::Decline);
    }
}
