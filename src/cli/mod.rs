//! CLI-specific functionality
//!
//! Argument parsing, record file handling and the terminal confirmation prompt.

pub mod args;
pub mod prompt;
pub mod records;

pub use args::{Args, ConfirmationMode, ExecutionMode};
pub use prompt::TerminalGate;
pub use records::{FileError, RecordFormat, RecordLoader, export_tasks};
