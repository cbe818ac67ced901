//! Command line argument parsing
//!
//! Subcommands:
//! - `suggest`: Ask the enrichment service about a task without saving it
//! - `submit`: Create a task, rescoring colliding tasks when needed
//! - `import`: Import a JSON or CSV file of task records
//! - `export`: Write all tasks as JSON or CSV
//! - `list`: List tasks, optionally filtered
//! - `delete`: Delete several tasks at once
//! - `context`: Add or list context entries
//! - `categories`: List known categories
//! - `show-config`: Show configuration discovery information

use super::records::RecordFormat;
use crate::orchestrator::TaskForm;
use crate::store::SourceType;
use crate::task::{PriorityBand, TaskFilter, TaskId};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug)]
pub enum ExecutionMode {
    Suggest(TaskForm),
    Submit {
        form: TaskForm,
        confirmation: ConfirmationMode,
    },
    Import(PathBuf),
    Export {
        format: RecordFormat,
        output: Option<PathBuf>,
    },
    List(TaskFilter),
    Delete(Vec<TaskId>),
    AddContext {
        content: String,
        source_type: SourceType,
    },
    ListContexts,
    ListCategories,
    ShowConfig,
}

/// How `submit` answers the overload prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationMode {
    Ask,
    AlwaysAccept,
    AlwaysDecline,
}

#[derive(Debug, Parser)]
#[command(name = "smart-todo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Task list with AI enrichment and deadline-aware reprioritization")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the enrichment suggestion for a task without creating it
    Suggest {
        title: String,
        #[arg(short = 'd', long = "description", default_value = "")]
        description: String,
        /// Free-text notes (emails, messages) passed to the enrichment service
        #[arg(long = "context", default_value = "")]
        context: String,
    },
    /// Create a task from its enrichment suggestion
    Submit {
        title: String,
        #[arg(short = 'd', long = "description", default_value = "")]
        description: String,
        #[arg(long = "context", default_value = "")]
        context: String,
        /// Proceed without asking when the deadline collides with other tasks
        #[arg(short = 'y', long = "yes", conflicts_with = "no")]
        yes: bool,
        /// Abort without asking when the deadline collides with other tasks
        #[arg(long = "no")]
        no: bool,
    },
    /// Import task records from a .json or .csv file
    Import { file: PathBuf },
    /// Export all tasks
    Export {
        #[arg(value_enum, default_value = "json")]
        format: RecordFormat,
        /// Write to a file instead of stdout
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// List tasks
    List {
        /// Only tasks at or above this completion percentage
        #[arg(long = "min-status", default_value_t = 0)]
        min_status: u8,
        /// most-important, important or casual
        #[arg(short = 'p', long = "priority")]
        priority: Option<PriorityBand>,
        #[arg(long = "category")]
        category: Option<String>,
    },
    /// Delete tasks by id
    Delete {
        #[arg(required = true)]
        ids: Vec<TaskId>,
    },
    /// Manage context entries
    #[command(subcommand)]
    Context(ContextCommand),
    /// List known categories
    Categories,
    /// Show configuration discovery information
    ShowConfig,
}

#[derive(Debug, Subcommand)]
pub enum ContextCommand {
    /// Record a piece of context
    Add {
        content: String,
        /// email, whatsapp or note
        #[arg(short = 's', long = "source", default_value = "note")]
        source: SourceType,
    },
    /// List context entries, newest first
    List,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn mode(&self) -> Result<ExecutionMode, String> {
        match &self.command {
            Some(Commands::Suggest {
                title,
                description,
                context,
            }) => Ok(ExecutionMode::Suggest(Self::form(title, description, context)?)),
            Some(Commands::Submit {
                title,
                description,
                context,
                yes,
                no,
            }) => {
                let confirmation = match (yes, no) {
                    (true, _) => ConfirmationMode::AlwaysAccept,
                    (false, true) => ConfirmationMode::AlwaysDecline,
                    (false, false) => ConfirmationMode::Ask,
                };
                Ok(ExecutionMode::Submit {
                    form: Self::form(title, description, context)?,
                    confirmation,
                })
            }
            Some(Commands::Import { file }) => Ok(ExecutionMode::Import(file.clone())),
            Some(Commands::Export { format, output }) => Ok(ExecutionMode::Export {
                format: *format,
                output: output.clone(),
            }),
            Some(Commands::List {
                min_status,
                priority,
                category,
            }) => {
                if *min_status > 100 {
                    return Err(format!(
                        "--min-status is a percentage (0-100), got {}",
                        min_status
                    ));
                }
                Ok(ExecutionMode::List(TaskFilter {
                    min_status: *min_status,
                    priority: *priority,
                    category: category.clone(),
                }))
            }
            Some(Commands::Delete { ids }) => Ok(ExecutionMode::Delete(ids.clone())),
            Some(Commands::Context(ContextCommand::Add { content, source })) => {
                if content.trim().is_empty() {
                    return Err("Context content must not be empty".to_string());
                }
                Ok(ExecutionMode::AddContext {
                    content: content.clone(),
                    source_type: *source,
                })
            }
            Some(Commands::Context(ContextCommand::List)) => Ok(ExecutionMode::ListContexts),
            Some(Commands::Categories) => Ok(ExecutionMode::ListCategories),
            Some(Commands::ShowConfig) => Ok(ExecutionMode::ShowConfig),
            None => Err(
                "No command specified. Use 'smart-todo --help' to see available commands."
                    .to_string(),
            ),
        }
    }

    fn form(title: &str, description: &str, context: &str) -> Result<TaskForm, String> {
        if title.trim().is_empty() {
            return Err("Task title must not be empty".to_string());
        }
        Ok(TaskForm::new(title.trim(), description).with_context(context))
    }
}
