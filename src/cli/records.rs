//! Task record files
//!
//! Import files are either a JSON array of records or a CSV file with a header
//! row. Export writes the current task list in the same two formats.

use crate::import::TaskRecord;
use crate::task::Task;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum FileError {
    #[error("File '{path}' is not UTF-8 encoded: {hint}")]
    NotUtf8 { path: PathBuf, hint: String },

    #[error("File '{path}' not found")]
    NotFound { path: PathBuf },

    #[error("IO error on '{path}': {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported file type '{path}' (expected .json or .csv)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Record parsing error in '{path}': {reason}")]
    ParseError { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RecordFormat {
    Json,
    Csv,
}

impl RecordFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, FileError> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(RecordFormat::Json),
            Some("csv") => Ok(RecordFormat::Csv),
            _ => Err(FileError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

pub struct RecordLoader;

impl RecordLoader {
    fn load_utf8_file(path: &Path) -> Result<String, FileError> {
        debug!("Loading record file: {:?}", path);

        fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FileError::NotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::InvalidData => FileError::NotUtf8 {
                path: path.to_path_buf(),
                hint: "Record files must be UTF-8 JSON or CSV".to_string(),
            },
            _ => FileError::IoError {
                path: path.to_path_buf(),
                source: e,
            },
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<TaskRecord>, FileError> {
        let path = path.as_ref();
        let format = RecordFormat::from_path(path)?;
        let content = Self::load_utf8_file(path)?;

        let records = match format {
            RecordFormat::Json => Self::parse_json(&content, path)?,
            RecordFormat::Csv => Self::parse_csv(&content),
        };
        debug!("Loaded {} records from {:?}", records.len(), path);
        Ok(records)
    }

    fn parse_json(content: &str, path: &Path) -> Result<Vec<TaskRecord>, FileError> {
        serde_json::from_str(content).map_err(|e| FileError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Header row names the fields; values are split on commas and trimmed.
    /// Unknown columns are ignored, unparseable numbers or dates count as absent.
    pub fn parse_csv(content: &str) -> Vec<TaskRecord> {
        let mut lines = content.trim().lines();
        let Some(header_line) = lines.next() else {
            return Vec::new();
        };
        let headers: Vec<String> = header_line.split(',').map(unquote).collect();

        lines
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(row, line)| {
                let mut record = TaskRecord::default();
                for (header, value) in headers.iter().zip(line.split(',').map(unquote)) {
                    if value.is_empty() {
                        continue;
                    }
                    match header.as_str() {
                        "title" => record.title = value,
                        "description" => record.description = value,
                        "context" => record.context = value,
                        "priority_score" => record.priority_score = lenient(row, header, &value),
                        "deadline" => record.deadline = lenient::<NaiveDate>(row, header, &value),
                        "status" => record.status = lenient(row, header, &value),
                        "category" => record.category = Some(value),
                        _ => {}
                    }
                }
                record
            })
            .collect()
    }
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .map(|v| v.replace("\"\"", "\""))
        .unwrap_or_else(|| value.to_string())
}

fn lenient<T: FromStr>(row: usize, column: &str, value: &str) -> Option<T> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Row {}: ignoring unparseable {} '{}'", row + 1, column, value);
            None
        }
    }
}

/// Render tasks for export
pub fn export_tasks(tasks: &[Task], format: RecordFormat) -> Result<String, serde_json::Error> {
    match format {
        RecordFormat::Json => serde_json::to_string_pretty(tasks),
        RecordFormat::Csv => Ok(tasks_to_csv(tasks)),
    }
}

fn tasks_to_csv(tasks: &[Task]) -> String {
    let quote = |v: &str| format!("\"{}\"", v.replace('"', "\"\""));

    let header = "id,title,description,priority_score,deadline,status,category";
    let mut lines = vec![header.to_string()];
    lines.extend(tasks.iter().map(|task| {
        [
            task.id.to_string(),
            task.title.clone(),
            task.description.clone(),
            task.priority_score.to_string(),
            task.deadline.map(|d| d.to_string()).unwrap_or_default(),
            task.status.to_string(),
            task.category.clone().unwrap_or_default(),
        ]
        .iter()
        .map(|v| quote(v))
        .collect::<Vec<_>>()
        .join(",")
    }));
    lines.join("\n")
}
