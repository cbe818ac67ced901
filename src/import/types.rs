use crate::enrichment::EnrichmentError;
use crate::enrichment::types::score_from_value;
use crate::store::StoreError;
use crate::task::{Task, category_name};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// An externally supplied task, already parsed from its file format.
///
/// Numeric and date fields that cannot be read count as absent, so a record
/// with a bad value still goes through enrichment instead of failing the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub context: String,
    #[serde(default, deserialize_with = "record_priority")]
    pub priority_score: Option<u8>,
    #[serde(default, deserialize_with = "record_deadline")]
    pub deadline: Option<NaiveDate>,
    #[serde(default, deserialize_with = "record_status")]
    pub status: Option<u8>,
    #[serde(default, deserialize_with = "category_name")]
    pub category: Option<String>,
}

impl TaskRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Records carrying both a priority and a deadline skip enrichment
    pub fn is_complete(&self) -> bool {
        self.priority_score.is_some_and(|p| p > 0) && self.deadline.is_some()
    }
}

fn bounded_field<'de, D>(
    deserializer: D,
    field: &str,
    range: (i64, i64),
) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    match score_from_value(&value) {
        Some(n) if (range.0..=range.1).contains(&n) => Ok(Some(n as u8)),
        _ => {
            warn!("Ignoring unusable record {} {}", field, value);
            Ok(None)
        }
    }
}

/// Scores 1-10; zero means "none"
fn record_priority<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    bounded_field(deserializer, "priority_score", (1, 10))
}

/// Percent complete, 0-100
fn record_status<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    bounded_field(deserializer, "status", (0, 100))
}

fn record_deadline<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) if raw.trim().is_empty() => None,
        Some(Value::String(raw)) => match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(e) => {
                warn!("Ignoring unparseable record deadline '{}': {}", raw, e);
                None
            }
        },
        Some(other) => {
            warn!("Ignoring unusable record deadline {}", other);
            None
        }
    })
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ImportError {
    #[error("Enrichment failed: {0}")]
    Enrichment(#[from] EnrichmentError),
    #[error("Persisting failed: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct RecordFailure {
    /// Position of the record in the input batch
    pub index: usize,
    pub title: String,
    pub error: ImportError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStatus {
    Succeeded,
    PartiallySucceeded,
    Failed,
}

/// What an import did, in input order
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub created: Vec<Task>,
    /// Indices of records without a title
    pub skipped: Vec<usize>,
    pub failed: Vec<RecordFailure>,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.created.len() + self.skipped.len() + self.failed.len()
    }

    pub fn status(&self) -> ImportStatus {
        match (self.created.is_empty(), self.failed.is_empty()) {
            (_, true) => ImportStatus::Succeeded,
            (true, false) => ImportStatus::Failed,
            (false, false) => ImportStatus::PartiallySucceeded,
        }
    }
}
