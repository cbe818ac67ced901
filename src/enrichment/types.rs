use crate::env::defaults;
use crate::task::{NewTask, Task, TaskId};
use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// The caller's notion of "today", sent so the service can resolve relative
/// deadlines such as "next Friday" without its own clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDate {
    /// `YYYY-MM-DD`
    pub current_date: NaiveDate,
    /// English weekday name, e.g. "Sunday"
    pub current_day: String,
}

impl RequestDate {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            current_date: date,
            current_day: weekday_name(date.weekday()).to_string(),
        }
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Source of the invocation-time date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    fn request_date(&self) -> RequestDate {
        RequestDate::from_date(self.today())
    }
}

/// Local wall-clock date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Body of a suggestion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestRequest {
    pub title: String,
    pub description: String,
    pub context: String,
    #[serde(flatten)]
    pub date: RequestDate,
}

impl SuggestRequest {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        context: impl Into<String>,
        date: RequestDate,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            context: context.into(),
            date,
        }
    }
}

/// Structured suggestion for one task.
///
/// Every field is optional; the service makes no completeness promise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentSuggestion {
    #[serde(default)]
    pub enhanced_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority_score: Option<u8>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub suggested_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub suggested_category: Option<String>,
    #[serde(default)]
    pub tip_or_advice: Option<String>,
}

impl EnrichmentSuggestion {
    pub fn description_or(&self, fallback: &str) -> String {
        self.enhanced_description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    pub fn priority_or_default(&self) -> u8 {
        self.priority_score.unwrap_or(defaults::PRIORITY_SCORE)
    }

    /// Build the task to persist, applying defaults for whatever is missing
    pub fn to_new_task(&self, title: &str, fallback_description: &str) -> NewTask {
        NewTask::new(
            title,
            self.description_or(fallback_description),
            self.priority_or_default(),
            self.suggested_deadline,
            self.suggested_category.clone(),
        )
    }
}

/// The task being proposed, as described to the rescoring service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposedTask {
    pub title: String,
    pub description: String,
    pub context: String,
    pub deadline: Option<NaiveDate>,
}

/// Body of a rescore request.
///
/// `current_tasks` carries full task records, ids included, so the service
/// can echo the id of each task it scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RescoreRequest {
    pub new_task: ProposedTask,
    pub current_tasks: Vec<Task>,
    #[serde(flatten)]
    pub date: RequestDate,
}

/// New priority for one task considered during rescoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescoreResult {
    /// Echoed task id; absent for services that only return titles
    #[serde(default)]
    pub id: Option<TaskId>,
    pub title: String,
    #[serde(deserialize_with = "required_priority")]
    pub new_priority_score: u8,
    #[serde(default)]
    pub recommended_category: Option<String>,
}

/// Enrichment errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Enrichment service unavailable: {0}")]
    Unavailable(String),
    #[error("Enrichment request timed out: {0}")]
    Timeout(String),
    #[error("Enrichment service error ({status}): {message}")]
    Service { status: u16, message: String },
    #[error("Malformed enrichment response: {0}")]
    MalformedResponse(String),
    #[error("Invalid enrichment configuration: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for EnrichmentError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            EnrichmentError::Timeout(error.to_string())
        } else {
            EnrichmentError::Unavailable(error.to_string())
        }
    }
}

/// Integer reading of a JSON number or numeric string, rounded
pub(crate) fn score_from_value(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64)),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    }
}

/// Scores arrive as numbers or numeric strings; non-positive means "none"
fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(score_from_value)
        .filter(|score| *score > 0)
        .map(|score| score.min(10) as u8))
}

fn required_priority<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    score_from_value(&value)
        .map(|score| score.clamp(1, 10) as u8)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid priority score: {}", value)))
}

/// Unparseable deadlines are dropped rather than failing the whole suggestion
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(e) => {
                warn!("Ignoring unparseable suggested deadline '{}': {}", raw, e);
                None
            }
        }
    }))
}
