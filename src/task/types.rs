use crate::env::defaults;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier assigned by the task store
pub type TaskId = i64;

/// A persisted task as held by the task store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority_score: u8,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    /// Percent complete, 0-100
    #[serde(default)]
    pub status: u8,
    #[serde(default, deserialize_with = "category_name")]
    pub category: Option<String>,
}

/// Task fields sent to the store on creation; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority_score: u8,
    pub deadline: Option<NaiveDate>,
    pub status: u8,
    pub category: String,
}

impl Task {
    /// Copy of this task with only the priority replaced
    pub fn with_priority(&self, priority_score: u8) -> Self {
        Self {
            priority_score,
            ..self.clone()
        }
    }

    /// Whether the task is at or above the given completion percentage
    pub fn is_effectively_done(&self, completion_exemption: u8) -> bool {
        self.status >= completion_exemption
    }

    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(defaults::CATEGORY)
    }
}

impl NewTask {
    /// A new task at 0% with the given fields, category falling back to the default
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority_score: u8,
        deadline: Option<NaiveDate>,
        category: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority_score: clamp_priority(priority_score),
            deadline,
            status: 0,
            category: category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| defaults::CATEGORY.to_string()),
        }
    }

    pub fn with_status(mut self, status: u8) -> Self {
        self.status = status.min(100);
        self
    }

    /// Attach the store-assigned id
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            priority_score: self.priority_score,
            deadline: self.deadline,
            status: self.status,
            category: Some(self.category),
        }
    }
}

/// Clamp a priority into 1..=10; zero means "no priority" and takes the default
pub fn clamp_priority(score: u8) -> u8 {
    match score {
        0 => defaults::PRIORITY_SCORE,
        s => s.min(10),
    }
}

/// Category reference as it appears on the wire: either a bare name or the
/// store's structured category object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Name(String),
    Object { name: String },
}

impl CategoryRef {
    pub fn into_name(self) -> String {
        match self {
            CategoryRef::Name(name) | CategoryRef::Object { name } => name,
        }
    }
}

/// Collapse a structured category reference to a plain name
pub fn category_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<CategoryRef>::deserialize(deserializer)?;
    Ok(value
        .map(CategoryRef::into_name)
        .filter(|name| !name.trim().is_empty()))
}
