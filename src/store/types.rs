use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a context note came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Email,
    #[serde(rename = "whatsapp")]
    WhatsApp,
    Note,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceType::Email => "email",
            SourceType::WhatsApp => "whatsapp",
            SourceType::Note => "note",
        };
        f.write_str(name)
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "email" => Ok(SourceType::Email),
            "whatsapp" => Ok(SourceType::WhatsApp),
            "note" => Ok(SourceType::Note),
            other => Err(format!(
                "Invalid source type '{}'. Must be 'email', 'whatsapp' or 'note'",
                other
            )),
        }
    }
}

/// A stored context note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub id: i64,
    pub content: String,
    pub source_type: SourceType,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub processed_insights: String,
}

/// Request body for a new context note
#[derive(Debug, Clone, Serialize)]
pub(crate) struct NewContextEntry {
    pub content: String,
    pub source_type: SourceType,
}

/// Task category as listed by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub usage_frequency: i64,
}
