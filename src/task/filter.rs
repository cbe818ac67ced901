use crate::task::types::Task;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse priority grouping used when browsing the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriorityBand {
    /// Priority 8 and above
    MostImportant,
    /// Priority 5 to 7
    Important,
    /// Priority 4 and below
    Casual,
}

impl PriorityBand {
    pub fn contains(&self, priority_score: u8) -> bool {
        match self {
            PriorityBand::MostImportant => priority_score >= 8,
            PriorityBand::Important => (5..=7).contains(&priority_score),
            PriorityBand::Casual => priority_score <= 4,
        }
    }
}

impl fmt::Display for PriorityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PriorityBand::MostImportant => "most-important",
            PriorityBand::Important => "important",
            PriorityBand::Casual => "casual",
        };
        f.write_str(name)
    }
}

impl FromStr for PriorityBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "most-important" => Ok(PriorityBand::MostImportant),
            "important" => Ok(PriorityBand::Important),
            "casual" => Ok(PriorityBand::Casual),
            other => Err(format!(
                "Invalid priority band '{}'. Must be 'most-important', 'important' or 'casual'",
                other
            )),
        }
    }
}

/// Visible-subset filter over the task list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Hide tasks below this completion percentage; 0 disables the filter
    pub min_status: u8,
    pub priority: Option<PriorityBand>,
    pub category: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if self.min_status > 0 && task.status < self.min_status {
            return false;
        }

        if let Some(band) = self.priority
            && !band.contains(task.priority_score)
        {
            return false;
        }

        if let Some(category) = &self.category
            && task.category.as_deref() != Some(category.as_str())
        {
            return false;
        }

        true
    }

    /// Tasks that pass the filter, in their original order
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }
}

/// Distinct category names present in the list, sorted
pub fn categories(tasks: &[Task]) -> Vec<String> {
    let mut names: Vec<String> = tasks.iter().filter_map(|t| t.category.clone()).collect();
    names.sort();
    names.dedup();
    names
}
