//! Task data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Validation failures for user-supplied tokens
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "'{0}' is not a priority I recognize.\n\
         Use high, medium, low, none (or 1-4)."
    )]
    InvalidPriority(String),

    #[error("No tasks selected. Pass at least one task number.")]
    EmptySelection,

    #[error("A task needs a title.")]
    EmptyTitle,
}

/// Task priority. Ordering is canonical: High sorts before Medium before
/// Low before None, so an ascending sort puts the most urgent tasks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
    #[default]
    None,
}

impl Priority {
    /// Parse a priority token. Numeric shorthand (1=high .. 4=none) is
    /// tried before the word forms.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let token = s.trim();

        if let Ok(n) = token.parse::<u8>() {
            return match n {
                1 => Ok(Self::High),
                2 => Ok(Self::Medium),
                3 => Ok(Self::Low),
                4 => Ok(Self::None),
                _ => Err(ValidationError::InvalidPriority(s.to_string())),
            };
        }

        match token.to_lowercase().as_str() {
            "high" | "h" => Ok(Self::High),
            "medium" | "med" | "m" => Ok(Self::Medium),
            "low" | "l" => Ok(Self::Low),
            "none" | "n" => Ok(Self::None),
            _ => Err(ValidationError::InvalidPriority(s.to_string())),
        }
    }

    /// Get the text label
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::None => "none",
        }
    }

    /// Get the list-view symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::High => "⚡",
            Self::Medium => "●",
            Self::Low => "○",
            Self::None => " ",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Why a task left the active list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveReason {
    Completed,
    Deleted,
    Expired,
}

impl ArchiveReason {
    /// Parse a reason token
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "completed" => Some(Self::Completed),
            "deleted" => Some(Self::Deleted),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }

    /// Get the text label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Deleted => "deleted",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for ArchiveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A task on the active list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque unique ID, assigned at creation and never reused
    pub id: String,

    /// Task title
    pub title: String,

    /// Priority level
    #[serde(default)]
    pub priority: Priority,

    /// Due instant, if any. Always a resolved point in time.
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,

    /// Free-text labels. Deduplicated, never empty strings.
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task with a fresh ID
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title,
            priority: Priority::default(),
            due: None,
            tags: BTreeSet::new(),
            created_at: now,
        })
    }

    /// Check whether the task is overdue at `now`. The due instant itself
    /// is not overdue; only instants strictly after it are.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due.is_some_and(|due| now > due)
    }
}

/// Snapshot of a task that left the active list. Immutable history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedTask {
    /// The task as it was at archival time
    pub task: Task,

    /// When the task was archived
    pub archived_at: DateTime<Utc>,

    /// Why it was archived
    pub reason: ArchiveReason,
}

/// Split a comma-separated tag string into a normalized tag set.
/// Whitespace is trimmed, empty segments dropped, duplicates collapse.
pub fn parse_tags(input: &str) -> BTreeSet<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
