//! Task list collaborator
//!
//! Single-table CRUD over task records, SQLite-backed. Independent of the
//! generation core.

mod store;

pub use store::TaskStore;

use serde::{Deserialize, Serialize};

/// Task priority bucket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }
}

/// A stored task row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub priority: TaskPriority,
    pub category: String,
    /// RFC 3339, UTC
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a task
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default = "default_priority")]
    pub priority: TaskPriority,
    #[serde(default = "default_category")]
    pub category: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            priority: TaskPriority::Medium,
            category: default_category(),
        }
    }
}

fn default_priority() -> TaskPriority {
    TaskPriority::Medium
}

fn default_category() -> String {
    "General".to_string()
}
