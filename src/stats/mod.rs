//! Dashboard aggregation
//!
//! Pure summaries over task rows for the dashboard view. No state of its
//! own; the shell fetches tasks from the store and projects them here.

use crate::tasks::{Task, TaskPriority};
use serde::Serialize;

/// How many completed tasks the activity feed shows
const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Completion stats for one priority bucket
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriorityStats {
    pub total: usize,
    pub completed: usize,
    /// Rounded share of completed tasks, 0 when the bucket is empty
    pub percent: u32,
}

/// Aggregated dashboard view of the task list
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub open_tasks: usize,
    pub completed_tasks: usize,
    pub high: PriorityStats,
    pub medium: PriorityStats,
    pub low: PriorityStats,
}

/// Summarize the task list for the dashboard cards
pub fn dashboard_stats(tasks: &[Task]) -> DashboardStats {
    DashboardStats {
        open_tasks: tasks.iter().filter(|t| !t.completed).count(),
        completed_tasks: tasks.iter().filter(|t| t.completed).count(),
        high: priority_stats(tasks, TaskPriority::High),
        medium: priority_stats(tasks, TaskPriority::Medium),
        low: priority_stats(tasks, TaskPriority::Low),
    }
}

/// Completion breakdown for one priority
pub fn priority_stats(tasks: &[Task], priority: TaskPriority) -> PriorityStats {
    let total = tasks.iter().filter(|t| t.priority == priority).count();
    let completed = tasks
        .iter()
        .filter(|t| t.priority == priority && t.completed)
        .count();
    let percent = if total > 0 {
        ((completed as f64 / total as f64) * 100.0).round() as u32
    } else {
        0
    };

    PriorityStats {
        total,
        completed,
        percent,
    }
}

/// Most recently finished tasks, newest first, capped for the activity feed.
/// Falls back to creation time for rows that were never updated.
pub fn recent_completed(tasks: &[Task]) -> Vec<Task> {
    let mut done: Vec<Task> = tasks.iter().filter(|t| t.completed).cloned().collect();
    done.sort_by(|a, b| {
        let a_time = if a.updated_at.is_empty() { &a.created_at } else { &a.updated_at };
        let b_time = if b.updated_at.is_empty() { &b.created_at } else { &b.updated_at };
        b_time.cmp(a_time)
    });
    done.truncate(RECENT_ACTIVITY_LIMIT);
    done
}
