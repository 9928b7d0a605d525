use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task_priority::TaskPriority;
use super::task_status::TaskStatus;

/// A task record. `assigned_users` is the full assignment set, written as a
/// whole on every change, so replacement is all-or-nothing by construction.
///
/// Invariant: `completed_at` is Some exactly when `status` is Completed.
/// All writes go through `set_status` to keep the two in step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category: Option<String>,
    pub due_date: DateTime<Utc>,
    pub created_by: Uuid,
    pub assigned_users: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub estimated_hours: Option<u32>,
    pub actual_hours: Option<u32>,
    pub is_deleted: bool,
}

impl TaskItem {
    pub fn is_assigned_to(&self, user_id: Uuid) -> bool {
        self.assigned_users.contains(&user_id)
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Completed && self.due_date < now
    }

    /// Change status, maintaining the completed_at invariant. An idempotent
    /// re-save of an already-completed task keeps the original stamp.
    pub fn set_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        if status == TaskStatus::Completed {
            if self.completed_at.is_none() {
                self.completed_at = Some(now);
            }
        } else {
            self.completed_at = None;
        }
        self.status = status;
    }

    /// Case-insensitive free-text match over title, description, category.
    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
            || self
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(needle))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> TaskItem {
        let now = Utc::now();
        TaskItem {
            id: Uuid::new_v4(),
            title: "Fix the login flow".into(),
            description: Some("Session expiry handling".into()),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            category: Some("Backend".into()),
            due_date: now + chrono::Duration::days(7),
            created_by: Uuid::new_v4(),
            assigned_users: Vec::new(),
            created_at: now,
            updated_at: None,
            completed_at: None,
            estimated_hours: None,
            actual_hours: None,
            is_deleted: false,
        }
    }

    #[test]
    fn completing_stamps_completed_at() {
        let mut task = sample_task();
        let now = Utc::now();
        task.set_status(TaskStatus::Completed, now);
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.completed_at, Some(now));
    }

    #[test]
    fn recompleting_keeps_the_original_stamp() {
        let mut task = sample_task();
        let first = Utc::now();
        task.set_status(TaskStatus::Completed, first);
        let later = first + chrono::Duration::hours(1);
        task.set_status(TaskStatus::Completed, later);
        assert_eq!(task.completed_at, Some(first));
    }

    #[test]
    fn leaving_completed_clears_the_stamp() {
        let mut task = sample_task();
        let now = Utc::now();
        task.set_status(TaskStatus::Completed, now);
        task.set_status(TaskStatus::Pending, now);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn overdue_requires_past_due_date_and_open_status() {
        let mut task = sample_task();
        let now = Utc::now();
        assert!(!task.is_overdue(now));

        task.due_date = now - chrono::Duration::days(1);
        assert!(task.is_overdue(now));

        task.set_status(TaskStatus::Completed, now);
        assert!(!task.is_overdue(now));
    }

    #[test]
    fn search_matches_any_text_field_case_insensitively() {
        let task = sample_task();
        assert!(task.matches_search("login"));
        assert!(task.matches_search("expiry"));
        assert!(task.matches_search("backend"));
        assert!(!task.matches_search("frontend"));
    }
}
