//! Pipeline tasks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, normalize_key};

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Backlog,
    InProgress,
    Testing,
    Live,
}

impl TaskStatus {
    /// Convert to string for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "backlog",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Testing => "testing",
            TaskStatus::Live => "live",
        }
    }

    /// Parse from storage or user string
    pub fn parse(s: &str) -> Option<Self> {
        match normalize_key(s).as_str() {
            "backlog" => Some(TaskStatus::Backlog),
            "in_progress" => Some(TaskStatus::InProgress),
            "testing" => Some(TaskStatus::Testing),
            "live" | "done" => Some(TaskStatus::Live),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role that owns a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Architect,
    Merchant,
    Manager,
    Strategist,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Architect => "Architect",
            Role::Merchant => "Merchant",
            Role::Manager => "Manager",
            Role::Strategist => "Strategist",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match normalize_key(s).as_str() {
            "architect" => Some(Role::Architect),
            "merchant" => Some(Role::Merchant),
            "manager" => Some(Role::Manager),
            "strategist" => Some(Role::Strategist),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match normalize_key(s).as_str() {
            "low" => Some(Priority::Low),
            "medium" | "normal" => Some(Priority::Medium),
            "high" | "urgent" => Some(Priority::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Focus block a task needs: deep uninterrupted work or a normal slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpalBlock {
    Deep,
    #[default]
    Normal,
}

/// A unit of work in the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier
    pub id: String,
    pub name: String,
    pub owner: Role,
    pub status: TaskStatus,
    pub opal_block: OpalBlock,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    /// Project this task contributes to
    pub project_id: Option<String>,
}

impl Task {
    /// Whether the task still needs work
    pub fn is_open(&self) -> bool {
        self.status != TaskStatus::Live
    }

    /// Whether the task is past due at `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_open() && self.due_date.is_some_and(|due| due < now)
    }
}

/// Fields for a task that does not exist yet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub name: String,
    pub owner: Role,
    pub status: TaskStatus,
    pub opal_block: OpalBlock,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub project_id: Option<String>,
}

impl NewTask {
    /// A backlog task with default owner and priority
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn owned_by(mut self, owner: Role) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn deep(mut self) -> Self {
        self.opal_block = OpalBlock::Deep;
        self
    }

    pub fn due(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn in_project(mut self, project_id: Option<String>) -> Self {
        self.project_id = project_id;
        self
    }

    pub(crate) fn into_task(self) -> Task {
        Task {
            id: new_id(),
            name: self.name,
            owner: self.owner,
            status: self.status,
            opal_block: self.opal_block,
            priority: self.priority,
            due_date: self.due_date,
            project_id: self.project_id,
        }
    }
}

/// Partial update for a task; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub owner: Option<Role>,
    pub status: Option<TaskStatus>,
    pub opal_block: Option<OpalBlock>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub project_id: Option<Option<String>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn project(project_id: Option<String>) -> Self {
        Self {
            project_id: Some(project_id),
            ..Default::default()
        }
    }

    /// Whether the patch can change the linked project's completion
    pub fn touches_completion(&self) -> bool {
        self.status.is_some() || self.project_id.is_some()
    }

    pub(crate) fn merge_into(self, task: &mut Task) {
        if let Some(name) = self.name {
            task.name = name;
        }
        if let Some(owner) = self.owner {
            task.owner = owner;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(block) = self.opal_block {
            task.opal_block = block;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due) = self.due_date {
            task.due_date = due;
        }
        if let Some(project_id) = self.project_id {
            task.project_id = project_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_status_roundtrip_spellings() {
        assert_eq!(TaskStatus::parse("In Progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("LIVE"), Some(TaskStatus::Live));
        assert_eq!(TaskStatus::parse("shipped"), None);
        assert_eq!(TaskStatus::Testing.as_str(), "testing");
    }

    #[test]
    fn test_overdue_only_when_open() {
        let now = Utc::now();
        let mut task = NewTask::new("Ship it").due(now - Duration::hours(1)).into_task();
        assert!(task.is_overdue(now));

        task.status = TaskStatus::Live;
        assert!(!task.is_overdue(now));
    }

    #[test]
    fn test_patch_merge_leaves_untouched_fields() {
        let mut task = NewTask::new("Write copy")
            .with_priority(Priority::High)
            .in_project(Some("p1".into()))
            .into_task();

        TaskPatch::status(TaskStatus::Testing).merge_into(&mut task);
        assert_eq!(task.status, TaskStatus::Testing);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.project_id.as_deref(), Some("p1"));

        TaskPatch::project(None).merge_into(&mut task);
        assert!(task.project_id.is_none());
    }

    #[test]
    fn test_touches_completion() {
        assert!(TaskPatch::status(TaskStatus::Live).touches_completion());
        let rename = TaskPatch {
            name: Some("x".into()),
            ..Default::default()
        };
        assert!(!rename.touches_completion());
    }
}
