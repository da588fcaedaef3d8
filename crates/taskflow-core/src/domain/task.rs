//! Task Entity
//!
//! A unit of work shown on the kanban board, the timeline, the calendar
//! and the list view. Meetings are tasks with a date and a time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::entity::{new_id, Entity};

/// Workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
    /// Finished meetings; shares the Done column with `Done`
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Review => "Review",
            TaskStatus::Done => "Done",
            TaskStatus::Completed => "Completed",
        }
    }

    /// The status a kanban column stands for. `Completed` folds into `Done`.
    pub fn column_status(&self) -> TaskStatus {
        match self {
            TaskStatus::Completed => TaskStatus::Done,
            other => *other,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in-progress" => Ok(TaskStatus::InProgress),
            "review" => Ok(TaskStatus::Review),
            "done" => Ok(TaskStatus::Done),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown task status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
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
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

/// Decides which views a task shows up in by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    #[default]
    Task,
    Meeting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskComment {
    pub id: String,
    /// Older payloads use `text` instead of `content`
    #[serde(alias = "text")]
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// A task as held by the task board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Project display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub assignees: Vec<String>,
    /// IDs of tasks that must finish first
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Meeting day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Meeting start, "HH:MM"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Meeting length in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default)]
    pub task_type: TaskType,
    #[serde(default = "default_true")]
    pub show_in_kanban: bool,
    #[serde(default)]
    pub show_in_timeline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub comments: Vec<TaskComment>,
}

fn default_true() -> bool {
    true
}

impl Task {
    /// Create a plain kanban task
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status,
            priority: None,
            project: None,
            project_id: None,
            assignees: Vec::new(),
            dependencies: Vec::new(),
            start_date: None,
            due_date: None,
            date: None,
            time: None,
            duration: None,
            task_type: TaskType::Task,
            show_in_kanban: true,
            show_in_timeline: false,
            recurrence: None,
            comments: Vec::new(),
        }
    }

    pub fn is_assigned_to(&self, name: &str) -> bool {
        self.assignees.iter().any(|a| a == name)
    }
}

impl Entity for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Input for `TaskBoard::add_task`: a task whose id, type and view flags
/// may still be undecided
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub assignees: Option<Vec<String>>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub task_type: Option<TaskType>,
    #[serde(default)]
    pub show_in_kanban: Option<bool>,
    #[serde(default)]
    pub show_in_timeline: Option<bool>,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            title: title.into(),
            status,
            ..Default::default()
        }
    }

    /// Resolve defaults: meetings are tasks with both a date and a time,
    /// meetings show on the timeline and plain tasks on the kanban board.
    pub fn into_task(self) -> Task {
        let task_type = self.task_type.unwrap_or(if self.date.is_some() && self.time.is_some() {
            TaskType::Meeting
        } else {
            TaskType::Task
        });
        let project_id = self.project_id.filter(|p| !p.is_empty());

        Task {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or_else(|| new_id("task")),
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            project: self.project,
            project_id,
            assignees: self.assignees.unwrap_or_default(),
            dependencies: self.dependencies,
            start_date: self.start_date,
            due_date: self.due_date,
            date: self.date,
            time: self.time,
            duration: self.duration,
            task_type,
            show_in_kanban: self.show_in_kanban.unwrap_or(task_type == TaskType::Task),
            show_in_timeline: self.show_in_timeline.unwrap_or(task_type == TaskType::Meeting),
            recurrence: self.recurrence,
            comments: Vec::new(),
        }
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            id: Some(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            project: task.project.clone(),
            project_id: task.project_id.clone(),
            assignees: Some(task.assignees.clone()),
            dependencies: task.dependencies.clone(),
            start_date: task.start_date,
            due_date: task.due_date,
            date: task.date,
            time: task.time.clone(),
            duration: task.duration,
            task_type: Some(task.task_type),
            show_in_kanban: Some(task.show_in_kanban),
            show_in_timeline: Some(task.show_in_timeline),
            recurrence: task.recurrence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_kebab_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert!("doing".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_completed_folds_into_done_column() {
        assert_eq!(TaskStatus::Completed.column_status(), TaskStatus::Done);
        assert_eq!(TaskStatus::Review.column_status(), TaskStatus::Review);
    }

    #[test]
    fn test_draft_without_date_is_kanban_task() {
        let task = TaskDraft::new("Write docs", TaskStatus::Todo).into_task();
        assert!(task.id.starts_with("task-"));
        assert_eq!(task.task_type, TaskType::Task);
        assert!(task.show_in_kanban);
        assert!(!task.show_in_timeline);
        assert!(task.assignees.is_empty());
        assert_eq!(task.project_id, None);
    }

    #[test]
    fn test_draft_with_date_and_time_is_meeting() {
        let mut draft = TaskDraft::new("Standup", TaskStatus::Todo);
        draft.date = NaiveDate::from_ymd_opt(2025, 5, 20);
        draft.time = Some("10:00".to_string());
        let task = draft.into_task();

        assert_eq!(task.task_type, TaskType::Meeting);
        assert!(!task.show_in_kanban);
        assert!(task.show_in_timeline);
    }

    #[test]
    fn test_explicit_flags_win_over_type_defaults() {
        let mut draft = TaskDraft::new("Both", TaskStatus::Todo);
        draft.id = Some("task-fixed".to_string());
        draft.show_in_timeline = Some(true);
        let task = draft.into_task();

        assert_eq!(task.id, "task-fixed");
        assert!(task.show_in_kanban);
        assert!(task.show_in_timeline);
    }

    #[test]
    fn test_task_deserializes_from_backend_shape() {
        let json = r#"{
            "id": "timeline-1",
            "title": "Project kickoff meeting",
            "status": "completed",
            "projectId": "1",
            "date": "2025-05-20",
            "time": "10:00",
            "duration": 60,
            "assignees": ["Admin User"],
            "taskType": "meeting",
            "showInTimeline": true,
            "comments": [
                {"id": "1", "author": "Admin User", "text": "hello", "createdAt": "2025-05-18T00:00:00Z"}
            ]
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.date, NaiveDate::from_ymd_opt(2025, 5, 20));
        assert_eq!(task.comments[0].content, "hello");
        assert!(task.show_in_kanban);
    }
}
