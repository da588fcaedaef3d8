//! Notification Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Mention,
    Assignment,
    Deadline,
    Comment,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelatedKind {
    Project,
    Task,
    Comment,
}

/// The entity a notification points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedEntity {
    #[serde(rename = "type")]
    pub kind: RelatedKind,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_to: Option<RelatedEntity>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Entity for Notification {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A notification before the center stamps id, read flag and time
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub related_to: Option<RelatedEntity>,
}

impl NotificationDraft {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            related_to: None,
        }
    }

    pub fn about_task(mut self, task_id: impl Into<String>) -> Self {
        self.related_to = Some(RelatedEntity {
            kind: RelatedKind::Task,
            id: task_id.into(),
        });
        self
    }
}
