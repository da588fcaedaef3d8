//! Messaging Entities
//!
//! Channels own their messages. A channel can hang off a project or a task,
//! and direct channels are private conversations between members.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::entity::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Project,
    Task,
    General,
    Direct,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 4] = [
        ChannelKind::General,
        ChannelKind::Project,
        ChannelKind::Task,
        ChannelKind::Direct,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Project => "project",
            ChannelKind::Task => "task",
            ChannelKind::General => "general",
            ChannelKind::Direct => "direct",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChannelKind::Project => "Projects",
            ChannelKind::Task => "Tasks",
            ChannelKind::General => "General",
            ChannelKind::Direct => "Direct",
        }
    }
}

impl FromStr for ChannelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChannelKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown channel type: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub emoji: String,
    pub count: u32,
    pub users: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub author: String,
    pub channel_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mentions: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub is_pinned: bool,
    /// Message this one replies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<String>,
}

impl Entity for Message {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageChannel {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    pub members: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_task_id: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Entity for MessageChannel {
    fn id(&self) -> &str {
        &self.id
    }
}

impl MessageChannel {
    pub fn is_member(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// A channel before the board stamps id and creation time
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelDraft {
    pub name: String,
    pub description: Option<String>,
    pub kind: ChannelKind,
    pub members: Vec<String>,
    pub created_by: String,
    pub related_project_id: Option<String>,
    pub related_task_id: Option<String>,
    pub is_private: bool,
}

impl ChannelDraft {
    /// A public channel whose only member is its creator
    pub fn new(name: impl Into<String>, kind: ChannelKind, created_by: impl Into<String>) -> Self {
        let created_by = created_by.into();
        Self {
            name: name.into(),
            description: None,
            kind,
            members: vec![created_by.clone()],
            created_by,
            related_project_id: None,
            related_task_id: None,
            is_private: false,
        }
    }
}
