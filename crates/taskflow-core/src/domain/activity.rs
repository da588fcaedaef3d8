//! File Activity Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Create,
    View,
    Download,
    Edit,
    Delete,
    Rename,
    Move,
    Share,
    PermissionChange,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Create => "create",
            ActivityType::View => "view",
            ActivityType::Download => "download",
            ActivityType::Edit => "edit",
            ActivityType::Delete => "delete",
            ActivityType::Rename => "rename",
            ActivityType::Move => "move",
            ActivityType::Share => "share",
            ActivityType::PermissionChange => "permission_change",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileActivity {
    pub id: String,
    pub file_id: String,
    pub file_name: String,
    pub activity_type: ActivityType,
    pub performed_by: String,
    pub performed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorCount {
    pub user_id: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourCount {
    pub hour: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivityStats {
    pub views: usize,
    pub downloads: usize,
    pub edits: usize,
    pub most_frequent_viewers: Vec<ActorCount>,
    pub most_active_hours: Vec<HourCount>,
}
