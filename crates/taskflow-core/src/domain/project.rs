//! Project Entity
//!
//! Projects nest: `path` is the slash-joined chain of ancestor ids ending in
//! the project's own id and `level` is its depth (0 for roots).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::task::Priority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    Completed,
    OnHold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: ProjectStatus,
    pub priority: Priority,
    /// 0..=100
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub team_members: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub level: u32,
}

impl Entity for Project {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub priority: Priority,
    pub team_members: Vec<String>,
    pub created_by: String,
    pub tags: Vec<String>,
    pub parent_id: Option<String>,
}

/// A project with its children, for hierarchy views
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectNode {
    pub project: Project,
    pub children: Vec<ProjectNode>,
}
