//! File and Folder Entities
//!
//! Folders form a tree through `parent_id`; files point at their folder.
//! Both carry per-user permission grants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::entity::Entity;

/// Access level, ordered view < edit < delete < admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    View,
    Edit,
    Delete,
    Admin,
}

impl PermissionLevel {
    /// Whether holding `self` satisfies a check for `required`
    pub fn grants(self, required: PermissionLevel) -> bool {
        match (self, required) {
            (PermissionLevel::Admin, _) => true,
            (held, required) if held == required => true,
            (PermissionLevel::Edit | PermissionLevel::Delete, PermissionLevel::View) => true,
            (PermissionLevel::Delete, PermissionLevel::Edit) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::View => "view",
            PermissionLevel::Edit => "edit",
            PermissionLevel::Delete => "delete",
            PermissionLevel::Admin => "admin",
        }
    }
}

impl FromStr for PermissionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(PermissionLevel::View),
            "edit" => Ok(PermissionLevel::Edit),
            "delete" => Ok(PermissionLevel::Delete),
            "admin" => Ok(PermissionLevel::Admin),
            other => Err(format!("unknown permission: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePermission {
    pub id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub file_id: String,
    pub permission: PermissionLevel,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderPermission {
    pub id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub folder_id: String,
    pub permission: PermissionLevel,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    /// Recorded with the grant; descendants see ancestor grants either way
    pub inherit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileVersion {
    pub id: String,
    pub file_id: String,
    pub version_number: u32,
    pub size: u64,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<String>,
}

/// A file in the file manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub id: String,
    pub name: String,
    /// MIME type
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub folder_id: Option<String>,
    pub project_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub permissions: Vec<FilePermission>,
    #[serde(default)]
    pub version_history: Vec<FileVersion>,
}

impl StoredFile {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

impl Entity for StoredFile {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub project_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    /// Display path, e.g. "Projects/Website"
    pub path: String,
    #[serde(default)]
    pub permissions: Vec<FolderPermission>,
}

impl Entity for Folder {
    fn id(&self) -> &str {
        &self.id
    }
}

/// What the browser tells us about a picked file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileUpload {
    pub name: String,
    /// Empty when the browser could not tell
    pub mime_type: String,
    pub size: u64,
    /// Object URL or server URL of the uploaded content
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use PermissionLevel::*;

    #[test]
    fn test_permission_grants() {
        assert!(Admin.grants(Admin));
        assert!(Admin.grants(View));
        assert!(Delete.grants(Edit));
        assert!(Delete.grants(View));
        assert!(Edit.grants(View));
        assert!(View.grants(View));

        assert!(!View.grants(Edit));
        assert!(!Edit.grants(Delete));
        assert!(!Delete.grants(Admin));
        assert!(!Edit.grants(Admin));
    }

    #[test]
    fn test_file_type_field_is_named_type() {
        let now = Utc::now();
        let file = StoredFile {
            id: "file-1".into(),
            name: "a.png".into(),
            mime_type: "image/png".into(),
            size: 10,
            url: "blob:a".into(),
            created_at: now,
            updated_at: now,
            created_by: "1".into(),
            folder_id: None,
            project_id: None,
            tags: vec![],
            description: None,
            thumbnail: None,
            favorite: false,
            permissions: vec![],
            version_history: vec![],
        };
        let value = serde_json::to_value(&file).unwrap();
        assert_eq!(value["type"], "image/png");
        assert_eq!(value["folderId"], serde_json::Value::Null);
        assert!(file.is_image());
    }
}
