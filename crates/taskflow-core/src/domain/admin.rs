//! Admin Entities
//!
//! Flat CRUD records managed from the admin console, plus the pagination
//! envelope and the metrics payloads of the dashboard endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::task::Task;
use super::user::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, alias = "last_login", skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
}

impl Entity for AdminUser {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default, alias = "user_count")]
    pub user_count: u32,
}

impl Entity for Role {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Setting value; the backend sends bare JSON scalars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl SettingValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Bool(_) => "boolean",
            SettingValue::Number(_) => "number",
            SettingValue::Text(_) => "string",
        }
    }

    /// Parse user input according to the declared setting type
    pub fn parse_as(type_name: &str, raw: &str) -> Option<SettingValue> {
        match type_name {
            "boolean" => raw.trim().parse().ok().map(SettingValue::Bool),
            "number" => raw.trim().parse().ok().map(SettingValue::Number),
            _ => Some(SettingValue::Text(raw.to_string())),
        }
    }
}

impl std::fmt::Display for SettingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::Number(n) => write!(f, "{}", n),
            SettingValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSetting {
    pub id: String,
    pub name: String,
    pub value: SettingValue,
    /// "string", "boolean" or "number"
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

impl Entity for SystemSetting {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Pagination envelope of the admin listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Paginated<T> {
    pub fn page_count(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(self.per_page as u64) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountByLabel {
    pub name: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub count: u32,
}

/// Per-user task figures from `/tasks/metrics/user/{id}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMetrics {
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub in_progress_tasks: u32,
    pub todo_tasks: u32,
    pub review_tasks: u32,
    pub overdue_tasks: u32,
    /// Days
    #[serde(default)]
    pub average_completion_time: f64,
    /// Tasks completed per week
    #[serde(default)]
    pub task_velocity: f64,
    #[serde(default)]
    pub tasks_by_priority: Vec<CountByLabel>,
    #[serde(default)]
    pub task_status_distribution: Vec<CountByLabel>,
    #[serde(default)]
    pub completion_trend: Vec<TrendPoint>,
    #[serde(default)]
    pub active_tasks: Vec<Task>,
    #[serde(default)]
    pub recently_completed_tasks: Vec<Task>,
    #[serde(default)]
    pub last_active_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active_projects: Vec<String>,
}

/// `/tasks/metrics/team`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMetrics {
    #[serde(default)]
    pub average_tasks_per_user: f64,
    #[serde(default)]
    pub average_completion_time: f64,
    #[serde(default)]
    pub task_distribution: Vec<CountByLabel>,
    #[serde(default)]
    pub task_completion_trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPerformanceMetrics {
    pub user_id: String,
    pub user_name: String,
    pub metrics: TaskMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_value_untagged() {
        let s: SystemSetting = serde_json::from_str(
            r#"{"id":"1","name":"maintenance","value":true,"type":"boolean","description":"","category":"system"}"#,
        )
        .unwrap();
        assert_eq!(s.value, SettingValue::Bool(true));

        let s: SystemSetting = serde_json::from_str(
            r#"{"id":"2","name":"max_upload","value":25,"type":"number"}"#,
        )
        .unwrap();
        assert_eq!(s.value, SettingValue::Number(25.0));
        assert_eq!(s.value.to_string(), "25");
    }

    #[test]
    fn test_parse_setting_input() {
        assert_eq!(SettingValue::parse_as("boolean", " true "), Some(SettingValue::Bool(true)));
        assert_eq!(SettingValue::parse_as("number", "abc"), None);
        assert_eq!(SettingValue::parse_as("string", "x"), Some(SettingValue::Text("x".into())));
    }

    #[test]
    fn test_page_count_rounds_up() {
        let page: Paginated<Role> = Paginated { items: vec![], total: 21, page: 1, per_page: 10 };
        assert_eq!(page.page_count(), 3);
    }

    #[test]
    fn test_admin_user_accepts_snake_case_dates() {
        let u: AdminUser = serde_json::from_str(
            r#"{"id":"7","name":"Ann","email":"a@x","role":"manager","status":"pending","created_at":"2025-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(u.role, UserRole::Manager);
        assert_eq!(u.status, UserStatus::Pending);
    }
}
