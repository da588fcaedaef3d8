//! Admin Endpoints
//!
//! Settings, users, roles, listings and the performance dashboards.

use serde::Serialize;
use taskflow_core::domain::{
    AdminUser, Paginated, Project, Role, SettingValue, SystemSetting, Task, TaskMetrics,
    TeamMetrics, TrendPoint, UserPerformanceMetrics, UserRole, UserStatus,
};

use super::{segment, ApiClient, ApiError};

pub const DEFAULT_METRICS_DAYS: u32 = 30;

// ========================
// Argument Structs
// ========================

#[derive(Serialize, Default, Clone, Copy)]
pub struct PageQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'a str>,
}

#[derive(Serialize)]
pub struct NewSetting<'a> {
    pub name: &'a str,
    pub value: &'a SettingValue,
    #[serde(rename = "type")]
    pub value_type: &'a str,
    pub description: &'a str,
    pub category: &'a str,
}

#[derive(Serialize)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
}

#[derive(Serialize)]
pub struct NewRole<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub permissions: &'a [String],
}

#[derive(Serialize)]
struct RoleArgs {
    role: UserRole,
}

#[derive(Serialize)]
struct StatusArgs {
    status: UserStatus,
}

#[derive(Serialize)]
struct DaysQuery {
    days: u32,
}

// ========================
// Settings
// ========================

pub async fn list_settings(client: &ApiClient, query: PageQuery<'_>) -> Result<Paginated<SystemSetting>, ApiError> {
    client.get_query("/admin/settings", &query).await
}

pub async fn create_setting(client: &ApiClient, setting: &NewSetting<'_>) -> Result<SystemSetting, ApiError> {
    client.post("/admin/settings", setting).await
}

pub async fn update_setting(client: &ApiClient, setting: &SystemSetting) -> Result<SystemSetting, ApiError> {
    client
        .put(&format!("/admin/settings/{}", segment(&setting.id)), setting)
        .await
}

pub async fn delete_setting(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.delete(&format!("/admin/settings/{}", segment(id))).await
}

// ========================
// Users
// ========================

pub async fn list_users(client: &ApiClient, query: PageQuery<'_>) -> Result<Paginated<AdminUser>, ApiError> {
    client.get_query("/admin/users", &query).await
}

pub async fn get_user(client: &ApiClient, id: &str) -> Result<AdminUser, ApiError> {
    client.get(&format!("/admin/users/{}", segment(id))).await
}

pub async fn create_user(client: &ApiClient, user: &NewUser<'_>) -> Result<AdminUser, ApiError> {
    client.post("/admin/users", user).await
}

/// Same payload as create, without a password
pub async fn invite_user(client: &ApiClient, user: &NewUser<'_>) -> Result<AdminUser, ApiError> {
    client.post("/admin/users/invite", user).await
}

pub async fn update_user(client: &ApiClient, user: &AdminUser) -> Result<AdminUser, ApiError> {
    client
        .put(&format!("/admin/users/{}", segment(&user.id)), user)
        .await
}

pub async fn update_user_role(client: &ApiClient, id: &str, role: UserRole) -> Result<AdminUser, ApiError> {
    client
        .put(&format!("/admin/users/{}/role", segment(id)), &RoleArgs { role })
        .await
}

pub async fn update_user_status(client: &ApiClient, id: &str, status: UserStatus) -> Result<AdminUser, ApiError> {
    client
        .put(&format!("/admin/users/{}/status", segment(id)), &StatusArgs { status })
        .await
}

pub async fn delete_user(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.delete(&format!("/admin/users/{}", segment(id))).await
}

// ========================
// Roles
// ========================

pub async fn list_roles(client: &ApiClient, query: PageQuery<'_>) -> Result<Paginated<Role>, ApiError> {
    client.get_query("/admin/roles", &query).await
}

pub async fn create_role(client: &ApiClient, role: &NewRole<'_>) -> Result<Role, ApiError> {
    client.post("/admin/roles", role).await
}

pub async fn update_role(client: &ApiClient, role: &Role) -> Result<Role, ApiError> {
    client
        .put(&format!("/admin/roles/{}", segment(&role.id)), role)
        .await
}

pub async fn delete_role(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.delete(&format!("/admin/roles/{}", segment(id))).await
}

// ========================
// Listings
// ========================

pub async fn list_projects(client: &ApiClient, query: PageQuery<'_>) -> Result<Paginated<Project>, ApiError> {
    client.get_query("/admin/projects", &query).await
}

pub async fn list_tasks(client: &ApiClient, query: PageQuery<'_>) -> Result<Paginated<Task>, ApiError> {
    client.get_query("/admin/tasks", &query).await
}

pub async fn user_activity(client: &ApiClient, query: PageQuery<'_>) -> Result<Paginated<TrendPoint>, ApiError> {
    client.get_query("/admin/analytics/user-activity", &query).await
}

// ========================
// Metrics
// ========================

pub async fn user_performance(client: &ApiClient, user_id: &str, days: u32) -> Result<UserPerformanceMetrics, ApiError> {
    let user = get_user(client, user_id).await?;
    let metrics: TaskMetrics = client
        .get_query(&format!("/tasks/metrics/user/{}", segment(user_id)), &DaysQuery { days })
        .await?;
    Ok(UserPerformanceMetrics {
        user_id: user.id,
        user_name: user.name,
        metrics,
    })
}

pub async fn team_metrics(client: &ApiClient, days: u32) -> Result<TeamMetrics, ApiError> {
    client.get_query("/tasks/metrics/team", &DaysQuery { days }).await
}

/// Metrics for every user on the first page; users whose metrics fail are skipped
pub async fn all_user_performance(client: &ApiClient, days: u32) -> Result<Vec<UserPerformanceMetrics>, ApiError> {
    let users = list_users(client, PageQuery::default()).await?;
    let mut out = Vec::with_capacity(users.items.len());
    for user in &users.items {
        match user_performance(client, &user.id, days).await {
            Ok(metrics) => out.push(metrics),
            Err(e) => log::warn!("[API] skipping metrics for {}: {}", user.id, e),
        }
    }
    Ok(out)
}
