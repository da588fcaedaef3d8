//! User and Auth State

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    #[serde(alias = "member")]
    User,
    Manager,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Manager => "manager",
            UserRole::Admin => "admin",
        }
    }

    /// Admin console access
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Team dashboards and performance pages
    pub fn can_view_team_metrics(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Manager)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub language: Language,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Two-letter initials for avatars
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}
