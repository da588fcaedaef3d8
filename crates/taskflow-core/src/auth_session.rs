//! Auth Session
//!
//! `AuthSession` is the state machine behind the login screen. The UI feeds
//! it results from either the REST backend or [`MockDirectory`], which
//! stands in for the backend in offline mode.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{AuthState, Language, User, UserRole};
use crate::error::AuthError;

/// Body returned by `POST /auth/login` and `POST /auth/register`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthSession {
    state: AuthState,
}

impl AuthSession {
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|u| u.role.is_admin())
    }

    /// Rebuild the session from the user JSON saved in local storage
    pub fn restore(saved_user: Option<&str>) -> Result<Self, AuthError> {
        let Some(raw) = saved_user else {
            return Ok(Self::default());
        };
        let user: User = serde_json::from_str(raw).map_err(|e| {
            log::warn!("[AUTH] discarding saved user: {}", e);
            AuthError::InvalidSession
        })?;
        let mut session = Self::default();
        session.sign_in(user);
        Ok(session)
    }

    /// A login or register request is in flight
    pub fn begin(&mut self) {
        self.state.is_loading = true;
        self.state.error = None;
    }

    pub fn sign_in(&mut self, user: User) {
        log::info!("[AUTH] signed in as {}", user.email);
        self.state = AuthState {
            user: Some(user),
            is_authenticated: true,
            is_loading: false,
            error: None,
        };
    }

    /// Record a failed attempt. A failed login drops any previous user; a
    /// failed register keeps it.
    pub fn fail(&mut self, error: impl Into<String>, keep_user: bool) {
        let error = error.into();
        log::warn!("[AUTH] {}", error);
        if !keep_user {
            self.state.user = None;
            self.state.is_authenticated = false;
        }
        self.state.is_loading = false;
        self.state.error = Some(error);
    }

    pub fn logout(&mut self) {
        self.state = AuthState::default();
    }

    pub fn update_language(&mut self, language: Language) -> Result<&User, AuthError> {
        let user = self.state.user.as_mut().ok_or(AuthError::NotAuthenticated)?;
        user.language = language;
        Ok(user)
    }
}

struct MockAccount {
    user: User,
    password: String,
}

/// In-memory accounts used when no backend is configured
pub struct MockDirectory {
    accounts: Vec<MockAccount>,
}

impl Default for MockDirectory {
    fn default() -> Self {
        let now = Utc::now();
        let account = |id: &str, email: &str, password: &str, name: &str, role, language| MockAccount {
            user: User {
                id: id.into(),
                email: email.into(),
                name: name.into(),
                avatar: None,
                role,
                language,
                created_at: now,
            },
            password: password.into(),
        };
        Self {
            accounts: vec![
                account("1", "admin@example.com", "admin123", "Admin User", UserRole::Admin, Language::En),
                account("2", "user@example.com", "user123", "Regular User", UserRole::User, Language::Es),
            ],
        }
    }
}

impl MockDirectory {
    pub fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        self.accounts
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(email.trim()) && a.password == password)
            .map(|a| a.user.clone())
            .ok_or(AuthError::InvalidCredentials)
    }

    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();
        if self.accounts.iter().any(|a| a.user.email.eq_ignore_ascii_case(email)) {
            return Err(AuthError::EmailTaken);
        }
        let user = User {
            id: (self.accounts.len() + 1).to_string(),
            email: email.to_string(),
            name: name.trim().to_string(),
            avatar: None,
            role: UserRole::User,
            language: Language::En,
            created_at: Utc::now(),
        };
        self.accounts.push(MockAccount {
            user: user.clone(),
            password: password.to_string(),
        });
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_login() {
        let dir = MockDirectory::default();
        let admin = dir.login("admin@example.com", "admin123").unwrap();
        assert!(admin.role.is_admin());
        assert_eq!(dir.login("user@example.com", "nope"), Err(AuthError::InvalidCredentials));
        assert_eq!(dir.login("ghost@example.com", "x"), Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn test_mock_register_rejects_duplicates() {
        let mut dir = MockDirectory::default();
        assert_eq!(dir.register("Dup", "admin@example.com", "pw"), Err(AuthError::EmailTaken));
        let user = dir.register("New Person", "new@example.com", "secret").unwrap();
        assert_eq!(user.id, "3");
        assert_eq!(user.role, UserRole::User);
        assert!(dir.login("new@example.com", "secret").is_ok());
    }

    #[test]
    fn test_session_lifecycle() {
        let dir = MockDirectory::default();
        let mut session = AuthSession::default();
        session.begin();
        assert!(session.state().is_loading);

        session.sign_in(dir.login("admin@example.com", "admin123").unwrap());
        assert!(session.state().is_authenticated);
        assert!(session.is_admin());

        session.update_language(Language::Es).unwrap();
        assert_eq!(session.user().unwrap().language, Language::Es);

        session.logout();
        assert_eq!(session.state(), &AuthState::default());
        assert_eq!(session.update_language(Language::En).unwrap_err(), AuthError::NotAuthenticated);
    }

    #[test]
    fn test_failed_login_clears_user() {
        let mut session = AuthSession::default();
        session.sign_in(MockDirectory::default().login("user@example.com", "user123").unwrap());
        session.fail("Email already registered", true);
        assert!(session.state().is_authenticated);
        session.fail("Invalid email or password", false);
        assert!(!session.state().is_authenticated);
        assert_eq!(session.state().error.as_deref(), Some("Invalid email or password"));
    }

    #[test]
    fn test_restore_from_saved_json() {
        let user = MockDirectory::default().login("user@example.com", "user123").unwrap();
        let raw = serde_json::to_string(&user).unwrap();
        let session = AuthSession::restore(Some(&raw)).unwrap();
        assert_eq!(session.user().map(|u| u.id.as_str()), Some("2"));

        assert_eq!(AuthSession::restore(Some("{oops")), Err(AuthError::InvalidSession));
        assert!(!AuthSession::restore(None).unwrap().state().is_authenticated);
    }

    #[test]
    fn test_login_response_accepts_backend_user() {
        let body = r#"{
            "access_token": "a", "refresh_token": "r",
            "user": {"id": "u1", "email": "x@y.z", "name": "X", "role": "member",
                     "language": "es", "created_at": "2024-01-01T00:00:00Z"}
        }"#;
        let resp: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.user.role, UserRole::User);
        assert_eq!(resp.user.language, Language::Es);
    }
}
