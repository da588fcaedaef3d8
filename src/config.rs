//! Runtime Configuration
//!
//! The backend base URL comes from `TASKFLOW_API_URL` at build time and can
//! be overridden per browser through local storage. An empty URL switches
//! the app to offline mode: mock accounts and locally computed metrics.

use crate::storage;

const DEFAULT_API_URL: &str = "/api";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Absolute base URL without trailing slash; `None` in offline mode
    pub api_base_url: Option<String>,
}

impl AppConfig {
    pub fn load() -> Self {
        let compiled = option_env!("TASKFLOW_API_URL").unwrap_or(DEFAULT_API_URL);
        let configured = storage::get(storage::API_URL_KEY).unwrap_or_else(|| compiled.to_string());
        let config = Self {
            api_base_url: absolutize(configured.trim()),
        };
        log::info!("[CONFIG] api base: {:?}", config.api_base_url);
        config
    }

    pub fn is_offline(&self) -> bool {
        self.api_base_url.is_none()
    }

    /// Persist a new base URL override; takes effect on the next load
    pub fn save_override(url: &str) {
        storage::set(storage::API_URL_KEY, url.trim());
    }
}

/// reqwest needs absolute URLs, so a path like `/api` is resolved against
/// the page origin.
fn absolutize(raw: &str) -> Option<String> {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('/') {
        let origin = web_sys::window()?.location().origin().ok()?;
        return Some(format!("{}{}", origin, trimmed));
    }
    Some(trimmed.to_string())
}
