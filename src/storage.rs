//! Browser Local Storage
//!
//! Thin helpers over `window.localStorage`. Every failure (private mode,
//! quota, bad JSON) degrades to "nothing stored" and is logged.

use serde::de::DeserializeOwned;
use serde::Serialize;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const API_URL_KEY: &str = "apiBaseUrl";
pub const POMODORO_SETTINGS_KEY: &str = "pomodoroSettings";
pub const TASK_POMODOROS_KEY: &str = "taskPomodoros";
pub const ACTIVE_TASKS_KEY: &str = "activeTaskIds";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

pub fn get(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

pub fn set(key: &str, value: &str) {
    if let Some(storage) = local_storage() {
        if storage.set_item(key, value).is_err() {
            log::warn!("[STORAGE] could not write {}", key);
        }
    }
}

pub fn remove(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

pub fn get_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let raw = get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("[STORAGE] ignoring malformed {}: {}", key, e);
            None
        }
    }
}

pub fn set_json<T: Serialize>(key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => set(key, &raw),
        Err(e) => log::error!("[STORAGE] could not serialize {}: {}", key, e),
    }
}
