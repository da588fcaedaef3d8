//! TaskFlow Core
//!
//! In-memory state containers behind the TaskFlow UI: the task board,
//! file store, permission rules, notifications, team chat, pomodoro timer,
//! activity log, projects and auth session. Nothing here touches the browser, so
//! every rule is testable natively.

pub mod domain;
pub mod error;

pub mod task_board;
pub mod selectors;
pub mod permission;
pub mod file_store;
pub mod activity_log;
pub mod notification_center;
pub mod mention;
pub mod messaging;
pub mod pomodoro;
pub mod project_directory;
pub mod auth_session;
pub mod metrics;
pub mod seed;
pub mod i18n;

pub use error::{AuthError, BoardError, FileError, MessageError, ProjectError};
pub use task_board::TaskBoard;
pub use file_store::FileStore;
pub use activity_log::ActivityLog;
pub use notification_center::NotificationCenter;
pub use messaging::MessageBoard;
pub use pomodoro::{PomodoroTimer, SettingsPatch, TimerEvent, TimerSettings, TimerState};
pub use project_directory::ProjectDirectory;
pub use auth_session::{AuthSession, LoginResponse, MockDirectory};
