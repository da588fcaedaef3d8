//! Domain Layer
//!
//! Plain records shared by the state containers and the REST wrappers.
//! Everything serializes with camelCase keys to match the backend schemas.

mod entity;
mod task;
mod board;
mod file;
mod notification;
mod user;
mod admin;
mod project;
mod activity;
mod message;

pub use entity::{Entity, find_by_id, replace_by_id, remove_by_id, new_id};
pub use task::{Task, TaskDraft, TaskStatus, Priority, TaskType, Recurrence, TaskComment};
pub use board::{Board, Column};
pub use file::{StoredFile, Folder, FolderDraft, FileUpload, PermissionLevel, FilePermission, FolderPermission, FileVersion};
pub use notification::{Notification, NotificationDraft, NotificationKind, RelatedEntity, RelatedKind};
pub use user::{User, UserRole, Language, AuthState};
pub use admin::{AdminUser, UserStatus, Role, SystemSetting, SettingValue, Paginated, TaskMetrics, TeamMetrics, UserPerformanceMetrics, CountByLabel, TrendPoint};
pub use project::{Project, ProjectDraft, ProjectStatus, ProjectNode};
pub use message::{MessageChannel, Message, ChannelKind, ChannelDraft, Reaction, Attachment};
pub use activity::{FileActivity, ActivityType, ActivityStats, ActorCount, HourCount};
