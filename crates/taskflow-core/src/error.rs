//! Domain Errors
//!
//! One error enum per state container. The UI formats these into toasts.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("task not found: {0}")]
    TaskNotFound(String),
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    #[error("task {task} is not in column {column}")]
    TaskNotInColumn { task: String, column: String },
    #[error("dependency on {dependency} would create a cycle for {task}")]
    DependencyCycle { task: String, dependency: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileError {
    #[error("file not found: {0}")]
    FileNotFound(String),
    #[error("folder not found: {0}")]
    FolderNotFound(String),
    #[error("a folder cannot be moved into itself")]
    InvalidMove,
    #[error("you do not have permission to change {0}")]
    PermissionDenied(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error("channel not found: {0}")]
    ChannelNotFound(String),
    #[error("message not found: {0}")]
    MessageNotFound(String),
    #[error("message is empty")]
    EmptyMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectError {
    #[error("project not found: {0}")]
    NotFound(String),
    #[error("project {0} cannot become a child of its own subtree")]
    InvalidParent(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid session")]
    InvalidSession,
    #[error("Not signed in")]
    NotAuthenticated,
}
