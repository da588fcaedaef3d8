//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Each field is one
//! of the in-memory containers from `taskflow-core`; the `store_*` helpers
//! below are the only places that mutate more than one of them at once.

use leptos::prelude::*;
use reactive_stores::Store;
use serde_json::Map;

use taskflow_core::domain::{
    ActivityType, FileUpload, Folder, FolderDraft, Message, NotificationDraft, NotificationKind,
    PermissionLevel, StoredFile, Task, TaskComment, TaskDraft,
};
use taskflow_core::pomodoro::TaskPomodoro;
use taskflow_core::{
    mention, seed, ActivityLog, AuthSession, BoardError, FileError, FileStore, MessageBoard,
    MessageError, NotificationCenter, PomodoroTimer, ProjectDirectory, TaskBoard, TimerSettings,
};

use crate::storage;

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    pub board: TaskBoard,
    pub files: FileStore,
    pub notifications: NotificationCenter,
    pub messages: MessageBoard,
    pub pomodoro: PomodoroTimer,
    pub auth: AuthSession,
    pub activity: ActivityLog,
    pub projects: ProjectDirectory,
}

impl AppState {
    /// Demo data plus whatever the browser remembered
    pub fn load() -> Self {
        let auth = match AuthSession::restore(storage::get(storage::USER_KEY).as_deref()) {
            Ok(session) => session,
            Err(e) => {
                storage::remove(storage::USER_KEY);
                log::warn!("[STORE] {}", e);
                AuthSession::default()
            }
        };
        let settings: TimerSettings = storage::get_json(storage::POMODORO_SETTINGS_KEY).unwrap_or_default();
        let task_pomodoros: Vec<TaskPomodoro> = storage::get_json(storage::TASK_POMODOROS_KEY).unwrap_or_default();
        let active_ids: Vec<String> = storage::get_json(storage::ACTIVE_TASKS_KEY).unwrap_or_default();

        Self {
            board: TaskBoard::new(seed::tasks()),
            files: FileStore::new(seed::files(), seed::folders()),
            notifications: NotificationCenter::new(seed::notifications()),
            messages: MessageBoard::new(seed::channels()),
            pomodoro: PomodoroTimer::new(settings, task_pomodoros, active_ids),
            auth,
            activity: ActivityLog::new(),
            projects: ProjectDirectory::new(seed::projects()),
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

/// Id of the signed-in user, or "anonymous"
pub fn current_user_id(store: &AppStore) -> String {
    store
        .auth()
        .read()
        .user()
        .map(|u| u.id.clone())
        .unwrap_or_else(|| "anonymous".to_string())
}

pub fn current_user_name(store: &AppStore) -> String {
    store
        .auth()
        .read()
        .user()
        .map(|u| u.name.clone())
        .unwrap_or_else(|| "Anonymous".to_string())
}

// ========================
// Tasks
// ========================

/// Add a task; assignees other than the current user get an assignment notice
pub fn store_add_task(store: &AppStore, draft: TaskDraft) -> Task {
    let task = store.board().write().add_task(draft);
    let me = current_user_name(store);
    if task.assignees.iter().any(|a| *a != me) {
        store.notifications().write().add(
            NotificationDraft::new(
                NotificationKind::Assignment,
                "Task assigned",
                format!("\"{}\" was assigned to {}", task.title, task.assignees.join(", ")),
            )
            .about_task(&task.id),
        );
    }
    task
}

pub fn store_update_task(store: &AppStore, task: Task) -> Result<Task, BoardError> {
    store.board().write().update_task(task)
}

pub fn store_delete_task(store: &AppStore, task_id: &str) -> Option<Task> {
    let removed = store.board().write().delete_task(task_id);
    if removed.is_some() {
        store.pomodoro().write().remove_task_from_pomodoros(task_id);
        store_persist_pomodoro(store);
    }
    removed
}

pub fn store_move_task(store: &AppStore, task_id: &str, source: &str, dest: &str, index: usize) -> Result<(), BoardError> {
    store.board().write().move_task(task_id, source, dest, index)
}

/// Add a comment and deliver mention notifications for `@handles` in it
pub fn store_add_comment(store: &AppStore, task_id: &str, content: &str) -> Result<TaskComment, BoardError> {
    let author = current_user_name(store);
    let comment = store.board().write().add_comment(task_id, &author, content)?;

    let (title, mut members) = {
        let board = store.board().read();
        let task = board
            .task_by_id(task_id)
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))?;
        (task.title.clone(), task.assignees.clone())
    };
    if let Some(project_id) = store.board().read().task_by_id(task_id).and_then(|t| t.project_id.clone()) {
        if let Some(project) = store.projects().read().by_id(&project_id) {
            members.extend(project.team_members.iter().cloned());
        }
    }
    members.sort();
    members.dedup();

    for (member, draft) in mention::mention_notifications(&author, task_id, &title, content, &members) {
        log::info!("[STORE] {} mentioned {}", author, member);
        store.notifications().write().add(draft);
    }
    Ok(comment)
}

// ========================
// Files
// ========================

pub fn store_upload_file(store: &AppStore, upload: FileUpload, folder_id: Option<&str>) -> StoredFile {
    let user = current_user_id(store);
    let file = store.files().write().upload_file(upload, folder_id, None, &user);
    store.activity().write().log_file_activity(
        &file.id,
        &file.name,
        ActivityType::Create,
        &user,
        Some(format!("Uploaded {}", file.name)),
        Map::new(),
    );
    file
}

pub fn store_log_file(store: &AppStore, file: &StoredFile, kind: ActivityType) {
    let user = current_user_id(store);
    store
        .activity()
        .write()
        .log_file_activity(&file.id, &file.name, kind, &user, None, Map::new());
}

pub fn store_delete_file(store: &AppStore, file_id: &str) -> Result<StoredFile, FileError> {
    let removed = store
        .files()
        .write()
        .delete_file(file_id)
        .ok_or_else(|| FileError::FileNotFound(file_id.to_string()))?;
    store_log_file(store, &removed, ActivityType::Delete);
    Ok(removed)
}

pub fn store_rename_file(store: &AppStore, file_id: &str, name: &str) -> Result<StoredFile, FileError> {
    let renamed = store.files().write().rename_file(file_id, name)?.clone();
    store_log_file(store, &renamed, ActivityType::Rename);
    Ok(renamed)
}

pub fn store_create_folder(store: &AppStore, draft: FolderDraft) -> Folder {
    let user = current_user_id(store);
    let folder = store.files().write().create_folder(draft, &user);
    store
        .activity()
        .write()
        .log_folder_activity(&folder, ActivityType::Create, &user, None, Map::new());
    folder
}

pub fn store_delete_folder(store: &AppStore, folder_id: &str) -> Result<usize, FileError> {
    let user = current_user_id(store);
    let folder = store
        .files()
        .read()
        .folder(folder_id)
        .cloned()
        .ok_or_else(|| FileError::FolderNotFound(folder_id.to_string()))?;
    let removed = store.files().write().delete_folder(folder_id)?;
    store
        .activity()
        .write()
        .log_folder_activity(&folder, ActivityType::Delete, &user, None, Map::new());
    Ok(removed.len())
}

pub fn store_move_file(store: &AppStore, file_id: &str, folder_id: Option<&str>) -> Result<StoredFile, FileError> {
    let moved = store.files().write().move_file(file_id, folder_id)?.clone();
    store_log_file(store, &moved, ActivityType::Move);
    Ok(moved)
}

pub fn store_move_folder(store: &AppStore, folder_id: &str, parent_id: Option<&str>) -> Result<Folder, FileError> {
    let user = current_user_id(store);
    let moved = store.files().write().move_folder(folder_id, parent_id)?.clone();
    store
        .activity()
        .write()
        .log_folder_activity(&moved, ActivityType::Move, &user, Some(format!("Moved to {}", moved.path)), Map::new());
    Ok(moved)
}

/// Grant `user_id` a level on a file; only users holding admin on it may share
pub fn store_share_file(store: &AppStore, file_id: &str, user_id: &str, level: PermissionLevel) -> Result<(), FileError> {
    let me = current_user_id(store);
    store.files().write().share_file(file_id, &me, user_id, level)?;
    let mut metadata = Map::new();
    metadata.insert("userId".into(), user_id.into());
    metadata.insert("permission".into(), level.as_str().into());
    if let Some(file) = store.files().read_untracked().file(file_id) {
        store.activity().write().log_file_activity(
            &file.id,
            &file.name,
            ActivityType::Share,
            &me,
            Some(format!("Shared with {} ({})", user_id, level.as_str())),
            metadata,
        );
    }
    Ok(())
}

pub fn store_unshare_file(store: &AppStore, file_id: &str, user_id: &str) -> Result<(), FileError> {
    let me = current_user_id(store);
    store.files().write().unshare_file(file_id, &me, user_id)?;
    if let Some(file) = store.files().read_untracked().file(file_id) {
        store.activity().write().log_file_activity(
            &file.id,
            &file.name,
            ActivityType::PermissionChange,
            &me,
            Some(format!("Removed access for {}", user_id)),
            Map::new(),
        );
    }
    Ok(())
}

/// Grant on a folder; the grant reaches every subfolder
pub fn store_share_folder(
    store: &AppStore,
    folder_id: &str,
    user_id: &str,
    level: PermissionLevel,
    inherit: bool,
) -> Result<(), FileError> {
    let me = current_user_id(store);
    store.files().write().share_folder(folder_id, &me, user_id, level, inherit)?;
    let folder = store.files().read_untracked().folder(folder_id).cloned();
    if let Some(folder) = folder {
        store.activity().write().log_folder_activity(
            &folder,
            ActivityType::Share,
            &me,
            Some(format!("Shared with {} ({})", user_id, level.as_str())),
            Map::new(),
        );
    }
    Ok(())
}

// ========================
// Messaging
// ========================

/// Post as the current user; channel members named with `@` get a notice
pub fn store_post_message(
    store: &AppStore,
    channel_id: &str,
    text: &str,
    reply_to: Option<&str>,
) -> Result<Message, MessageError> {
    let author = current_user_name(store);
    let message = store.messages().write().add_message(channel_id, &author, text, reply_to)?;
    let notices = store.messages().read_untracked().mention_notices(&message);
    for (member, draft) in notices {
        log::info!("[STORE] {} mentioned {} in chat", author, member);
        store_notify(store, draft);
    }
    Ok(message)
}

// ========================
// Notifications / Pomodoro
// ========================

pub fn store_notify(store: &AppStore, draft: NotificationDraft) {
    store.notifications().write().add(draft);
}

/// Add deadline notices for tasks due tomorrow
pub fn store_check_deadlines(store: &AppStore, today: chrono::NaiveDate) -> usize {
    let drafts = {
        let board = store.board().read();
        store.notifications().read().deadline_notices(board.all_tasks(), today)
    };
    let count = drafts.len();
    for draft in drafts {
        store_notify(store, draft);
    }
    count
}

pub fn store_persist_pomodoro(store: &AppStore) {
    let timer = store.pomodoro().read();
    storage::set_json(storage::POMODORO_SETTINGS_KEY, &timer.settings);
    storage::set_json(storage::TASK_POMODOROS_KEY, &timer.task_pomodoros());
    storage::set_json(storage::ACTIVE_TASKS_KEY, &timer.active_task_ids());
}
