//! Demo Data
//!
//! The records shown before anything is loaded from a backend. Kept as
//! JSON next to the crate so the shapes match what the REST layer sends.

use serde::de::DeserializeOwned;

use crate::domain::{Folder, MessageChannel, Notification, Project, StoredFile, Task};

const TASKS: &str = include_str!("../seed/tasks.json");
const FOLDERS: &str = include_str!("../seed/folders.json");
const FILES: &str = include_str!("../seed/files.json");
const PROJECTS: &str = include_str!("../seed/projects.json");
const NOTIFICATIONS: &str = include_str!("../seed/notifications.json");
const CHANNELS: &str = include_str!("../seed/channels.json");

fn parse<T: DeserializeOwned>(name: &str, raw: &str) -> Vec<T> {
    match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(e) => {
            log::error!("[SEED] failed to parse {}: {}", name, e);
            Vec::new()
        }
    }
}

pub fn tasks() -> Vec<Task> {
    parse("tasks", TASKS)
}

pub fn folders() -> Vec<Folder> {
    parse("folders", FOLDERS)
}

pub fn files() -> Vec<StoredFile> {
    parse("files", FILES)
}

pub fn projects() -> Vec<Project> {
    parse("projects", PROJECTS)
}

pub fn notifications() -> Vec<Notification> {
    parse("notifications", NOTIFICATIONS)
}

pub fn channels() -> Vec<MessageChannel> {
    parse("channels", CHANNELS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskType;
    use crate::TaskBoard;

    #[test]
    fn test_every_seed_file_parses() {
        // parse() swallows errors, so go through serde directly here
        serde_json::from_str::<Vec<Task>>(TASKS).unwrap();
        serde_json::from_str::<Vec<Folder>>(FOLDERS).unwrap();
        serde_json::from_str::<Vec<StoredFile>>(FILES).unwrap();
        serde_json::from_str::<Vec<Project>>(PROJECTS).unwrap();
        serde_json::from_str::<Vec<Notification>>(NOTIFICATIONS).unwrap();
        serde_json::from_str::<Vec<MessageChannel>>(CHANNELS).unwrap();
    }

    #[test]
    fn test_seed_channels_point_at_seed_records() {
        let projects = projects();
        let tasks = tasks();
        for channel in channels() {
            if let Some(project) = &channel.related_project_id {
                assert!(projects.iter().any(|p| &p.id == project), "{} has no project", channel.id);
            }
            if let Some(task) = &channel.related_task_id {
                assert!(tasks.iter().any(|t| &t.id == task), "{} has no task", channel.id);
            }
            assert!(channel.messages.iter().all(|m| m.channel_id == channel.id));
        }
    }

    #[test]
    fn test_seed_board_places_only_kanban_tasks() {
        let board = TaskBoard::new(tasks());
        assert_eq!(board.kanban_tasks().len(), 4);
        assert!(board
            .timeline_tasks()
            .iter()
            .all(|t| t.task_type == TaskType::Meeting));
        assert!(board.status_mismatches().is_empty());
    }

    #[test]
    fn test_seed_folders_are_a_tree() {
        let folders = folders();
        for folder in &folders {
            if let Some(parent) = &folder.parent_id {
                assert!(folders.iter().any(|f| &f.id == parent), "{} has no parent", folder.id);
            }
        }
        assert!(files().iter().all(|f| f
            .folder_id
            .as_ref()
            .is_some_and(|id| folders.iter().any(|d| &d.id == id))));
    }
}
