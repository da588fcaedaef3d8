//! Task Board
//!
//! The unified task collection plus the kanban board built from it. Every
//! mutation keeps both in step: a task shown on the kanban sits in exactly
//! one column, and that column's status matches the task's status.

use chrono::Utc;
use std::collections::HashSet;

use crate::domain::{
    find_by_id, new_id, remove_by_id, replace_by_id, Board, Task, TaskComment, TaskDraft,
    TaskStatus,
};
use crate::error::BoardError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskBoard {
    tasks: Vec<Task>,
    board: Board,
}

impl TaskBoard {
    /// Build the board from every task flagged for the kanban view
    pub fn new(tasks: Vec<Task>) -> Self {
        let mut this = Self {
            tasks: Vec::new(),
            board: Board::default(),
        };
        for task in tasks {
            this.place_on_board(&task);
            this.tasks.push(task);
        }
        this
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    // ========================
    // Selectors
    // ========================

    pub fn all_tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn kanban_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.show_in_kanban).collect()
    }

    pub fn timeline_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.show_in_timeline).collect()
    }

    pub fn task_by_id(&self, task_id: &str) -> Option<&Task> {
        find_by_id(&self.tasks, task_id)
    }

    /// Tasks of a project; `None` selects tasks without a project
    pub fn tasks_by_project(&self, project_id: Option<&str>) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.project_id.as_deref() == project_id)
            .collect()
    }

    /// Tasks of a kanban column in display order
    pub fn column_tasks(&self, column_id: &str) -> Vec<&Task> {
        self.board.column_tasks(column_id)
    }

    // ========================
    // Mutations
    // ========================

    /// Insert a task, or replace the one with the same id
    pub fn add_task(&mut self, draft: TaskDraft) -> Task {
        let task = draft.into_task();
        if !replace_by_id(&mut self.tasks, task.clone()) {
            self.tasks.push(task.clone());
        }
        self.place_on_board(&task);
        log::debug!("[BOARD] saved task {} ({})", task.id, task.status);
        task
    }

    /// Replace an existing task; a status change moves it to the end of the
    /// matching column, and clearing `show_in_kanban` takes it off the board
    pub fn update_task(&mut self, task: Task) -> Result<Task, BoardError> {
        if !replace_by_id(&mut self.tasks, task.clone()) {
            return Err(BoardError::TaskNotFound(task.id));
        }
        self.place_on_board(&task);
        Ok(task)
    }

    pub fn delete_task(&mut self, task_id: &str) -> Option<Task> {
        let removed = remove_by_id(&mut self.tasks, task_id);
        self.board.detach(task_id);
        self.board.tasks.remove(task_id);
        removed
    }

    /// Move a card. `new_index` is the card's final position in the
    /// destination column and is clamped to the column length. The task
    /// takes on the destination column's status unless its current status
    /// already belongs there (a completed meeting stays completed in Done).
    pub fn move_task(
        &mut self,
        task_id: &str,
        source_column: &str,
        dest_column: &str,
        new_index: usize,
    ) -> Result<(), BoardError> {
        let current_index = self
            .board
            .columns
            .get(source_column)
            .ok_or_else(|| BoardError::ColumnNotFound(source_column.to_string()))?
            .position_of(task_id)
            .ok_or_else(|| BoardError::TaskNotInColumn {
                task: task_id.to_string(),
                column: source_column.to_string(),
            })?;
        let dest_status = self
            .board
            .columns
            .get(dest_column)
            .ok_or_else(|| BoardError::ColumnNotFound(dest_column.to_string()))?
            .status;

        if source_column == dest_column && new_index == current_index {
            return Ok(());
        }

        if let Some(source) = self.board.columns.get_mut(source_column) {
            source.task_ids.remove(current_index);
        }
        if let Some(dest) = self.board.columns.get_mut(dest_column) {
            let index = new_index.min(dest.task_ids.len());
            dest.task_ids.insert(index, task_id.to_string());
        }

        let mut status = None;
        if let Some(task) = self.board.tasks.get_mut(task_id) {
            if task.status.column_status() != dest_status {
                task.status = dest_status;
            }
            status = Some(task.status);
        }
        if let (Some(status), Some(task)) = (status, self.tasks.iter_mut().find(|t| t.id == task_id)) {
            task.status = status;
        }

        log::debug!("[BOARD] moved {} from {} to {}[{}]", task_id, source_column, dest_column, new_index);
        Ok(())
    }

    /// Append a comment to a task's discussion
    pub fn add_comment(&mut self, task_id: &str, author: &str, content: &str) -> Result<TaskComment, BoardError> {
        let mut task = self
            .task_by_id(task_id)
            .cloned()
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))?;
        let comment = TaskComment {
            id: new_id("comment"),
            content: content.to_string(),
            author: author.to_string(),
            created_at: Utc::now(),
        };
        task.comments.push(comment.clone());
        self.update_task(task)?;
        Ok(comment)
    }

    // ========================
    // Dependencies
    // ========================

    /// Whether `task_id` depends on `target`, directly or through other tasks
    pub fn depends_on(&self, task_id: &str, target: &str) -> bool {
        let mut stack = vec![task_id];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(task) = self.task_by_id(current) {
                for dep in &task.dependencies {
                    if dep == target {
                        return true;
                    }
                    stack.push(dep);
                }
            }
        }
        false
    }

    /// Tasks that may become dependencies of `task_id` without a cycle
    pub fn eligible_dependencies(&self, task_id: Option<&str>) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| match task_id {
                Some(current) => t.id != current && !self.depends_on(&t.id, current),
                None => true,
            })
            .collect()
    }

    pub fn set_dependencies(&mut self, task_id: &str, dependencies: Vec<String>) -> Result<Task, BoardError> {
        let mut task = self
            .task_by_id(task_id)
            .cloned()
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))?;
        for dep in &dependencies {
            if self.task_by_id(dep).is_none() {
                return Err(BoardError::TaskNotFound(dep.clone()));
            }
            if dep == task_id || self.depends_on(dep, task_id) {
                return Err(BoardError::DependencyCycle {
                    task: task_id.to_string(),
                    dependency: dep.clone(),
                });
            }
        }
        task.dependencies = dependencies;
        self.update_task(task)
    }

    /// Unfinished dependencies of a task
    pub fn open_blockers(&self, task_id: &str) -> Vec<&Task> {
        self.task_by_id(task_id)
            .map(|task| {
                task.dependencies
                    .iter()
                    .filter_map(|dep| self.task_by_id(dep))
                    .filter(|dep| !dep.status.is_finished())
                    .collect()
            })
            .unwrap_or_default()
    }

    // ========================
    // Board bookkeeping
    // ========================

    fn place_on_board(&mut self, task: &Task) {
        if !task.show_in_kanban {
            self.board.detach(&task.id);
            self.board.tasks.remove(&task.id);
            return;
        }

        let Some(dest) = self.board.column_for_status(task.status).map(str::to_string) else {
            return;
        };
        let current = self.board.column_of(&task.id).map(str::to_string);
        self.board.tasks.insert(task.id.clone(), task.clone());

        if current.as_deref() == Some(dest.as_str()) {
            return;
        }
        self.board.detach(&task.id);
        if let Some(column) = self.board.columns.get_mut(&dest) {
            column.task_ids.push(task.id.clone());
        }
    }

    /// Tasks whose column disagrees with their status
    pub fn status_mismatches(&self) -> Vec<&Task> {
        self.board
            .tasks
            .values()
            .filter(|task| {
                self.board
                    .column_of(&task.id)
                    .and_then(|id| self.board.columns.get(id))
                    .map_or(true, |column| column.status != task.status.column_status())
            })
            .collect()
    }

    /// Count per kanban status, in column order
    pub fn status_counts(&self) -> Vec<(TaskStatus, usize)> {
        self.board
            .ordered_columns()
            .into_iter()
            .map(|c| (c.status, c.task_ids.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskType;
    use chrono::NaiveDate;

    fn task(id: &str, status: TaskStatus) -> Task {
        Task::new(id, format!("Task {}", id), status)
    }

    fn sample_board() -> TaskBoard {
        TaskBoard::new(vec![
            task("task-1", TaskStatus::Todo),
            task("task-2", TaskStatus::InProgress),
            task("task-3", TaskStatus::Review),
            task("task-4", TaskStatus::Done),
            task("task-5", TaskStatus::Todo),
        ])
    }

    fn ids(board: &TaskBoard, column: &str) -> Vec<String> {
        board.column_tasks(column).iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_new_places_tasks_by_status() {
        let board = sample_board();
        assert_eq!(ids(&board, "column-1"), vec!["task-1", "task-5"]);
        assert_eq!(ids(&board, "column-2"), vec!["task-2"]);
        assert_eq!(ids(&board, "column-4"), vec!["task-4"]);
        assert!(board.status_mismatches().is_empty());
    }

    #[test]
    fn test_meetings_stay_off_the_board() {
        let mut meeting = task("timeline-1", TaskStatus::Completed);
        meeting.task_type = TaskType::Meeting;
        meeting.show_in_kanban = false;
        meeting.show_in_timeline = true;

        let board = TaskBoard::new(vec![meeting, task("task-1", TaskStatus::Todo)]);
        assert_eq!(board.all_tasks().len(), 2);
        assert_eq!(board.kanban_tasks().len(), 1);
        assert_eq!(board.timeline_tasks().len(), 1);
        assert!(!board.board().tasks.contains_key("timeline-1"));
    }

    #[test]
    fn test_moving_to_done_sets_status_done() {
        let mut board = sample_board();
        board.move_task("task-1", "column-1", "column-4", 0).unwrap();

        assert_eq!(ids(&board, "column-4"), vec!["task-1", "task-4"]);
        assert_eq!(ids(&board, "column-1"), vec!["task-5"]);
        assert_eq!(board.task_by_id("task-1").unwrap().status, TaskStatus::Done);
        assert_eq!(board.board().tasks["task-1"].status, TaskStatus::Done);
        assert!(board.status_mismatches().is_empty());
    }

    #[test]
    fn test_move_index_is_clamped() {
        let mut board = sample_board();
        board.move_task("task-2", "column-2", "column-1", 99).unwrap();
        assert_eq!(ids(&board, "column-1"), vec!["task-1", "task-5", "task-2"]);
        assert_eq!(board.task_by_id("task-2").unwrap().status, TaskStatus::Todo);
    }

    #[test]
    fn test_reorder_within_column_does_not_duplicate() {
        let mut board = sample_board();
        board.move_task("task-1", "column-1", "column-1", 1).unwrap();
        assert_eq!(ids(&board, "column-1"), vec!["task-5", "task-1"]);
        assert_eq!(board.task_by_id("task-1").unwrap().status, TaskStatus::Todo);
    }

    #[test]
    fn test_same_position_is_noop() {
        let mut board = sample_board();
        let before = board.clone();
        board.move_task("task-5", "column-1", "column-1", 1).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn test_move_errors() {
        let mut board = sample_board();
        assert_eq!(
            board.move_task("task-1", "column-9", "column-2", 0),
            Err(BoardError::ColumnNotFound("column-9".into()))
        );
        assert_eq!(
            board.move_task("task-2", "column-1", "column-2", 0),
            Err(BoardError::TaskNotInColumn { task: "task-2".into(), column: "column-1".into() })
        );
        assert_eq!(
            board.move_task("task-1", "column-1", "column-7", 0),
            Err(BoardError::ColumnNotFound("column-7".into()))
        );
    }

    #[test]
    fn test_completed_task_keeps_status_in_done() {
        let mut board = TaskBoard::new(vec![task("m", TaskStatus::Completed), task("t", TaskStatus::Todo)]);
        assert_eq!(ids(&board, "column-4"), vec!["m"]);

        board.move_task("m", "column-4", "column-4", 0).unwrap();
        assert_eq!(board.task_by_id("m").unwrap().status, TaskStatus::Completed);

        board.move_task("m", "column-4", "column-3", 0).unwrap();
        board.move_task("m", "column-3", "column-4", 0).unwrap();
        assert_eq!(board.task_by_id("m").unwrap().status, TaskStatus::Done);
    }

    #[test]
    fn test_add_task_appends_to_status_column() {
        let mut board = sample_board();
        let created = board.add_task(TaskDraft::new("New", TaskStatus::Review));

        assert_eq!(ids(&board, "column-3"), vec!["task-3".to_string(), created.id.clone()]);
        assert_eq!(board.all_tasks().len(), 6);
    }

    #[test]
    fn test_add_task_with_existing_id_replaces() {
        let mut board = sample_board();
        let mut draft = TaskDraft::from(board.task_by_id("task-1").unwrap());
        draft.title = "Renamed".into();
        board.add_task(draft);

        assert_eq!(board.all_tasks().len(), 5);
        assert_eq!(board.task_by_id("task-1").unwrap().title, "Renamed");
        assert_eq!(ids(&board, "column-1"), vec!["task-1", "task-5"]);
    }

    #[test]
    fn test_update_status_moves_to_end_of_new_column() {
        let mut board = sample_board();
        let mut t = board.task_by_id("task-1").unwrap().clone();
        t.status = TaskStatus::InProgress;
        board.update_task(t).unwrap();

        assert_eq!(ids(&board, "column-1"), vec!["task-5"]);
        assert_eq!(ids(&board, "column-2"), vec!["task-2", "task-1"]);
    }

    #[test]
    fn test_update_without_status_change_keeps_position() {
        let mut board = sample_board();
        let mut t = board.task_by_id("task-1").unwrap().clone();
        t.title = "Edited".into();
        board.update_task(t).unwrap();

        assert_eq!(ids(&board, "column-1"), vec!["task-1", "task-5"]);
        assert_eq!(board.board().tasks["task-1"].title, "Edited");
    }

    #[test]
    fn test_update_hidden_from_kanban_removes_card() {
        let mut board = sample_board();
        let mut t = board.task_by_id("task-2").unwrap().clone();
        t.show_in_kanban = false;
        board.update_task(t).unwrap();

        assert!(ids(&board, "column-2").is_empty());
        assert!(!board.board().tasks.contains_key("task-2"));
        assert!(board.task_by_id("task-2").is_some());
    }

    #[test]
    fn test_update_shown_on_kanban_adds_card() {
        let mut hidden = task("m", TaskStatus::Review);
        hidden.show_in_kanban = false;
        let mut board = TaskBoard::new(vec![hidden]);

        let mut t = board.task_by_id("m").unwrap().clone();
        t.show_in_kanban = true;
        board.update_task(t).unwrap();
        assert_eq!(ids(&board, "column-3"), vec!["m"]);
    }

    #[test]
    fn test_update_unknown_task_fails() {
        let mut board = sample_board();
        assert_eq!(
            board.update_task(task("nope", TaskStatus::Todo)),
            Err(BoardError::TaskNotFound("nope".into()))
        );
    }

    #[test]
    fn test_delete_task() {
        let mut board = sample_board();
        assert!(board.delete_task("task-3").is_some());
        assert!(board.delete_task("task-3").is_none());
        assert!(ids(&board, "column-3").is_empty());
        assert_eq!(board.all_tasks().len(), 4);
    }

    #[test]
    fn test_tasks_by_project() {
        let mut a = task("a", TaskStatus::Todo);
        a.project_id = Some("1".into());
        let b = task("b", TaskStatus::Todo);
        let board = TaskBoard::new(vec![a, b]);

        assert_eq!(board.tasks_by_project(Some("1")).len(), 1);
        assert_eq!(board.tasks_by_project(None)[0].id, "b");
    }

    #[test]
    fn test_dependency_cycles_rejected() {
        let mut board = sample_board();
        board.set_dependencies("task-2", vec!["task-1".into()]).unwrap();
        board.set_dependencies("task-3", vec!["task-2".into()]).unwrap();

        assert!(board.depends_on("task-3", "task-1"));
        assert!(matches!(
            board.set_dependencies("task-1", vec!["task-3".into()]),
            Err(BoardError::DependencyCycle { .. })
        ));
        assert!(matches!(
            board.set_dependencies("task-1", vec!["task-1".into()]),
            Err(BoardError::DependencyCycle { .. })
        ));

        let eligible: Vec<_> = board.eligible_dependencies(Some("task-1")).iter().map(|t| t.id.clone()).collect();
        assert_eq!(eligible, vec!["task-4", "task-5"]);
    }

    #[test]
    fn test_open_blockers() {
        let mut board = sample_board();
        board.set_dependencies("task-5", vec!["task-1".into(), "task-4".into()]).unwrap();
        let blockers: Vec<_> = board.open_blockers("task-5").iter().map(|t| t.id.clone()).collect();
        assert_eq!(blockers, vec!["task-1"]);
    }

    #[test]
    fn test_add_comment() {
        let mut board = sample_board();
        let comment = board.add_comment("task-1", "Admin User", "looks good").unwrap();
        assert_eq!(board.task_by_id("task-1").unwrap().comments, vec![comment]);
        assert!(board.add_comment("missing", "a", "b").is_err());
    }

    #[test]
    fn test_meeting_draft_goes_to_timeline_only() {
        let mut board = sample_board();
        let mut draft = TaskDraft::new("Kickoff", TaskStatus::Todo);
        draft.date = NaiveDate::from_ymd_opt(2025, 5, 20);
        draft.time = Some("10:00".into());
        let created = board.add_task(draft);

        assert!(!board.board().tasks.contains_key(&created.id));
        assert_eq!(board.timeline_tasks().len(), 1);
    }
}
