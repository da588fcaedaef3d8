//! Kanban Board
//!
//! Columns hold ordered task-id lists; a task's position on the board is
//! its index in the list of the column containing it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::task::{Task, TaskStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub title: String,
    /// Status a task takes on when it lands in this column
    pub status: TaskStatus,
    pub task_ids: Vec<String>,
}

impl Column {
    pub fn new(id: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id: id.into(),
            title: status.label().to_string(),
            status,
            task_ids: Vec::new(),
        }
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.task_ids.iter().any(|id| id == task_id)
    }

    pub fn position_of(&self, task_id: &str) -> Option<usize> {
        self.task_ids.iter().position(|id| id == task_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub tasks: HashMap<String, Task>,
    pub columns: HashMap<String, Column>,
    pub column_order: Vec<String>,
}

impl Default for Board {
    /// Empty To Do / In Progress / Review / Done board
    fn default() -> Self {
        let statuses = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Review, TaskStatus::Done];
        let mut columns = HashMap::new();
        let mut column_order = Vec::new();
        for (i, status) in statuses.into_iter().enumerate() {
            let id = format!("column-{}", i + 1);
            column_order.push(id.clone());
            columns.insert(id.clone(), Column::new(id, status));
        }
        Self {
            tasks: HashMap::new(),
            columns,
            column_order,
        }
    }
}

impl Board {
    /// Column for a status; unknown mappings fall back to the first column
    pub fn column_for_status(&self, status: TaskStatus) -> Option<&str> {
        let wanted = status.column_status();
        self.column_order
            .iter()
            .find(|id| self.columns.get(*id).is_some_and(|c| c.status == wanted))
            .or_else(|| self.column_order.first())
            .map(String::as_str)
    }

    /// Column currently holding the task
    pub fn column_of(&self, task_id: &str) -> Option<&str> {
        self.column_order
            .iter()
            .find(|id| self.columns.get(*id).is_some_and(|c| c.contains(task_id)))
            .map(String::as_str)
    }

    /// Columns in display order
    pub fn ordered_columns(&self) -> Vec<&Column> {
        self.column_order.iter().filter_map(|id| self.columns.get(id)).collect()
    }

    /// Tasks of a column in display order
    pub fn column_tasks(&self, column_id: &str) -> Vec<&Task> {
        self.columns
            .get(column_id)
            .map(|c| c.task_ids.iter().filter_map(|id| self.tasks.get(id)).collect())
            .unwrap_or_default()
    }

    /// Turn a drop into `(source column, final index)` for `move_task`.
    ///
    /// `slot` counts cards as displayed before the drag, with `None` meaning
    /// the column's empty tail. A card moving down its own column lands one
    /// slot earlier since it no longer sits above the gap.
    pub fn final_drop_index(&self, card_id: &str, dest_column: &str, slot: Option<usize>) -> Option<(&str, usize)> {
        let source = self.column_of(card_id)?;
        let current = self.columns.get(source)?.position_of(card_id)?;
        let dest_len = self.columns.get(dest_column)?.task_ids.len();
        let same_column = source == dest_column;
        let index = match slot {
            Some(slot) if same_column && current < slot => slot - 1,
            Some(slot) => slot.min(dest_len),
            None if same_column => dest_len.saturating_sub(1),
            None => dest_len,
        };
        Some((source, index))
    }

    /// Remove a task id from whichever column holds it
    pub(crate) fn detach(&mut self, task_id: &str) {
        for column in self.columns.values_mut() {
            column.task_ids.retain(|id| id != task_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_board_has_four_columns() {
        let board = Board::default();
        let titles: Vec<_> = board.ordered_columns().iter().map(|c| c.title.clone()).collect();
        assert_eq!(titles, vec!["To Do", "In Progress", "Review", "Done"]);
    }

    fn board_with(todo: &[&str], doing: &[&str]) -> Board {
        let mut board = Board::default();
        for (column, ids) in [("column-1", todo), ("column-2", doing)] {
            if let Some(c) = board.columns.get_mut(column) {
                c.task_ids = ids.iter().map(|id| id.to_string()).collect();
            }
        }
        board
    }

    #[test]
    fn test_drop_moving_up_keeps_slot() {
        let board = board_with(&["a", "b", "c"], &[]);
        assert_eq!(board.final_drop_index("c", "column-1", Some(0)), Some(("column-1", 0)));
        assert_eq!(board.final_drop_index("c", "column-1", Some(1)), Some(("column-1", 1)));
    }

    #[test]
    fn test_drop_moving_down_same_column_shifts_by_one() {
        let board = board_with(&["a", "b", "c"], &[]);
        // Gap between b and c
        assert_eq!(board.final_drop_index("a", "column-1", Some(2)), Some(("column-1", 1)));
        // Gap right below itself is its own spot
        assert_eq!(board.final_drop_index("a", "column-1", Some(1)), Some(("column-1", 0)));
    }

    #[test]
    fn test_drop_on_own_column_tail_goes_last() {
        let board = board_with(&["a", "b", "c"], &[]);
        assert_eq!(board.final_drop_index("a", "column-1", None), Some(("column-1", 2)));
        assert_eq!(board.final_drop_index("a", "column-1", Some(3)), Some(("column-1", 2)));
    }

    #[test]
    fn test_drop_across_columns_uses_slot_or_tail() {
        let board = board_with(&["a", "b"], &["x", "y"]);
        assert_eq!(board.final_drop_index("a", "column-2", Some(1)), Some(("column-1", 1)));
        assert_eq!(board.final_drop_index("a", "column-2", None), Some(("column-1", 2)));
        assert_eq!(board.final_drop_index("a", "column-2", Some(9)), Some(("column-1", 2)));
        assert_eq!(board.final_drop_index("a", "column-3", Some(0)), Some(("column-1", 0)));
    }

    #[test]
    fn test_drop_of_unknown_card_or_column() {
        let board = board_with(&["a"], &[]);
        assert_eq!(board.final_drop_index("ghost", "column-1", None), None);
        assert_eq!(board.final_drop_index("a", "column-9", None), None);
    }

    #[test]
    fn test_completed_maps_to_done_column() {
        let board = Board::default();
        assert_eq!(board.column_for_status(TaskStatus::Completed), Some("column-4"));
        assert_eq!(board.column_for_status(TaskStatus::InProgress), Some("column-2"));
    }
}
