//! View Selectors
//!
//! Date and list queries behind the calendar, timeline and list views.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::{Priority, Task, TaskStatus};

/// Zoom level of the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Day,
    #[default]
    Week,
    Month,
    Quarter,
    Year,
}

impl ViewMode {
    pub const ALL: [ViewMode; 5] = [ViewMode::Day, ViewMode::Week, ViewMode::Month, ViewMode::Quarter, ViewMode::Year];

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Day => "Day",
            ViewMode::Week => "Week",
            ViewMode::Month => "Month",
            ViewMode::Quarter => "Quarter",
            ViewMode::Year => "Year",
        }
    }

    /// Inclusive date range containing `anchor`
    pub fn range(&self, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            ViewMode::Day => (anchor, anchor),
            ViewMode::Week => {
                let start = week_start(anchor);
                (start, start + Days::new(6))
            }
            ViewMode::Month => month_range(anchor.year(), anchor.month(), 1),
            ViewMode::Quarter => {
                let first_month = (anchor.month0() / 3) * 3 + 1;
                month_range(anchor.year(), first_month, 3)
            }
            ViewMode::Year => month_range(anchor.year(), 1, 12),
        }
    }

    /// Move the anchor one period forward (`steps > 0`) or back
    pub fn shift(&self, anchor: NaiveDate, steps: i32) -> NaiveDate {
        let months = |n: i32| -> NaiveDate {
            let delta = Months::new(n.unsigned_abs());
            if n >= 0 {
                anchor.checked_add_months(delta).unwrap_or(anchor)
            } else {
                anchor.checked_sub_months(delta).unwrap_or(anchor)
            }
        };
        let days = |n: i64| -> NaiveDate {
            let delta = Days::new(n.unsigned_abs());
            if n >= 0 {
                anchor.checked_add_days(delta).unwrap_or(anchor)
            } else {
                anchor.checked_sub_days(delta).unwrap_or(anchor)
            }
        };
        match self {
            ViewMode::Day => days(steps as i64),
            ViewMode::Week => days(steps as i64 * 7),
            ViewMode::Month => months(steps),
            ViewMode::Quarter => months(steps * 3),
            ViewMode::Year => months(steps * 12),
        }
    }
}

fn month_range(year: i32, first_month: u32, span: u32) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(year, first_month, 1).unwrap_or_default();
    let end = start
        .checked_add_months(Months::new(span))
        .and_then(|d| d.pred_opt())
        .unwrap_or(start);
    (start, end)
}

/// Monday of the week containing `day`
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day.week(Weekday::Mon).first_day()
}

/// The seven days of the Monday-based week containing `day`
pub fn week_days(day: NaiveDate) -> Vec<NaiveDate> {
    week_start(day).iter_days().take(7).collect()
}

/// Whole Monday-based weeks covering the month of `anchor`
pub fn month_grid(anchor: NaiveDate) -> Vec<NaiveDate> {
    let (first, last) = ViewMode::Month.range(anchor);
    let mut days: Vec<NaiveDate> = week_start(first)
        .iter_days()
        .take_while(|d| *d <= last)
        .collect();
    let pad = (7 - days.len() % 7) % 7;
    days.extend(last.iter_days().skip(1).take(pad));
    days
}

/// A task lands on a day through its meeting date, due date or start date
pub fn occurs_on(task: &Task, day: NaiveDate) -> bool {
    task.date == Some(day) || task.due_date == Some(day) || task.start_date == Some(day)
}

pub fn tasks_on_date<'a, I>(tasks: I, day: NaiveDate) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter().filter(|t| occurs_on(t, day)).collect()
}

/// Days of the week containing `day`, each with its tasks; meetings sorted by time
pub fn tasks_by_week<'a>(tasks: &[&'a Task], day: NaiveDate) -> Vec<(NaiveDate, Vec<&'a Task>)> {
    week_days(day)
        .into_iter()
        .map(|d| {
            let mut on_day: Vec<&Task> = tasks.iter().copied().filter(|t| occurs_on(t, d)).collect();
            on_day.sort_by(|a, b| a.time.cmp(&b.time));
            (d, on_day)
        })
        .collect()
}

/// Tasks with any date inside the inclusive range
pub fn tasks_in_range<'a>(tasks: &[&'a Task], start: NaiveDate, end: NaiveDate) -> Vec<&'a Task> {
    tasks
        .iter()
        .copied()
        .filter(|t| {
            [t.date, t.due_date, t.start_date]
                .into_iter()
                .flatten()
                .any(|d| d >= start && d <= end)
        })
        .collect()
}

pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    !task.status.is_finished() && task.due_date.is_some_and(|due| due < today)
}

/// Column the list view sorts by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Title,
    Status,
    Priority,
    DueDate,
}

/// Filters of the list view; `None` fields match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee: Option<String>,
    pub text: String,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.priority.is_some() && self.priority != task.priority {
            return false;
        }
        if let Some(assignee) = &self.assignee {
            if !task.is_assigned_to(assignee) {
                return false;
            }
        }
        let needle = self.text.trim().to_lowercase();
        needle.is_empty()
            || task.title.to_lowercase().contains(&needle)
            || task
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

/// Filter then sort for the list view. Missing priorities and due dates sort last.
pub fn filter_and_sort<'a>(tasks: &'a [Task], filter: &TaskFilter, key: SortKey, descending: bool) -> Vec<&'a Task> {
    let mut out: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t)).collect();
    out.sort_by(|a, b| match key {
        SortKey::Title => directed(a.title.to_lowercase().cmp(&b.title.to_lowercase()), descending),
        SortKey::Status => directed(status_rank(a.status).cmp(&status_rank(b.status)), descending),
        SortKey::Priority => cmp_missing_last(a.priority, b.priority, descending),
        SortKey::DueDate => cmp_missing_last(a.due_date, b.due_date, descending),
    });
    out
}

fn directed(ord: Ordering, descending: bool) -> Ordering {
    if descending { ord.reverse() } else { ord }
}

fn cmp_missing_last<T: Ord>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => directed(x.cmp(&y), descending),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn status_rank(status: TaskStatus) -> usize {
    TaskStatus::ALL.iter().position(|s| *s == status).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_grid_is_whole_weeks() {
        let grid = month_grid(day(2024, 6, 15));
        assert_eq!(grid.len(), 35);
        assert_eq!(grid[0], day(2024, 5, 27));
        assert_eq!(grid[34], day(2024, 6, 30));

        let may = month_grid(day(2024, 5, 1));
        assert_eq!(may.len(), 35);
        assert_eq!(may[0], day(2024, 4, 29));
        assert_eq!(may[34], day(2024, 6, 2));

        // February 2021 starts on a Monday and fills exactly four weeks
        let feb = month_grid(day(2021, 2, 3));
        assert_eq!(feb.len(), 28);
        assert_eq!(feb[0], day(2021, 2, 1));
    }

    fn dated(id: &str, date: Option<NaiveDate>, due: Option<NaiveDate>) -> Task {
        let mut t = Task::new(id, id, TaskStatus::Todo);
        t.date = date;
        t.due_date = due;
        t
    }

    #[test]
    fn test_week_starts_on_monday() {
        // 2025-05-22 is a Thursday
        let days = week_days(day(2025, 5, 22));
        assert_eq!(days.first(), Some(&day(2025, 5, 19)));
        assert_eq!(days.last(), Some(&day(2025, 5, 25)));
        assert_eq!(week_start(day(2025, 5, 19)), day(2025, 5, 19));
    }

    #[test]
    fn test_tasks_on_date_checks_all_date_fields() {
        let mut started = Task::new("s", "s", TaskStatus::Todo);
        started.start_date = Some(day(2025, 5, 20));
        let tasks = vec![
            dated("meeting", Some(day(2025, 5, 20)), None),
            dated("due", None, Some(day(2025, 5, 20))),
            dated("other", Some(day(2025, 5, 21)), None),
            started,
        ];
        let ids: Vec<_> = tasks_on_date(&tasks, day(2025, 5, 20)).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["meeting", "due", "s"]);
    }

    #[test]
    fn test_tasks_by_week_sorts_by_time() {
        let mut late = dated("late", Some(day(2025, 5, 20)), None);
        late.time = Some("14:00".into());
        let mut early = dated("early", Some(day(2025, 5, 20)), None);
        early.time = Some("09:30".into());
        let tasks = [&late, &early];

        let week = tasks_by_week(&tasks, day(2025, 5, 20));
        assert_eq!(week.len(), 7);
        let tuesday: Vec<_> = week[1].1.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(tuesday, vec!["early", "late"]);
        assert!(week[0].1.is_empty());
    }

    #[test]
    fn test_view_mode_ranges() {
        let anchor = day(2025, 5, 22);
        assert_eq!(ViewMode::Day.range(anchor), (anchor, anchor));
        assert_eq!(ViewMode::Month.range(anchor), (day(2025, 5, 1), day(2025, 5, 31)));
        assert_eq!(ViewMode::Quarter.range(anchor), (day(2025, 4, 1), day(2025, 6, 30)));
        assert_eq!(ViewMode::Year.range(anchor), (day(2025, 1, 1), day(2025, 12, 31)));
        assert_eq!(ViewMode::Week.shift(anchor, -1), day(2025, 5, 15));
        assert_eq!(ViewMode::Quarter.shift(anchor, 1), day(2025, 8, 22));
    }

    #[test]
    fn test_tasks_in_range() {
        let a = dated("a", Some(day(2025, 4, 30)), None);
        let b = dated("b", None, Some(day(2025, 5, 2)));
        let tasks = [&a, &b];
        let (start, end) = ViewMode::Month.range(day(2025, 5, 10));
        let hits: Vec<_> = tasks_in_range(&tasks, start, end).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(hits, vec!["b"]);
    }

    #[test]
    fn test_overdue_ignores_finished_tasks() {
        let today = day(2025, 5, 20);
        let mut t = dated("t", None, Some(day(2025, 5, 19)));
        assert!(is_overdue(&t, today));
        t.status = TaskStatus::Done;
        assert!(!is_overdue(&t, today));
        assert!(!is_overdue(&dated("n", None, None), today));
    }

    #[test]
    fn test_filter_and_sort() {
        let mut a = Task::new("a", "Bravo", TaskStatus::Todo);
        a.priority = Some(Priority::Low);
        a.assignees = vec!["Ann".into()];
        let mut b = Task::new("b", "alpha", TaskStatus::Review);
        b.priority = Some(Priority::High);
        let c = Task::new("c", "Charlie", TaskStatus::Todo);
        let tasks = vec![a, b, c];

        let by_title: Vec<_> = filter_and_sort(&tasks, &TaskFilter::default(), SortKey::Title, false)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(by_title, vec!["b", "a", "c"]);

        let by_priority: Vec<_> = filter_and_sort(&tasks, &TaskFilter::default(), SortKey::Priority, true)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(by_priority[0], "b");

        let filter = TaskFilter { assignee: Some("Ann".into()), ..Default::default() };
        assert_eq!(filter_and_sort(&tasks, &filter, SortKey::Title, false).len(), 1);

        let filter = TaskFilter { status: Some(TaskStatus::Todo), text: "char".into(), ..Default::default() };
        let hits = filter_and_sort(&tasks, &filter, SortKey::Title, false);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "c");
    }
}
