//! Local Task Metrics
//!
//! Dashboard figures computed from the in-memory task list, used when the
//! backend metrics endpoints are unreachable (or in offline mode).
//! Tasks carry no completion timestamp, so finished tasks are dated by their
//! due date and the average completion time is left at zero.

use chrono::{Duration, NaiveDate};
use std::collections::{BTreeMap, HashSet};

use crate::domain::{CountByLabel, Priority, Task, TaskMetrics, TaskStatus, TeamMetrics, TrendPoint};
use crate::selectors::is_overdue;

const RECENT_LIMIT: usize = 5;

/// Metrics over `tasks`, restricted to one assignee when given. `days`
/// sizes the trend window ending at `today`.
pub fn task_metrics(tasks: &[Task], assignee: Option<&str>, today: NaiveDate, days: u32) -> TaskMetrics {
    let mine: Vec<&Task> = tasks
        .iter()
        .filter(|t| assignee.map_or(true, |a| t.is_assigned_to(a)))
        .collect();
    let count = |status: TaskStatus| mine.iter().filter(|t| t.status == status).count() as u32;

    let completed: Vec<&Task> = mine.iter().copied().filter(|t| t.status.is_finished()).collect();
    let window_start = today - Duration::days(days.max(1) as i64 - 1);
    let trend = completion_trend(&completed, window_start, today);
    let finished_in_window: u32 = trend.iter().map(|p| p.count).sum();
    let weeks = (days.max(1) as f64) / 7.0;

    let mut recently_completed: Vec<Task> = completed.iter().map(|t| (*t).clone()).collect();
    recently_completed.sort_by(|a, b| b.due_date.cmp(&a.due_date));
    recently_completed.truncate(RECENT_LIMIT);

    let active_projects: Vec<String> = {
        let mut seen = HashSet::new();
        mine.iter()
            .filter(|t| !t.status.is_finished())
            .filter_map(|t| t.project.clone())
            .filter(|p| seen.insert(p.clone()))
            .collect()
    };

    TaskMetrics {
        total_tasks: mine.len() as u32,
        completed_tasks: completed.len() as u32,
        in_progress_tasks: count(TaskStatus::InProgress),
        todo_tasks: count(TaskStatus::Todo),
        review_tasks: count(TaskStatus::Review),
        overdue_tasks: mine.iter().filter(|t| is_overdue(t, today)).count() as u32,
        average_completion_time: 0.0,
        task_velocity: finished_in_window as f64 / weeks,
        tasks_by_priority: by_priority(&mine),
        task_status_distribution: by_status(&mine),
        completion_trend: trend,
        active_tasks: mine
            .iter()
            .filter(|t| t.status == TaskStatus::InProgress)
            .map(|t| (*t).clone())
            .collect(),
        recently_completed_tasks: recently_completed,
        last_active_date: None,
        active_projects,
    }
}

/// Team view: distribution over assignees and the shared trend
pub fn team_metrics(tasks: &[Task], today: NaiveDate, days: u32) -> TeamMetrics {
    let mut per_user: BTreeMap<&str, u32> = BTreeMap::new();
    for task in tasks {
        for assignee in &task.assignees {
            *per_user.entry(assignee.as_str()).or_default() += 1;
        }
    }
    let average = if per_user.is_empty() {
        0.0
    } else {
        per_user.values().sum::<u32>() as f64 / per_user.len() as f64
    };

    let completed: Vec<&Task> = tasks.iter().filter(|t| t.status.is_finished()).collect();
    let window_start = today - Duration::days(days.max(1) as i64 - 1);

    TeamMetrics {
        average_tasks_per_user: average,
        average_completion_time: 0.0,
        task_distribution: per_user
            .into_iter()
            .map(|(name, value)| CountByLabel {
                name: name.to_string(),
                value,
            })
            .collect(),
        task_completion_trend: completion_trend(&completed, window_start, today),
    }
}

fn completion_trend(completed: &[&Task], start: NaiveDate, end: NaiveDate) -> Vec<TrendPoint> {
    let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for task in completed {
        if let Some(day) = task.due_date.filter(|d| *d >= start && *d <= end) {
            *per_day.entry(day).or_default() += 1;
        }
    }
    per_day
        .into_iter()
        .map(|(date, count)| TrendPoint { date, count })
        .collect()
}

fn by_priority(tasks: &[&Task]) -> Vec<CountByLabel> {
    [Priority::High, Priority::Medium, Priority::Low]
        .into_iter()
        .map(|p| CountByLabel {
            name: p.as_str().to_string(),
            value: tasks.iter().filter(|t| t.priority == Some(p)).count() as u32,
        })
        .filter(|c| c.value > 0)
        .collect()
}

fn by_status(tasks: &[&Task]) -> Vec<CountByLabel> {
    TaskStatus::ALL
        .into_iter()
        .map(|s| CountByLabel {
            name: s.label().to_string(),
            value: tasks.iter().filter(|t| t.status == s).count() as u32,
        })
        .filter(|c| c.value > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn task(id: &str, status: TaskStatus, who: &str, due: Option<u32>) -> Task {
        let mut t = Task::new(id, id, status);
        t.assignees = vec![who.to_string()];
        t.due_date = due.map(day);
        t.priority = Some(Priority::High);
        t
    }

    #[test]
    fn test_user_metrics() {
        let tasks = vec![
            task("a", TaskStatus::Done, "ann", Some(10)),
            task("b", TaskStatus::Completed, "ann", Some(12)),
            task("c", TaskStatus::InProgress, "ann", Some(1)),
            task("d", TaskStatus::Todo, "bob", None),
        ];
        let m = task_metrics(&tasks, Some("ann"), day(14), 14);
        assert_eq!(m.total_tasks, 3);
        assert_eq!(m.completed_tasks, 2);
        assert_eq!(m.in_progress_tasks, 1);
        assert_eq!(m.overdue_tasks, 1);
        assert_eq!(m.completion_trend.len(), 2);
        assert!((m.task_velocity - 1.0).abs() < 1e-9);
        assert_eq!(m.recently_completed_tasks[0].id, "b");
        assert_eq!(m.active_tasks.len(), 1);
        assert_eq!(m.tasks_by_priority, vec![CountByLabel { name: "high".into(), value: 3 }]);
    }

    #[test]
    fn test_team_metrics() {
        let tasks = vec![
            task("a", TaskStatus::Done, "ann", Some(10)),
            task("b", TaskStatus::Todo, "ann", None),
            task("c", TaskStatus::Todo, "bob", None),
        ];
        let m = team_metrics(&tasks, day(14), 30);
        assert!((m.average_tasks_per_user - 1.5).abs() < 1e-9);
        assert_eq!(m.task_distribution[0], CountByLabel { name: "ann".into(), value: 2 });
        assert_eq!(m.task_completion_trend.len(), 1);

        assert_eq!(team_metrics(&[], day(1), 7).average_tasks_per_user, 0.0);
    }
}
