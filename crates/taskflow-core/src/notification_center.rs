//! Notification Center
//!
//! Newest-first list of in-app notifications with read tracking.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::domain::{Notification, NotificationDraft, NotificationKind, Task};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationCenter {
    notifications: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new(notifications: Vec<Notification>) -> Self {
        Self { notifications }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn add(&mut self, draft: NotificationDraft) -> Notification {
        self.add_at(draft, Utc::now())
    }

    fn add_at(&mut self, draft: NotificationDraft, created_at: DateTime<Utc>) -> Notification {
        let notification = Notification {
            id: uuid::Uuid::new_v4().to_string(),
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            related_to: draft.related_to,
            is_read: false,
            created_at,
        };
        log::debug!("[NOTIFY] {}", notification.title);
        self.notifications.insert(0, notification.clone());
        notification
    }

    /// Returns false for unknown ids
    pub fn mark_as_read(&mut self, id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.is_read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_as_read(&mut self) {
        for n in &mut self.notifications {
            n.is_read = true;
        }
    }

    pub fn delete(&mut self, id: &str) -> Option<Notification> {
        let pos = self.notifications.iter().position(|n| n.id == id)?;
        Some(self.notifications.remove(pos))
    }

    pub fn clear_all(&mut self) {
        self.notifications.clear();
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.is_read).count()
    }

    /// Deadline drafts for unfinished tasks due the day after `today` that
    /// do not already have an unread deadline notice.
    pub fn deadline_notices(&self, tasks: &[Task], today: NaiveDate) -> Vec<NotificationDraft> {
        let tomorrow = today + Duration::days(1);
        tasks
            .iter()
            .filter(|t| t.due_date == Some(tomorrow) && !t.status.is_finished())
            .filter(|t| !self.has_unread_deadline_for(&t.id))
            .map(|t| {
                NotificationDraft::new(
                    NotificationKind::Deadline,
                    "Upcoming deadline",
                    format!("Task \"{}\" is due tomorrow", t.title),
                )
                .about_task(&t.id)
            })
            .collect()
    }

    fn has_unread_deadline_for(&self, task_id: &str) -> bool {
        self.notifications.iter().any(|n| {
            !n.is_read
                && n.kind == NotificationKind::Deadline
                && n.related_to.as_ref().is_some_and(|r| r.id == task_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskStatus;

    fn draft(title: &str) -> NotificationDraft {
        NotificationDraft::new(NotificationKind::System, title, "body")
    }

    #[test]
    fn test_add_puts_newest_first_and_unread() {
        let mut center = NotificationCenter::default();
        center.add(draft("first"));
        let second = center.add(draft("second"));
        assert_eq!(center.notifications()[0].id, second.id);
        assert!(!second.is_read);
        assert_eq!(center.unread_count(), 2);
    }

    #[test]
    fn test_read_delete_clear() {
        let mut center = NotificationCenter::default();
        let a = center.add(draft("a"));
        let b = center.add(draft("b"));

        assert!(center.mark_as_read(&a.id));
        assert!(!center.mark_as_read("missing"));
        assert_eq!(center.unread_count(), 1);

        center.mark_all_as_read();
        assert_eq!(center.unread_count(), 0);

        assert_eq!(center.delete(&b.id).map(|n| n.title), Some("b".to_string()));
        assert_eq!(center.notifications().len(), 1);

        center.clear_all();
        assert!(center.notifications().is_empty());
    }

    #[test]
    fn test_deadline_notices_for_tasks_due_tomorrow() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();

        let mut due = Task::new("t1", "Bug fixing", TaskStatus::InProgress);
        due.due_date = Some(tomorrow);
        let mut done = Task::new("t2", "Shipped", TaskStatus::Done);
        done.due_date = Some(tomorrow);
        let mut later = Task::new("t3", "Later", TaskStatus::Todo);
        later.due_date = Some(today + Duration::days(5));

        let mut center = NotificationCenter::default();
        let notices = center.deadline_notices(&[due.clone(), done, later], today);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Task \"Bug fixing\" is due tomorrow");

        center.add(notices[0].clone());
        assert!(center.deadline_notices(&[due], today).is_empty());
    }
}
