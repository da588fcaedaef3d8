//! Activity Log
//!
//! Append-only record of what happened to files and folders.

use chrono::{DateTime, Timelike, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::domain::{ActivityStats, ActivityType, ActorCount, FileActivity, Folder, HourCount};

const TOP_ACTORS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityLog {
    entries: Vec<FileActivity>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_file_activity(
        &mut self,
        file_id: &str,
        file_name: &str,
        activity_type: ActivityType,
        performed_by: &str,
        details: Option<String>,
        metadata: Map<String, Value>,
    ) -> FileActivity {
        self.record(file_id, file_name, activity_type, performed_by, details, metadata, Utc::now())
    }

    /// Folder entries get a default detail line and `isFolder: true`
    pub fn log_folder_activity(
        &mut self,
        folder: &Folder,
        activity_type: ActivityType,
        performed_by: &str,
        details: Option<String>,
        mut metadata: Map<String, Value>,
    ) -> FileActivity {
        metadata.insert("isFolder".to_string(), Value::Bool(true));
        let details = details.or_else(|| Some(format!("Folder {}", activity_type.as_str())));
        self.log_file_activity(&folder.id, &folder.name, activity_type, performed_by, details, metadata)
    }

    #[allow(clippy::too_many_arguments)]
    fn record(
        &mut self,
        file_id: &str,
        file_name: &str,
        activity_type: ActivityType,
        performed_by: &str,
        details: Option<String>,
        metadata: Map<String, Value>,
        performed_at: DateTime<Utc>,
    ) -> FileActivity {
        let activity = FileActivity {
            id: uuid::Uuid::new_v4().to_string(),
            file_id: file_id.to_string(),
            file_name: file_name.to_string(),
            activity_type,
            performed_by: performed_by.to_string(),
            performed_at,
            details,
            metadata,
        };
        log::debug!(
            "[ACTIVITY] {} {} by {}",
            activity_type.as_str(),
            file_name,
            performed_by
        );
        self.entries.push(activity.clone());
        activity
    }

    /// Newest first
    pub fn activities(&self, limit: usize, offset: usize) -> Vec<&FileActivity> {
        self.newest_first(|_| true)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect()
    }

    pub fn file_activities(&self, file_id: &str) -> Vec<&FileActivity> {
        self.newest_first(|a| a.file_id == file_id)
    }

    pub fn user_activities(&self, user_id: &str) -> Vec<&FileActivity> {
        self.newest_first(|a| a.performed_by == user_id)
    }

    pub fn stats(&self, file_id: &str) -> ActivityStats {
        let activities = self.file_activities(file_id);
        let count_of = |kind: ActivityType| {
            activities.iter().filter(|a| a.activity_type == kind).count()
        };

        // Keep first-seen order so ties break stably
        let mut actor_counts: Vec<ActorCount> = Vec::new();
        let mut actor_index: HashMap<&str, usize> = HashMap::new();
        let mut hours = [0usize; 24];
        for activity in &activities {
            match actor_index.get(activity.performed_by.as_str()) {
                Some(&i) => actor_counts[i].count += 1,
                None => {
                    actor_index.insert(&activity.performed_by, actor_counts.len());
                    actor_counts.push(ActorCount {
                        user_id: activity.performed_by.clone(),
                        count: 1,
                    });
                }
            }
            hours[activity.performed_at.hour() as usize] += 1;
        }
        actor_counts.sort_by(|a, b| b.count.cmp(&a.count));
        actor_counts.truncate(TOP_ACTORS);

        let mut most_active_hours: Vec<HourCount> = hours
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(hour, &count)| HourCount {
                hour: hour as u32,
                count,
            })
            .collect();
        most_active_hours.sort_by(|a, b| b.count.cmp(&a.count));

        ActivityStats {
            views: count_of(ActivityType::View),
            downloads: count_of(ActivityType::Download),
            edits: count_of(ActivityType::Edit),
            most_frequent_viewers: actor_counts,
            most_active_hours,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn newest_first(&self, keep: impl Fn(&FileActivity) -> bool) -> Vec<&FileActivity> {
        let mut out: Vec<&FileActivity> = self.entries.iter().filter(|a| keep(a)).collect();
        // Stable sort: equal timestamps keep the later entry first
        out.reverse();
        out.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(log: &mut ActivityLog, file: &str, kind: ActivityType, who: &str, hour: u32) {
        let when = Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap();
        log.record(file, file, kind, who, None, Map::new(), when);
    }

    #[test]
    fn test_activities_newest_first_with_paging() {
        let mut log = ActivityLog::new();
        at(&mut log, "f1", ActivityType::Create, "u1", 8);
        at(&mut log, "f1", ActivityType::View, "u2", 10);
        at(&mut log, "f2", ActivityType::Edit, "u1", 9);

        let page: Vec<_> = log.activities(2, 0).iter().map(|a| a.performed_at.hour()).collect();
        assert_eq!(page, vec![10, 9]);
        assert_eq!(log.activities(2, 2).len(), 1);
        assert_eq!(log.file_activities("f1").len(), 2);
        assert_eq!(log.user_activities("u1").len(), 2);
    }

    #[test]
    fn test_folder_activity_is_flagged() {
        let mut log = ActivityLog::new();
        let now = Utc::now();
        let folder = Folder {
            id: "folder-1".into(),
            name: "Docs".into(),
            parent_id: None,
            project_id: None,
            created_at: now,
            updated_at: now,
            created_by: "u1".into(),
            path: "Docs".into(),
            permissions: vec![],
        };
        let entry = log.log_folder_activity(&folder, ActivityType::Create, "u1", None, Map::new());
        assert_eq!(entry.metadata.get("isFolder"), Some(&Value::Bool(true)));
        assert_eq!(entry.details.as_deref(), Some("Folder create"));
        assert_eq!(entry.file_name, "Docs");
    }

    #[test]
    fn test_stats_counts_actors_and_hours() {
        let mut log = ActivityLog::new();
        for _ in 0..3 {
            at(&mut log, "f1", ActivityType::View, "bob", 14);
        }
        at(&mut log, "f1", ActivityType::Download, "carol", 9);
        at(&mut log, "f1", ActivityType::Edit, "bob", 9);
        at(&mut log, "f1", ActivityType::Edit, "dave", 9);
        at(&mut log, "f2", ActivityType::View, "bob", 1);

        let stats = log.stats("f1");
        assert_eq!((stats.views, stats.downloads, stats.edits), (3, 1, 2));
        assert_eq!(stats.most_frequent_viewers[0].user_id, "bob");
        assert_eq!(stats.most_frequent_viewers[0].count, 4);
        assert_eq!(stats.most_frequent_viewers.len(), 3);
        assert_eq!(stats.most_active_hours[0], HourCount { hour: 9, count: 3 });
        assert_eq!(stats.most_active_hours.len(), 2);
    }

    #[test]
    fn test_top_actors_capped_at_five() {
        let mut log = ActivityLog::new();
        for who in ["a", "b", "c", "d", "e", "f", "g"] {
            at(&mut log, "f1", ActivityType::View, who, 12);
        }
        assert_eq!(log.stats("f1").most_frequent_viewers.len(), 5);
        log.clear();
        assert!(log.is_empty());
    }
}
