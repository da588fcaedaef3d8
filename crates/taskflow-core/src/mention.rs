//! @mentions in comments

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::{NotificationDraft, NotificationKind, RelatedEntity, RelatedKind};

fn mention_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"@([A-Za-z0-9_.\-]+)").expect("mention pattern compiles"))
}

/// Raw handles in order of appearance, without duplicates
pub fn extract_handles(text: &str) -> Vec<String> {
    let mut handles: Vec<String> = Vec::new();
    for cap in mention_pattern().captures_iter(text) {
        let handle = cap[1].trim_end_matches('.').to_string();
        if !handle.is_empty() && !handles.iter().any(|h| h.eq_ignore_ascii_case(&handle)) {
            handles.push(handle);
        }
    }
    handles
}

/// Members whose name (spaces removed) matches a handle, case-insensitively
pub fn resolve_mentions<'a>(text: &str, members: &'a [String]) -> Vec<&'a str> {
    let handles = extract_handles(text);
    members
        .iter()
        .filter(|m| {
            let compact: String = m.split_whitespace().collect();
            handles.iter().any(|h| h.eq_ignore_ascii_case(&compact))
        })
        .map(String::as_str)
        .collect()
}

/// One mention notification per resolved member other than the author
pub fn mention_notifications(
    author: &str,
    task_id: &str,
    task_title: &str,
    comment: &str,
    members: &[String],
) -> Vec<(String, NotificationDraft)> {
    resolve_mentions(comment, members)
        .into_iter()
        .filter(|m| *m != author)
        .map(|member| {
            let mut draft = NotificationDraft::new(
                NotificationKind::Mention,
                "You were mentioned",
                format!("@{} mentioned you in a comment on \"{}\"", author, task_title),
            );
            draft.related_to = Some(RelatedEntity {
                kind: RelatedKind::Task,
                id: task_id.to_string(),
            });
            (member.to_string(), draft)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_handles() {
        assert_eq!(
            extract_handles("ping @alice and @Bob. also @alice again"),
            vec!["alice", "Bob"]
        );
        assert!(extract_handles("no mentions, email a@ b").is_empty());
    }

    #[test]
    fn test_resolve_against_member_names() {
        let members = vec!["Jane Doe".to_string(), "John Smith".to_string(), "Ann".to_string()];
        let found = resolve_mentions("thanks @janedoe and @ANN", &members);
        assert_eq!(found, vec!["Jane Doe", "Ann"]);
    }

    #[test]
    fn test_author_is_not_notified() {
        let members = vec!["Jane Doe".to_string(), "John Smith".to_string()];
        let drafts = mention_notifications("Jane Doe", "task-1", "Kickoff", "@JaneDoe @JohnSmith", &members);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].0, "John Smith");
        assert_eq!(drafts[0].1.kind, NotificationKind::Mention);
        assert_eq!(drafts[0].1.related_to.as_ref().map(|r| r.id.as_str()), Some("task-1"));
    }
}
