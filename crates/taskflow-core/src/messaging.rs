//! Message Board
//!
//! Team chat: channels in creation order, each holding its messages oldest
//! first. Replies point at a parent message in the same channel.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{
    find_by_id, new_id, remove_by_id, ChannelDraft, ChannelKind, Message, MessageChannel,
    NotificationDraft, NotificationKind, Reaction, RelatedEntity, RelatedKind,
};
use crate::error::MessageError;
use crate::mention;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageBoard {
    channels: Vec<MessageChannel>,
}

impl MessageBoard {
    pub fn new(channels: Vec<MessageChannel>) -> Self {
        Self { channels }
    }

    pub fn channels(&self) -> &[MessageChannel] {
        &self.channels
    }

    pub fn channel(&self, id: &str) -> Option<&MessageChannel> {
        find_by_id(&self.channels, id)
    }

    fn channel_mut(&mut self, id: &str) -> Result<&mut MessageChannel, MessageError> {
        self.channels
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| MessageError::ChannelNotFound(id.to_string()))
    }

    // ========================
    // Channels
    // ========================

    pub fn add_channel(&mut self, draft: ChannelDraft) -> MessageChannel {
        let mut members = draft.members;
        if !members.contains(&draft.created_by) {
            members.insert(0, draft.created_by.clone());
        }
        let channel = MessageChannel {
            id: new_id("channel"),
            name: draft.name.trim().to_string(),
            description: draft.description.filter(|d| !d.trim().is_empty()),
            kind: draft.kind,
            members,
            created_by: draft.created_by,
            created_at: Utc::now(),
            updated_at: None,
            related_project_id: draft.related_project_id,
            related_task_id: draft.related_task_id,
            is_private: draft.is_private,
            messages: Vec::new(),
        };
        log::info!("[CHAT] created channel {}", channel.name);
        self.channels.push(channel.clone());
        channel
    }

    /// Replace a channel's details. Its messages are kept as they are.
    pub fn update_channel(&mut self, updated: MessageChannel) -> Result<MessageChannel, MessageError> {
        let channel = self.channel_mut(&updated.id)?;
        let messages = std::mem::take(&mut channel.messages);
        *channel = MessageChannel {
            messages,
            updated_at: Some(Utc::now()),
            ..updated
        };
        Ok(channel.clone())
    }

    pub fn delete_channel(&mut self, id: &str) -> Option<MessageChannel> {
        remove_by_id(&mut self.channels, id)
    }

    pub fn join(&mut self, channel_id: &str, member: &str) -> Result<(), MessageError> {
        let channel = self.channel_mut(channel_id)?;
        if !channel.is_member(member) {
            channel.members.push(member.to_string());
        }
        Ok(())
    }

    pub fn leave(&mut self, channel_id: &str, member: &str) -> Result<(), MessageError> {
        self.channel_mut(channel_id)?.members.retain(|m| m != member);
        Ok(())
    }

    // ========================
    // Messages
    // ========================

    /// Post to a channel. Mentions are taken from the text; a reply to a
    /// message outside the channel is rejected.
    pub fn add_message(
        &mut self,
        channel_id: &str,
        author: &str,
        text: &str,
        parent_message_id: Option<&str>,
    ) -> Result<Message, MessageError> {
        self.add_message_at(channel_id, author, text, parent_message_id, Utc::now())
    }

    fn add_message_at(
        &mut self,
        channel_id: &str,
        author: &str,
        text: &str,
        parent_message_id: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<Message, MessageError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MessageError::EmptyMessage);
        }
        let channel = self.channel_mut(channel_id)?;
        if let Some(parent) = parent_message_id {
            if find_by_id(&channel.messages, parent).is_none() {
                return Err(MessageError::MessageNotFound(parent.to_string()));
            }
        }
        let message = Message {
            id: new_id("message"),
            text: text.to_string(),
            author: author.to_string(),
            channel_id: channel_id.to_string(),
            created_at,
            updated_at: None,
            mentions: mention::extract_handles(text),
            attachments: Vec::new(),
            reactions: Vec::new(),
            is_pinned: false,
            parent_message_id: parent_message_id.map(str::to_string),
        };
        channel.messages.push(message.clone());
        channel.updated_at = Some(created_at);
        log::debug!("[CHAT] {} posted in {}", author, channel_id);
        Ok(message)
    }

    fn message_mut(&mut self, channel_id: &str, message_id: &str) -> Result<&mut Message, MessageError> {
        self.channel_mut(channel_id)?
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| MessageError::MessageNotFound(message_id.to_string()))
    }

    /// Edit a message's text; mentions follow the new text
    pub fn update_message(&mut self, channel_id: &str, message_id: &str, text: &str) -> Result<Message, MessageError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MessageError::EmptyMessage);
        }
        let message = self.message_mut(channel_id, message_id)?;
        message.text = text.to_string();
        message.mentions = mention::extract_handles(text);
        message.updated_at = Some(Utc::now());
        Ok(message.clone())
    }

    /// Remove a message; its replies go with it
    pub fn delete_message(&mut self, channel_id: &str, message_id: &str) -> Result<Message, MessageError> {
        let channel = self.channel_mut(channel_id)?;
        let removed = remove_by_id(&mut channel.messages, message_id)
            .ok_or_else(|| MessageError::MessageNotFound(message_id.to_string()))?;
        channel
            .messages
            .retain(|m| m.parent_message_id.as_deref() != Some(message_id));
        Ok(removed)
    }

    /// Add the user's reaction, or take it back when they already reacted
    /// with that emoji. Reactions nobody holds disappear.
    pub fn toggle_reaction(
        &mut self,
        channel_id: &str,
        message_id: &str,
        emoji: &str,
        user: &str,
    ) -> Result<Message, MessageError> {
        let message = self.message_mut(channel_id, message_id)?;
        match message.reactions.iter_mut().find(|r| r.emoji == emoji) {
            Some(reaction) if reaction.users.iter().any(|u| u == user) => {
                reaction.users.retain(|u| u != user);
                reaction.count = reaction.users.len() as u32;
            }
            Some(reaction) => {
                reaction.users.push(user.to_string());
                reaction.count = reaction.users.len() as u32;
            }
            None => message.reactions.push(Reaction {
                emoji: emoji.to_string(),
                count: 1,
                users: vec![user.to_string()],
            }),
        }
        message.reactions.retain(|r| r.count > 0);
        Ok(message.clone())
    }

    pub fn toggle_pin(&mut self, channel_id: &str, message_id: &str) -> Result<bool, MessageError> {
        let message = self.message_mut(channel_id, message_id)?;
        message.is_pinned = !message.is_pinned;
        Ok(message.is_pinned)
    }

    // ========================
    // Selectors
    // ========================

    pub fn channels_by_kind(&self, kind: ChannelKind) -> Vec<&MessageChannel> {
        self.channels.iter().filter(|c| c.kind == kind).collect()
    }

    pub fn channels_by_member(&self, member: &str) -> Vec<&MessageChannel> {
        self.channels.iter().filter(|c| c.is_member(member)).collect()
    }

    pub fn channels_by_project(&self, project_id: &str) -> Vec<&MessageChannel> {
        self.channels
            .iter()
            .filter(|c| c.related_project_id.as_deref() == Some(project_id))
            .collect()
    }

    pub fn channels_by_task(&self, task_id: &str) -> Vec<&MessageChannel> {
        self.channels
            .iter()
            .filter(|c| c.related_task_id.as_deref() == Some(task_id))
            .collect()
    }

    /// Channels `user` may see, matching a name/description query and an
    /// optional kind. Private channels only show up for their members.
    pub fn search(&self, user: &str, query: &str, kind: Option<ChannelKind>) -> Vec<&MessageChannel> {
        let query = query.trim().to_lowercase();
        self.channels
            .iter()
            .filter(|c| !c.is_private || c.is_member(user))
            .filter(|c| kind.map_or(true, |k| c.kind == k))
            .filter(|c| {
                query.is_empty()
                    || c.name.to_lowercase().contains(&query)
                    || c.description.as_ref().is_some_and(|d| d.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// Top-level messages of a channel grouped by calendar day, oldest first
    pub fn messages_by_date(&self, channel_id: &str) -> Vec<(NaiveDate, Vec<&Message>)> {
        let mut groups: Vec<(NaiveDate, Vec<&Message>)> = Vec::new();
        let Some(channel) = self.channel(channel_id) else {
            return groups;
        };
        for message in channel.messages.iter().filter(|m| m.parent_message_id.is_none()) {
            let day = message.created_at.date_naive();
            match groups.last_mut() {
                Some((d, list)) if *d == day => list.push(message),
                _ => groups.push((day, vec![message])),
            }
        }
        groups
    }

    pub fn replies(&self, channel_id: &str, message_id: &str) -> Vec<&Message> {
        self.channel(channel_id)
            .map(|c| {
                c.messages
                    .iter()
                    .filter(|m| m.parent_message_id.as_deref() == Some(message_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Mention notices for channel members named in a message
    pub fn mention_notices(&self, message: &Message) -> Vec<(String, NotificationDraft)> {
        let Some(channel) = self.channel(&message.channel_id) else {
            return Vec::new();
        };
        let related_to = match (&channel.related_task_id, &channel.related_project_id) {
            (Some(task), _) => Some(RelatedEntity { kind: RelatedKind::Task, id: task.clone() }),
            (None, Some(project)) => Some(RelatedEntity { kind: RelatedKind::Project, id: project.clone() }),
            (None, None) => None,
        };
        mention::resolve_mentions(&message.text, &channel.members)
            .into_iter()
            .filter(|m| *m != message.author)
            .map(|member| {
                let mut draft = NotificationDraft::new(
                    NotificationKind::Mention,
                    "You were mentioned",
                    format!("@{} mentioned you in #{}", message.author, channel.name),
                );
                draft.related_to = related_to.clone();
                (member.to_string(), draft)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn board() -> MessageBoard {
        let mut board = MessageBoard::default();
        let mut general = ChannelDraft::new("General", ChannelKind::General, "Admin User");
        general.members.extend(["Regular User".to_string(), "Project Manager".to_string()]);
        general.description = Some("Company-wide topics".into());
        board.add_channel(general);

        let mut project = ChannelDraft::new("Website Redesign", ChannelKind::Project, "Admin User");
        project.related_project_id = Some("1".into());
        board.add_channel(project);

        let mut task = ChannelDraft::new("Homepage", ChannelKind::Task, "Regular User");
        task.related_project_id = Some("1".into());
        task.related_task_id = Some("task-3".into());
        task.is_private = true;
        board.add_channel(task);
        board
    }

    fn id_of(board: &MessageBoard, name: &str) -> String {
        board.channels().iter().find(|c| c.name == name).unwrap().id.clone()
    }

    #[test]
    fn test_add_channel_includes_creator_once() {
        let board = board();
        let general = board.channel(&id_of(&board, "General")).unwrap();
        assert!(general.id.starts_with("channel-"));
        assert_eq!(general.members.iter().filter(|m| *m == "Admin User").count(), 1);
        assert!(general.messages.is_empty());
    }

    #[test]
    fn test_update_channel_keeps_messages() {
        let mut board = board();
        let id = id_of(&board, "General");
        board.add_message(&id, "Admin User", "hello", None).unwrap();

        let mut edited = board.channel(&id).unwrap().clone();
        edited.name = "Everyone".into();
        edited.messages.clear();
        let saved = board.update_channel(edited).unwrap();
        assert_eq!(saved.name, "Everyone");
        assert_eq!(saved.messages.len(), 1);
        assert!(saved.updated_at.is_some());

        let mut ghost = saved.clone();
        ghost.id = "channel-ghost".into();
        assert_eq!(board.update_channel(ghost), Err(MessageError::ChannelNotFound("channel-ghost".into())));
    }

    #[test]
    fn test_delete_channel() {
        let mut board = board();
        let id = id_of(&board, "Homepage");
        assert!(board.delete_channel(&id).is_some());
        assert!(board.delete_channel(&id).is_none());
        assert_eq!(board.channels().len(), 2);
    }

    #[test]
    fn test_add_message_records_mentions_and_rejects_blank() {
        let mut board = board();
        let id = id_of(&board, "General");
        let message = board
            .add_message(&id, "Admin User", "  @RegularUser can you check this?  ", None)
            .unwrap();
        assert_eq!(message.text, "@RegularUser can you check this?");
        assert_eq!(message.mentions, vec!["RegularUser"]);
        assert_eq!(board.channel(&id).unwrap().last_message().unwrap().id, message.id);

        assert_eq!(board.add_message(&id, "Admin User", "   ", None), Err(MessageError::EmptyMessage));
        assert_eq!(
            board.add_message("channel-none", "Admin User", "hi", None),
            Err(MessageError::ChannelNotFound("channel-none".into()))
        );
    }

    #[test]
    fn test_replies_and_cascading_delete() {
        let mut board = board();
        let id = id_of(&board, "General");
        let root = board.add_message(&id, "Admin User", "standup at 10", None).unwrap();
        let reply = board.add_message(&id, "Regular User", "ok", Some(&root.id)).unwrap();
        assert_eq!(board.replies(&id, &root.id), vec![&reply]);
        assert_eq!(
            board.add_message(&id, "Regular User", "?", Some("message-elsewhere")),
            Err(MessageError::MessageNotFound("message-elsewhere".into()))
        );

        board.delete_message(&id, &root.id).unwrap();
        assert!(board.channel(&id).unwrap().messages.is_empty());
        assert!(board.delete_message(&id, &root.id).is_err());
    }

    #[test]
    fn test_update_message_refreshes_mentions() {
        let mut board = board();
        let id = id_of(&board, "General");
        let message = board.add_message(&id, "Admin User", "ping @RegularUser", None).unwrap();
        let edited = board.update_message(&id, &message.id, "ping @ProjectManager").unwrap();
        assert_eq!(edited.mentions, vec!["ProjectManager"]);
        assert!(edited.updated_at.is_some());
        assert_eq!(board.update_message(&id, &message.id, ""), Err(MessageError::EmptyMessage));
    }

    #[test]
    fn test_reaction_toggles_per_user() {
        let mut board = board();
        let id = id_of(&board, "General");
        let message = board.add_message(&id, "Admin User", "shipped", None).unwrap();

        board.toggle_reaction(&id, &message.id, "🎉", "Regular User").unwrap();
        let after = board.toggle_reaction(&id, &message.id, "🎉", "Project Manager").unwrap();
        assert_eq!(after.reactions[0].count, 2);

        board.toggle_reaction(&id, &message.id, "🎉", "Regular User").unwrap();
        let after = board.toggle_reaction(&id, &message.id, "🎉", "Project Manager").unwrap();
        assert!(after.reactions.is_empty());
    }

    #[test]
    fn test_pin_toggles() {
        let mut board = board();
        let id = id_of(&board, "General");
        let message = board.add_message(&id, "Admin User", "rules", None).unwrap();
        assert_eq!(board.toggle_pin(&id, &message.id), Ok(true));
        assert_eq!(board.toggle_pin(&id, &message.id), Ok(false));
    }

    #[test]
    fn test_channel_selectors() {
        let board = board();
        assert_eq!(board.channels_by_kind(ChannelKind::Project).len(), 1);
        assert_eq!(board.channels_by_member("Project Manager").len(), 1);
        assert_eq!(board.channels_by_member("Admin User").len(), 2);
        assert_eq!(board.channels_by_project("1").len(), 2);
        assert_eq!(board.channels_by_task("task-3")[0].name, "Homepage");
        assert!(board.channels_by_task("task-9").is_empty());
    }

    #[test]
    fn test_search_hides_private_channels_from_outsiders() {
        let board = board();
        assert_eq!(board.search("Admin User", "", None).len(), 2);
        assert_eq!(board.search("Regular User", "", None).len(), 3);
        assert_eq!(board.search("Admin User", "company", None)[0].name, "General");
        assert!(board.search("Admin User", "", Some(ChannelKind::Direct)).is_empty());
    }

    #[test]
    fn test_messages_grouped_by_day() {
        let mut board = board();
        let id = id_of(&board, "General");
        let day = |d, h| Utc.with_ymd_and_hms(2025, 1, d, h, 0, 0).unwrap();
        board.add_message_at(&id, "Admin User", "a", None, day(1, 9)).unwrap();
        let first = board.add_message_at(&id, "Admin User", "b", None, day(1, 15)).unwrap();
        board.add_message_at(&id, "Regular User", "reply", Some(&first.id), day(2, 8)).unwrap();
        board.add_message_at(&id, "Regular User", "c", None, day(2, 9)).unwrap();

        let groups = board.messages_by_date(&id);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(groups[1].1.len(), 1);
        assert!(board.messages_by_date("channel-none").is_empty());
    }

    #[test]
    fn test_mention_notices_skip_author_and_outsiders() {
        let mut board = board();
        let id = id_of(&board, "Website Redesign");
        board.join(&id, "Regular User").unwrap();
        let message = board
            .add_message(&id, "Admin User", "@RegularUser @ProjectManager @AdminUser look", None)
            .unwrap();
        let notices = board.mention_notices(&message);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].0, "Regular User");
        assert_eq!(
            notices[0].1.related_to,
            Some(RelatedEntity { kind: RelatedKind::Project, id: "1".into() })
        );

        board.leave(&id, "Regular User").unwrap();
        assert!(board.mention_notices(&message).is_empty());
    }
}
