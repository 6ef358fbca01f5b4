//! The ordered history of one chat session.

use std::fmt;

use time::OffsetDateTime;
use time::macros::format_description;

use crate::Error;

/// Prefix that marks an assistant entry as a failed turn.
pub const ERROR_PREFIX: &str = "❌ Sorry, I encountered an error: ";

/// Who wrote a message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// The person at the keyboard.
    User,

    /// The model, or an error standing in for its reply.
    Assistant,
}

impl Role {
    /// A display label for the role.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Gemini",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One complete turn.  Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: Role,
    content: String,
    timestamp: OffsetDateTime,
}

impl Message {
    /// Create a message stamped with the current wall-clock time.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        let timestamp = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        Self::with_timestamp(role, content, timestamp)
    }

    /// Create a message with an explicit timestamp.
    pub fn with_timestamp(role: Role, content: impl Into<String>, timestamp: OffsetDateTime) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp,
        }
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// An assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// An assistant message reporting a failed turn.
    pub fn error(err: &Error) -> Self {
        Self::assistant(format!("{ERROR_PREFIX}{}", err.message()))
    }

    /// Who wrote the message.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The full text of the turn.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// When the message was created.
    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    /// The timestamp as `HH:MM`.
    pub fn time_label(&self) -> String {
        self.timestamp
            .format(format_description!("[hour]:[minute]"))
            .unwrap_or_else(|_| "--:--".to_string())
    }

    /// Returns true if this is an assistant entry standing in for a failed turn.
    pub fn is_error(&self) -> bool {
        self.role == Role::Assistant && self.content.starts_with(ERROR_PREFIX)
    }
}

/// Message counts derived from a transcript.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TranscriptStats {
    /// Number of messages.
    pub total: usize,
    /// Number of user messages.
    pub user: usize,
    /// Number of assistant messages.
    pub assistant: usize,
}

/// Append-only, insertion-ordered list of messages.
///
/// There is no size cap and no deduplication.  The only way to remove
/// messages is [`Transcript::clear`], which removes all of them.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Remove every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Iterate the messages, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// The most recent message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Count messages by role.  Recomputed on every call.
    pub fn stats(&self) -> TranscriptStats {
        let user = self.count(Role::User);
        let assistant = self.count(Role::Assistant);
        TranscriptStats {
            total: self.messages.len(),
            user,
            assistant,
        }
    }

    fn count(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn messages_keep_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("hi"));
        transcript.push(Message::assistant("hello"));
        transcript.push(Message::user("hi"));
        let contents: Vec<&str> = transcript.iter().map(Message::content).collect();
        assert_eq!(contents, vec!["hi", "hello", "hi"]);
    }

    #[test]
    fn clear_empties_any_transcript() {
        let mut transcript = Transcript::new();
        transcript.clear();
        assert_eq!(transcript.len(), 0);
        for _ in 0..17 {
            transcript.push(Message::user("x"));
        }
        transcript.clear();
        assert!(transcript.is_empty());
        assert_eq!(transcript.stats(), TranscriptStats::default());
    }

    #[test]
    fn stats_always_add_up() {
        let mut transcript = Transcript::new();
        let script = [
            Some(Role::User),
            Some(Role::Assistant),
            Some(Role::User),
            None,
            Some(Role::Assistant),
            Some(Role::User),
            Some(Role::Assistant),
            Some(Role::Assistant),
        ];
        for step in script {
            match step {
                Some(role) => transcript.push(Message::new(role, "m")),
                None => transcript.clear(),
            }
            let stats = transcript.stats();
            assert_eq!(stats.total, stats.user + stats.assistant);
            assert_eq!(stats.total, transcript.len());
        }
        assert_eq!(
            transcript.stats(),
            TranscriptStats {
                total: 4,
                user: 1,
                assistant: 3
            }
        );
    }

    #[test]
    fn error_message_is_marked() {
        let message = Message::error(&Error::upstream("quota exceeded"));
        assert_eq!(message.role(), Role::Assistant);
        assert!(message.is_error());
        assert_eq!(
            message.content(),
            "❌ Sorry, I encountered an error: quota exceeded"
        );
        assert!(!Message::assistant("fine").is_error());
    }

    #[test]
    fn time_label_is_hours_and_minutes() {
        let message =
            Message::with_timestamp(Role::User, "hi", datetime!(2025-03-04 09:05:59 UTC));
        assert_eq!(message.time_label(), "09:05");
    }

    #[test]
    fn role_labels() {
        assert_eq!(Role::User.label(), "You");
        assert_eq!(Role::Assistant.label(), "Gemini");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
