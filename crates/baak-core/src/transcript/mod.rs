//! The conversation transcript.
//!
//! [`Transcript`] is the source of truth: an ordered list of message records
//! plus any typing placeholders for requests still in flight. Visual
//! transcripts (HTML in [`html`], the terminal view in `baak-cli`) are
//! derived from it.

pub mod html;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// Backend-supplied classification shown as badges under a bot bubble.
///
/// Every field is optional. `has_data` keeps absent (`None`, no badge) apart
/// from present-and-false (`Some(false)`, a `no_data` badge).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_data: Option<bool>,
}

impl MessageMeta {
    /// Meta with every field present.
    pub fn new(source: impl Into<String>, intent: impl Into<String>, has_data: bool) -> Self {
        Self {
            source: Some(source.into()),
            intent: Some(intent.into()),
            has_data: Some(has_data),
        }
    }

    /// Meta attached to errors produced on the client side.
    pub fn client_error() -> Self {
        Self::new("client", "error", false)
    }

    /// Badge labels, in display order, for the fields that are present.
    ///
    /// Empty strings count as absent. Labels are raw text; renderers escape.
    pub fn badges(&self) -> Vec<String> {
        let mut badges = Vec::new();
        if let Some(source) = self.source.as_deref().filter(|s| !s.is_empty()) {
            badges.push(format!("src: {source}"));
        }
        if let Some(intent) = self.intent.as_deref().filter(|s| !s.is_empty()) {
            badges.push(format!("intent: {intent}"));
        }
        if let Some(has_data) = self.has_data {
            badges.push(if has_data { "has_data" } else { "no_data" }.to_string());
        }
        badges
    }
}

/// One bubble in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    /// Raw text. User text is unescaped; bot text may carry markup.
    pub text: String,
    pub timestamp: DateTime<Local>,
    #[serde(default)]
    pub meta: MessageMeta,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            text: text.into(),
            timestamp: Local::now(),
            meta: MessageMeta::default(),
        }
    }

    pub fn bot(text: impl Into<String>, meta: MessageMeta) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Bot,
            text: text.into(),
            timestamp: Local::now(),
            meta,
        }
    }
}

/// Identifies the typing placeholder of one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypingToken(pub u64);

/// A transcript entry: a message, or a placeholder awaiting a reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Message(Message),
    Typing {
        token: TypingToken,
        since: DateTime<Local>,
    },
}

/// Where the controller writes the conversation.
///
/// Implemented by [`Transcript`] and by anything that wraps it to draw.
pub trait TranscriptSink {
    /// Append a right-aligned bubble for user-authored text.
    fn append_user(&mut self, text: &str);

    /// Append a left-aligned bubble for a reply, with badges from `meta`.
    fn append_bot(&mut self, answer: &str, meta: &MessageMeta);

    /// Insert a typing placeholder bound to a fresh token.
    fn show_typing(&mut self) -> TypingToken;

    /// Remove the placeholder for `token`. No-op if it is gone.
    fn hide_typing(&mut self, token: TypingToken);

    /// Drop everything, as a page reload would.
    fn clear(&mut self);
}

/// In-memory transcript.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    next_token: u64,
    scroll_pending: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Message records only, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Message(message) => Some(message),
            Entry::Typing { .. } => None,
        })
    }

    /// The most recent entry, if any.
    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of typing placeholders currently shown.
    pub fn typing_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, Entry::Typing { .. }))
            .count()
    }

    /// Whether a scroll-to-bottom is owed since the last call.
    ///
    /// Any number of mutations between two calls yields a single `true`.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }

    fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
        self.scroll_pending = true;
    }
}

impl TranscriptSink for Transcript {
    fn append_user(&mut self, text: &str) {
        self.push(Entry::Message(Message::user(text)));
    }

    fn append_bot(&mut self, answer: &str, meta: &MessageMeta) {
        self.push(Entry::Message(Message::bot(answer, meta.clone())));
    }

    fn show_typing(&mut self) -> TypingToken {
        self.next_token += 1;
        let token = TypingToken(self.next_token);
        self.push(Entry::Typing {
            token,
            since: Local::now(),
        });
        token
    }

    fn hide_typing(&mut self, token: TypingToken) {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !matches!(entry, Entry::Typing { token: t, .. } if *t == token));
        if self.entries.len() != before {
            self.scroll_pending = true;
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.scroll_pending = true;
    }
}
