//! Append-only message log for one mounted assistant

use crate::rules::QuickReply;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Bot,
    User,
}

/// A message waiting to be appended (no id or timestamp yet)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender: Sender,
    pub text: String,
    pub options: Vec<QuickReply>,
}

impl NewMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            options: Vec::new(),
        }
    }

    pub fn bot(text: impl Into<String>, options: Vec<QuickReply>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            options,
        }
    }
}

/// A dialogue turn. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// 1-based position in the log
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuickReply>,
}

/// Ordered log of dialogue turns. Only grows.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp and append a message, returning the stored copy
    pub fn append(&mut self, message: NewMessage) -> &Message {
        let id = self.messages.len() as u64 + 1;
        self.messages.push(Message {
            id,
            sender: message.sender,
            text: message.text,
            timestamp: Utc::now(),
            options: message.options,
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
