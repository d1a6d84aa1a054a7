//! Assistant state types

use crate::config::AssistantConfig;
use crate::navigation::PageId;
use crate::rules::RuleTable;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Panel visibility as rendered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Closed,
    OpenActive,
    OpenMinimized,
}

impl Visibility {
    pub fn is_open(self) -> bool {
        !matches!(self, Visibility::Closed)
    }
}

/// Lifecycle of the one-shot engagement timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EngagementPhase {
    /// Not armed yet (before mount)
    #[default]
    Idle,
    Armed,
    /// Suppressed by `open()` before it fired
    Cancelled,
    Fired,
}

/// A bot reply waiting for its typing delay to elapse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReply {
    pub reply_id: u64,
    /// Text to classify once the delay elapses
    pub text: String,
    /// Set when the reply answers a navigating quick reply
    pub navigate_to: Option<PageId>,
}

/// A navigation waiting for its delay to elapse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingNavigation {
    pub navigation_id: u64,
    pub page: PageId,
}

/// Full assistant state. Only `transition` produces new values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConversationState {
    pub visibility: Visibility,
    pub unread_count: u32,
    pub is_typing: bool,
    /// Mirrors the message store length
    pub message_count: usize,
    pub engagement: EngagementPhase,
    /// Replies in answer order; only the head has an armed timer
    pub reply_queue: VecDeque<PendingReply>,
    /// Target whose navigation timer is armed. The first one wins until
    /// it fires or the panel closes.
    pub pending_navigation: Option<PendingNavigation>,
    pub next_reply_id: u64,
    pub next_navigation_id: u64,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_history(&self) -> bool {
        self.message_count > 0
    }
}

/// Immutable configuration of one mounted assistant
#[derive(Debug, Clone)]
pub struct AssistantContext {
    pub assistant_id: String,
    pub table: Arc<RuleTable>,
    pub engagement_delay: Duration,
    pub reply_delay: Duration,
    pub navigation_delay: Duration,
}

impl AssistantContext {
    pub fn new(assistant_id: impl Into<String>, table: Arc<RuleTable>, config: &AssistantConfig) -> Self {
        Self {
            assistant_id: assistant_id.into(),
            table,
            engagement_delay: config.engagement_delay,
            reply_delay: config.reply_delay,
            navigation_delay: config.navigation_delay,
        }
    }

    pub fn persona(&self) -> &str {
        self.table.persona()
    }
}
