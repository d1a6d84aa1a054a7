//! Pure state transition function
//!
//! Given the same state, context and event, `transition` always produces the
//! same new state and effects. Timers, the message store and the host
//! navigator are only touched by the executor running the effects.

use super::state::{EngagementPhase, PendingNavigation, PendingReply, Visibility};
use super::{AssistantContext, ConversationState, Effect, Event, TimerKind};
use crate::navigation::PageId;
use crate::rules::classify;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConversationState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConversationState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    /// State unchanged, nothing to do
    pub fn unchanged(state: &ConversationState) -> Self {
        Self::new(state.clone())
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Events the current state cannot accept. The executor logs and drops
/// these; none of them reach the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("Conversation is closed")]
    ConversationClosed,
    #[error("Stale {0} timer")]
    StaleTimer(TimerKind),
}

pub fn transition(
    state: &ConversationState,
    context: &AssistantContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        // ============================================================
        // Lifecycle
        // ============================================================
        Event::Mount if state.engagement == EngagementPhase::Idle => {
            let mut next = state.clone();
            next.engagement = EngagementPhase::Armed;
            Ok(TransitionResult::new(next)
                .with_effect(Effect::arm(
                    TimerKind::Engagement,
                    context.engagement_delay,
                    Event::EngagementTimeout,
                ))
                .with_effect(Effect::PublishState))
        }

        Event::Unmount => {
            let mut next = state.clone();
            next.reply_queue.clear();
            next.is_typing = false;
            next.pending_navigation = None;
            if next.engagement == EngagementPhase::Armed {
                next.engagement = EngagementPhase::Cancelled;
            }
            Ok(TransitionResult::new(next)
                .with_effects([
                    Effect::cancel(TimerKind::Engagement),
                    Effect::cancel(TimerKind::Reply),
                    Effect::cancel(TimerKind::Navigation),
                ])
                .with_effect(Effect::Shutdown))
        }

        // ============================================================
        // Visibility
        // ============================================================

        // Closed + Open -> OpenActive, greeting on first open
        Event::Open if state.visibility == Visibility::Closed => {
            let mut next = state.clone();
            next.visibility = Visibility::OpenActive;
            next.unread_count = 0;

            let mut result_effects = Vec::new();
            if next.engagement == EngagementPhase::Armed {
                next.engagement = EngagementPhase::Cancelled;
                result_effects.push(Effect::cancel(TimerKind::Engagement));
            }
            if !next.has_history() {
                next.message_count += 1;
                result_effects.push(Effect::append_bot_reply(context.table.greeting()));
            }
            result_effects.push(Effect::PublishState);

            Ok(TransitionResult::new(next).with_effects(result_effects))
        }

        // Already open: idempotent
        Event::Open => Ok(TransitionResult::unchanged(state)),

        Event::Close if state.visibility.is_open() => {
            let (next, effects) = close(state);
            Ok(TransitionResult::new(next).with_effects(effects))
        }

        Event::Close => Ok(TransitionResult::unchanged(state)),

        Event::Minimize => match state.visibility {
            Visibility::OpenActive => {
                let mut next = state.clone();
                next.visibility = Visibility::OpenMinimized;
                Ok(TransitionResult::new(next).with_effect(Effect::PublishState))
            }
            Visibility::OpenMinimized => Ok(TransitionResult::unchanged(state)),
            Visibility::Closed => Err(TransitionError::InvalidTransition(
                "cannot minimize a closed assistant".to_string(),
            )),
        },

        Event::Restore => match state.visibility {
            Visibility::OpenMinimized => {
                let mut next = state.clone();
                next.visibility = Visibility::OpenActive;
                Ok(TransitionResult::new(next).with_effect(Effect::PublishState))
            }
            Visibility::OpenActive => Ok(TransitionResult::unchanged(state)),
            Visibility::Closed => Err(TransitionError::InvalidTransition(
                "cannot restore a closed assistant".to_string(),
            )),
        },

        // ============================================================
        // User input
        // ============================================================

        // Blank input is dropped without touching anything
        Event::UserMessage { text } if text.trim().is_empty() => {
            Ok(TransitionResult::unchanged(state))
        }
        Event::OptionSelected { option } if option.label.trim().is_empty() => {
            Ok(TransitionResult::unchanged(state))
        }

        Event::UserMessage { .. } | Event::OptionSelected { .. }
            if !state.visibility.is_open() =>
        {
            Err(TransitionError::ConversationClosed)
        }

        Event::UserMessage { text } => Ok(enqueue_reply(state, context, text, None)),

        // A chosen option is re-classified exactly as if its label was typed
        Event::OptionSelected { option } => Ok(enqueue_reply(
            state,
            context,
            option.label,
            option.navigate_to,
        )),

        // ============================================================
        // Timers
        // ============================================================
        Event::EngagementTimeout if state.engagement == EngagementPhase::Armed => {
            let mut next = state.clone();
            next.engagement = EngagementPhase::Fired;
            if next.visibility == Visibility::Closed && !next.has_history() {
                next.unread_count = 1;
            }
            Ok(TransitionResult::new(next).with_effect(Effect::PublishState))
        }

        Event::EngagementTimeout => Err(TransitionError::StaleTimer(TimerKind::Engagement)),

        Event::ReplyReady { reply_id }
            if state
                .reply_queue
                .front()
                .is_some_and(|head| head.reply_id == reply_id) =>
        {
            Ok(resolve_reply(state, context))
        }

        Event::ReplyReady { .. } => Err(TransitionError::StaleTimer(TimerKind::Reply)),

        // Navigation closes the assistant first, then routes the host
        Event::NavigationReady {
            navigation_id,
            page,
        } if state
            .pending_navigation
            .as_ref()
            .is_some_and(|p| p.navigation_id == navigation_id && p.page == page) =>
        {
            // The navigation timer has fired; nothing left to cancel for it
            let mut landed = state.clone();
            landed.pending_navigation = None;
            let (next, effects) = close(&landed);
            Ok(TransitionResult::new(next)
                .with_effects(effects)
                .with_effect(Effect::Navigate { page }))
        }

        Event::NavigationReady { .. } => Err(TransitionError::StaleTimer(TimerKind::Navigation)),

        Event::Mount => Err(TransitionError::InvalidTransition(
            "assistant is already mounted".to_string(),
        )),
    }
}

/// Close the panel and drop every pending reply and navigation
fn close(state: &ConversationState) -> (ConversationState, Vec<Effect>) {
    let mut next = state.clone();
    let mut effects = Vec::new();

    next.visibility = Visibility::Closed;
    if !next.reply_queue.is_empty() {
        next.reply_queue.clear();
        effects.push(Effect::cancel(TimerKind::Reply));
    }
    next.is_typing = false;
    if next.pending_navigation.take().is_some() {
        effects.push(Effect::cancel(TimerKind::Navigation));
    }
    effects.push(Effect::PublishState);

    (next, effects)
}

/// Append the user's turn and queue its reply. Only the head of the queue
/// has a timer, so a reply already in flight just gains a successor.
fn enqueue_reply(
    state: &ConversationState,
    context: &AssistantContext,
    text: String,
    navigate_to: Option<PageId>,
) -> TransitionResult {
    let mut next = state.clone();
    let reply_id = next.next_reply_id;
    next.next_reply_id += 1;
    next.message_count += 1;

    let mut effects = vec![Effect::append_user_message(text.clone())];

    next.reply_queue.push_back(PendingReply {
        reply_id,
        text,
        navigate_to,
    });

    if !next.is_typing {
        next.is_typing = true;
        effects.push(Effect::arm(
            TimerKind::Reply,
            context.reply_delay,
            Event::ReplyReady { reply_id },
        ));
    }
    effects.push(Effect::PublishState);

    TransitionResult::new(next).with_effects(effects)
}

/// Answer the head of the reply queue
fn resolve_reply(state: &ConversationState, context: &AssistantContext) -> TransitionResult {
    let mut next = state.clone();
    let mut effects = Vec::new();

    let Some(reply) = next.reply_queue.pop_front() else {
        return TransitionResult::unchanged(state);
    };

    let rule = classify(&reply.text, &context.table);
    next.message_count += 1;
    effects.push(Effect::append_bot_reply(rule));

    match (reply.navigate_to, &next.pending_navigation) {
        // An earlier selection is already on its way; it keeps the slot
        (Some(page), Some(pending)) => {
            tracing::warn!(
                assistant_id = %context.assistant_id,
                pending = %pending.page,
                dropped = %page,
                "Navigation already pending, dropping later target"
            );
        }
        (Some(page), None) => {
            let navigation_id = next.next_navigation_id;
            next.next_navigation_id += 1;
            next.pending_navigation = Some(PendingNavigation {
                navigation_id,
                page: page.clone(),
            });
            effects.push(Effect::arm(
                TimerKind::Navigation,
                context.navigation_delay,
                Event::NavigationReady {
                    navigation_id,
                    page,
                },
            ));
        }
        (None, _) => {}
    }

    match next.reply_queue.front() {
        Some(head) => effects.push(Effect::arm(
            TimerKind::Reply,
            context.reply_delay,
            Event::ReplyReady {
                reply_id: head.reply_id,
            },
        )),
        None => next.is_typing = false,
    }
    effects.push(Effect::PublishState);

    TransitionResult::new(next).with_effects(effects)
}
