//! Runtime for mounted assistants
//!
//! Each mounted assistant is a single tokio task that owns its state,
//! message store and timers. The host talks to it through an
//! [`AssistantHandle`]; dropping the handle unmounts the assistant.

mod executor;
mod timers;

#[cfg(test)]
pub mod testing;

use executor::AssistantExecutor;

use crate::config::AssistantConfig;
use crate::navigation::{NavigationTrigger, Navigator, PageId};
use crate::rules::{QuickReply, RuleTable, RuleTableError};
use crate::state_machine::{AssistantContext, ConversationState, Event, Visibility};
use crate::store::Message;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Assistant has been unmounted")]
    Unmounted,
    #[error(transparent)]
    Config(#[from] RuleTableError),
}

/// Everything a host needs to render the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct AssistantView {
    pub visibility: Visibility,
    pub unread_count: u32,
    pub is_typing: bool,
    pub messages: Vec<Message>,
}

impl AssistantView {
    /// Options offered by the most recent bot message
    pub fn latest_options(&self) -> &[QuickReply] {
        self.messages
            .last()
            .map(|m| m.options.as_slice())
            .unwrap_or_default()
    }
}

/// Visibility portion of the view, sent on every state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateSummary {
    pub visibility: Visibility,
    pub unread_count: u32,
    pub is_typing: bool,
}

impl From<&ConversationState> for StateSummary {
    fn from(state: &ConversationState) -> Self {
        Self {
            visibility: state.visibility,
            unread_count: state.unread_count,
            is_typing: state.is_typing,
        }
    }
}

/// Incremental updates for hosts that render as things happen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantEvent {
    Message { message: Message },
    StateChange { state: StateSummary },
    Navigated { page: PageId },
}

/// Mounts assistants on the current tokio runtime
pub struct AssistantRuntime;

impl AssistantRuntime {
    /// Validate `table` against `navigator`, then start the assistant and
    /// arm its engagement timer.
    pub fn mount(
        table: RuleTable,
        navigator: Arc<dyn Navigator>,
        config: &AssistantConfig,
    ) -> Result<AssistantHandle, AssistantError> {
        let navigation = NavigationTrigger::new(navigator);
        table.validate_targets(|page| navigation.can_navigate(page))?;

        let assistant_id = uuid::Uuid::new_v4().to_string();
        let context = AssistantContext::new(&assistant_id, Arc::new(table), config);

        let (event_tx, event_rx) = mpsc::channel(64);
        let (broadcast_tx, _) = broadcast::channel(128);
        let (view_tx, view_rx) = watch::channel(AssistantView::default());
        let shutdown = CancellationToken::new();

        let executor = AssistantExecutor::new(
            context,
            navigation,
            event_rx,
            event_tx.clone(),
            broadcast_tx.clone(),
            view_tx,
            shutdown.clone(),
        );
        let task = tokio::spawn(executor.run());

        Ok(AssistantHandle {
            assistant_id,
            event_tx,
            broadcast_tx,
            view_rx,
            task: Some(task),
            _shutdown: shutdown.drop_guard(),
        })
    }
}

/// Handle to interact with a mounted assistant
pub struct AssistantHandle {
    assistant_id: String,
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<AssistantEvent>,
    view_rx: watch::Receiver<AssistantView>,
    task: Option<JoinHandle<()>>,
    /// Stops the executor when the handle goes away
    _shutdown: DropGuard,
}

impl AssistantHandle {
    pub fn id(&self) -> &str {
        &self.assistant_id
    }

    pub async fn open(&self) -> Result<(), AssistantError> {
        self.send(Event::Open).await
    }

    pub async fn close(&self) -> Result<(), AssistantError> {
        self.send(Event::Close).await
    }

    pub async fn minimize(&self) -> Result<(), AssistantError> {
        self.send(Event::Minimize).await
    }

    pub async fn restore(&self) -> Result<(), AssistantError> {
        self.send(Event::Restore).await
    }

    /// Send typed text. Blank text is ignored by the assistant.
    pub async fn send_message(&self, text: impl Into<String>) -> Result<(), AssistantError> {
        self.send(Event::user_message(text)).await
    }

    pub async fn select_option(&self, option: QuickReply) -> Result<(), AssistantError> {
        self.send(Event::OptionSelected { option }).await
    }

    /// Current render state
    pub fn view(&self) -> AssistantView {
        self.view_rx.borrow().clone()
    }

    /// Receiver that is notified whenever the view changes
    pub fn watch(&self) -> watch::Receiver<AssistantView> {
        self.view_rx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AssistantEvent> {
        self.broadcast_tx.subscribe()
    }

    /// Cancel every pending timer and wait for the assistant to stop
    pub async fn unmount(mut self) {
        let _ = self.event_tx.send(Event::Unmount).await;
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(assistant_id = %self.assistant_id, error = %e, "Assistant task failed");
            }
        }
    }

    async fn send(&self, event: Event) -> Result<(), AssistantError> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| AssistantError::Unmounted)
    }
}
