//! Assistant executor

use super::timers::TimerSet;
use super::{AssistantEvent, AssistantView, StateSummary};
use crate::navigation::NavigationTrigger;
use crate::state_machine::{transition, AssistantContext, ConversationState, Effect, Event};
use crate::store::MessageStore;
use std::ops::ControlFlow;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Runs one mounted assistant: feeds events through the pure state machine
/// and carries out the resulting effects, one event at a time.
pub(crate) struct AssistantExecutor {
    context: AssistantContext,
    state: ConversationState,
    store: MessageStore,
    navigation: NavigationTrigger,
    timers: TimerSet,
    event_rx: mpsc::Receiver<Event>,
    /// Handed to timers so they can deliver their events
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<AssistantEvent>,
    view_tx: watch::Sender<AssistantView>,
    shutdown: CancellationToken,
}

impl AssistantExecutor {
    pub(crate) fn new(
        context: AssistantContext,
        navigation: NavigationTrigger,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::Sender<Event>,
        broadcast_tx: broadcast::Sender<AssistantEvent>,
        view_tx: watch::Sender<AssistantView>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            context,
            state: ConversationState::new(),
            store: MessageStore::new(),
            navigation,
            timers: TimerSet::new(),
            event_rx,
            event_tx,
            broadcast_tx,
            view_tx,
            shutdown,
        }
    }

    pub(crate) async fn run(mut self) {
        tracing::info!(
            assistant_id = %self.context.assistant_id,
            persona = %self.context.persona(),
            "Mounting assistant"
        );

        if self.process_event(Event::Mount).is_continue() {
            loop {
                tokio::select! {
                    biased;

                    () = self.shutdown.cancelled() => {
                        tracing::debug!(assistant_id = %self.context.assistant_id, "Handle dropped");
                        let _ = self.process_event(Event::Unmount);
                        break;
                    }

                    Some(event) = self.event_rx.recv() => {
                        if self.process_event(event).is_break() {
                            break;
                        }
                    }

                    else => break,
                }
            }
        }

        self.timers.cancel_all();
        tracing::info!(
            assistant_id = %self.context.assistant_id,
            messages = self.store.len(),
            "Assistant unmounted"
        );
    }

    fn process_event(&mut self, event: Event) -> ControlFlow<()> {
        let event_name = event.name();
        let result = match transition(&self.state, &self.context, event) {
            Ok(r) => r,
            Err(e) => {
                // Rejected events leave the assistant untouched
                tracing::debug!(
                    assistant_id = %self.context.assistant_id,
                    event = event_name,
                    error = %e,
                    "Ignoring event"
                );
                return ControlFlow::Continue(());
            }
        };

        tracing::debug!(
            assistant_id = %self.context.assistant_id,
            event = event_name,
            effects = result.effects.len(),
            "Transition"
        );
        self.state = result.new_state;

        let mut flow = ControlFlow::Continue(());
        for effect in result.effects {
            if self.execute_effect(effect).is_break() {
                flow = ControlFlow::Break(());
            }
        }
        flow
    }

    fn execute_effect(&mut self, effect: Effect) -> ControlFlow<()> {
        match effect {
            Effect::AppendMessage { message } => {
                let message = self.store.append(message).clone();
                tracing::debug!(
                    assistant_id = %self.context.assistant_id,
                    id = message.id,
                    sender = ?message.sender,
                    "Message appended"
                );
                // No subscribers is fine
                let _ = self.broadcast_tx.send(AssistantEvent::Message { message });
            }

            Effect::ArmTimer { kind, delay, fire } => {
                tracing::debug!(timer = %kind, delay = ?delay, "Arming timer");
                self.timers.arm(kind, delay, fire, self.event_tx.clone());
            }

            Effect::CancelTimer { kind } => {
                tracing::debug!(timer = %kind, "Cancelling timer");
                self.timers.cancel(kind);
            }

            Effect::Navigate { page } => {
                self.navigation.fire(&page);
                let _ = self.broadcast_tx.send(AssistantEvent::Navigated { page });
            }

            Effect::PublishState => {
                let summary = StateSummary::from(&self.state);
                self.view_tx.send_replace(AssistantView {
                    visibility: summary.visibility,
                    unread_count: summary.unread_count,
                    is_typing: summary.is_typing,
                    messages: self.store.messages().to_vec(),
                });
                let _ = self
                    .broadcast_tx
                    .send(AssistantEvent::StateChange { state: summary });
            }

            Effect::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }
}
