//! Cancellable one-shot timers owned by a mounted assistant

use crate::state_machine::{Event, TimerKind};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// At most one live timer per [`TimerKind`]. Arming a kind replaces its
/// previous timer; dropping the set cancels everything still pending.
#[derive(Debug, Default)]
pub(crate) struct TimerSet {
    timers: HashMap<TimerKind, CancellationToken>,
}

impl TimerSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Deliver `fire` on `event_tx` once `delay` has elapsed
    pub(crate) fn arm(
        &mut self,
        kind: TimerKind,
        delay: Duration,
        fire: Event,
        event_tx: mpsc::Sender<Event>,
    ) {
        let token = CancellationToken::new();
        if let Some(previous) = self.timers.insert(kind, token.clone()) {
            previous.cancel();
        }

        tokio::spawn(async move {
            tokio::select! {
                biased;

                () = token.cancelled() => {
                    tracing::trace!(timer = %kind, "Timer cancelled");
                }

                () = tokio::time::sleep(delay) => {
                    // Receiver gone means the assistant was unmounted
                    let _ = event_tx.send(fire).await;
                }
            }
        });
    }

    pub(crate) fn cancel(&mut self, kind: TimerKind) {
        if let Some(token) = self.timers.remove(&kind) {
            token.cancel();
        }
    }

    pub(crate) fn cancel_all(&mut self) {
        for (_, token) in self.timers.drain() {
            token.cancel();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_armed(&self, kind: TimerKind) -> bool {
        self.timers.get(&kind).is_some_and(|t| !t.is_cancelled())
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
