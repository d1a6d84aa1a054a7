//! Test doubles and end-to-end scenarios for mounted assistants
//!
//! Every test runs on a paused tokio clock, so the 30 second engagement
//! delay and the reply delays elapse instantly and deterministically.

use super::*;
use crate::navigation::RouteTable;
use crate::rules::{Persona, RuleTableError};
use crate::store::Sender;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::timeout;

// ============================================================================
// Recording Navigator
// ============================================================================

/// Navigator that remembers every page it was asked to show
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pages: Mutex<Vec<PageId>>,
}

impl RecordingNavigator {
    pub fn pages(&self) -> Vec<PageId> {
        self.pages.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, page: &PageId) {
        self.pages.lock().unwrap().push(page.clone());
    }
}

// ============================================================================
// Helpers
// ============================================================================

const WAIT: Duration = Duration::from_secs(120);

fn mount_customer() -> (AssistantHandle, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::default());
    let handle = AssistantRuntime::mount(
        Persona::Customer.table(),
        navigator.clone(),
        &AssistantConfig::default(),
    )
    .unwrap();
    (handle, navigator)
}

/// Wait until the published view satisfies `pred`
async fn wait_for_view(
    handle: &AssistantHandle,
    pred: impl FnMut(&AssistantView) -> bool,
) -> AssistantView {
    let mut rx = handle.watch();
    let view = timeout(WAIT, rx.wait_for(pred))
        .await
        .expect("timed out waiting for view")
        .expect("assistant stopped");
    view.clone()
}

async fn next_event(rx: &mut broadcast::Receiver<AssistantEvent>) -> AssistantEvent {
    timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

/// Let every armed timer that could still fire do so
async fn settle() {
    tokio::time::sleep(Duration::from_secs(60)).await;
}

fn customer_reply(input: &str) -> String {
    Persona::Customer.table().classify(input).response_text.clone()
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_security_question_offers_consultation() {
    let (handle, _) = mount_customer();
    handle.open().await.unwrap();
    wait_for_view(&handle, |v| v.messages.len() == 1).await;

    handle
        .send_message("I need help with network security")
        .await
        .unwrap();

    let typing = wait_for_view(&handle, |v| v.messages.len() == 2).await;
    assert!(typing.is_typing);
    assert_eq!(typing.messages[1].sender, Sender::User);

    let view = wait_for_view(&handle, |v| v.messages.len() == 3).await;
    assert!(!view.is_typing);
    let reply = &view.messages[2];
    assert_eq!(reply.sender, Sender::Bot);
    assert_eq!(reply.text, customer_reply("network security"));
    assert!(view
        .latest_options()
        .iter()
        .any(|o| o.label == "Yes, book consultation"));
}

#[tokio::test(start_paused = true)]
async fn test_blank_message_is_ignored() {
    let (handle, _) = mount_customer();
    handle.open().await.unwrap();
    wait_for_view(&handle, |v| v.messages.len() == 1).await;

    handle.send_message("   ").await.unwrap();
    settle().await;

    let view = handle.view();
    assert_eq!(view.messages.len(), 1);
    assert!(!view.is_typing);
}

#[tokio::test(start_paused = true)]
async fn test_take_me_there_closes_then_navigates_once() {
    let (handle, navigator) = mount_customer();
    let mut events = handle.subscribe();
    handle.open().await.unwrap();
    handle
        .select_option(QuickReply::navigating("Take me there", PageId::new("contact")))
        .await
        .unwrap();

    let mut last_state = None;
    loop {
        match next_event(&mut events).await {
            AssistantEvent::StateChange { state } => last_state = Some(state),
            AssistantEvent::Navigated { page } => {
                assert_eq!(page, PageId::new("contact"));
                break;
            }
            AssistantEvent::Message { .. } => {}
        }
    }
    assert_eq!(last_state.map(|s| s.visibility), Some(Visibility::Closed));

    settle().await;
    assert_eq!(navigator.pages(), vec![PageId::new("contact")]);

    let view = handle.view();
    assert_eq!(view.visibility, Visibility::Closed);
    assert_eq!(view.messages[1].text, "Take me there");
    assert_eq!(view.messages.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_unopened_assistant_shows_badge() {
    let (handle, _) = mount_customer();

    tokio::time::sleep(Duration::from_secs(31)).await;
    let view = handle.view();
    assert_eq!(view.unread_count, 1);
    assert_eq!(view.visibility, Visibility::Closed);
    assert!(view.messages.is_empty());

    handle.open().await.unwrap();
    let view = wait_for_view(&handle, |v| v.visibility == Visibility::OpenActive).await;
    assert_eq!(view.unread_count, 0);
    assert_eq!(view.messages.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_opening_early_suppresses_badge() {
    let (handle, _) = mount_customer();
    handle.open().await.unwrap();
    handle.close().await.unwrap();

    tokio::time::sleep(Duration::from_secs(31)).await;
    let view = handle.view();
    assert_eq!(view.unread_count, 0);
    assert_eq!(view.visibility, Visibility::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_open_is_idempotent() {
    let (handle, _) = mount_customer();
    handle.open().await.unwrap();
    handle.open().await.unwrap();
    handle.close().await.unwrap();
    handle.open().await.unwrap();
    settle().await;

    let view = handle.view();
    assert_eq!(view.visibility, Visibility::OpenActive);
    assert_eq!(view.messages.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_replies_arrive_in_order() {
    let (handle, _) = mount_customer();
    handle.open().await.unwrap();
    handle.send_message("hello").await.unwrap();
    handle.send_message("where is my order").await.unwrap();

    let view = wait_for_view(&handle, |v| v.messages.len() == 5 && !v.is_typing).await;
    let texts: Vec<_> = view.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts[1], "hello");
    assert_eq!(texts[2], "where is my order");
    assert_eq!(texts[3], customer_reply("hello"));
    assert_eq!(texts[4], customer_reply("where is my order"));
    assert!(view.messages.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test(start_paused = true)]
async fn test_close_drops_pending_reply() {
    let (handle, _) = mount_customer();
    handle.open().await.unwrap();
    handle.send_message("hello").await.unwrap();
    handle.close().await.unwrap();
    settle().await;

    let view = handle.view();
    assert_eq!(view.visibility, Visibility::Closed);
    assert!(!view.is_typing);
    assert_eq!(view.messages.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_messages_rejected_while_closed() {
    let (handle, _) = mount_customer();
    handle.send_message("hello").await.unwrap();
    settle().await;

    assert!(handle.view().messages.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_minimized_conversation_keeps_replying() {
    let (handle, _) = mount_customer();
    handle.open().await.unwrap();
    handle.minimize().await.unwrap();
    handle.send_message("refund please").await.unwrap();

    let view = wait_for_view(&handle, |v| v.messages.len() == 3).await;
    assert_eq!(view.visibility, Visibility::OpenMinimized);
    assert_eq!(view.messages[2].text, customer_reply("refund"));

    handle.restore().await.unwrap();
    wait_for_view(&handle, |v| v.visibility == Visibility::OpenActive).await;
}

#[tokio::test(start_paused = true)]
async fn test_unmount_stops_timers() {
    let (handle, navigator) = mount_customer();
    let rx = handle.watch();
    handle.open().await.unwrap();
    handle
        .select_option(QuickReply::navigating("Take me there", PageId::new("contact")))
        .await
        .unwrap();
    handle.unmount().await;

    settle().await;
    assert!(navigator.pages().is_empty());
    // greeting and the echoed option, no reply
    assert_eq!(rx.borrow().messages.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_unmounts() {
    let (handle, _) = mount_customer();
    let mut rx = handle.watch();
    drop(handle);

    let stopped = timeout(WAIT, rx.wait_for(|_| false)).await.unwrap();
    assert!(stopped.is_err());
}

#[tokio::test]
async fn test_mount_rejects_unknown_navigation_target() {
    let navigator = RouteTable::new(
        [PageId::new("shop"), PageId::new("orders")],
        |_: &PageId| {},
    );
    let result = AssistantRuntime::mount(
        Persona::Customer.table(),
        Arc::new(navigator),
        &AssistantConfig::default(),
    );
    assert!(matches!(
        result,
        Err(AssistantError::Config(RuleTableError::UnknownNavigationTarget { .. }))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_events_serialize_with_type_tag() {
    let (handle, _) = mount_customer();
    let mut events = handle.subscribe();
    handle.open().await.unwrap();

    let event = next_event(&mut events).await;
    let json = serde_json::to_value(&event).unwrap();
    assert!(json["type"] == "message" || json["type"] == "state_change");
}
