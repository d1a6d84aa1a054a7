//! Terminal host for a concierge assistant
//!
//! Mounts one persona and drives it from stdin. Plain lines are sent as
//! messages; `/open`, `/close`, `/min`, `/restore`, `/pick N` and `/quit`
//! act like the widget's buttons. Logs go to stderr as JSON.

use concierge::{
    AssistantConfig, AssistantEvent, AssistantRuntime, Message, PageId, RouteTable, RuleTable,
    Sender,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "concierge=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = AssistantConfig::from_env();
    let table = match &config.rules_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading rule table");
            RuleTable::load(path)?
        }
        None => config.persona.try_table()?,
    };

    let navigator = RouteTable::new(config.persona.routes(), |page: &PageId| {
        println!("  -> navigating to /{page}");
    });
    let handle = AssistantRuntime::mount(table, Arc::new(navigator), &config)?;
    tracing::info!(assistant_id = %handle.id(), persona = %config.persona, "Assistant ready");

    let mut events = handle.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(AssistantEvent::Message { message }) => print_message(&message),
                Ok(AssistantEvent::StateChange { state }) => {
                    let typing = if state.is_typing { " | typing..." } else { "" };
                    println!(
                        "  [{:?} | unread {}{typing}]",
                        state.visibility, state.unread_count
                    );
                }
                // Printed by the navigator itself
                Ok(AssistantEvent::Navigated { .. }) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Printer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    println!("Commands: /open /close /min /restore /pick N /quit. Anything else is sent as a message.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(raw) = lines.next_line().await? {
        let line = raw.trim();
        let (command, arg) = line
            .split_once(' ')
            .map_or((line, ""), |(c, rest)| (c, rest.trim()));

        match command {
            "/quit" => break,
            "/open" => handle.open().await?,
            "/close" => handle.close().await?,
            "/min" => handle.minimize().await?,
            "/restore" => handle.restore().await?,
            "/pick" => {
                let choice = arg
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| handle.view().latest_options().get(i).cloned());
                match choice {
                    Some(option) => handle.select_option(option).await?,
                    None => println!("  no option {arg:?} on the last message"),
                }
            }
            _ => handle.send_message(line).await?,
        }
    }

    handle.unmount().await;
    printer.await?;
    Ok(())
}

fn print_message(message: &Message) {
    let who = match message.sender {
        Sender::Bot => "bot",
        Sender::User => "you",
    };
    println!("{who}> {}", message.text);
    for (i, option) in message.options.iter().enumerate() {
        println!("    [{}] {}", i + 1, option.label);
    }
}
