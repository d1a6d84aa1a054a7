//! Concierge - scripted conversational assistant engine
//!
//! Matches visitor input against ordered keyword rule tables, replies with
//! canned text and quick-reply options after a simulated typing delay,
//! nudges idle visitors with an unread badge, and routes the host
//! application when a navigating option is chosen.

pub mod config;
pub mod navigation;
pub mod rules;
pub mod runtime;
pub mod state_machine;
pub mod store;

pub use config::AssistantConfig;
pub use navigation::{Navigator, PageId, RouteTable};
pub use rules::{classify, Persona, QuickReply, Rule, RuleTable, RuleTableBuilder, RuleTableError};
pub use runtime::{
    AssistantError, AssistantEvent, AssistantHandle, AssistantRuntime, AssistantView, StateSummary,
};
pub use state_machine::Visibility;
pub use store::{Message, Sender};
