//! Assistant timing and persona configuration

use crate::rules::Persona;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENGAGEMENT_DELAY: Duration = Duration::from_secs(30);
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1500);
pub const DEFAULT_NAVIGATION_DELAY: Duration = Duration::from_secs(1);

/// Delays and persona selection for a mounted assistant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Idle time before an unopened assistant raises its unread badge
    pub engagement_delay: Duration,
    /// Simulated typing time before each bot reply
    pub reply_delay: Duration,
    /// Pause between a navigating option's reply and the navigation
    pub navigation_delay: Duration,
    pub persona: Persona,
    /// JSON rule table overriding the persona's built-in table
    pub rules_path: Option<PathBuf>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            engagement_delay: DEFAULT_ENGAGEMENT_DELAY,
            reply_delay: DEFAULT_REPLY_DELAY,
            navigation_delay: DEFAULT_NAVIGATION_DELAY,
            persona: Persona::default(),
            rules_path: None,
        }
    }
}

impl AssistantConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let persona = match lookup("CONCIERGE_PERSONA") {
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                tracing::warn!(error = %e, "Ignoring CONCIERGE_PERSONA");
                defaults.persona
            }),
            None => defaults.persona,
        };

        Self {
            engagement_delay: millis(
                &lookup,
                "CONCIERGE_ENGAGEMENT_DELAY_MS",
                defaults.engagement_delay,
            ),
            reply_delay: millis(&lookup, "CONCIERGE_REPLY_DELAY_MS", defaults.reply_delay),
            navigation_delay: millis(
                &lookup,
                "CONCIERGE_NAVIGATION_DELAY_MS",
                defaults.navigation_delay,
            ),
            persona,
            rules_path: lookup("CONCIERGE_RULES_PATH").map(PathBuf::from),
        }
    }
}

fn millis(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: Duration) -> Duration {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(ms) => Duration::from_millis(ms),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "Ignoring invalid delay");
            default
        }
    }
}
