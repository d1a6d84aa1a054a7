//! Rule table configuration errors

use thiserror::Error;

/// A rule table that cannot be used. These are programmer errors and are
/// reported when the table is built or mounted, never while dispatching.
#[derive(Debug, Error)]
pub enum RuleTableError {
    #[error("Rule table has no fallback rule")]
    MissingFallback,
    #[error("Rule table has no greeting")]
    MissingGreeting,
    #[error("Rule {index} has no keywords")]
    NoKeywords { index: usize },
    #[error("Rule {index} has a blank keyword")]
    BlankKeyword { index: usize },
    #[error("Option {label:?} targets unknown page {page:?}")]
    UnknownNavigationTarget { label: String, page: String },
    #[error("Invalid rule table JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read rule table: {0}")]
    Io(#[from] std::io::Error),
}
