//! Keyword rule tables and the intent classifier
//!
//! A [`RuleTable`] is an ordered list of keyword rules plus a scripted
//! greeting and a catch-all fallback. Classification is first-match-wins:
//! there is no scoring, so table authors put specific rules before general
//! ones.

mod error;
mod personas;

#[cfg(test)]
mod proptests;

pub use error::RuleTableError;
pub use personas::Persona;

use crate::navigation::PageId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A pre-written reply the user can pick instead of typing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigate_to: Option<PageId>,
}

impl QuickReply {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            navigate_to: None,
        }
    }

    pub fn navigating(label: impl Into<String>, page: PageId) -> Self {
        Self {
            label: label.into(),
            navigate_to: Some(page),
        }
    }
}

/// A keyword-triggered response template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Lowercase substrings; any one of them triggers the rule
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    pub response_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuickReply>,
}

impl Rule {
    pub fn new<K>(
        keywords: impl IntoIterator<Item = K>,
        response_text: impl Into<String>,
        options: Vec<QuickReply>,
    ) -> Self
    where
        K: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            response_text: response_text.into(),
            options,
        }
    }

    /// A response with no trigger (greeting or fallback)
    pub fn response(response_text: impl Into<String>, options: Vec<QuickReply>) -> Self {
        Self {
            keywords: Vec::new(),
            response_text: response_text.into(),
            options,
        }
    }

    /// `input` must already be lowercase
    fn matches(&self, input: &str) -> bool {
        self.keywords.iter().any(|k| input.contains(k.as_str()))
    }
}

/// Immutable, validated persona configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleTable {
    persona: String,
    greeting: Rule,
    rules: Vec<Rule>,
    fallback: Rule,
}

/// Serialized shape of a rule table. Greeting and fallback are optional
/// here only so that their absence can be reported as a config error.
#[derive(Debug, Deserialize)]
struct RuleTableSpec {
    persona: String,
    greeting: Option<Rule>,
    #[serde(default)]
    rules: Vec<Rule>,
    fallback: Option<Rule>,
}

impl RuleTable {
    pub fn builder(persona: impl Into<String>) -> RuleTableBuilder {
        RuleTableBuilder {
            persona: persona.into(),
            greeting: None,
            rules: Vec::new(),
            fallback: None,
        }
    }

    /// Parse and validate a table from JSON
    pub fn from_json_str(json: &str) -> Result<Self, RuleTableError> {
        let spec: RuleTableSpec = serde_json::from_str(json)?;
        let mut builder = Self::builder(spec.persona);
        builder.greeting = spec.greeting;
        builder.fallback = spec.fallback;
        builder.rules = spec.rules;
        builder.build()
    }

    /// Read a JSON table from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuleTableError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn greeting(&self) -> &Rule {
        &self.greeting
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn fallback(&self) -> &Rule {
        &self.fallback
    }

    pub fn classify(&self, input: &str) -> &Rule {
        classify(input, self)
    }

    /// Every quick reply in the table, greeting first, fallback last
    pub fn options(&self) -> impl Iterator<Item = &QuickReply> {
        std::iter::once(&self.greeting)
            .chain(&self.rules)
            .chain(std::iter::once(&self.fallback))
            .flat_map(|rule| rule.options.iter())
    }

    /// Reject navigation targets the host does not know about
    pub fn validate_targets(
        &self,
        can_navigate: impl Fn(&PageId) -> bool,
    ) -> Result<(), RuleTableError> {
        for option in self.options() {
            if let Some(page) = &option.navigate_to {
                if !can_navigate(page) {
                    return Err(RuleTableError::UnknownNavigationTarget {
                        label: option.label.clone(),
                        page: page.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Builder that validates a table before it can be used
#[derive(Debug)]
pub struct RuleTableBuilder {
    persona: String,
    greeting: Option<Rule>,
    rules: Vec<Rule>,
    fallback: Option<Rule>,
}

impl RuleTableBuilder {
    #[must_use]
    pub fn greeting(mut self, response_text: impl Into<String>, options: Vec<QuickReply>) -> Self {
        self.greeting = Some(Rule::response(response_text, options));
        self
    }

    #[must_use]
    pub fn rule<K>(
        mut self,
        keywords: impl IntoIterator<Item = K>,
        response_text: impl Into<String>,
        options: Vec<QuickReply>,
    ) -> Self
    where
        K: Into<String>,
    {
        self.rules.push(Rule::new(keywords, response_text, options));
        self
    }

    #[must_use]
    pub fn fallback(mut self, response_text: impl Into<String>, options: Vec<QuickReply>) -> Self {
        self.fallback = Some(Rule::response(response_text, options));
        self
    }

    pub fn build(self) -> Result<RuleTable, RuleTableError> {
        let greeting = self.greeting.ok_or(RuleTableError::MissingGreeting)?;
        let fallback = self.fallback.ok_or(RuleTableError::MissingFallback)?;

        let mut rules = Vec::with_capacity(self.rules.len());
        for (index, mut rule) in self.rules.into_iter().enumerate() {
            if rule.keywords.is_empty() {
                return Err(RuleTableError::NoKeywords { index });
            }
            let mut keywords: Vec<String> = Vec::with_capacity(rule.keywords.len());
            for keyword in &rule.keywords {
                let keyword = keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    return Err(RuleTableError::BlankKeyword { index });
                }
                if !keywords.contains(&keyword) {
                    keywords.push(keyword);
                }
            }
            rule.keywords = keywords;
            rules.push(rule);
        }

        Ok(RuleTable {
            persona: self.persona,
            greeting: Rule::response(greeting.response_text, greeting.options),
            rules,
            fallback: Rule::response(fallback.response_text, fallback.options),
        })
    }
}

/// Pick the response rule for `input`.
///
/// The input is lowercased, then the rules are tried in declaration order.
/// The first rule with any keyword contained in the input wins. Input that
/// matches nothing gets the fallback.
pub fn classify<'t>(input: &str, table: &'t RuleTable) -> &'t Rule {
    let input = input.to_lowercase();
    table
        .rules
        .iter()
        .find(|rule| rule.matches(&input))
        .unwrap_or(&table.fallback)
}
