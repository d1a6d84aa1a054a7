//! Built-in persona tables
//!
//! The storefront and the two admin panels each used to carry their own
//! copy of the assistant. They now share one engine and differ only in the
//! table built here.

use super::{QuickReply, RuleTable, RuleTableError};
use crate::navigation::PageId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named rule table variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Storefront visitors
    #[default]
    Customer,
    /// Main admin dashboard
    AdminGeneral,
    /// Reports and settings panel
    AdminSecondary,
}

impl Persona {
    pub const ALL: [Persona; 3] = [
        Persona::Customer,
        Persona::AdminGeneral,
        Persona::AdminSecondary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Persona::Customer => "customer",
            Persona::AdminGeneral => "admin_general",
            Persona::AdminSecondary => "admin_secondary",
        }
    }

    /// Host pages this persona's options may navigate to
    pub fn routes(self) -> Vec<PageId> {
        let pages: &[&str] = match self {
            Persona::Customer => &["contact", "shop", "orders"],
            Persona::AdminGeneral => &["products", "orders", "customers", "team", "blog"],
            Persona::AdminSecondary => &["reports", "settings", "support"],
        };
        pages.iter().map(|p| PageId::new(*p)).collect()
    }

    /// Build this persona's table
    pub fn try_table(self) -> Result<RuleTable, RuleTableError> {
        match self {
            Persona::Customer => customer_table(),
            Persona::AdminGeneral => admin_general_table(),
            Persona::AdminSecondary => admin_secondary_table(),
        }
    }

    /// Like [`Persona::try_table`], for callers that treat the built-in
    /// tables as known-good.
    ///
    /// # Panics
    ///
    /// If a built-in table fails validation.
    pub fn table(self) -> RuleTable {
        match self.try_table() {
            Ok(table) => table,
            Err(e) => panic!("built-in {self} table is invalid: {e}"),
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "customer" => Ok(Persona::Customer),
            "admin" | "admin_general" => Ok(Persona::AdminGeneral),
            "admin_secondary" => Ok(Persona::AdminSecondary),
            other => Err(format!("unknown persona: {other}")),
        }
    }
}

fn go(label: &str, page: &str) -> QuickReply {
    QuickReply::navigating(label, PageId::new(page))
}

fn say(label: &str) -> QuickReply {
    QuickReply::new(label)
}

fn customer_table() -> Result<RuleTable, RuleTableError> {
    RuleTable::builder(Persona::Customer.name())
        .greeting(
            "Hi there! I'm the store assistant. How can I help you today?",
            vec![
                say("Browse products"),
                say("Track my order"),
                say("Security services"),
                say("Talk to a human"),
            ],
        )
        .rule(
            ["book consultation", "consultation", "appointment", "book a call"],
            "Great! Our consultants are available Monday to Friday. \
             I can take you to the contact page to pick a slot.",
            vec![go("Take me there", "contact"), say("Maybe later")],
        )
        .rule(
            ["take me there", "human", "agent", "contact", "talk to"],
            "Sure, connecting you with our team now.",
            vec![],
        )
        .rule(
            ["security", "firewall", "network", "breach", "vpn"],
            "Our security team can assess your network, harden your firewall \
             and monitor for threats around the clock. \
             Would you like to book a free consultation?",
            vec![
                say("Yes, book consultation"),
                say("Tell me more"),
                say("Not now"),
            ],
        )
        .rule(
            ["tell me more", "services", "what do you offer"],
            "Besides our online shop we offer managed IT services: network audits, \
             endpoint protection and cloud backups.",
            vec![say("Yes, book consultation"), say("Browse products")],
        )
        .rule(
            ["track", "order", "shipping", "delivery", "package"],
            "You can follow every order from your account page. \
             Shipments usually arrive within 3-5 business days.",
            vec![go("View my orders", "orders"), say("Returns and refunds")],
        )
        .rule(
            ["return", "refund", "exchange"],
            "Items can be returned within 30 days. Refunds reach your card \
             5-7 days after we receive the parcel.",
            vec![say("Talk to a human"), say("Track my order")],
        )
        .rule(
            ["product", "shop", "browse", "catalog", "price", "buy", "deal"],
            "We stock networking gear, laptops and accessories. \
             This week's deals are on the shop front page.",
            vec![go("Go to the shop", "shop"), say("Security services")],
        )
        // Must precede the thanks rule: "no thanks" contains "thanks"
        .rule(
            ["not now", "maybe later", "no thanks"],
            "No problem! I'll be right here if you need anything.",
            vec![],
        )
        .rule(
            ["thank", "bye", "goodbye"],
            "You're welcome! Have a great day.",
            vec![],
        )
        .rule(
            ["hello", "hey", "good morning", "good evening"],
            "Hello! What can I do for you?",
            vec![say("Browse products"), say("Track my order")],
        )
        .fallback(
            "I'm not sure I understood that. Could you rephrase, or pick one of these topics?",
            vec![
                say("Track my order"),
                say("Security services"),
                say("Talk to a human"),
            ],
        )
        .build()
}

fn admin_general_table() -> Result<RuleTable, RuleTableError> {
    RuleTable::builder(Persona::AdminGeneral.name())
        .greeting(
            "Hello admin! I can help you find your way around the dashboard.",
            vec![
                say("Manage products"),
                say("View orders"),
                say("Customer insights"),
                say("Team settings"),
            ],
        )
        .rule(
            ["product", "inventory", "stock", "catalog", "sku"],
            "The products screen lets you add, edit and archive items and adjust stock levels.",
            vec![go("Open products", "products"), say("Something else")],
        )
        .rule(
            ["order", "fulfil", "shipment", "invoice"],
            "Orders can be filtered by status. Pending orders are listed first.",
            vec![go("Open orders", "orders"), say("Something else")],
        )
        .rule(
            ["customer", "client", "buyer", "insight"],
            "The customers screen shows lifetime value and recent activity for every account.",
            vec![go("Open customers", "customers"), say("Something else")],
        )
        .rule(
            ["team", "staff", "member", "role", "permission"],
            "Invite teammates and assign roles from the team screen.",
            vec![go("Open team", "team"), say("Something else")],
        )
        .rule(
            ["blog", "post", "article", "publish"],
            "Drafts and scheduled posts live in the blog manager.",
            vec![go("Open blog", "blog"), say("Something else")],
        )
        .rule(
            ["something else", "other", "help"],
            "Sure, what else would you like to manage?",
            vec![
                say("Manage products"),
                say("View orders"),
                say("Write a blog post"),
                say("Team settings"),
            ],
        )
        .fallback(
            "I couldn't find a matching section. \
             Try asking about products, orders, customers, the team or the blog.",
            vec![say("Something else")],
        )
        .build()
}

fn admin_secondary_table() -> Result<RuleTable, RuleTableError> {
    RuleTable::builder(Persona::AdminSecondary.name())
        .greeting(
            "Need a hand with reports or store settings?",
            vec![
                say("Sales report"),
                say("Store settings"),
                say("Contact support"),
            ],
        )
        // Must precede the reports rule: "export report" should explain exporting
        .rule(
            ["export", "csv", "download"],
            "Any report can be exported as CSV from its top-right menu.",
            vec![go("Open reports", "reports")],
        )
        .rule(
            ["report", "sales", "revenue", "analytics"],
            "Sales, revenue and traffic reports are updated hourly.",
            vec![go("Open reports", "reports"), say("Export help")],
        )
        .rule(
            ["setting", "config", "tax", "currency", "payment"],
            "Taxes, currencies and payment providers are configured under settings.",
            vec![go("Open settings", "settings")],
        )
        .rule(
            ["support", "bug", "issue", "broken"],
            "Our support engineers answer within one business day.",
            vec![go("Contact support", "support")],
        )
        .fallback(
            "I can help with reports, exports, settings and support requests.",
            vec![say("Sales report"), say("Store settings")],
        )
        .build()
}
