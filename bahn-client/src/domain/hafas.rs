//! Disruption notices scraped from HAFAS train info pages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HafasMessagePriority {
    High,
    #[default]
    Middle,
    Low,
}

/// A notice attached to a train. Fields the page does not provide are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HafasMessage {
    pub id: String,
    pub priority: HafasMessagePriority,
    /// Start of validity, verbatim.
    pub from: String,
    /// End of validity, verbatim.
    pub to: String,
    pub subject: String,
    pub content: String,
}
