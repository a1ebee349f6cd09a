//! Wing-train definitions: where two coupled trains join or split.

use serde::{Deserialize, Serialize};

use super::EvaId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WingDefinition {
    pub start: WingDefinitionElement,
    pub end: WingDefinitionElement,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WingDefinitionElement {
    pub eva_id: Option<EvaId>,
    pub station_name: String,
    /// Planned time, verbatim from the wire.
    pub planned_time: String,
    pub fl: bool,
}
