//! Station metadata as returned by the IRIS station lookup.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::EvaId;

/// A station known to IRIS.
///
/// A lookup may return several stations (e.g. a main station and its
/// subterranean S-Bahn halt).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub eva_id: Option<EvaId>,
    pub name: String,
    /// Operator station code (DS100/RIL100), e.g. `FF` for Frankfurt (Main) Hbf.
    pub ds100: String,
    pub platforms: Vec<String>,
    /// EVA numbers of related stations, as text.
    pub meta: Vec<String>,
    /// Whether the station is run by the main operator.
    pub is_db: bool,
    pub created_at: Option<NaiveDateTime>,
}

impl Station {
    /// Related station ids that parse as EVA numbers.
    pub fn meta_ids(&self) -> impl Iterator<Item = EvaId> + '_ {
        self.meta.iter().filter_map(|m| m.parse().ok())
    }
}
