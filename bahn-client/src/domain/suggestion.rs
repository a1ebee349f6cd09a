//! Train search suggestions from the HAFAS journey planner.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One train matching a search by line name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Display name, e.g. `ICE 1095`.
    pub value: String,
    pub cycle: String,
    pub pool: String,
    pub id: String,
    /// Opaque handle for the HAFAS train info page.
    pub train_link: String,
    pub journey_params: String,
    pub departure_station: String,
    pub departure_time: Option<NaiveDateTime>,
    pub arrival_station: String,
    pub arrival_time: Option<NaiveDateTime>,
    pub published_time: Option<NaiveDateTime>,
}
