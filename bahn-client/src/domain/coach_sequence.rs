//! Physical train formations (Wagenreihung).

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CoachTypeInfo, EvaId};

/// A coach sequence response: envelope metadata plus the formation itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoachSequence {
    pub meta: CoachSequenceMeta,
    pub formation: CoachSequenceFormation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoachSequenceMeta {
    pub id: String,
    pub owner: String,
    pub format: String,
    pub version: String,
    pub correlation: Vec<String>,
    pub created: Option<DateTime<FixedOffset>>,
    pub sequence: i64,
}

/// Direction of travel relative to the platform sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Forwards,
    Backwards,
    Unknown,
    #[default]
    Undefined,
}

impl Direction {
    /// Resolve the German wire spelling.
    pub fn from_code(code: &str) -> Self {
        match code {
            "VORWAERTS" => Self::Forwards,
            "RUECKWAERTS" => Self::Backwards,
            "UNDEFINIERT" | "" => Self::Undefined,
            other => {
                debug!(code = other, "unrecognized formation direction");
                Self::Unknown
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoachSequenceFormation {
    pub direction: Direction,
    pub groups: Vec<CoachSequenceCoachGroup>,
    pub stop: CoachSequenceStop,
    pub line: String,
    /// Train category, e.g. `ICE`.
    pub train_type: String,
    pub train_id: String,
    pub service_id: String,
    pub journey_id: String,
    pub starting_date: Option<NaiveDate>,
    pub is_planned: bool,
}

impl CoachSequenceFormation {
    /// Every coach in order, across all groups.
    pub fn coaches(&self) -> impl Iterator<Item = &CoachSequenceCoach> {
        self.groups.iter().flat_map(|g| g.coaches.iter())
    }
}

/// The stop the formation was reported for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoachSequenceStop {
    pub arrival: Option<NaiveDateTime>,
    pub departure: Option<NaiveDateTime>,
    pub station: String,
    pub eva_id: Option<EvaId>,
    pub platform: String,
    pub stop_id: String,
    pub rl100: String,
    pub platform_sections: Vec<CoachSequencePlatformSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoachSequencePlatformSection {
    pub name: String,
    pub position: PlatformPosition,
}

/// Coaches that run together as one unit (one trainset or wing).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoachSequenceCoachGroup {
    pub train_id: String,
    pub description: String,
    pub coaches: Vec<CoachSequenceCoach>,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoachSequenceCoach {
    pub equipment: Vec<CoachSequenceCoachEquipment>,
    pub category: String,
    pub coach_id: String,
    pub orientation: String,
    pub group_position: String,
    pub coach_type: CoachTypeInfo,
    /// Number shown on the coach for seat reservations.
    pub ordinal: String,
    pub platform_section: String,
    pub platform_position: PlatformPosition,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoachSequenceCoachEquipment {
    pub count: String,
    pub equipment_type: String,
    pub description: String,
    pub status: String,
}

/// Extent along the platform, in meters and as a share of its length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformPosition {
    pub start_meter: f64,
    pub end_meter: f64,
    pub start_percent: i64,
    pub end_percent: i64,
}

impl PlatformPosition {
    /// Length in meters.
    pub fn length(&self) -> f64 {
        self.end_meter - self.start_meter
    }
}
