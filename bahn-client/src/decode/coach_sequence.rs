//! Coach sequence (Wagenreihung) JSON, `{coach}/{line}/{yyyyMMddHHmm}`.
//!
//! Field names are the upstream German ones (`fahrtrichtung`,
//! `allFahrzeuggruppe`, ...). Numbers inside platform positions arrive as
//! strings.

use std::io::Read;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{DecodeError, json_from_reader, json_from_slice, or_default};
use crate::domain::{
    CoachSequence, CoachSequenceCoach, CoachSequenceCoachEquipment, CoachSequenceCoachGroup,
    CoachSequenceFormation, CoachSequenceMeta, CoachSequencePlatformSection, CoachSequenceStop,
    CoachTypeInfo, Direction, PlatformPosition,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCoachSequence {
    #[serde(default)]
    pub meta: Option<RawCoachSequenceMeta>,
    #[serde(default)]
    pub data: Option<RawCoachSequenceData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCoachSequenceMeta {
    pub id: Option<String>,
    pub owner: Option<String>,
    pub format: Option<String>,
    pub version: Option<String>,
    pub correlation: Option<Vec<String>>,
    /// RFC 3339 timestamp.
    pub created: Option<String>,
    pub sequence: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCoachSequenceData {
    #[serde(rename = "istformation")]
    pub formation: Option<RawCoachSequenceFormation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCoachSequenceFormation {
    #[serde(rename = "fahrtrichtung")]
    pub direction: Option<String>,
    #[serde(rename = "allFahrzeuggruppe")]
    pub groups: Option<Vec<RawCoachSequenceCoachGroup>>,
    #[serde(rename = "halt")]
    pub stop: Option<RawCoachSequenceStop>,
    #[serde(rename = "liniebezeichnung")]
    pub line: Option<String>,
    #[serde(rename = "zuggattung")]
    pub train_type: Option<String>,
    #[serde(rename = "zugnummer")]
    pub train_id: Option<String>,
    #[serde(rename = "serviceid")]
    pub service_id: Option<String>,
    #[serde(
        rename = "planstarttag",
        default,
        with = "crate::codec::time::date::option"
    )]
    pub starting_date: Option<NaiveDate>,
    #[serde(rename = "fahrtid")]
    pub journey_id: Option<String>,
    #[serde(rename = "istplaninformation")]
    pub is_planned: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCoachSequenceStop {
    #[serde(
        rename = "abfahrtszeit",
        default,
        with = "crate::codec::time::medium::option"
    )]
    pub departure: Option<NaiveDateTime>,
    #[serde(
        rename = "ankunftszeit",
        default,
        with = "crate::codec::time::medium::option"
    )]
    pub arrival: Option<NaiveDateTime>,
    #[serde(rename = "bahnhofsname")]
    pub station: Option<String>,
    #[serde(rename = "evanummer")]
    pub eva: Option<String>,
    #[serde(rename = "gleisbezeichnung")]
    pub platform: Option<String>,
    #[serde(rename = "haltid")]
    pub stop_id: Option<String>,
    pub rl100: Option<String>,
    #[serde(rename = "allSektor")]
    pub platform_sections: Option<Vec<RawCoachSequencePlatformSection>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCoachSequencePlatformSection {
    #[serde(rename = "positionamgleis")]
    pub position: Option<RawPlatformPosition>,
    #[serde(rename = "sektorbezeichnung")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCoachSequenceCoachGroup {
    #[serde(rename = "allFahrzeug")]
    pub coaches: Option<Vec<RawCoachSequenceCoach>>,
    #[serde(rename = "fahrzeuggruppebezeichnung")]
    pub description: Option<String>,
    #[serde(rename = "zielbetriebsstellename")]
    pub to: Option<String>,
    #[serde(rename = "startbetriebsstellename")]
    pub from: Option<String>,
    #[serde(rename = "verkehrlichezugnummer")]
    pub train_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCoachSequenceCoach {
    #[serde(rename = "allFahrzeugausstattung")]
    pub equipment: Option<Vec<RawCoachSequenceCoachEquipment>>,
    #[serde(rename = "kategorie")]
    pub category: Option<String>,
    #[serde(rename = "fahrzeugnummer")]
    pub coach_id: Option<String>,
    #[serde(rename = "orientierung")]
    pub orientation: Option<String>,
    #[serde(rename = "positioningruppe")]
    pub group_position: Option<String>,
    #[serde(rename = "fahrzeugsektor")]
    pub platform_section: Option<String>,
    #[serde(rename = "fahrzeugtyp")]
    pub coach_type: Option<String>,
    #[serde(rename = "wagenordnungsnummer")]
    pub ordinal: Option<String>,
    #[serde(rename = "positionamhalt")]
    pub platform_position: Option<RawPlatformPosition>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCoachSequenceCoachEquipment {
    #[serde(rename = "anzahl")]
    pub count: Option<String>,
    #[serde(rename = "ausstattungsart")]
    pub equipment_type: Option<String>,
    #[serde(rename = "bezeichnung")]
    pub description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPlatformPosition {
    #[serde(rename = "endemeter")]
    pub end_meter: Option<String>,
    #[serde(rename = "endeprozent")]
    pub end_percent: Option<String>,
    #[serde(rename = "startmeter")]
    pub start_meter: Option<String>,
    #[serde(rename = "startprozent")]
    pub start_percent: Option<String>,
}

impl RawCoachSequence {
    /// Encode back to the wire format.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

pub fn decode_coach_sequence(bytes: &[u8]) -> Result<CoachSequence, DecodeError> {
    let raw: RawCoachSequence = json_from_slice(bytes)?;
    Ok(convert_coach_sequence(&raw))
}

pub fn decode_coach_sequence_reader<R: Read>(reader: R) -> Result<CoachSequence, DecodeError> {
    let raw: RawCoachSequence = json_from_reader(reader)?;
    Ok(convert_coach_sequence(&raw))
}

pub fn convert_coach_sequence(raw: &RawCoachSequence) -> CoachSequence {
    CoachSequence {
        meta: raw.meta.as_ref().map(convert_meta).unwrap_or_default(),
        formation: raw
            .data
            .as_ref()
            .and_then(|d| d.formation.as_ref())
            .map(convert_formation)
            .unwrap_or_default(),
    }
}

fn convert_meta(raw: &RawCoachSequenceMeta) -> CoachSequenceMeta {
    CoachSequenceMeta {
        id: or_default(&raw.id),
        owner: or_default(&raw.owner),
        format: or_default(&raw.format),
        version: or_default(&raw.version),
        correlation: or_default(&raw.correlation),
        created: raw
            .created
            .as_deref()
            .and_then(|c| DateTime::parse_from_rfc3339(c).ok()),
        sequence: raw.sequence.unwrap_or(0),
    }
}

fn convert_formation(raw: &RawCoachSequenceFormation) -> CoachSequenceFormation {
    CoachSequenceFormation {
        direction: Direction::from_code(raw.direction.as_deref().unwrap_or("")),
        groups: raw
            .groups
            .iter()
            .flatten()
            .map(convert_group)
            .collect(),
        stop: raw.stop.as_ref().map(convert_stop).unwrap_or_default(),
        line: or_default(&raw.line),
        train_type: or_default(&raw.train_type),
        train_id: or_default(&raw.train_id),
        service_id: or_default(&raw.service_id),
        journey_id: or_default(&raw.journey_id),
        starting_date: raw.starting_date,
        is_planned: raw.is_planned.unwrap_or(false),
    }
}

fn convert_stop(raw: &RawCoachSequenceStop) -> CoachSequenceStop {
    CoachSequenceStop {
        arrival: raw.arrival,
        departure: raw.departure,
        station: or_default(&raw.station),
        eva_id: raw.eva.as_deref().and_then(|e| e.parse().ok()),
        platform: or_default(&raw.platform),
        stop_id: or_default(&raw.stop_id),
        rl100: or_default(&raw.rl100),
        platform_sections: raw
            .platform_sections
            .iter()
            .flatten()
            .map(|s| CoachSequencePlatformSection {
                name: or_default(&s.name),
                position: convert_position(s.position.as_ref()),
            })
            .collect(),
    }
}

fn convert_group(raw: &RawCoachSequenceCoachGroup) -> CoachSequenceCoachGroup {
    CoachSequenceCoachGroup {
        train_id: or_default(&raw.train_id),
        description: or_default(&raw.description),
        coaches: raw.coaches.iter().flatten().map(convert_coach).collect(),
        from: or_default(&raw.from),
        to: or_default(&raw.to),
    }
}

fn convert_coach(raw: &RawCoachSequenceCoach) -> CoachSequenceCoach {
    CoachSequenceCoach {
        equipment: raw
            .equipment
            .iter()
            .flatten()
            .map(|e| CoachSequenceCoachEquipment {
                count: or_default(&e.count),
                equipment_type: or_default(&e.equipment_type),
                description: or_default(&e.description),
                status: or_default(&e.status),
            })
            .collect(),
        category: or_default(&raw.category),
        coach_id: or_default(&raw.coach_id),
        orientation: or_default(&raw.orientation),
        group_position: or_default(&raw.group_position),
        coach_type: CoachTypeInfo::decode(raw.coach_type.as_deref().unwrap_or("")),
        ordinal: or_default(&raw.ordinal),
        platform_section: or_default(&raw.platform_section),
        platform_position: convert_position(raw.platform_position.as_ref()),
        status: or_default(&raw.status),
    }
}

fn parse_or_zero<T: std::str::FromStr + Default>(value: &Option<String>) -> T {
    value
        .as_deref()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or_default()
}

/// `NaN` and infinities parse as `f64` but cannot be stored as JSON.
fn meters_or_zero(value: &Option<String>) -> f64 {
    let meters: f64 = parse_or_zero(value);
    if meters.is_finite() { meters } else { 0.0 }
}

/// Unparseable or non-finite sub-fields become zero.
fn convert_position(raw: Option<&RawPlatformPosition>) -> PlatformPosition {
    let Some(raw) = raw else {
        return PlatformPosition::default();
    };
    PlatformPosition {
        start_meter: meters_or_zero(&raw.start_meter),
        end_meter: meters_or_zero(&raw.end_meter),
        start_percent: parse_or_zero(&raw.start_percent),
        end_percent: parse_or_zero(&raw.end_percent),
    }
}
