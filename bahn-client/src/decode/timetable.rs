//! IRIS timetables: planned (`/plan`), full changes (`/fchg`) and recent
//! changes (`/rchg`) all share this schema.
//!
//! Element and attribute names are the terse IRIS ones: `s` stop, `tl` trip
//! label, `ar`/`dp` arrival/departure, `m` message, `hd` historic delay,
//! `hpc` historic platform change, `conn` connection. Times use the short
//! `yyMMddHHmm` layout and paths are pipe-joined station names.

use std::io::Read;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{DecodeError, or_default, xml_from_reader, xml_from_slice};
use crate::domain::{
    Connection, ConnectionStatus, DelaySource, DistributorMessage, DistributorType, Event,
    EventStatus, FilterFlag, HistoricDelay, HistoricPlatformChange, Message, MessageType,
    Priority, Timetable, TimetableStop, TripLabel, TripType,
};

/// Root `<timetable>` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTimetable {
    #[serde(rename = "@station", default, skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    #[serde(rename = "@eva", default, skip_serializing_if = "Option::is_none")]
    pub eva: Option<String>,
    #[serde(rename = "s", default, skip_serializing_if = "Vec::is_empty")]
    pub stops: Vec<RawTimetableStop>,
    #[serde(rename = "m", default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<RawMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTimetableStop {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "@eva", default, skip_serializing_if = "Option::is_none")]
    pub eva: Option<String>,
    #[serde(rename = "tl", default, skip_serializing_if = "Option::is_none")]
    pub trip_label: Option<RawTripLabel>,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Box<RawTimetableStop>>,
    #[serde(rename = "ar", default, skip_serializing_if = "Option::is_none")]
    pub arrival: Option<RawEvent>,
    #[serde(rename = "dp", default, skip_serializing_if = "Option::is_none")]
    pub departure: Option<RawEvent>,
    #[serde(rename = "m", default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<RawMessage>,
    #[serde(rename = "hd", default, skip_serializing_if = "Vec::is_empty")]
    pub historic_delays: Vec<RawHistoricDelay>,
    #[serde(rename = "hpc", default, skip_serializing_if = "Vec::is_empty")]
    pub historic_platform_changes: Vec<RawHistoricPlatformChange>,
    #[serde(rename = "conn", default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<RawConnection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTripLabel {
    #[serde(
        rename = "@ct",
        default,
        with = "crate::codec::time::short::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "@f", default, skip_serializing_if = "Option::is_none")]
    pub filter_flag: Option<String>,
    #[serde(rename = "@t", default, skip_serializing_if = "Option::is_none")]
    pub trip_type: Option<String>,
    #[serde(rename = "@o", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(rename = "@c", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "@n", default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(rename = "m", default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<RawMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "@pp", default, skip_serializing_if = "Option::is_none")]
    pub planned_platform: Option<String>,
    #[serde(
        rename = "@pt",
        default,
        with = "crate::codec::time::short::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub planned_time: Option<NaiveDateTime>,
    #[serde(
        rename = "@ppth",
        default,
        with = "crate::codec::list::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub planned_path: Option<Vec<String>>,
    #[serde(rename = "@pde", default, skip_serializing_if = "Option::is_none")]
    pub planned_destination: Option<String>,
    #[serde(rename = "@cp", default, skip_serializing_if = "Option::is_none")]
    pub changed_platform: Option<String>,
    #[serde(
        rename = "@ct",
        default,
        with = "crate::codec::time::short::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub changed_time: Option<NaiveDateTime>,
    #[serde(
        rename = "@cpth",
        default,
        with = "crate::codec::list::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub changed_path: Option<Vec<String>>,
    #[serde(rename = "@cde", default, skip_serializing_if = "Option::is_none")]
    pub changed_destination: Option<String>,
    #[serde(rename = "@ps", default, skip_serializing_if = "Option::is_none")]
    pub planned_status: Option<String>,
    #[serde(rename = "@cs", default, skip_serializing_if = "Option::is_none")]
    pub changed_status: Option<String>,
    #[serde(rename = "@hi", default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<i32>,
    #[serde(rename = "@clt", default, skip_serializing_if = "Option::is_none")]
    pub cancellation_time: Option<String>,
    #[serde(rename = "@wings", default, skip_serializing_if = "Option::is_none")]
    pub wings: Option<String>,
    #[serde(rename = "@l", default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(rename = "@tra", default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,
    #[serde(rename = "m", default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<RawMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "@t", default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    #[serde(
        rename = "@from",
        default,
        with = "crate::codec::time::short::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub from: Option<NaiveDateTime>,
    #[serde(
        rename = "@to",
        default,
        with = "crate::codec::time::short::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub to: Option<NaiveDateTime>,
    #[serde(rename = "@c", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    #[serde(rename = "@int", default, skip_serializing_if = "Option::is_none")]
    pub internal_text: Option<String>,
    #[serde(rename = "@ext", default, skip_serializing_if = "Option::is_none")]
    pub external_text: Option<String>,
    #[serde(rename = "@cat", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "@ec", default, skip_serializing_if = "Option::is_none")]
    pub external_category: Option<String>,
    #[serde(
        rename = "@ts",
        default,
        with = "crate::codec::time::short::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(rename = "@pr", default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(rename = "@o", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(rename = "@elnk", default, skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
    #[serde(rename = "@del", default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<i32>,
    #[serde(rename = "dm", default, skip_serializing_if = "Vec::is_empty")]
    pub distributor_messages: Vec<RawDistributorMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDistributorMessage {
    #[serde(rename = "@t", default, skip_serializing_if = "Option::is_none")]
    pub distributor_type: Option<String>,
    #[serde(rename = "@n", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "@int", default, skip_serializing_if = "Option::is_none")]
    pub internal_text: Option<String>,
    #[serde(
        rename = "@ts",
        default,
        with = "crate::codec::time::short::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHistoricDelay {
    #[serde(
        rename = "@ts",
        default,
        with = "crate::codec::time::short::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(
        rename = "@ar",
        default,
        with = "crate::codec::time::short::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub arrival: Option<NaiveDateTime>,
    #[serde(
        rename = "@dp",
        default,
        with = "crate::codec::time::short::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub departure: Option<NaiveDateTime>,
    #[serde(rename = "@src", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "@cod", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHistoricPlatformChange {
    #[serde(
        rename = "@ts",
        default,
        with = "crate::codec::time::short::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(rename = "@ar", default, skip_serializing_if = "Option::is_none")]
    pub arrival_platform: Option<String>,
    #[serde(rename = "@dp", default, skip_serializing_if = "Option::is_none")]
    pub departure_platform: Option<String>,
    #[serde(rename = "@cot", default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawConnection {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        rename = "@ts",
        default,
        with = "crate::codec::time::short::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(rename = "@eva", default, skip_serializing_if = "Option::is_none")]
    pub eva: Option<String>,
    #[serde(rename = "@cs", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Box<RawTimetableStop>>,
    #[serde(rename = "s", default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Box<RawTimetableStop>>,
}

impl RawTimetable {
    /// Encode back to the wire format.
    pub fn to_xml(&self) -> Result<String, quick_xml::SeError> {
        quick_xml::se::to_string_with_root("timetable", self)
    }
}

/// Decode a planned or real-time timetable.
pub fn decode_timetable(bytes: &[u8]) -> Result<Timetable, DecodeError> {
    let raw: RawTimetable = xml_from_slice(bytes)?;
    Ok(convert_timetable(&raw))
}

/// Decode a planned or real-time timetable from a reader.
pub fn decode_timetable_reader<R: Read>(reader: R) -> Result<Timetable, DecodeError> {
    let raw: RawTimetable = xml_from_reader(reader)?;
    Ok(convert_timetable(&raw))
}

fn code(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn eva(value: &Option<String>) -> Option<crate::domain::EvaId> {
    value.as_deref().and_then(|v| v.parse().ok())
}

pub fn convert_timetable(raw: &RawTimetable) -> Timetable {
    Timetable {
        station: or_default(&raw.station),
        eva_id: eva(&raw.eva),
        stops: raw.stops.iter().map(convert_stop).collect(),
        messages: convert_messages(&raw.messages),
    }
}

pub fn convert_stop(raw: &RawTimetableStop) -> TimetableStop {
    TimetableStop {
        stop_id: or_default(&raw.id),
        eva_id: eva(&raw.eva),
        trip_label: raw
            .trip_label
            .as_ref()
            .map(convert_trip_label)
            .unwrap_or_default(),
        reference: raw.reference.as_deref().map(|r| Box::new(convert_stop(r))),
        arrival: raw.arrival.as_ref().map(convert_event),
        departure: raw.departure.as_ref().map(convert_event),
        messages: convert_messages(&raw.messages),
        historic_delays: raw.historic_delays.iter().map(convert_historic_delay).collect(),
        historic_platform_changes: raw
            .historic_platform_changes
            .iter()
            .map(convert_historic_platform_change)
            .collect(),
        connections: raw.connections.iter().map(convert_connection).collect(),
    }
}

fn convert_trip_label(raw: &RawTripLabel) -> TripLabel {
    TripLabel {
        messages: convert_messages(&raw.messages),
        created_at: raw.created_at,
        filter_flag: FilterFlag::from_code(code(&raw.filter_flag)),
        trip_type: TripType::from_code(code(&raw.trip_type)),
        owner: or_default(&raw.owner),
        category: or_default(&raw.category),
        number: or_default(&raw.number),
    }
}

fn convert_event(raw: &RawEvent) -> Event {
    Event {
        messages: convert_messages(&raw.messages),
        planned_platform: or_default(&raw.planned_platform),
        planned_time: raw.planned_time,
        planned_path: or_default(&raw.planned_path),
        planned_destination: or_default(&raw.planned_destination),
        changed_platform: or_default(&raw.changed_platform),
        changed_time: raw.changed_time,
        changed_path: or_default(&raw.changed_path),
        changed_destination: or_default(&raw.changed_destination),
        planned_status: EventStatus::from_code(code(&raw.planned_status)),
        changed_status: EventStatus::from_code(code(&raw.changed_status)),
        hidden: raw.hidden.unwrap_or(0) != 0,
        cancellation_time: or_default(&raw.cancellation_time),
        wings: or_default(&raw.wings),
        line: or_default(&raw.line),
        transition: or_default(&raw.transition),
    }
}

fn convert_messages(raw: &[RawMessage]) -> Vec<Message> {
    raw.iter().map(convert_message).collect()
}

fn convert_message(raw: &RawMessage) -> Message {
    Message {
        message_id: or_default(&raw.id),
        message_type: MessageType::from_code(code(&raw.message_type)),
        from: raw.from,
        to: raw.to,
        code: raw.code.unwrap_or(0),
        internal_text: or_default(&raw.internal_text),
        external_text: or_default(&raw.external_text),
        category: or_default(&raw.category),
        external_category: or_default(&raw.external_category),
        timestamp: raw.timestamp,
        priority: Priority::from_code(code(&raw.priority)),
        owner: or_default(&raw.owner),
        external_link: or_default(&raw.external_link),
        deleted: raw.deleted.unwrap_or(0) != 0,
        distributor_messages: raw
            .distributor_messages
            .iter()
            .map(|dm| DistributorMessage {
                distributor_type: DistributorType::from_code(code(&dm.distributor_type)),
                distributor_name: or_default(&dm.name),
                internal_text: or_default(&dm.internal_text),
                timestamp: dm.timestamp,
            })
            .collect(),
    }
}

fn convert_historic_delay(raw: &RawHistoricDelay) -> HistoricDelay {
    HistoricDelay {
        timestamp: raw.timestamp,
        arrival: raw.arrival,
        departure: raw.departure,
        source: DelaySource::from_code(code(&raw.source)),
        code: or_default(&raw.code),
    }
}

fn convert_historic_platform_change(raw: &RawHistoricPlatformChange) -> HistoricPlatformChange {
    HistoricPlatformChange {
        timestamp: raw.timestamp,
        arrival_platform: or_default(&raw.arrival_platform),
        departure_platform: or_default(&raw.departure_platform),
        cause: or_default(&raw.cause),
    }
}

fn convert_connection(raw: &RawConnection) -> Connection {
    Connection {
        connection_id: or_default(&raw.id),
        timestamp: raw.timestamp,
        eva_id: eva(&raw.eva),
        status: ConnectionStatus::from_code(code(&raw.status)),
        reference: raw.reference.as_deref().map(convert_stop),
        stop: raw.stop.as_deref().map(convert_stop),
    }
}
