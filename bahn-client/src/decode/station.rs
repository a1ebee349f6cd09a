//! IRIS station lookup (`/timetable/station/{eva}`).
//!
//! ```xml
//! <stations>
//!   <station name="Frankfurt(Main)Hbf" eva="8000105" ds100="FF" db="true"
//!            p="1|2|3" meta="8098105" creationts="19-06-14 11:42:56.426"/>
//! </stations>
//! ```

use std::io::Read;

use serde::{Deserialize, Serialize};

use super::{DecodeError, or_default, xml_from_reader, xml_from_slice};
use crate::domain::Station;

/// Root `<stations>` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStations {
    #[serde(rename = "station", default, skip_serializing_if = "Vec::is_empty")]
    pub stations: Vec<RawStation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStation {
    #[serde(
        rename = "@p",
        default,
        with = "crate::codec::list::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub platforms: Option<Vec<String>>,

    #[serde(
        rename = "@meta",
        default,
        with = "crate::codec::list::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub meta: Option<Vec<String>>,

    #[serde(rename = "@name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "@eva", default, skip_serializing_if = "Option::is_none")]
    pub eva: Option<String>,

    #[serde(rename = "@ds100", default, skip_serializing_if = "Option::is_none")]
    pub ds100: Option<String>,

    #[serde(rename = "@db", default, skip_serializing_if = "Option::is_none")]
    pub db: Option<bool>,

    #[serde(
        rename = "@creationts",
        default,
        with = "crate::codec::time::long::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub creationts: Option<chrono::NaiveDateTime>,
}

impl RawStations {
    /// Encode back to the wire format.
    pub fn to_xml(&self) -> Result<String, quick_xml::SeError> {
        quick_xml::se::to_string_with_root("stations", self)
    }
}

/// Decode a station lookup response.
pub fn decode_stations(bytes: &[u8]) -> Result<Vec<Station>, DecodeError> {
    let raw: RawStations = xml_from_slice(bytes)?;
    Ok(convert_stations(&raw))
}

/// Decode a station lookup response from a reader.
pub fn decode_stations_reader<R: Read>(reader: R) -> Result<Vec<Station>, DecodeError> {
    let raw: RawStations = xml_from_reader(reader)?;
    Ok(convert_stations(&raw))
}

pub fn convert_stations(raw: &RawStations) -> Vec<Station> {
    raw.stations.iter().map(convert_station).collect()
}

pub fn convert_station(raw: &RawStation) -> Station {
    Station {
        eva_id: raw.eva.as_deref().and_then(|e| e.parse().ok()),
        name: or_default(&raw.name),
        ds100: or_default(&raw.ds100),
        platforms: or_default(&raw.platforms),
        meta: or_default(&raw.meta),
        is_db: raw.db.unwrap_or(false),
        created_at: raw.creationts,
    }
}
