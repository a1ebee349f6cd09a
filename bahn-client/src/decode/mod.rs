//! Wire format decoders.
//!
//! Each submodule handles one upstream payload in two stages:
//!
//! 1. `Raw*` types mirror the wire schema one to one (attribute and field
//!    names preserved, everything optional). Failing here is fatal.
//! 2. `convert_*` projects the raw value into [`crate::domain`]. This stage
//!    never fails: unknown codes become `Unknown`, bad ids become `None`.
//!
//! The XML and JSON raw types also serialise back to their wire format, so
//! fixtures can be built in code and decoded again.

use std::io::{BufReader, Read};

use serde::de::DeserializeOwned;

pub mod coach_sequence;
mod error;
pub mod hafas_messages;
pub mod station;
pub mod suggestion;
pub mod timetable;
pub mod wings;

pub use coach_sequence::{decode_coach_sequence, decode_coach_sequence_reader};
pub use error::DecodeError;
pub use hafas_messages::{decode_hafas_messages, decode_hafas_messages_reader};
pub use station::{decode_stations, decode_stations_reader};
pub use suggestion::{decode_suggestions, decode_suggestions_reader};
pub use timetable::{decode_timetable, decode_timetable_reader};
pub use wings::{decode_wing_definition, decode_wing_definition_reader};

fn xml_from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    Ok(quick_xml::de::from_reader(bytes)?)
}

fn xml_from_reader<T: DeserializeOwned, R: Read>(reader: R) -> Result<T, DecodeError> {
    Ok(quick_xml::de::from_reader(BufReader::new(reader))?)
}

fn json_from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}

fn json_from_reader<T: DeserializeOwned, R: Read>(reader: R) -> Result<T, DecodeError> {
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}

/// Project an optional wire value, using the default when absent.
fn or_default<T: Clone + Default>(value: &Option<T>) -> T {
    value.clone().unwrap_or_default()
}
