//! IRIS wing definitions (`/timetable/wingdef/{parent}/{wing}`).

use std::io::Read;

use serde::{Deserialize, Serialize};

use super::{DecodeError, or_default, xml_from_reader, xml_from_slice};
use crate::domain::{WingDefinition, WingDefinitionElement};

/// Root `<wing-def>` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawWingDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<RawWingDefinitionElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<RawWingDefinitionElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawWingDefinitionElement {
    #[serde(rename = "@eva", default, skip_serializing_if = "Option::is_none")]
    pub eva: Option<String>,
    #[serde(rename = "@st-name", default, skip_serializing_if = "Option::is_none")]
    pub station_name: Option<String>,
    #[serde(rename = "@pt", default, skip_serializing_if = "Option::is_none")]
    pub planned_time: Option<String>,
    #[serde(rename = "@fl", default, skip_serializing_if = "Option::is_none")]
    pub fl: Option<bool>,
}

impl RawWingDefinition {
    /// Encode back to the wire format.
    pub fn to_xml(&self) -> Result<String, quick_xml::SeError> {
        quick_xml::se::to_string_with_root("wing-def", self)
    }
}

pub fn decode_wing_definition(bytes: &[u8]) -> Result<WingDefinition, DecodeError> {
    let raw: RawWingDefinition = xml_from_slice(bytes)?;
    Ok(convert_wing_definition(&raw))
}

pub fn decode_wing_definition_reader<R: Read>(reader: R) -> Result<WingDefinition, DecodeError> {
    let raw: RawWingDefinition = xml_from_reader(reader)?;
    Ok(convert_wing_definition(&raw))
}

pub fn convert_wing_definition(raw: &RawWingDefinition) -> WingDefinition {
    let element = |e: &Option<RawWingDefinitionElement>| {
        e.as_ref()
            .map(|e| WingDefinitionElement {
                eva_id: e.eva.as_deref().and_then(|v| v.parse().ok()),
                station_name: or_default(&e.station_name),
                planned_time: or_default(&e.planned_time),
                fl: e.fl.unwrap_or(false),
            })
            .unwrap_or_default()
    };
    WingDefinition {
        start: element(&raw.start),
        end: element(&raw.end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EvaId;

    const SAMPLE: &str = include_str!("../../data/samples/wingdef.xml");

    #[test]
    fn decode_sample() {
        let wings = decode_wing_definition(SAMPLE.as_bytes()).unwrap();
        assert_eq!(wings.start.eva_id, Some(EvaId::new(8000105)));
        assert_eq!(wings.start.station_name, "Frankfurt(Main)Hbf");
        assert_eq!(wings.start.planned_time, "1906141334");
        assert!(wings.start.fl);
        assert_eq!(wings.end.eva_id, Some(EvaId::new(8000096)));
        assert!(!wings.end.fl);
    }

    #[test]
    fn missing_end_is_default() {
        let wings =
            decode_wing_definition(br#"<wing-def><start eva="8000105"/></wing-def>"#).unwrap();
        assert_eq!(wings.start.eva_id, Some(EvaId::new(8000105)));
        assert_eq!(wings.end, WingDefinitionElement::default());
    }

    #[test]
    fn reader_matches_slice() {
        assert_eq!(
            decode_wing_definition_reader(SAMPLE.as_bytes()).unwrap(),
            decode_wing_definition(SAMPLE.as_bytes()).unwrap()
        );
    }

    #[test]
    fn truncated_is_fatal() {
        assert!(decode_wing_definition(b"<wing-def><start eva=\"1\"").is_err());
    }

    #[test]
    fn raw_roundtrip() {
        let raw: RawWingDefinition = quick_xml::de::from_str(SAMPLE).unwrap();
        let again: RawWingDefinition = quick_xml::de::from_str(&raw.to_xml().unwrap()).unwrap();
        assert_eq!(raw, again);
    }
}
