//! Planned and real-time timetable model.
//!
//! A [`Timetable`] is what the IRIS `plan`, `fchg` and `rchg` endpoints
//! return: a list of stops at one station, each describing one train's
//! arrival and/or departure there, plus station-wide messages.
//!
//! Every enumeration in this module has an explicit `Unknown` variant (a code
//! this crate does not recognise) and an `Undefined` variant (no code at all),
//! so decoding never fails because of a new upstream code.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::EvaId;

/// All stops and messages for one station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timetable {
    pub station: String,
    pub eva_id: Option<EvaId>,
    pub stops: Vec<TimetableStop>,
    pub messages: Vec<Message>,
}

/// One train's visit to a station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimetableStop {
    pub stop_id: String,
    pub eva_id: Option<EvaId>,
    pub trip_label: TripLabel,
    /// The stop this one refers to (e.g. the original of a replacement train).
    pub reference: Option<Box<TimetableStop>>,
    pub arrival: Option<Event>,
    pub departure: Option<Event>,
    pub messages: Vec<Message>,
    pub historic_delays: Vec<HistoricDelay>,
    pub historic_platform_changes: Vec<HistoricPlatformChange>,
    pub connections: Vec<Connection>,
}

/// Train identity: category, number, owner and classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripLabel {
    pub messages: Vec<Message>,
    pub created_at: Option<NaiveDateTime>,
    pub filter_flag: FilterFlag,
    pub trip_type: TripType,
    pub owner: String,
    /// Train category, e.g. `ICE`.
    pub category: String,
    /// Train number, e.g. `1095`.
    pub number: String,
}

/// An arrival or departure at a stop.
///
/// `planned_*` fields come from the plan endpoint, `changed_*` from the
/// real-time change endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub messages: Vec<Message>,
    pub planned_platform: String,
    pub planned_time: Option<NaiveDateTime>,
    /// Stations before (arrival) or after (departure) this stop.
    pub planned_path: Vec<String>,
    pub planned_destination: String,
    pub changed_platform: String,
    pub changed_time: Option<NaiveDateTime>,
    pub changed_path: Vec<String>,
    pub changed_destination: String,
    pub planned_status: EventStatus,
    pub changed_status: EventStatus,
    pub hidden: bool,
    pub cancellation_time: String,
    pub wings: String,
    pub line: String,
    pub transition: String,
}

/// A disruption, delay cause or free-text notice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: String,
    pub message_type: MessageType,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    pub code: i32,
    pub internal_text: String,
    pub external_text: String,
    pub category: String,
    pub external_category: String,
    pub timestamp: Option<NaiveDateTime>,
    pub priority: Priority,
    pub owner: String,
    pub external_link: String,
    pub deleted: bool,
    pub distributor_messages: Vec<DistributorMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributorMessage {
    pub distributor_type: DistributorType,
    pub distributor_name: String,
    pub internal_text: String,
    pub timestamp: Option<NaiveDateTime>,
}

/// A previously published delay for a stop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricDelay {
    pub timestamp: Option<NaiveDateTime>,
    pub arrival: Option<NaiveDateTime>,
    pub departure: Option<NaiveDateTime>,
    pub source: DelaySource,
    pub code: String,
}

/// A previously published platform change for a stop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricPlatformChange {
    pub timestamp: Option<NaiveDateTime>,
    pub arrival_platform: String,
    pub departure_platform: String,
    pub cause: String,
}

/// A connecting train held for (or substituted by) another.
///
/// Both stops are owned copies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub connection_id: String,
    pub timestamp: Option<NaiveDateTime>,
    pub eva_id: Option<EvaId>,
    pub status: ConnectionStatus,
    pub reference: Option<TimetableStop>,
    pub stop: Option<TimetableStop>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    HafasInformationManager,
    QualityChange,
    FreeText,
    CauseOfDelay,
    Ibis,
    IbisUnassigned,
    Disruption,
    Connection,
    Unknown,
    #[default]
    Undefined,
}

impl MessageType {
    /// Resolve the single-letter wire code (`t` attribute).
    pub fn from_code(code: &str) -> Self {
        match code {
            "h" => Self::HafasInformationManager,
            "q" => Self::QualityChange,
            "f" => Self::FreeText,
            "d" => Self::CauseOfDelay,
            "i" => Self::Ibis,
            "u" => Self::IbisUnassigned,
            "r" => Self::Disruption,
            "c" => Self::Connection,
            "" => Self::Undefined,
            other => {
                debug!(code = other, "unrecognized message type");
                Self::Unknown
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    Low,
    Done,
    Unknown,
    #[default]
    Undefined,
}

impl Priority {
    pub fn from_code(code: &str) -> Self {
        match code {
            "1" => Self::High,
            "2" => Self::Medium,
            "3" => Self::Low,
            "4" => Self::Done,
            "" => Self::Undefined,
            other => {
                debug!(code = other, "unrecognized message priority");
                Self::Unknown
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistributorType {
    City,
    Region,
    LongDistance,
    Other,
    Unknown,
    #[default]
    Undefined,
}

impl DistributorType {
    pub fn from_code(code: &str) -> Self {
        match code {
            "s" => Self::City,
            "r" => Self::Region,
            "f" => Self::LongDistance,
            "x" => Self::Other,
            "" => Self::Undefined,
            other => {
                debug!(code = other, "unrecognized distributor type");
                Self::Unknown
            }
        }
    }
}

/// Coarse traffic classification of a trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterFlag {
    External,
    LongDistance,
    Regional,
    #[serde(rename = "SBAHN")]
    SBahn,
    Unknown,
    #[default]
    Undefined,
}

impl FilterFlag {
    pub fn from_code(code: &str) -> Self {
        match code {
            "D" => Self::External,
            "F" => Self::LongDistance,
            "N" => Self::Regional,
            "S" => Self::SBahn,
            "" => Self::Undefined,
            other => {
                debug!(code = other, "unrecognized filter flag");
                Self::Unknown
            }
        }
    }
}

/// IRIS trip type. The upstream documentation only names these by letter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TripType {
    P,
    E,
    Z,
    S,
    H,
    N,
    #[serde(rename = "UNKNOWN")]
    Unknown,
    #[default]
    #[serde(rename = "UNDEFINED")]
    Undefined,
}

impl TripType {
    pub fn from_code(code: &str) -> Self {
        match code {
            "p" => Self::P,
            "e" => Self::E,
            "z" => Self::Z,
            "s" => Self::S,
            "h" => Self::H,
            "n" => Self::N,
            "" => Self::Undefined,
            other => {
                debug!(code = other, "unrecognized trip type");
                Self::Unknown
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelaySource {
    Leibit,
    IrisAutomatic,
    IrisManual,
    ThirdParty,
    IstpAutomatic,
    IstpManual,
    Prognosis,
    Unknown,
    #[default]
    Undefined,
}

impl DelaySource {
    pub fn from_code(code: &str) -> Self {
        match code {
            "L" => Self::Leibit,
            "NA" => Self::IrisAutomatic,
            "NM" => Self::IrisManual,
            "V" => Self::ThirdParty,
            "IA" => Self::IstpAutomatic,
            "IM" => Self::IstpManual,
            "A" => Self::Prognosis,
            "" => Self::Undefined,
            other => {
                debug!(code = other, "unrecognized delay source");
                Self::Unknown
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    Waiting,
    Transition,
    Alternative,
    Unknown,
    #[default]
    Undefined,
}

impl ConnectionStatus {
    pub fn from_code(code: &str) -> Self {
        match code {
            "w" => Self::Waiting,
            "n" => Self::Transition,
            "a" => Self::Alternative,
            "" => Self::Undefined,
            other => {
                debug!(code = other, "unrecognized connection status");
                Self::Unknown
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Added,
    Cancelled,
    Planned,
    Unknown,
    #[default]
    Undefined,
}

impl EventStatus {
    pub fn from_code(code: &str) -> Self {
        match code {
            "a" => Self::Added,
            "c" => Self::Cancelled,
            "p" => Self::Planned,
            "" => Self::Undefined,
            other => {
                debug!(code = other, "unrecognized event status");
                Self::Unknown
            }
        }
    }
}

impl Event {
    /// Best known time: the changed time if published, otherwise the plan.
    pub fn time(&self) -> Option<NaiveDateTime> {
        self.changed_time.or(self.planned_time)
    }

    /// Best known platform, preferring a published change.
    pub fn platform(&self) -> &str {
        if self.changed_platform.is_empty() {
            &self.planned_platform
        } else {
            &self.changed_platform
        }
    }

    /// Whether either status marks the event as cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.changed_status == EventStatus::Cancelled
            || self.planned_status == EventStatus::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_type_codes() {
        assert_eq!(MessageType::from_code("h"), MessageType::HafasInformationManager);
        assert_eq!(MessageType::from_code("q"), MessageType::QualityChange);
        assert_eq!(MessageType::from_code("f"), MessageType::FreeText);
        assert_eq!(MessageType::from_code("d"), MessageType::CauseOfDelay);
        assert_eq!(MessageType::from_code("i"), MessageType::Ibis);
        assert_eq!(MessageType::from_code("u"), MessageType::IbisUnassigned);
        assert_eq!(MessageType::from_code("r"), MessageType::Disruption);
        assert_eq!(MessageType::from_code("c"), MessageType::Connection);
        assert_eq!(MessageType::from_code(""), MessageType::Undefined);
        assert_eq!(MessageType::from_code("x"), MessageType::Unknown);
        assert_eq!(MessageType::from_code("H"), MessageType::Unknown);
    }

    #[test]
    fn priority_codes() {
        assert_eq!(Priority::from_code("1"), Priority::High);
        assert_eq!(Priority::from_code("2"), Priority::Medium);
        assert_eq!(Priority::from_code("3"), Priority::Low);
        assert_eq!(Priority::from_code("4"), Priority::Done);
        assert_eq!(Priority::from_code(""), Priority::Undefined);
        assert_eq!(Priority::from_code("5"), Priority::Unknown);
    }

    #[test]
    fn distributor_type_codes() {
        assert_eq!(DistributorType::from_code("s"), DistributorType::City);
        assert_eq!(DistributorType::from_code("r"), DistributorType::Region);
        assert_eq!(DistributorType::from_code("f"), DistributorType::LongDistance);
        assert_eq!(DistributorType::from_code("x"), DistributorType::Other);
        assert_eq!(DistributorType::from_code(""), DistributorType::Undefined);
        assert_eq!(DistributorType::from_code("q"), DistributorType::Unknown);
    }

    #[test]
    fn filter_flag_codes() {
        assert_eq!(FilterFlag::from_code("D"), FilterFlag::External);
        assert_eq!(FilterFlag::from_code("F"), FilterFlag::LongDistance);
        assert_eq!(FilterFlag::from_code("N"), FilterFlag::Regional);
        assert_eq!(FilterFlag::from_code("S"), FilterFlag::SBahn);
        assert_eq!(FilterFlag::from_code(""), FilterFlag::Undefined);
        assert_eq!(FilterFlag::from_code("s"), FilterFlag::Unknown);
    }

    #[test]
    fn trip_type_codes() {
        for (code, expected) in [
            ("p", TripType::P),
            ("e", TripType::E),
            ("z", TripType::Z),
            ("s", TripType::S),
            ("h", TripType::H),
            ("n", TripType::N),
            ("", TripType::Undefined),
            ("P", TripType::Unknown),
        ] {
            assert_eq!(TripType::from_code(code), expected, "code {code:?}");
        }
    }

    #[test]
    fn delay_source_codes() {
        assert_eq!(DelaySource::from_code("L"), DelaySource::Leibit);
        assert_eq!(DelaySource::from_code("NA"), DelaySource::IrisAutomatic);
        assert_eq!(DelaySource::from_code("NM"), DelaySource::IrisManual);
        assert_eq!(DelaySource::from_code("V"), DelaySource::ThirdParty);
        assert_eq!(DelaySource::from_code("IA"), DelaySource::IstpAutomatic);
        assert_eq!(DelaySource::from_code("IM"), DelaySource::IstpManual);
        assert_eq!(DelaySource::from_code("A"), DelaySource::Prognosis);
        assert_eq!(DelaySource::from_code(""), DelaySource::Undefined);
        assert_eq!(DelaySource::from_code("N"), DelaySource::Unknown);
    }

    #[test]
    fn connection_status_codes() {
        assert_eq!(ConnectionStatus::from_code("w"), ConnectionStatus::Waiting);
        assert_eq!(ConnectionStatus::from_code("n"), ConnectionStatus::Transition);
        assert_eq!(ConnectionStatus::from_code("a"), ConnectionStatus::Alternative);
        assert_eq!(ConnectionStatus::from_code(""), ConnectionStatus::Undefined);
        assert_eq!(ConnectionStatus::from_code("z"), ConnectionStatus::Unknown);
    }

    #[test]
    fn event_status_codes() {
        assert_eq!(EventStatus::from_code("a"), EventStatus::Added);
        assert_eq!(EventStatus::from_code("c"), EventStatus::Cancelled);
        assert_eq!(EventStatus::from_code("p"), EventStatus::Planned);
        assert_eq!(EventStatus::from_code(""), EventStatus::Undefined);
        assert_eq!(EventStatus::from_code("cancelled"), EventStatus::Unknown);
    }

    #[test]
    fn enum_serialization_names() {
        assert_eq!(
            serde_json::to_string(&MessageType::HafasInformationManager).unwrap(),
            "\"HAFAS_INFORMATION_MANAGER\""
        );
        assert_eq!(serde_json::to_string(&FilterFlag::SBahn).unwrap(), "\"SBAHN\"");
        assert_eq!(serde_json::to_string(&TripType::P).unwrap(), "\"P\"");
        assert_eq!(
            serde_json::to_string(&TripType::Undefined).unwrap(),
            "\"UNDEFINED\""
        );
    }

    #[test]
    fn event_prefers_changes() {
        let planned = NaiveDateTime::parse_from_str("2019-06-14 13:05", "%Y-%m-%d %H:%M").unwrap();
        let changed = NaiveDateTime::parse_from_str("2019-06-14 13:12", "%Y-%m-%d %H:%M").unwrap();

        let mut event = Event {
            planned_time: Some(planned),
            planned_platform: "7".to_string(),
            ..Event::default()
        };
        assert_eq!(event.time(), Some(planned));
        assert_eq!(event.platform(), "7");
        assert!(!event.is_cancelled());

        event.changed_time = Some(changed);
        event.changed_platform = "9".to_string();
        event.changed_status = EventStatus::Cancelled;
        assert_eq!(event.time(), Some(changed));
        assert_eq!(event.platform(), "9");
        assert!(event.is_cancelled());
    }
}
