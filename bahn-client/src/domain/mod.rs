//! Domain types for the railway timetable and status APIs.
//!
//! These are the decoded, normalised values every query returns. They are
//! plain data: built once by a decoder, never mutated afterwards, and
//! serialisable so that cache tiers can store their own copies.

mod coach_sequence;
mod coach_type;
mod eva;
mod hafas;
mod station;
mod suggestion;
mod timetable;
mod wings;

pub use coach_sequence::{
    CoachSequence, CoachSequenceCoach, CoachSequenceCoachEquipment, CoachSequenceCoachGroup,
    CoachSequenceFormation, CoachSequenceMeta, CoachSequencePlatformSection, CoachSequenceStop,
    Direction, PlatformPosition,
};
pub use coach_type::CoachTypeInfo;
pub use eva::{EvaId, InvalidEvaId};
pub use hafas::{HafasMessage, HafasMessagePriority};
pub use station::Station;
pub use suggestion::Suggestion;
pub use timetable::{
    Connection, ConnectionStatus, DelaySource, DistributorMessage, DistributorType, Event,
    EventStatus, FilterFlag, HistoricDelay, HistoricPlatformChange, Message, MessageType,
    Priority, Timetable, TimetableStop, TripLabel, TripType,
};
pub use wings::{WingDefinition, WingDefinitionElement};
