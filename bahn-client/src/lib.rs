//! Client for Deutsche Bahn's timetable and train status services.
//!
//! Fetches station data, planned and real-time timetables, wing train
//! definitions, coach sequences, journey suggestions and HAFAS disruption
//! messages, decodes them into the types in [`domain`], and caches the
//! results in one or more [`cache`] tiers.

pub mod api;
pub mod cache;
pub mod codec;
pub mod decode;
pub mod domain;
