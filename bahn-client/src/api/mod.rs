//! API client for the IRIS timetable, coach sequence and HAFAS services.
//!
//! Upstream characteristics worth knowing:
//! - Planned timetables come in one-hour slices (`/plan/{eva}/{yyMMdd}/{HH}`)
//! - `/fchg` returns every known change for a station, `/rchg` only those
//!   from the last two minutes
//! - Journey suggestions are ISO-8859-1 JavaScript, not plain JSON
//! - HAFAS messages are only available as an HTML fragment

mod client;
mod config;
mod error;
mod mock;
mod query;
mod transport;

pub use client::ApiClient;
pub use config::{
    ApiConfig, DEFAULT_COACH_SEQUENCE_BASE_URL, DEFAULT_HAFAS_BASE_URL, DEFAULT_IRIS_BASE_URL,
};
pub use error::ApiError;
pub use mock::{MockTransport, RecordedRequest};
pub use query::{Query, Request};
pub use transport::{HttpTransport, Transport};
