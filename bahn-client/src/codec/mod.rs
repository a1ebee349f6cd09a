//! Wire-level value codecs shared by the format decoders.

pub mod list;
pub mod time;

pub use time::{TimeCodecError, parse_day_and_clock};
