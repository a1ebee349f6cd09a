//! Fixed-layout timestamp codecs.
//!
//! The IRIS, coach-sequence and HAFAS endpoints each spell timestamps in
//! their own compact layout. Every layout here is optional on the wire: an
//! absent or empty value decodes to `None`, and `None` is never written back
//! out as a zero timestamp.
//!
//! Each layout module exposes `parse`/`format` plus an `option` submodule for
//! use with `#[serde(with = "...")]` on `Option` fields.

use chrono::{NaiveDate, NaiveDateTime};

/// Error returned when a present timestamp does not match its layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {value:?} for layout {layout}")]
pub struct TimeCodecError {
    value: String,
    layout: &'static str,
}

impl TimeCodecError {
    fn new(value: &str, layout: &'static str) -> Self {
        Self {
            value: value.to_string(),
            layout,
        }
    }
}

/// Parse an optional date-time. Empty input yields `Ok(None)`.
fn parse_datetime(
    s: &str,
    layout: &'static str,
) -> Result<Option<NaiveDateTime>, TimeCodecError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(s, layout)
        .map(Some)
        .map_err(|_| TimeCodecError::new(s, layout))
}

macro_rules! datetime_layout {
    ($(#[$meta:meta])* $name:ident, $layout:literal) => {
        $(#[$meta])*
        pub mod $name {
            use chrono::NaiveDateTime;

            use super::TimeCodecError;

            /// chrono layout string.
            pub const LAYOUT: &str = $layout;

            /// Parse a value in this layout; empty input is `None`.
            pub fn parse(s: &str) -> Result<Option<NaiveDateTime>, TimeCodecError> {
                super::parse_datetime(s, LAYOUT)
            }

            /// Format a value in this layout.
            pub fn format(value: &NaiveDateTime) -> String {
                value.format(LAYOUT).to_string()
            }

            /// Serde adapter for `Option<NaiveDateTime>` fields.
            pub mod option {
                use chrono::NaiveDateTime;
                use serde::{Deserialize, Deserializer, Serializer};

                pub fn serialize<S: Serializer>(
                    value: &Option<NaiveDateTime>,
                    serializer: S,
                ) -> Result<S::Ok, S::Error> {
                    match value {
                        Some(t) => serializer.serialize_str(&super::format(t)),
                        None => serializer.serialize_none(),
                    }
                }

                pub fn deserialize<'de, D: Deserializer<'de>>(
                    deserializer: D,
                ) -> Result<Option<NaiveDateTime>, D::Error> {
                    match Option::<String>::deserialize(deserializer)? {
                        Some(text) => super::parse(&text).map_err(serde::de::Error::custom),
                        None => Ok(None),
                    }
                }
            }
        }
    };
}

datetime_layout!(
    /// Two-digit year with millisecond precision: `19-06-14 11:42:56.426`.
    long,
    "%y-%m-%d %H:%M:%S%.f"
);

datetime_layout!(
    /// Two-digit year down to the minute, no separators: `1906141305`.
    short,
    "%y%m%d%H%M"
);

datetime_layout!(
    /// ISO-like local time: `2019-06-14T13:05:00`.
    medium,
    "%Y-%m-%dT%H:%M:%S"
);

datetime_layout!(
    /// Four-digit year down to the minute, no separators: `201906141305`.
    medium_short,
    "%Y%m%d%H%M"
);

/// Calendar date: `2019-06-14`.
pub mod date {
    use chrono::NaiveDate;

    use super::TimeCodecError;

    /// chrono layout string.
    pub const LAYOUT: &str = "%Y-%m-%d";

    /// Parse a date; empty input is `None`.
    pub fn parse(s: &str) -> Result<Option<NaiveDate>, TimeCodecError> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(s, LAYOUT)
            .map(Some)
            .map_err(|_| TimeCodecError::new(s, LAYOUT))
    }

    /// Format a date.
    pub fn format(value: &NaiveDate) -> String {
        value.format(LAYOUT).to_string()
    }

    /// Serde adapter for `Option<NaiveDate>` fields.
    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(d) => serializer.serialize_str(&super::format(d)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(text) => super::parse(&text).map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}

/// Combine a `DD.MM.YYYY` date and `HH:MM` time as sent by the journey
/// search endpoint. A missing date means `today`; anything unparseable is
/// `None`.
pub fn parse_day_and_clock(date: &str, time: &str, today: NaiveDate) -> Option<NaiveDateTime> {
    let date = date.trim();
    let date = if date.is_empty() {
        today
    } else {
        NaiveDate::parse_from_str(date, "%d.%m.%Y").ok()?
    };
    let time = chrono::NaiveTime::parse_from_str(time.trim(), "%H:%M").ok()?;
    Some(date.and_time(time))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::Timelike;
    use proptest::prelude::*;

    fn minute_precision() -> impl Strategy<Value = NaiveDateTime> {
        (2000i32..2069, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60).prop_map(|(y, mo, d, h, mi)| {
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_opt(h, mi, 0)
                .unwrap()
        })
    }

    proptest! {
        /// Present short timestamps round-trip to the same instant
        #[test]
        fn short_roundtrip(t in minute_precision()) {
            prop_assert_eq!(short::parse(&short::format(&t)).unwrap(), Some(t));
        }

        /// Present medium timestamps round-trip to the same instant
        #[test]
        fn medium_roundtrip(t in minute_precision()) {
            prop_assert_eq!(medium::parse(&medium::format(&t)).unwrap(), Some(t));
        }

        /// Millisecond precision survives the long layout
        #[test]
        fn long_roundtrip(t in minute_precision(), s in 0u32..60, ms in 0u32..1000) {
            let t = t.with_second(s).unwrap().with_nanosecond(ms * 1_000_000).unwrap();
            prop_assert_eq!(long::parse(&long::format(&t)).unwrap(), Some(t));
        }
    }
}
