//! Station identifier type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Error returned when parsing an invalid EVA number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid EVA number: {reason}")]
pub struct InvalidEvaId {
    reason: &'static str,
}

/// A numeric EVA station identifier.
///
/// EVA numbers identify stations across every endpoint (e.g. `8000105` for
/// Frankfurt (Main) Hbf). Any `EvaId` value is a non-empty run of ASCII digits
/// by construction.
///
/// # Examples
///
/// ```
/// use bahn_client::domain::EvaId;
///
/// let ffm = EvaId::parse("8000105").unwrap();
/// assert_eq!(ffm.get(), 8000105);
/// assert_eq!(ffm.to_string(), "8000105");
///
/// assert!(EvaId::parse("").is_err());
/// assert!(EvaId::parse("80x0105").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EvaId(u64);

impl EvaId {
    /// Wrap a raw numeric identifier.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Parse an EVA number from its decimal representation.
    ///
    /// Surrounding whitespace is ignored; the remainder must be ASCII digits
    /// only (no sign, no separators).
    pub fn parse(s: &str) -> Result<Self, InvalidEvaId> {
        let s = s.trim();

        if s.is_empty() {
            return Err(InvalidEvaId {
                reason: "must not be empty",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidEvaId {
                reason: "must be ASCII digits 0-9",
            });
        }

        s.parse::<u64>().map(Self).map_err(|_| InvalidEvaId {
            reason: "out of range",
        })
    }

    /// Returns the numeric value.
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl FromStr for EvaId {
    type Err = InvalidEvaId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for EvaId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Debug for EvaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EvaId({})", self.0)
    }
}

impl fmt::Display for EvaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// XML attributes arrive as text, JSON caches store plain numbers. Accept both.
impl<'de> Deserialize<'de> for EvaId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(Self(n)),
            Repr::Text(s) => Self::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Roundtrip: any u64 survives display then parse
        #[test]
        fn roundtrip(n in any::<u64>()) {
            let eva = EvaId::new(n);
            prop_assert_eq!(EvaId::parse(&eva.to_string()).unwrap(), eva);
        }

        /// Strings containing a letter are always rejected
        #[test]
        fn letters_rejected(s in "[0-9]{0,5}[A-Za-z][0-9]{0,5}") {
            prop_assert!(EvaId::parse(&s).is_err());
        }
    }
}
