//! Pipe-delimited string lists (`ppth="Berlin Hbf|Halle(Saale)Hbf"`).

/// Separator between tokens.
pub const SEPARATOR: char = '|';

/// Split a pipe-joined attribute into its tokens.
///
/// An empty attribute has no tokens.
pub fn split(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(SEPARATOR).map(str::to_string).collect()
}

/// Join tokens back into a single attribute value.
pub fn join(tokens: &[String]) -> String {
    tokens.join("|")
}

/// Serde adapter for `Option<Vec<String>>` attributes.
///
/// `None` means the attribute was absent; the projection into the domain
/// model turns that into an empty list.
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Vec<String>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(tokens) => serializer.serialize_str(&super::join(tokens)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<String>>, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.map(|s| super::split(&s)))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Joining then splitting non-empty tokens is lossless
        #[test]
        fn roundtrip(tokens in proptest::collection::vec("[A-Za-z0-9 ()]{1,12}", 1..8)) {
            prop_assert_eq!(split(&join(&tokens)), tokens);
        }
    }
}
