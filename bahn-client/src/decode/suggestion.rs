//! HAFAS train search suggestions (`trainsearch.exe`).
//!
//! The endpoint answers with a Latin-1 JavaScript snippet rather than plain
//! JSON:
//!
//! ```text
//! TSLs.sls={"suggestions":[{"value":"ICE 1095", ...}]};TSLs.showSuggestion();
//! ```
//!
//! The payload is transcoded to UTF-8, the assignment around the object
//! literal is removed, and what remains is decoded as JSON.

use std::io::Read;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DecodeError, json_from_slice, or_default};
use crate::codec::parse_day_and_clock;
use crate::domain::Suggestion;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSuggestions {
    #[serde(alias = "Suggestions", default)]
    pub suggestions: Vec<RawSuggestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSuggestion {
    pub value: Option<String>,
    pub cycle: Option<String>,
    pub pool: Option<String>,
    pub id: Option<String>,
    #[serde(rename = "trainLink")]
    pub train_link: Option<String>,
    #[serde(rename = "journParam")]
    pub journey_params: Option<String>,
    #[serde(rename = "pubTime")]
    pub published_time: Option<String>,
    #[serde(rename = "pubDate")]
    pub published_date: Option<String>,
    #[serde(rename = "dep")]
    pub departure_station: Option<String>,
    #[serde(rename = "depDate")]
    pub departure_date: Option<String>,
    #[serde(rename = "depTime")]
    pub departure_time: Option<String>,
    #[serde(rename = "arr")]
    pub arrival_station: Option<String>,
    #[serde(rename = "arrTime")]
    pub arrival_time: Option<String>,
    #[serde(rename = "arrDate")]
    pub arrival_date: Option<String>,
}

impl RawSuggestions {
    /// Encode the JSON object (without the script wrapper).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Transcode a Latin-1 response body to text.
///
/// `ISO-8859-1` is an alias of windows-1252 in the WHATWG encoding standard,
/// which is what browsers (and HAFAS clients) actually apply.
pub fn transcode(bytes: &[u8]) -> String {
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// Cut the object literal out of a `name = {...};` script.
///
/// A body that already starts with the object is returned trimmed.
pub fn strip_script(text: &str) -> &str {
    let text = text.trim();
    let start = match (text.find('='), text.find('{')) {
        (Some(eq), Some(brace)) if eq < brace => eq + 1,
        _ => 0,
    };
    let body = &text[start..];
    match body.rfind('}') {
        Some(end) => body[..=end].trim(),
        None => body.trim().trim_end_matches(';'),
    }
}

pub fn decode_suggestions(bytes: &[u8]) -> Result<Vec<Suggestion>, DecodeError> {
    let text = transcode(bytes);
    let raw: RawSuggestions = json_from_slice(strip_script(&text).as_bytes())?;
    Ok(convert_suggestions(&raw, chrono::Local::now().date_naive()))
}

pub fn decode_suggestions_reader<R: Read>(mut reader: R) -> Result<Vec<Suggestion>, DecodeError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_suggestions(&bytes)
}

/// Project raw suggestions; dates the service leaves out mean `today`.
pub fn convert_suggestions(raw: &RawSuggestions, today: NaiveDate) -> Vec<Suggestion> {
    raw.suggestions
        .iter()
        .map(|s| convert_suggestion(s, today))
        .collect()
}

fn convert_suggestion(raw: &RawSuggestion, today: NaiveDate) -> Suggestion {
    let time = |date: &Option<String>, clock: &Option<String>| {
        parse_day_and_clock(
            date.as_deref().unwrap_or(""),
            clock.as_deref().unwrap_or(""),
            today,
        )
    };
    Suggestion {
        value: or_default(&raw.value),
        cycle: or_default(&raw.cycle),
        pool: or_default(&raw.pool),
        id: or_default(&raw.id),
        train_link: or_default(&raw.train_link),
        journey_params: or_default(&raw.journey_params),
        departure_station: or_default(&raw.departure_station),
        departure_time: time(&raw.departure_date, &raw.departure_time),
        arrival_station: or_default(&raw.arrival_station),
        arrival_time: time(&raw.arrival_date, &raw.arrival_time),
        published_time: time(&raw.published_date, &raw.published_time),
    }
}
