//! Cache keys and upstream requests for each query.
//!
//! A [`Query`] carries only the identifying parameters, already truncated to
//! the query's granularity, so equal queries always map to one key.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::codec::time::medium_short;
use crate::domain::EvaId;

use super::config::ApiConfig;

/// Maximum number of suggestions requested from the journey planner.
const SUGGESTION_LIMIT: u32 = 50;

/// One upstream lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Station metadata.
    Station { eva_id: EvaId },
    /// Planned timetable slice for one hour.
    Timetable { eva_id: EvaId, hour: NaiveDateTime },
    /// All known changes for a station.
    RealtimeAll { eva_id: EvaId, at: NaiveDateTime },
    /// Changes made in the last two minutes.
    RealtimeRecent { eva_id: EvaId, at: NaiveDateTime },
    /// Wing train relation between two trips.
    WingDefinition { parent: String, wing: String },
    /// Physical formation of a line at a departure time.
    CoachSequence { line: String, at: NaiveDateTime },
    /// Journey search by train name.
    Suggestions { line: String, date: NaiveDate },
    /// HIM messages for a journey.
    HafasMessages { train_link: String },
}

/// How to fetch a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Get { url: String },
    PostForm { url: String, form: Vec<(&'static str, String)> },
}

impl Request {
    pub fn url(&self) -> &str {
        match self {
            Request::Get { url } | Request::PostForm { url, .. } => url,
        }
    }
}

/// Escape a free-text key part so that spaces only ever separate parts.
fn key_part(value: &str) -> String {
    value.replace('%', "%25").replace(' ', "%20")
}

fn truncate_to_minute(at: NaiveDateTime) -> NaiveDateTime {
    at.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}

fn truncate_to_hour(at: NaiveDateTime) -> NaiveDateTime {
    truncate_to_minute(at).with_minute(0).unwrap_or(at)
}

impl Query {
    pub fn station(eva_id: EvaId) -> Self {
        Query::Station { eva_id }
    }

    pub fn timetable(eva_id: EvaId, at: NaiveDateTime) -> Self {
        Query::Timetable {
            eva_id,
            hour: truncate_to_hour(at),
        }
    }

    pub fn realtime_all(eva_id: EvaId, at: NaiveDateTime) -> Self {
        Query::RealtimeAll {
            eva_id,
            at: truncate_to_minute(at),
        }
    }

    pub fn realtime_recent(eva_id: EvaId, at: NaiveDateTime) -> Self {
        Query::RealtimeRecent {
            eva_id,
            at: truncate_to_minute(at),
        }
    }

    pub fn wing_definition(parent: impl Into<String>, wing: impl Into<String>) -> Self {
        Query::WingDefinition {
            parent: parent.into(),
            wing: wing.into(),
        }
    }

    pub fn coach_sequence(line: impl Into<String>, at: NaiveDateTime) -> Self {
        Query::CoachSequence {
            line: line.into(),
            at: truncate_to_minute(at),
        }
    }

    pub fn suggestions(line: impl Into<String>, date: NaiveDate) -> Self {
        Query::Suggestions {
            line: line.into(),
            date,
        }
    }

    pub fn hafas_messages(train_link: impl Into<String>) -> Self {
        Query::HafasMessages {
            train_link: train_link.into(),
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Query::Station { .. } => "station",
            Query::Timetable { .. } => "timetable",
            Query::RealtimeAll { .. } => "realtime_all",
            Query::RealtimeRecent { .. } => "realtime_recent",
            Query::WingDefinition { .. } => "wing_definition",
            Query::CoachSequence { .. } => "coach_sequence",
            Query::Suggestions { .. } => "suggestions",
            Query::HafasMessages { .. } => "hafas_messages",
        }
    }

    /// The key under which the decoded value is cached.
    pub fn cache_key(&self) -> String {
        let name = self.name();
        match self {
            Query::Station { eva_id } => format!("{name} {eva_id}"),
            Query::Timetable { eva_id, hour } => {
                format!("{name} {eva_id} {}", hour.format("%Y-%m-%dT%H"))
            }
            Query::RealtimeAll { eva_id, at } | Query::RealtimeRecent { eva_id, at } => {
                format!("{name} {eva_id} {}", at.format("%Y-%m-%dT%H:%M"))
            }
            Query::WingDefinition { parent, wing } => {
                format!("{name} {} {}", key_part(parent), key_part(wing))
            }
            Query::CoachSequence { line, at } => {
                format!("{name} {} {}", key_part(line), at.format("%Y-%m-%dT%H:%M"))
            }
            Query::Suggestions { line, date } => {
                format!("{name} {} {}", key_part(line), date.format("%Y-%m-%d"))
            }
            Query::HafasMessages { train_link } => format!("{name} {}", key_part(train_link)),
        }
    }

    /// The upstream request answering this query.
    pub fn request(&self, config: &ApiConfig) -> Request {
        let iris = &config.iris_base_url;
        let url = match self {
            Query::Station { eva_id } => format!("{iris}/timetable/station/{eva_id}"),
            Query::Timetable { eva_id, hour } => format!(
                "{iris}/timetable/plan/{eva_id}/{}",
                hour.format("%y%m%d/%H")
            ),
            Query::RealtimeAll { eva_id, .. } => format!("{iris}/timetable/fchg/{eva_id}"),
            Query::RealtimeRecent { eva_id, .. } => format!("{iris}/timetable/rchg/{eva_id}"),
            Query::WingDefinition { parent, wing } => {
                format!("{iris}/timetable/wingdef/{parent}/{wing}")
            }
            Query::CoachSequence { line, at } => format!(
                "{}/{line}/{}",
                config.coach_sequence_base_url,
                medium_short::format(at)
            ),
            Query::Suggestions { line, date } => {
                return Request::PostForm {
                    url: format!("{}/trainsearch.exe/dn", config.hafas_base_url),
                    form: vec![
                        ("maxResults", SUGGESTION_LIMIT.to_string()),
                        ("trainname", line.clone()),
                        ("date", date.format("%d.%m.%Y").to_string()),
                        ("L", "vs_json.vs_hap".to_string()),
                    ],
                };
            }
            Query::HafasMessages { train_link } => format!(
                "{}/traininfo.exe/dn/{train_link}?rt=1&ajax=1",
                config.hafas_base_url
            ),
        };
        Request::Get { url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eva() -> EvaId {
        EvaId::new(8000105)
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn timetable_is_hourly() {
        let a = Query::timetable(eva(), at(14, 5, 0));
        let b = Query::timetable(eva(), at(14, 59, 59));
        assert_eq!(a, b);
        assert_eq!(a.cache_key(), "timetable 8000105 2024-03-09T14");
        assert_ne!(a, Query::timetable(eva(), at(15, 0, 0)));

        let config = ApiConfig::default().with_iris_base_url("http://iris");
        assert_eq!(
            a.request(&config),
            Request::Get {
                url: "http://iris/timetable/plan/8000105/240309/14".into()
            }
        );
    }

    #[test]
    fn realtime_is_per_minute() {
        let a = Query::realtime_all(eva(), at(14, 5, 1));
        assert_eq!(a, Query::realtime_all(eva(), at(14, 5, 59)));
        assert_eq!(a.cache_key(), "realtime_all 8000105 2024-03-09T14:05");

        let recent = Query::realtime_recent(eva(), at(14, 5, 1));
        assert_eq!(recent.cache_key(), "realtime_recent 8000105 2024-03-09T14:05");
        assert_ne!(a.cache_key(), recent.cache_key());

        let config = ApiConfig::default().with_iris_base_url("http://iris");
        assert_eq!(a.request(&config).url(), "http://iris/timetable/fchg/8000105");
        assert_eq!(recent.request(&config).url(), "http://iris/timetable/rchg/8000105");
    }

    #[test]
    fn station_key_has_no_time() {
        let q = Query::station(eva());
        assert_eq!(q.cache_key(), "station 8000105");
        assert_eq!(
            q.request(&ApiConfig::default()).url(),
            "https://iris.noncd.db.de/iris-tts/timetable/station/8000105"
        );
    }

    #[test]
    fn wing_definition() {
        let q = Query::wing_definition("-123-2403091400-1", "-456-2403091400-1");
        assert_eq!(
            q.cache_key(),
            "wing_definition -123-2403091400-1 -456-2403091400-1"
        );
        let config = ApiConfig::default().with_iris_base_url("http://iris");
        assert_eq!(
            q.request(&config).url(),
            "http://iris/timetable/wingdef/-123-2403091400-1/-456-2403091400-1"
        );
    }

    #[test]
    fn coach_sequence() {
        let q = Query::coach_sequence("1095", at(14, 5, 30));
        assert_eq!(q.cache_key(), "coach_sequence 1095 2024-03-09T14:05");
        let config = ApiConfig::default().with_coach_sequence_base_url("http://wr");
        assert_eq!(q.request(&config).url(), "http://wr/1095/202403091405");
    }

    #[test]
    fn suggestions_post_a_form() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let q = Query::suggestions("ICE 1095", date);
        assert_eq!(q.cache_key(), "suggestions ICE%201095 2024-03-09");

        let config = ApiConfig::default().with_hafas_base_url("http://hafas/bin");
        assert_eq!(
            q.request(&config),
            Request::PostForm {
                url: "http://hafas/bin/trainsearch.exe/dn".into(),
                form: vec![
                    ("maxResults", "50".into()),
                    ("trainname", "ICE 1095".into()),
                    ("date", "09.03.2024".into()),
                    ("L", "vs_json.vs_hap".into()),
                ],
            }
        );
    }

    #[test]
    fn hafas_messages() {
        let q = Query::hafas_messages("123/456/789/0/80");
        assert_eq!(q.cache_key(), "hafas_messages 123/456/789/0/80");
        let config = ApiConfig::default().with_hafas_base_url("http://hafas/bin");
        assert_eq!(
            q.request(&config).url(),
            "http://hafas/bin/traininfo.exe/dn/123/456/789/0/80?rt=1&ajax=1"
        );
    }

    #[test]
    fn spaces_in_parameters_cannot_shift_parts() {
        assert_ne!(
            Query::wing_definition("a b", "c").cache_key(),
            Query::wing_definition("a", "b c").cache_key()
        );
        assert_ne!(
            Query::wing_definition("a%20b", "c").cache_key(),
            Query::wing_definition("a b", "c").cache_key()
        );
        assert_eq!(
            Query::wing_definition("a b", "c").cache_key(),
            "wing_definition a%20b c"
        );
    }

    #[test]
    fn names_are_distinct() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let queries = [
            Query::station(eva()),
            Query::timetable(eva(), at(1, 0, 0)),
            Query::realtime_all(eva(), at(1, 0, 0)),
            Query::realtime_recent(eva(), at(1, 0, 0)),
            Query::wing_definition("a", "b"),
            Query::coach_sequence("1", at(1, 0, 0)),
            Query::suggestions("1", date),
            Query::hafas_messages("x"),
        ];
        let mut names: Vec<_> = queries.iter().map(Query::name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), queries.len());
    }
}
