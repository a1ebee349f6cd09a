//! Disruption notices scraped from the HAFAS train info page
//! (`traininfo.exe/dn/{trainlink}?rt=1&ajax=1`).
//!
//! The page groups notices by priority:
//!
//! ```html
//! <div class="himMessagesHigh">
//!   <div id="HIM_Text__123456">
//!     <span class="bold">14.06.2019 - \n16.06.2019: \nBauarbeiten.</span>
//!     <span>Zwischen Fulda und Frankfurt ...</span>
//!   </div>
//! </div>
//! ```
//!
//! HTML parsing is lenient, so only reading the body can fail. Parts of a
//! notice that cannot be found are left empty.

use std::io::Read;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::DecodeError;
use crate::domain::{HafasMessage, HafasMessagePriority};

struct Selectors {
    sections: [(Selector, HafasMessagePriority); 3],
    validity: Selector,
    content: Selector,
}

fn selectors() -> &'static Selectors {
    static SELECTORS: OnceLock<Selectors> = OnceLock::new();
    SELECTORS.get_or_init(|| {
        let parse = |s: &str| Selector::parse(s).expect("static selector is valid");
        Selectors {
            sections: [
                (parse(".himMessagesHigh > div"), HafasMessagePriority::High),
                (parse(".himMessagesMiddle > div"), HafasMessagePriority::Middle),
                (parse(".himMessagesLow > div"), HafasMessagePriority::Low),
            ],
            validity: parse("span.bold"),
            content: parse("span:not(.bold)"),
        }
    })
}

/// `From[ - \nTo][: \nSubject[.]]`
fn validity_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<from>.+?)(?:\p{Z}-\p{Z}\n(?P<to>.+?))?(?::\p{Z}\n(?P<subject>.+?)\.?)?$")
            .expect("static pattern is valid")
    })
}

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^HIM_Text__(?P<id>\d+)$").expect("static pattern is valid")
    })
}

pub fn decode_hafas_messages(bytes: &[u8]) -> Result<Vec<HafasMessage>, DecodeError> {
    Ok(scrape(&String::from_utf8_lossy(bytes)))
}

pub fn decode_hafas_messages_reader<R: Read>(
    mut reader: R,
) -> Result<Vec<HafasMessage>, DecodeError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_hafas_messages(&bytes)
}

/// Extract every notice, high priority first, in document order within a
/// priority.
pub fn scrape(html: &str) -> Vec<HafasMessage> {
    let document = Html::parse_document(html);
    let selectors = selectors();

    selectors
        .sections
        .iter()
        .flat_map(|(selector, priority)| {
            document
                .select(selector)
                .map(move |block| convert_block(block, *priority))
        })
        .collect()
}

fn text_of(element: Option<ElementRef<'_>>) -> String {
    element
        .map(|e| e.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn group(captures: Option<&regex::Captures<'_>>, name: &str) -> String {
    captures
        .and_then(|c| c.name(name))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn convert_block(block: ElementRef<'_>, priority: HafasMessagePriority) -> HafasMessage {
    let selectors = selectors();
    let validity = text_of(block.select(&selectors.validity).next());
    let content = text_of(block.select(&selectors.content).next());
    let id = block.value().attr("id").unwrap_or("").trim();

    let validity_captures = validity_pattern().captures(&validity);
    let id_captures = id_pattern().captures(id);

    HafasMessage {
        id: group(id_captures.as_ref(), "id"),
        priority,
        from: group(validity_captures.as_ref(), "from"),
        to: group(validity_captures.as_ref(), "to"),
        subject: group(validity_captures.as_ref(), "subject"),
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../../data/samples/hafas_messages.html");

    #[test]
    fn decode_sample() {
        let messages = decode_hafas_messages(SAMPLE.as_bytes()).unwrap();
        assert_eq!(messages.len(), 4);

        let priorities: Vec<_> = messages.iter().map(|m| m.priority).collect();
        assert_eq!(
            priorities,
            vec![
                HafasMessagePriority::High,
                HafasMessagePriority::Middle,
                HafasMessagePriority::Middle,
                HafasMessagePriority::Low,
            ]
        );

        let works = &messages[0];
        assert_eq!(works.id, "2173846");
        assert_eq!(works.from, "14.06.2019");
        assert_eq!(works.to, "16.06.2019");
        assert_eq!(works.subject, "Bauarbeiten");
        assert!(works.content.starts_with("Zwischen Fulda und Frankfurt(Main)Hbf"));
    }

    #[test]
    fn partial_validity() {
        let messages = decode_hafas_messages(SAMPLE.as_bytes()).unwrap();

        // No end date
        let open_ended = &messages[1];
        assert_eq!(open_ended.from, "ab 14.06.2019");
        assert_eq!(open_ended.to, "");
        assert_eq!(open_ended.subject, "Reparatur an einem Signal");

        // Only a start, no subject
        let bare = &messages[2];
        assert_eq!(bare.from, "14.06.2019 13:10");
        assert_eq!(bare.to, "");
        assert_eq!(bare.subject, "");
    }

    #[test]
    fn missing_parts_are_empty() {
        let messages = decode_hafas_messages(SAMPLE.as_bytes()).unwrap();
        let low = &messages[3];
        assert_eq!(low.id, "");
        assert_eq!(low.from, "");
        assert_eq!(low.content, "Bitte beachten Sie die geänderten Abfahrtszeiten.");
    }

    #[test]
    fn no_messages() {
        let messages = decode_hafas_messages(b"<div class=\"tqDetails\"></div>").unwrap();
        assert!(messages.is_empty());
        assert!(decode_hafas_messages(b"").unwrap().is_empty());
    }

    #[test]
    fn invalid_utf8_is_tolerated() {
        let html = b"<div class=\"himMessagesLow\"><div><span>K\xf6ln</span></div></div>";
        let messages = decode_hafas_messages(html).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "K\u{fffd}ln");
    }

    #[test]
    fn reader_matches_slice() {
        assert_eq!(
            decode_hafas_messages_reader(SAMPLE.as_bytes()).unwrap(),
            decode_hafas_messages(SAMPLE.as_bytes()).unwrap()
        );
    }

    #[test]
    fn validity_pattern_groups() {
        let c = validity_pattern()
            .captures("01.07.2019 - \n05.07.2019: \nUnwetter.")
            .unwrap();
        assert_eq!(&c["from"], "01.07.2019");
        assert_eq!(&c["to"], "05.07.2019");
        assert_eq!(&c["subject"], "Unwetter");
    }
}
