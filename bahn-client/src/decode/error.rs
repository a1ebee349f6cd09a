//! Decode error types.

/// A payload that could not be read into its wire schema.
///
/// Only structural failures end up here. Unknown codes, unparseable station
/// ids and similar content problems degrade to `Unknown`/`None` instead.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Malformed XML, or XML that does not fit the schema
    #[error("XML decode error: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// Malformed JSON, or JSON that does not fit the schema
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading the payload failed
    #[error("I/O error while decoding: {0}")]
    Io(#[from] std::io::Error),
}
