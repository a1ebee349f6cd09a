//! Canned-response transport for testing without network access.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::error::ApiError;
use super::transport::Transport;

/// One request seen by a [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// `GET` or `POST`
    pub method: &'static str,
    pub url: String,
    /// Form fields of a `POST`, empty for `GET`
    pub form: Vec<(String, String)>,
}

/// Transport that serves fixed bodies by URL.
///
/// Unknown URLs answer with a 404 status error. Every request is recorded,
/// including failed ones.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url` (for both `GET` and `POST`).
    pub fn with_response(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.into(), body.into());
        self
    }

    /// Number of requests made so far.
    pub fn request_count(&self) -> usize {
        self.lock().len()
    }

    /// All requests made so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RecordedRequest>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn respond(&self, request: RecordedRequest) -> Result<Vec<u8>, ApiError> {
        let body = self.responses.get(&request.url).cloned();
        let url = request.url.clone();
        self.lock().push(request);
        body.ok_or_else(|| ApiError::Status {
            status: 404,
            message: format!("No mock response for {url}"),
        })
    }
}

impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        self.respond(RecordedRequest {
            method: "GET",
            url: url.to_string(),
            form: Vec::new(),
        })
    }

    async fn post_form(&self, url: &str, form: &[(&str, String)]) -> Result<Vec<u8>, ApiError> {
        self.respond(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            form: form
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_and_records() {
        let mock = MockTransport::new().with_response("http://x/a", "hello");

        assert_eq!(mock.get("http://x/a").await.unwrap(), b"hello".to_vec());
        let err = mock
            .post_form("http://x/b", &[("q", "1".to_string())])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));

        assert_eq!(mock.request_count(), 2);
        let requests = mock.requests();
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[1].method, "POST");
        assert_eq!(requests[1].form, vec![("q".to_string(), "1".to_string())]);
    }
}
