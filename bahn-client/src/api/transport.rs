//! HTTP transport seam.
//!
//! The client only ever needs a complete response body, so the transport
//! boundary is two calls returning bytes. [`HttpTransport`] talks to the real
//! services; [`super::MockTransport`] serves canned bodies in tests.

use std::future::Future;
use std::time::Duration;

use reqwest::RequestBuilder;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use super::config::ApiConfig;
use super::error::ApiError;

/// Fetches complete response bodies.
pub trait Transport: Send + Sync {
    /// `GET url` and return the body.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ApiError>> + Send;

    /// `POST url` with a urlencoded form and return the body.
    fn post_form(
        &self,
        url: &str,
        form: &[(&str, String)],
    ) -> impl Future<Output = Result<Vec<u8>, ApiError>> + Send;
}

/// [`Transport`] over a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Build a client with the configured timeout and user agent.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let user_agent =
            HeaderValue::from_str(&config.user_agent).map_err(|_| ApiError::Status {
                status: 0,
                message: "Invalid user agent".to_string(),
            })?;
        headers.insert(USER_AGENT, user_agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http })
    }

    /// Use an existing client as is.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn send(request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        Self::send(self.http.get(url)).await
    }

    async fn post_form(&self, url: &str, form: &[(&str, String)]) -> Result<Vec<u8>, ApiError> {
        Self::send(self.http.post(url).form(form)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_default_config() {
        assert!(HttpTransport::new(&ApiConfig::default()).is_ok());
    }

    #[test]
    fn rejects_unencodable_user_agent() {
        let config = ApiConfig::default().with_user_agent("bad\nagent");
        assert!(matches!(
            HttpTransport::new(&config),
            Err(ApiError::Status { status: 0, .. })
        ));
    }
}
