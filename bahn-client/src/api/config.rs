//! Endpoint configuration.

use tracing::warn;

/// Default base URL for the IRIS timetable service.
pub const DEFAULT_IRIS_BASE_URL: &str = "https://iris.noncd.db.de/iris-tts";

/// Default base URL for the coach sequence service.
pub const DEFAULT_COACH_SEQUENCE_BASE_URL: &str = "https://www.apps-bahn.de/wr/wagenreihung/1.0";

/// Default base URL for the HAFAS journey planner.
pub const DEFAULT_HAFAS_BASE_URL: &str = "https://reiseauskunft.bahn.de/bin";

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the IRIS timetable service (no trailing slash)
    pub iris_base_url: String,
    /// Base URL of the coach sequence service
    pub coach_sequence_base_url: String,
    /// Base URL of the HAFAS journey planner
    pub hafas_base_url: String,
    /// Request timeout in seconds, covering fetch and body read
    pub timeout_secs: u64,
    /// `User-Agent` header sent with every request
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            iris_base_url: DEFAULT_IRIS_BASE_URL.to_string(),
            coach_sequence_base_url: DEFAULT_COACH_SEQUENCE_BASE_URL.to_string(),
            hafas_base_url: DEFAULT_HAFAS_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("bahn-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiConfig {
    /// Defaults, overridden by `BAHN_IRIS_BASE_URL`,
    /// `BAHN_COACH_SEQUENCE_BASE_URL`, `BAHN_HAFAS_BASE_URL` and
    /// `BAHN_TIMEOUT_SECS` where set.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("BAHN_IRIS_BASE_URL") {
            config = config.with_iris_base_url(url);
        }
        if let Some(url) = lookup("BAHN_COACH_SEQUENCE_BASE_URL") {
            config = config.with_coach_sequence_base_url(url);
        }
        if let Some(url) = lookup("BAHN_HAFAS_BASE_URL") {
            config = config.with_hafas_base_url(url);
        }
        if let Some(secs) = lookup("BAHN_TIMEOUT_SECS") {
            match secs.trim().parse() {
                Ok(secs) => config = config.with_timeout(secs),
                Err(_) => warn!(value = %secs, "ignoring invalid BAHN_TIMEOUT_SECS"),
            }
        }
        config
    }

    /// Set the IRIS base URL.
    pub fn with_iris_base_url(mut self, url: impl Into<String>) -> Self {
        self.iris_base_url = trim_slash(url.into());
        self
    }

    /// Set the coach sequence base URL.
    pub fn with_coach_sequence_base_url(mut self, url: impl Into<String>) -> Self {
        self.coach_sequence_base_url = trim_slash(url.into());
        self
    }

    /// Set the HAFAS base URL.
    pub fn with_hafas_base_url(mut self, url: impl Into<String>) -> Self {
        self.hafas_base_url = trim_slash(url.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
