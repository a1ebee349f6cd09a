//! Cache-aside API client.
//!
//! Every query follows the same path: build the cache key, check the tiers
//! fastest first, and either return the first hit (copying it into the
//! faster tiers that missed) or fetch, decode and store into every tier.

use std::future::Future;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::cache::{CacheConfig, CacheTier};
use crate::decode::{
    DecodeError, decode_coach_sequence, decode_hafas_messages, decode_stations,
    decode_suggestions, decode_timetable, decode_wing_definition,
};
use crate::domain::{
    CoachSequence, EvaId, HafasMessage, Station, Suggestion, Timetable, WingDefinition,
};

use super::config::ApiConfig;
use super::error::ApiError;
use super::query::{Query, Request};
use super::transport::{HttpTransport, Transport};

/// Client for the IRIS, coach sequence and HAFAS endpoints.
///
/// Holds no per-call state; share one instance across tasks.
pub struct ApiClient<T = HttpTransport> {
    transport: T,
    config: ApiConfig,
    tiers: Vec<Box<dyn CacheTier>>,
}

impl ApiClient<HttpTransport> {
    /// Create a client over HTTP with the tiers described by `cache`.
    pub fn new(config: ApiConfig, cache: &CacheConfig) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, config).with_tiers(cache.build_tiers()))
    }
}

impl<T: Transport> ApiClient<T> {
    /// Create a client without any cache tiers.
    pub fn with_transport(transport: T, config: ApiConfig) -> Self {
        Self {
            transport,
            config,
            tiers: Vec::new(),
        }
    }

    /// Replace the cache tiers. Order is lookup order, fastest first.
    pub fn with_tiers(mut self, tiers: Vec<Box<dyn CacheTier>>) -> Self {
        self.tiers = tiers;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Station metadata. Usually a single entry.
    pub async fn station(&self, eva_id: EvaId) -> Result<Vec<Station>, ApiError> {
        self.query(Query::station(eva_id), decode_stations).await
    }

    /// Planned timetable for the hour containing `at`.
    pub async fn timetable(
        &self,
        eva_id: EvaId,
        at: NaiveDateTime,
    ) -> Result<Timetable, ApiError> {
        self.query(Query::timetable(eva_id, at), decode_timetable).await
    }

    /// All known changes for the station, as of the minute containing `at`.
    pub async fn realtime_all(
        &self,
        eva_id: EvaId,
        at: NaiveDateTime,
    ) -> Result<Timetable, ApiError> {
        self.query(Query::realtime_all(eva_id, at), decode_timetable).await
    }

    /// Recent changes for the station, as of the minute containing `at`.
    pub async fn realtime_recent(
        &self,
        eva_id: EvaId,
        at: NaiveDateTime,
    ) -> Result<Timetable, ApiError> {
        self.query(Query::realtime_recent(eva_id, at), decode_timetable)
            .await
    }

    /// Where a wing train joins and leaves its parent.
    pub async fn wing_definition(
        &self,
        parent: &str,
        wing: &str,
    ) -> Result<WingDefinition, ApiError> {
        self.query(Query::wing_definition(parent, wing), decode_wing_definition)
            .await
    }

    /// Physical formation of `line` departing at `at`.
    pub async fn coach_sequence(
        &self,
        line: &str,
        at: NaiveDateTime,
    ) -> Result<CoachSequence, ApiError> {
        self.query(Query::coach_sequence(line, at), decode_coach_sequence)
            .await
    }

    /// Journeys matching a train name on `date`.
    pub async fn suggestions(
        &self,
        line: &str,
        date: NaiveDate,
    ) -> Result<Vec<Suggestion>, ApiError> {
        self.query(Query::suggestions(line, date), decode_suggestions).await
    }

    /// Disruption messages for a journey, by its HAFAS train link.
    pub async fn hafas_messages(&self, train_link: &str) -> Result<Vec<HafasMessage>, ApiError> {
        self.query(Query::hafas_messages(train_link), decode_hafas_messages)
            .await
    }

    async fn query<V>(
        &self,
        query: Query,
        decode: fn(&[u8]) -> Result<V, DecodeError>,
    ) -> Result<V, ApiError>
    where
        V: Serialize + DeserializeOwned,
    {
        let key = query.cache_key();
        let load = async {
            let body = self.fetch(&query).await?;
            Ok::<V, ApiError>(decode(&body)?)
        };
        self.cached(&key, load).await
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<u8>, ApiError> {
        let request = query.request(&self.config);
        info!(query = query.name(), url = request.url(), "loading");
        match &request {
            Request::Get { url } => self.transport.get(url).await,
            Request::PostForm { url, form } => self.transport.post_form(url, form).await,
        }
    }

    /// Return the cached value for `key`, or await `load` and cache its result.
    ///
    /// `load` is only polled when every tier misses. A tier error or an entry
    /// that no longer deserializes counts as a miss for that tier. Load errors
    /// are returned as is and leave the tiers untouched.
    pub async fn cached<V, F>(&self, key: &str, load: F) -> Result<V, ApiError>
    where
        V: Serialize + DeserializeOwned,
        F: Future<Output = Result<V, ApiError>>,
    {
        for (index, tier) in self.tiers.iter().enumerate() {
            let bytes = match tier.get(key).await {
                Ok(Some(bytes)) => bytes,
                Ok(None) => continue,
                Err(e) => {
                    debug!(tier = tier.name(), key, error = %e, "cache lookup failed");
                    continue;
                }
            };

            match serde_json::from_slice::<V>(&bytes) {
                Ok(value) => {
                    debug!(tier = tier.name(), key, "cache hit");
                    for faster in &self.tiers[..index] {
                        debug!(tier = faster.name(), key, "promoting cache entry");
                        store(faster.as_ref(), key, bytes.clone()).await;
                    }
                    return Ok(value);
                }
                Err(e) => {
                    debug!(tier = tier.name(), key, error = %e, "ignoring unreadable cache entry");
                }
            }
        }

        let value = load.await?;
        match serde_json::to_vec(&value) {
            Ok(bytes) => {
                for tier in &self.tiers {
                    store(tier.as_ref(), key, bytes.clone()).await;
                }
                debug!(key, tiers = self.tiers.len(), "cache filled");
            }
            Err(e) => warn!(key, error = %e, "value not cacheable"),
        }
        Ok(value)
    }
}

async fn store(tier: &dyn CacheTier, key: &str, bytes: Vec<u8>) {
    if let Err(e) = tier.set(key, bytes).await {
        debug!(tier = tier.name(), key, error = %e, "cache store failed");
    }
}
