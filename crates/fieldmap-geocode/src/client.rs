//! HTTP client for a Nominatim-compatible forward-geocoding endpoint.
//!
//! `GET {base}?q=<text>&format=json&limit=1[&countrycodes=<iso>]` returning a
//! JSON array of matches. The first match wins; an empty array means "no
//! match".

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};

use fieldmap_core::{AppConfig, Coordinate};

use crate::error::GeocodeError;
use crate::retry::RetryPolicy;
use crate::types::GeocodeMatch;

/// Forward geocoding as seen by the search orchestrator.
///
/// Implementations must absorb every failure: `None` covers both "no match"
/// and "provider unavailable".
pub trait Geocoder: Send + Sync + 'static {
    /// Resolves free text to a position, optionally biased to an ISO
    /// 3166-1 alpha-2 country code.
    fn geocode(
        &self,
        query: &str,
        country_code: Option<&str>,
    ) -> impl Future<Output = Option<Coordinate>> + Send;
}

/// Client for the forward-geocoding provider.
///
/// Use [`GeocodingClient::new`] with the provider's search URL, or
/// [`GeocodingClient::from_config`] to read it from [`AppConfig`]. Tests point
/// the base URL at a wiremock server.
pub struct GeocodingClient {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl GeocodingClient {
    /// Creates a client for the provider at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| GeocodeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            retry: RetryPolicy::new(max_retries, backoff_base_ms),
        })
    }

    /// Creates a client from the `FIELDMAP_GEOCODER_*` settings.
    ///
    /// # Errors
    ///
    /// Same as [`GeocodingClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, GeocodeError> {
        Self::new(
            &config.geocoder_url,
            config.geocoder_timeout_secs,
            &config.geocoder_user_agent,
            config.geocoder_max_retries,
            config.geocoder_retry_backoff_ms,
        )
    }

    /// Looks up `query` and returns the first match's position.
    ///
    /// Transient failures are retried per the configured policy.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure or non-2xx status.
    /// - [`GeocodeError::Deserialize`] if the body is not a JSON array of matches.
    /// - [`GeocodeError::InvalidCoordinate`] if the first match is out of range.
    pub async fn lookup(
        &self,
        query: &str,
        country_code: Option<&str>,
    ) -> Result<Option<Coordinate>, GeocodeError> {
        let url = self.build_url(query, country_code);
        let matches = self
            .retry
            .run(query, || self.request_matches(&url))
            .await?;

        let Some(first) = matches.first() else {
            return Ok(None);
        };
        let coordinate = first.coordinate()?;
        tracing::debug!(
            query,
            %coordinate,
            display_name = first.display_name.as_deref().unwrap_or(""),
            "geocoded query"
        );
        Ok(Some(coordinate))
    }

    fn build_url(&self, query: &str, country_code: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            pairs.append_pair("format", "json");
            pairs.append_pair("limit", "1");
            if let Some(code) = country_code {
                pairs.append_pair("countrycodes", code);
            }
        }
        url
    }

    async fn request_matches(&self, url: &Url) -> Result<Vec<GeocodeMatch>, GeocodeError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

impl Geocoder for GeocodingClient {
    async fn geocode(&self, query: &str, country_code: Option<&str>) -> Option<Coordinate> {
        match self.lookup(query, country_code).await {
            Ok(Some(coordinate)) => Some(coordinate),
            Ok(None) => {
                tracing::debug!(query, "no geocoding match");
                None
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "geocoding failed, treating as no match");
                None
            }
        }
    }
}
