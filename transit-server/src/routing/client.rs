//! HTTP client for the GraphHopper routing engine.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use crate::domain::LatLng;

use super::error::RoutingError;
use super::types::RouteResponse;

/// Default GraphHopper base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:8989";

/// Default request timeout in seconds. No retries are performed; a timeout
/// is handled exactly like any other transport failure.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Which routing endpoint to use. Fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingMode {
    /// Schedule-aware public-transport routing (`/route-pt`).
    PublicTransport,
    /// Single-profile routing (`/route`), e.g. "foot".
    Profile(String),
}

impl RoutingMode {
    /// Profile string surfaced in composed responses.
    pub fn profile_label(&self) -> &str {
        match self {
            RoutingMode::PublicTransport => "pt",
            RoutingMode::Profile(profile) => profile,
        }
    }
}

/// Configuration for the GraphHopper client.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Base URL of the engine, without a trailing slash.
    pub base_url: String,
    /// Endpoint selection.
    pub mode: RoutingMode,
    /// Locale for instruction text.
    pub locale: String,
    /// Cap on PT solution alternatives requested from the engine.
    pub limit_solutions: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl RoutingConfig {
    /// Create a config with defaults: local engine, PT mode, German locale.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mode: RoutingMode::PublicTransport,
            locale: "de".to_string(),
            limit_solutions: 3,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the routing mode.
    pub fn with_mode(mut self, mode: RoutingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the instruction locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set the PT solution limit.
    pub fn with_limit_solutions(mut self, limit: u32) -> Self {
        self.limit_solutions = limit;
        self
    }

    /// Set the request timeout in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the GraphHopper HTTP API.
pub struct GraphHopperClient {
    config: RoutingConfig,
    http: reqwest::Client,
}

impl GraphHopperClient {
    /// Create a new client from the given config.
    pub fn new(config: RoutingConfig) -> Result<Self, RoutingError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RoutingError::Connection(e.to_string()))?;

        Ok(Self { config, http })
    }

    /// The configured routing mode.
    pub fn mode(&self) -> &RoutingMode {
        &self.config.mode
    }

    /// Request a route between two coordinates, departing now-ish.
    ///
    /// The failure is classified so callers can pattern-match transport
    /// failures (fallback material) apart from empty-but-successful results.
    pub async fn plan(
        &self,
        from: LatLng,
        to: LatLng,
        depart: DateTime<Utc>,
    ) -> Result<RouteResponse, RoutingError> {
        let (url, query) = self.build_request(from, to, depart);
        debug!(%url, mode = ?self.config.mode, "requesting route");

        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| classify_transport_error(e, self.config.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoutingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| RoutingError::Decode(e.to_string()))
    }

    fn build_request(
        &self,
        from: LatLng,
        to: LatLng,
        depart: DateTime<Utc>,
    ) -> (String, Vec<(&'static str, String)>) {
        let from_point = format!("{},{}", from.lat, from.lng);
        let to_point = format!("{},{}", to.lat, to.lng);

        match &self.config.mode {
            RoutingMode::PublicTransport => {
                let url = format!("{}/route-pt", self.config.base_url);
                let query = vec![
                    ("point", from_point),
                    ("point", to_point),
                    (
                        "pt.earliest_departure_time",
                        depart.to_rfc3339_opts(SecondsFormat::Millis, true),
                    ),
                    ("pt.profile", "true".to_string()),
                    ("locale", self.config.locale.clone()),
                    ("instructions", "true".to_string()),
                    ("pt.limit_solutions", self.config.limit_solutions.to_string()),
                ];
                (url, query)
            }
            RoutingMode::Profile(profile) => {
                let url = format!("{}/route", self.config.base_url);
                let query = vec![
                    ("point", from_point),
                    ("point", to_point),
                    ("profile", profile.clone()),
                    ("locale", self.config.locale.clone()),
                    ("instructions", "true".to_string()),
                    ("calc_points", "true".to_string()),
                    ("points_encoded", "false".to_string()),
                ];
                (url, query)
            }
        }
    }
}

fn classify_transport_error(error: reqwest::Error, timeout_secs: u64) -> RoutingError {
    if error.is_timeout() {
        RoutingError::Timeout { timeout_secs }
    } else {
        RoutingError::Connection(error.to_string())
    }
}
