//! Gate configuration, read once at startup and injected through `AppState`.
//!
//! Every knob is a `FARE_*` environment variable with a default, so the gate
//! starts with no environment at all (pointing at placeholder model ids).

use crate::ride::{parse_number, Location, RideDefaults};
use crate::stamp::{parse_offset, TimestampMode, Zone};
use fare_adapter::http::DEFAULT_ENDPOINT;
use fare_adapter::ModelName;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_PROJECT_ID: &str = "<your_project_id>";
pub const DEFAULT_MODEL_NAME: &str = "<your_model_name>";
pub const DEFAULT_MODEL_VERSION: &str = "<your_model_version>";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

fn invalid(var: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        var,
        reason: reason.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct GateConfig {
    pub bind_addr: SocketAddr,
    pub model: ModelName,
    pub endpoint: String,
    pub access_token: Option<String>,
    /// Outbound call timeout; `None` waits indefinitely.
    pub upstream_timeout_ms: Option<u64>,
    /// Whole-request deadline for `/predict_fare`; `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    pub defaults: RideDefaults,
    pub zone: Zone,
    pub timestamp_mode: TimestampMode,
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            model: ModelName::new(
                DEFAULT_PROJECT_ID,
                DEFAULT_MODEL_NAME,
                Some(DEFAULT_MODEL_VERSION.to_string()),
            ),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            access_token: None,
            upstream_timeout_ms: None,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            defaults: RideDefaults::default(),
            zone: Zone::new_york_lmt(),
            timestamp_mode: TimestampMode::default(),
            metrics_addr: None,
        }
    }
}

impl GateConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary variable source; unset and empty both mean
    /// "use the default", except `FARE_MODEL_VERSION` where empty drops the
    /// version segment.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        if let Some(v) = set("FARE_BIND_ADDR") {
            cfg.bind_addr = v.parse::<SocketAddr>().map_err(|e| invalid("FARE_BIND_ADDR", e))?;
        }
        if let Some(v) = set("FARE_PROJECT_ID") {
            cfg.model.project = v;
        }
        if let Some(v) = set("FARE_MODEL_NAME") {
            cfg.model.model = v;
        }
        if let Some(v) = get("FARE_MODEL_VERSION") {
            let v = v.trim();
            cfg.model.version = (!v.is_empty()).then(|| v.to_string());
        }
        if let Some(v) = set("FARE_PREDICT_ENDPOINT") {
            cfg.endpoint = v;
        }
        cfg.access_token = set("FARE_ACCESS_TOKEN");
        if let Some(v) = set("FARE_UPSTREAM_TIMEOUT_MS") {
            let ms = v.parse::<u64>().map_err(|e| invalid("FARE_UPSTREAM_TIMEOUT_MS", e))?;
            cfg.upstream_timeout_ms = (ms > 0).then_some(ms);
        }
        if let Some(v) = set("FARE_REQUEST_TIMEOUT_SECS") {
            let secs = v.parse::<u64>().map_err(|e| invalid("FARE_REQUEST_TIMEOUT_SECS", e))?;
            cfg.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(v) = set("FARE_DEFAULT_LOCATION") {
            cfg.defaults.location = Location::parse("FARE_DEFAULT_LOCATION", &v)
                .map_err(|e| invalid("FARE_DEFAULT_LOCATION", e))?;
        }
        if let Some(v) = set("FARE_DEFAULT_PASSENGERS") {
            cfg.defaults.passenger_count = parse_number("FARE_DEFAULT_PASSENGERS", &v)
                .map_err(|e| invalid("FARE_DEFAULT_PASSENGERS", e))?;
        }
        if let Some(v) = set("FARE_TZ_NAME") {
            cfg.zone.name = v;
        }
        if let Some(v) = set("FARE_TZ_OFFSET") {
            cfg.zone.offset = parse_offset(&v).map_err(|e| invalid("FARE_TZ_OFFSET", e))?;
        }
        if let Some(v) = set("FARE_TIMESTAMP_MODE") {
            cfg.timestamp_mode = v.parse::<TimestampMode>().map_err(|e| invalid("FARE_TIMESTAMP_MODE", e))?;
        }
        if let Some(v) = set("FARE_METRICS_ADDR") {
            cfg.metrics_addr = Some(v.parse::<SocketAddr>().map_err(|e| invalid("FARE_METRICS_ADDR", e))?);
        }
        Ok(cfg)
    }
}
