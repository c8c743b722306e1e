//! Runtime configuration
//!
//! Read from environment variables (a `.env` file is loaded first when
//! present). Every setting has a default suitable for local development.

use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "LANDING_BIND_ADDR";
pub const DELIVERY_URL_VAR: &str = "LANDING_DELIVERY_URL";
pub const DELIVERY_TO_VAR: &str = "LANDING_DELIVERY_TO";
pub const DELIVERY_SUBJECT_VAR: &str = "LANDING_DELIVERY_SUBJECT";
pub const DELIVERY_TIMEOUT_VAR: &str = "LANDING_DELIVERY_TIMEOUT_SECS";
pub const SESSION_IDLE_VAR: &str = "LANDING_SESSION_IDLE_SECS";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_DELIVERY_URL: &str = "http://127.0.0.1:3001/api/send-email";
const DEFAULT_DELIVERY_TO: &str = "sales@opsdeck.io";
const DEFAULT_DELIVERY_SUBJECT: &str = "New order request";
const DEFAULT_DELIVERY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SESSION_IDLE_SECS: u64 = 1800;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub delivery: DeliveryConfig,
    /// Sessions without a request for this long are evicted
    pub session_idle: Duration,
}

/// Where and how checkout submissions are sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryConfig {
    pub url: String,
    /// Fixed destination address placed in every envelope
    pub to: String,
    pub subject: String,
    pub timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind_raw = read(BIND_ADDR_VAR, DEFAULT_BIND_ADDR);
        let bind_addr: SocketAddr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            key: BIND_ADDR_VAR,
            value: bind_raw.clone(),
        })?;

        let positive_secs = |key: &'static str, default: u64| {
            let raw = read(key, &default.to_string());
            raw.parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid { key, value: raw })
        };
        let timeout = positive_secs(DELIVERY_TIMEOUT_VAR, DEFAULT_DELIVERY_TIMEOUT_SECS)?;
        let session_idle = positive_secs(SESSION_IDLE_VAR, DEFAULT_SESSION_IDLE_SECS)?;

        Ok(Self {
            bind_addr,
            delivery: DeliveryConfig {
                url: read(DELIVERY_URL_VAR, DEFAULT_DELIVERY_URL),
                to: read(DELIVERY_TO_VAR, DEFAULT_DELIVERY_TO),
                subject: read(DELIVERY_SUBJECT_VAR, DEFAULT_DELIVERY_SUBJECT),
                timeout,
            },
            session_idle,
        })
    }
}
