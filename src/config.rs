//! Configuration loader for the `codemetal-trackerdash` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.
//!
use std::env;

use anyhow::{anyhow, Result};

use crate::reconcile::DEFAULT_STALE_AFTER_SECS;

/// Parse an optional numeric environment variable with a default value.
macro_rules! parse_env {
    ($var_name:expr, $ty:ty, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

pub const DEFAULT_THINGSPEAK_URL: &str = "https://api.thingspeak.com";

/// Largest offline cutoff a `chrono::Duration` can hold in whole seconds.
pub const MAX_STALE_AFTER_SECS: u64 = (i64::MAX / 1000) as u64;

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Telemetry store base URL.
    pub api_url: String,

    /// Channel holding the tracker's feed.
    pub channel_id: String,

    /// Read API key for the channel.
    pub read_key: String,

    /// Write API key, used only for the alarm threshold.
    pub write_key: String,

    /// Live poll period in milliseconds.
    pub poll_interval_ms: u64,

    /// Entries read per live poll.
    pub live_results: u32,

    /// Entries read for the history trail.
    pub history_results: u32,

    /// Newest-entry age (seconds) after which the device is shown offline.
    pub stale_after_secs: u64,

    /// Alarm threshold used until the store provides one.
    pub default_temp_limit: f64,

    /// Port the dashboard listens on.
    pub listen_port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `THINGSPEAK_CHANNEL_ID` – channel id of the tracker feed
/// - `THINGSPEAK_READ_KEY` – read API key
/// - `THINGSPEAK_WRITE_KEY` – write API key
///
/// Optional:
/// - `THINGSPEAK_URL` – store base URL (default: https://api.thingspeak.com)
/// - `POLL_INTERVAL_MS` – live poll period (default: 1000)
/// - `LIVE_RESULTS` – entries per live poll (default: 10)
/// - `HISTORY_RESULTS` – entries for the history trail (default: 50)
/// - `STALE_AFTER_SECS` – offline cutoff (default: 240)
/// - `DEFAULT_TEMP_LIMIT` – initial alarm threshold (default: 30.0)
/// - `LISTEN_PORT` – HTTP port (default: 8080)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let channel_id = require_env!("THINGSPEAK_CHANNEL_ID");
    let read_key = require_env!("THINGSPEAK_READ_KEY");
    let write_key = require_env!("THINGSPEAK_WRITE_KEY");
    let api_url = env::var("THINGSPEAK_URL").unwrap_or_else(|_| DEFAULT_THINGSPEAK_URL.into());
    let poll_interval_ms = parse_env!("POLL_INTERVAL_MS", u64, 1000);
    let live_results = parse_env!("LIVE_RESULTS", u32, 10);
    let history_results = parse_env!("HISTORY_RESULTS", u32, 50);
    let stale_after_secs = parse_env!("STALE_AFTER_SECS", u64, DEFAULT_STALE_AFTER_SECS);
    let default_temp_limit = parse_env!("DEFAULT_TEMP_LIMIT", f64, 30.0);
    let listen_port = parse_env!("LISTEN_PORT", u16, 8080);

    let cfg = Config {
        api_url,
        channel_id,
        read_key,
        write_key,
        poll_interval_ms,
        live_results,
        history_results,
        stale_after_secs,
        default_temp_limit,
        listen_port,
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Keep the first and last two characters of a key, star the rest.
fn mask_key(key: &str) -> String {
    // ---
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}****{}", head, tail)
}

impl Config {
    /// Reject values that parse but cannot drive the dashboard.
    pub fn validate(&self) -> Result<()> {
        // ---
        if self.poll_interval_ms == 0 {
            return Err(anyhow!("POLL_INTERVAL_MS must be greater than zero"));
        }
        if self.live_results == 0 {
            return Err(anyhow!("LIVE_RESULTS must be greater than zero"));
        }
        if self.stale_after_secs > MAX_STALE_AFTER_SECS {
            return Err(anyhow!(
                "STALE_AFTER_SECS must be at most {}",
                MAX_STALE_AFTER_SECS
            ));
        }
        if !self.default_temp_limit.is_finite() {
            return Err(anyhow!("DEFAULT_TEMP_LIMIT must be a finite number"));
        }
        Ok(())
    }

    /// Log the loaded configuration for debugging purposes.
    ///
    /// API keys are masked; everything else is shown as loaded.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  THINGSPEAK_URL        : {}", self.api_url);
        tracing::info!("  THINGSPEAK_CHANNEL_ID : {}", self.channel_id);
        tracing::info!("  THINGSPEAK_READ_KEY   : {}", mask_key(&self.read_key));
        tracing::info!("  THINGSPEAK_WRITE_KEY  : {}", mask_key(&self.write_key));
        tracing::info!("  POLL_INTERVAL_MS      : {}", self.poll_interval_ms);
        tracing::info!("  LIVE_RESULTS          : {}", self.live_results);
        tracing::info!("  HISTORY_RESULTS       : {}", self.history_results);
        tracing::info!("  STALE_AFTER_SECS      : {}", self.stale_after_secs);
        tracing::info!("  DEFAULT_TEMP_LIMIT    : {}", self.default_temp_limit);
        tracing::info!("  LISTEN_PORT           : {}", self.listen_port);
    }
}
