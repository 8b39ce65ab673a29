//! Reconciliation of a telemetry batch into a displayable snapshot.
//!
//! The tracker reports zero for every field when it is powered down and
//! (0,0) for the location when it has no GPS fix, so a zero is either a real
//! reading or a placeholder. [`reconcile`] decides which, heuristically, from
//! the shape of the most recent window of entries.

use std::fmt;

use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::{nonzero, FeedEntry, LatLng};

// ---

/// Age of the newest entry beyond which a normal device counts as offline.
pub const DEFAULT_STALE_AFTER_SECS: u64 = 4 * 60;

/// Device classification derived from one batch.
///
/// `Online` and `Offline` are the two outcomes of the normal branch; the
/// other two are the degraded cases of the zero heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceState {
    Online,
    Offline,
    StaleLocationOnly,
    AllZeroOffline,
}

/// Operator-facing warnings, rendered in the banner in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    LocationUnavailable,
    DeviceOff,
    TemperatureExceeded,
    FetchFailed,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Warning::LocationUnavailable => {
                "Location fetching unsuccessful. Device might be turned off. \
                 Displaying the last seen location."
            }
            Warning::DeviceOff => "Device is turned off. Displaying last known data.",
            Warning::TemperatureExceeded => "Temperature exceeds safe limit!",
            Warning::FetchFailed => "Error fetching data. Please try again later.",
        };
        f.write_str(text)
    }
}

/// The reconciled, displayable state of one poll tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    // ---
    pub state: DeviceState,
    /// Position to show, `None` keeps whatever the map already shows.
    pub location: Option<LatLng>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub speed: Option<f64>,
    /// Newest timestamp for the normal branch, oldest in the window otherwise.
    pub last_seen: DateTime<Utc>,
    pub warnings: Vec<Warning>,
}

/// First valid, non-zero value per field, scanning oldest to newest.
#[derive(Debug, Default)]
struct Fallbacks {
    location: Option<LatLng>,
    temperature: Option<f64>,
    humidity: Option<f64>,
    speed: Option<f64>,
}

impl Fallbacks {
    fn scan<'a>(oldest_first: impl Iterator<Item = &'a FeedEntry>) -> Self {
        // ---
        let mut found = Fallbacks::default();
        for entry in oldest_first {
            found.location = found.location.or(entry.location());
            found.temperature = found.temperature.or(nonzero(entry.temperature));
            found.humidity = found.humidity.or(nonzero(entry.humidity));
            found.speed = found.speed.or(nonzero(entry.speed));
        }
        found
    }
}

/// Reconcile a batch of entries, ordered newest first, into a snapshot.
///
/// `threshold` is the temperature alarm limit; `stale_after` is how old the
/// newest entry may be before a normal device is reported offline.
pub fn reconcile(
    entries: &[FeedEntry],
    now: DateTime<Utc>,
    threshold: f64,
    stale_after: Duration,
) -> Result<Snapshot> {
    // ---
    let (Some(newest), Some(oldest)) = (entries.first(), entries.last()) else {
        bail!("telemetry feed returned no entries");
    };

    let fallbacks = Fallbacks::scan(entries.iter().rev());
    let window_all_zero = entries.iter().all(FeedEntry::is_all_zero);

    // A fresh fix always wins over the window fallback.
    let location = newest.location().or(fallbacks.location);

    let sensors_alive =
        nonzero(newest.temperature).is_some() && nonzero(newest.humidity).is_some();

    let mut warnings = Vec::new();
    let snapshot = if newest.has_zero_location() && sensors_alive {
        warnings.push(Warning::LocationUnavailable);
        // No location: the map keeps the position it already shows.
        Snapshot {
            state: DeviceState::StaleLocationOnly,
            location: None,
            temperature: newest.temperature,
            humidity: newest.humidity,
            speed: newest.speed,
            last_seen: oldest.timestamp,
            warnings,
        }
    } else if window_all_zero {
        warnings.push(Warning::DeviceOff);
        Snapshot {
            state: DeviceState::AllZeroOffline,
            location,
            temperature: fallbacks.temperature,
            humidity: fallbacks.humidity,
            speed: fallbacks.speed,
            last_seen: oldest.timestamp,
            warnings,
        }
    } else {
        let age = now.signed_duration_since(newest.timestamp);
        let state = if age <= stale_after {
            DeviceState::Online
        } else {
            DeviceState::Offline
        };
        Snapshot {
            state,
            location,
            temperature: newest.temperature,
            humidity: newest.humidity,
            speed: newest.speed,
            last_seen: newest.timestamp,
            warnings,
        }
    };

    Ok(with_temperature_alarm(snapshot, newest.temperature, threshold))
}

/// Append the high-temperature warning whatever branch produced `snapshot`.
fn with_temperature_alarm(mut snapshot: Snapshot, newest: Option<f64>, threshold: f64) -> Snapshot {
    // ---
    if newest.is_some_and(|t| t > threshold) {
        snapshot.warnings.push(Warning::TemperatureExceeded);
    }
    snapshot
}
