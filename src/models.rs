//! Data models for the tracker telemetry feed.
//!
//! The remote store speaks in loosely typed `field1..field6` strings. This
//! module owns the wire shape ([`RawFeedEntry`]) and its normalized form
//! ([`FeedEntry`]) where every numeric field is `Some` only when it held a
//! finite number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ---

/// Response body of `GET /channels/{id}/feeds.json`.
#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    // ---
    #[serde(default)]
    pub feeds: Vec<RawFeedEntry>,
}

/// One feed entry exactly as the remote store returns it.
///
/// Field mapping: 1 latitude, 2 longitude, 3 temperature, 4 humidity,
/// 5 speed, 6 alarm threshold.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFeedEntry {
    // ---
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub entry_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub field1: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub field2: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub field3: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub field4: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub field5: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub field6: Option<String>,
}

/// Accept strings, bare numbers or null for a `fieldN` value.
fn lenient_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Parse a raw field into a finite number; anything else is invalid.
pub fn parse_reading(raw: Option<&str>) -> Option<f64> {
    // ---
    raw.map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// A geographic position as handed to the map widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Normalized feed entry. `None` means absent or non-numeric.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    // ---
    pub timestamp: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub speed: Option<f64>,
    pub threshold: Option<f64>,
}

impl RawFeedEntry {
    // ---
    pub fn to_entry(&self) -> FeedEntry {
        // ---
        FeedEntry {
            timestamp: self.created_at,
            latitude: parse_reading(self.field1.as_deref()),
            longitude: parse_reading(self.field2.as_deref()),
            temperature: parse_reading(self.field3.as_deref()),
            humidity: parse_reading(self.field4.as_deref()),
            speed: parse_reading(self.field5.as_deref()),
            threshold: parse_reading(self.field6.as_deref()),
        }
    }
}

impl FeedEntry {
    // ---
    /// Location when both coordinates are valid and not exactly (0,0).
    pub fn location(&self) -> Option<LatLng> {
        // ---
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat != 0.0 || lng != 0.0 => Some(LatLng { lat, lng }),
            _ => None,
        }
    }

    /// True when both coordinates are valid and exactly zero, the device's
    /// placeholder for "no GPS fix".
    pub fn has_zero_location(&self) -> bool {
        self.latitude == Some(0.0) && self.longitude == Some(0.0)
    }

    /// True when every telemetry field parsed and equals zero.
    ///
    /// An invalid field does not count as zero; the threshold field is not
    /// telemetry and is ignored.
    pub fn is_all_zero(&self) -> bool {
        // ---
        [
            self.latitude,
            self.longitude,
            self.temperature,
            self.humidity,
            self.speed,
        ]
        .iter()
        .all(|v| *v == Some(0.0))
    }
}

/// Valid and non-zero, the test applied to every scalar fallback.
pub fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}
