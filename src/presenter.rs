//! Presenter: turns reconciled snapshots into the dashboard view.
//!
//! [`DashboardView`] is everything the page (and its map widget) renders.
//! It is mutated in place so that a failed poll or an empty history leaves
//! the last good values on screen.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::history::Trail;
use crate::models::LatLng;
use crate::reconcile::{DeviceState, Snapshot, Warning};

// ---

/// Speed (km/h) above which the device counts as moving.
pub const MOVING_SPEED: f64 = 2.0;

pub const NO_HISTORY_NOTICE: &str = "No historical location data available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Live,
    History,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    // ---
    pub mode: ViewMode,
    pub marker: Option<LatLng>,
    pub center: Option<LatLng>,
    pub temperature: String,
    pub humidity: String,
    pub movement: String,
    pub presence: String,
    pub state: Option<DeviceState>,
    /// Banner text, `None` when hidden.
    pub banner: Option<String>,
    pub threshold: f64,
    pub history: Option<Trail>,
    /// One-shot message for the operator, e.g. an empty history.
    pub notice: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DashboardView {
    // ---
    pub fn new(threshold: f64) -> Self {
        // ---
        Self {
            mode: ViewMode::Live,
            marker: None,
            center: None,
            temperature: "N/A".to_string(),
            humidity: "N/A".to_string(),
            movement: movement_label(None).to_string(),
            presence: String::new(),
            state: None,
            banner: None,
            threshold,
            history: None,
            notice: None,
            updated_at: None,
        }
    }

    /// Render a reconciled snapshot.
    pub fn apply(&mut self, snapshot: &Snapshot, now: DateTime<Utc>) {
        // ---
        if let Some(location) = snapshot.location {
            self.marker = Some(location);
            self.center = Some(location);
        }

        self.temperature = format_reading(snapshot.temperature);
        self.humidity = format_reading(snapshot.humidity);
        self.movement = movement_label(snapshot.speed).to_string();
        self.presence = presence_label(snapshot.state, snapshot.last_seen);
        self.state = Some(snapshot.state);
        self.banner = banner(&snapshot.warnings);
        self.updated_at = Some(now);
    }

    /// Show the generic fetch warning and keep every other value.
    pub fn apply_fetch_error(&mut self) {
        self.banner = Some(Warning::FetchFailed.to_string());
    }

    pub fn show_history(&mut self, trail: Trail) {
        // ---
        self.mode = ViewMode::History;
        self.history = Some(trail);
        self.notice = None;
    }

    /// History mode without a trail; the map is left untouched.
    pub fn show_history_notice(&mut self, notice: String) {
        // ---
        self.mode = ViewMode::History;
        self.history = None;
        self.notice = Some(notice);
    }

    pub fn show_live(&mut self) {
        // ---
        self.mode = ViewMode::Live;
        self.history = None;
        self.notice = None;
    }
}

/// One decimal, or "N/A" for a missing reading.
pub fn format_reading(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.1}", v))
}

pub fn movement_label(speed: Option<f64>) -> &'static str {
    // ---
    if speed.is_some_and(|s| s > MOVING_SPEED) {
        "Device is moving"
    } else {
        "Device is stationary"
    }
}

/// Operator-local rendering of a feed timestamp.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn presence_label(state: DeviceState, last_seen: DateTime<Utc>) -> String {
    // ---
    match state {
        DeviceState::Online => "Device is online".to_string(),
        DeviceState::Offline => {
            format!("Device is offline. Last online: {}", format_timestamp(last_seen))
        }
        DeviceState::StaleLocationOnly | DeviceState::AllZeroOffline => {
            format!("Last online: {}", format_timestamp(last_seen))
        }
    }
}

fn banner(warnings: &[Warning]) -> Option<String> {
    // ---
    if warnings.is_empty() {
        return None;
    }
    let text: Vec<String> = warnings.iter().map(Warning::to_string).collect();
    Some(text.join(" "))
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::TimeZone;

    fn seen() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 14, 9, 12, 0).unwrap()
    }

    fn snapshot(state: DeviceState, location: Option<LatLng>, warnings: Vec<Warning>) -> Snapshot {
        // ---
        Snapshot {
            state,
            location,
            temperature: Some(24.47),
            humidity: Some(60.0),
            speed: Some(3.5),
            last_seen: seen(),
            warnings,
        }
    }

    #[test]
    fn test_formatting() {
        // ---
        assert_eq!(format_reading(Some(24.47)), "24.5");
        assert_eq!(format_reading(Some(0.0)), "0.0");
        assert_eq!(format_reading(None), "N/A");

        assert_eq!(movement_label(Some(2.1)), "Device is moving");
        assert_eq!(movement_label(Some(2.0)), "Device is stationary");
        assert_eq!(movement_label(None), "Device is stationary");
    }

    #[test]
    fn test_presence_labels() {
        // ---
        assert_eq!(presence_label(DeviceState::Online, seen()), "Device is online");
        assert_eq!(
            presence_label(DeviceState::Offline, seen()),
            format!("Device is offline. Last online: {}", format_timestamp(seen()))
        );
        assert_eq!(
            presence_label(DeviceState::AllZeroOffline, seen()),
            format!("Last online: {}", format_timestamp(seen()))
        );
    }

    #[test]
    fn test_apply_normal_snapshot() {
        // ---
        let mut view = DashboardView::new(30.0);
        let here = LatLng { lat: 6.93, lng: 79.85 };
        view.apply(&snapshot(DeviceState::Online, Some(here), vec![]), seen());

        assert_eq!(view.marker, Some(here));
        assert_eq!(view.center, Some(here));
        assert_eq!(view.temperature, "24.5");
        assert_eq!(view.humidity, "60.0");
        assert_eq!(view.movement, "Device is moving");
        assert_eq!(view.presence, "Device is online");
        assert_eq!(view.banner, None);
    }

    #[test]
    fn test_snapshot_without_location_keeps_marker() {
        // ---
        let mut view = DashboardView::new(30.0);
        let here = LatLng { lat: 6.93, lng: 79.85 };
        view.apply(&snapshot(DeviceState::Online, Some(here), vec![]), seen());

        let warnings = vec![Warning::LocationUnavailable, Warning::TemperatureExceeded];
        view.apply(&snapshot(DeviceState::StaleLocationOnly, None, warnings), seen());

        assert_eq!(view.marker, Some(here));
        assert_eq!(view.state, Some(DeviceState::StaleLocationOnly));
        assert_eq!(
            view.banner.as_deref(),
            Some(
                "Location fetching unsuccessful. Device might be turned off. \
                 Displaying the last seen location. Temperature exceeds safe limit!"
            )
        );
    }

    #[test]
    fn test_fetch_error_keeps_values() {
        // ---
        let mut view = DashboardView::new(30.0);
        view.apply(&snapshot(DeviceState::Online, None, vec![]), seen());
        view.apply_fetch_error();

        assert_eq!(view.temperature, "24.5");
        assert_eq!(view.presence, "Device is online");
        assert_eq!(
            view.banner.as_deref(),
            Some("Error fetching data. Please try again later.")
        );
    }

    #[test]
    fn test_history_notice_leaves_map() {
        // ---
        let mut view = DashboardView::new(30.0);
        let here = LatLng { lat: 6.93, lng: 79.85 };
        view.apply(&snapshot(DeviceState::Online, Some(here), vec![]), seen());
        view.show_history_notice(NO_HISTORY_NOTICE.to_string());

        assert_eq!(view.mode, ViewMode::History);
        assert_eq!(view.history, None);
        assert_eq!(view.center, Some(here));
        assert_eq!(view.notice.as_deref(), Some(NO_HISTORY_NOTICE));

        view.show_live();
        assert_eq!(view.mode, ViewMode::Live);
        assert_eq!(view.notice, None);
    }

    #[test]
    fn test_lost_fix_keeps_marker_across_ticks() {
        // ---
        use crate::models::FeedEntry;
        use crate::reconcile::reconcile;

        let reading = |minute: u32, lat: f64, lng: f64| FeedEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 14, 9, minute, 0).unwrap(),
            latitude: Some(lat),
            longitude: Some(lng),
            temperature: Some(24.5),
            humidity: Some(61.0),
            speed: Some(0.0),
            threshold: None,
        };
        let stale_after = chrono::Duration::minutes(4);
        let now = Utc.with_ymd_and_hms(2024, 5, 14, 9, 13, 0).unwrap();
        let mut view = DashboardView::new(30.0);

        // Tick 1: newest fix B on top of an older fix A.
        let first = vec![reading(11, 6.93, 79.85), reading(10, 6.92, 79.84)];
        view.apply(&reconcile(&first, now, 30.0, stale_after).unwrap(), now);
        let shown = LatLng { lat: 6.93, lng: 79.85 };
        assert_eq!(view.marker, Some(shown));

        // Tick 2: GPS drops to (0,0) while the sensors keep reporting.
        let second = vec![
            reading(12, 0.0, 0.0),
            reading(11, 6.93, 79.85),
            reading(10, 6.92, 79.84),
        ];
        view.apply(&reconcile(&second, now, 30.0, stale_after).unwrap(), now);

        assert_eq!(view.state, Some(DeviceState::StaleLocationOnly));
        assert_eq!(view.marker, Some(shown));
        assert_eq!(view.center, Some(shown));
        assert_eq!(view.temperature, "24.5");
    }
}
