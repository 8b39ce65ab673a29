//! `codemetal-trackerdash`: live telemetry dashboard for a single tracked
//! device.
//!
//! The crate polls a hosted telemetry store, reconciles each batch of feed
//! entries into a displayable snapshot (disambiguating zero readings from
//! "device off" placeholders), and serves the resulting view to a browser
//! page that draws it on a map.
//!
//! Module layout follows the Explicit Module Boundary Pattern (EMBP): sibling
//! modules reach each other only through the re-exports below.

pub mod config;
pub mod dashboard;
pub mod history;
pub mod models;
pub mod presenter;
pub mod reconcile;
pub mod routes;
pub mod thingspeak;

pub use config::Config;
pub use dashboard::{Dashboard, Settings};
pub use models::{FeedEntry, LatLng, RawFeedEntry};
pub use presenter::{DashboardView, ViewMode};
pub use reconcile::{reconcile, DeviceState, Snapshot, Warning};
pub use thingspeak::ThingSpeakClient;
