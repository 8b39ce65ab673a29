//! Dashboard runtime: the live poll task, the history toggle and the
//! threshold command, all driving one shared [`DashboardView`].
//!
//! Only one writer touches the view at a time (`RwLock`); overlapping slow
//! responses are not coordinated, the last one to land wins.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::history::Trail;
use crate::presenter::{DashboardView, ViewMode, NO_HISTORY_NOTICE};
use crate::reconcile::reconcile;
use crate::thingspeak::ThingSpeakClient;
use crate::Config;

// ---

/// Polling and sizing knobs, split out of [`Config`] so tests can build a
/// dashboard without touching the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub poll_interval: Duration,
    pub live_results: u32,
    pub history_results: u32,
    pub stale_after: chrono::Duration,
    pub default_temp_limit: f64,
}

impl From<&Config> for Settings {
    fn from(cfg: &Config) -> Self {
        // ---
        Settings {
            poll_interval: Duration::from_millis(cfg.poll_interval_ms),
            live_results: cfg.live_results,
            history_results: cfg.history_results,
            stale_after: chrono::Duration::seconds(cfg.stale_after_secs as i64),
            default_temp_limit: cfg.default_temp_limit,
        }
    }
}

pub struct Dashboard {
    // ---
    client: ThingSpeakClient,
    settings: Settings,
    view: RwLock<DashboardView>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl Dashboard {
    // ---
    pub fn new(client: ThingSpeakClient, settings: Settings) -> Arc<Self> {
        // ---
        let view = DashboardView::new(settings.default_temp_limit);
        Arc::new(Self {
            client,
            settings,
            view: RwLock::new(view),
            poller: Mutex::new(None),
        })
    }

    /// Current view, cloned for serialization.
    pub async fn view(&self) -> DashboardView {
        self.view.read().await.clone()
    }

    pub async fn threshold(&self) -> f64 {
        self.view.read().await.threshold
    }

    /// Pick up the threshold mirrored in the store. Failure keeps the default.
    pub async fn load_threshold(&self) {
        // ---
        match self.client.fetch_threshold().await {
            Ok(Some(limit)) => {
                info!("Temperature limit loaded from store: {}", limit);
                self.view.write().await.threshold = limit;
            }
            Ok(None) => {
                warn!("Temperature limit not found in the feed, using default value");
            }
            Err(e) => {
                error!("Error fetching temperature limit: {:#}", e);
            }
        }
    }

    /// One live tick: fetch, reconcile, present.
    ///
    /// Any failure shows the generic fetch warning and leaves the rest of
    /// the view as it was.
    pub async fn poll_once(&self) {
        // ---
        let threshold = self.threshold().await;
        let result = self
            .client
            .fetch_latest(self.settings.live_results)
            .await
            .and_then(|entries| {
                reconcile(&entries, Utc::now(), threshold, self.settings.stale_after)
            });

        let mut view = self.view.write().await;
        match result {
            Ok(snapshot) => {
                debug!(
                    "Reconciled snapshot: state={:?} warnings={}",
                    snapshot.state,
                    snapshot.warnings.len()
                );
                view.apply(&snapshot, Utc::now());
            }
            Err(e) => {
                error!("Error fetching data: {:#}", e);
                view.apply_fetch_error();
            }
        }
    }

    /// Spawn the live poll task; the first tick fires immediately.
    pub async fn start_polling(self: &Arc<Self>) {
        // ---
        let mut poller = self.poller.lock().await;
        if poller.is_some() {
            return;
        }

        let dashboard = Arc::clone(self);
        let period = self.settings.poll_interval;
        *poller = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                dashboard.poll_once().await;
            }
        }));
        info!("Live polling started every {:?}", period);
    }

    pub async fn stop_polling(&self) {
        // ---
        if let Some(handle) = self.poller.lock().await.take() {
            handle.abort();
            info!("Live polling stopped");
        }
    }

    pub async fn is_polling(&self) -> bool {
        self.poller.lock().await.is_some()
    }

    /// Switch between the live view and the one-shot history view.
    pub async fn toggle_view(self: &Arc<Self>) -> DashboardView {
        // ---
        let mode = self.view.read().await.mode;
        match mode {
            ViewMode::Live => {
                self.stop_polling().await;
                self.show_history().await;
            }
            ViewMode::History => {
                self.view.write().await.show_live();
                self.start_polling().await;
            }
        }
        self.view().await
    }

    /// Fetch the recent trail and hand it to the view.
    pub async fn show_history(&self) {
        // ---
        let result = self.client.fetch_latest(self.settings.history_results).await;

        let mut view = self.view.write().await;
        match result {
            Ok(entries) => match Trail::from_entries(&entries) {
                Some(trail) => {
                    info!("Showing history trail of {} points", trail.points.len());
                    view.show_history(trail);
                }
                None => {
                    info!("No historical location data in {} entries", entries.len());
                    view.show_history_notice(NO_HISTORY_NOTICE.to_string());
                }
            },
            Err(e) => {
                error!("Error fetching historical data: {:#}", e);
                view.show_history_notice(format!("Error fetching historical data: {}", e));
            }
        }
    }

    /// Operator command: set the alarm threshold and mirror it to the store.
    ///
    /// The local value changes before the write; a failed write is reported
    /// but not rolled back.
    pub async fn set_threshold(&self, value: f64) -> Result<f64> {
        // ---
        if !value.is_finite() {
            return Err(anyhow!("temperature limit must be a finite number"));
        }

        self.view.write().await.threshold = value;

        let entry_id = self.client.write_threshold(value).await.map_err(|e| {
            error!("Error updating temperature limit: {:#}", e);
            e
        })?;
        info!("Temperature limit updated to {} (entry {})", value, entry_id);
        Ok(value)
    }
}
