use std::sync::Arc;

use axum::Router;

use crate::Dashboard;

mod api;
mod health;
mod page;

// ---

pub fn router(dashboard: Arc<Dashboard>) -> Router {
    // ---
    Router::new()
        .merge(api::router())
        .merge(page::router())
        .merge(health::router())
        .with_state(dashboard)
}
