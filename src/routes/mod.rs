use std::sync::Arc;

use axum::Router;
use tokio::sync::watch;

use crate::{AcquisitionScheduler, Snapshot};

mod health;
mod telemetry;

// ---

pub fn router(
    snapshots: watch::Receiver<Option<Snapshot>>,
    scheduler: Arc<AcquisitionScheduler>,
) -> Router {
    // ---
    Router::new()
        .merge(telemetry::router())
        .merge(health::router())
        .with_state((snapshots, scheduler))
}
