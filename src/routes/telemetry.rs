//! Read-only telemetry endpoints for the presentation layer.
//!
//! The pipeline publishes immutable snapshots through a watch channel;
//! these handlers only ever clone the latest published value, so a
//! presentation client can never observe half-updated state. Until the
//! first cycle of a session completes there is nothing to serve and the
//! snapshot endpoints answer 503.

use std::sync::Arc;

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::{AcquisitionScheduler, Snapshot};

// ---

type AppState = (watch::Receiver<Option<Snapshot>>, Arc<AcquisitionScheduler>);

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/telemetry/snapshot", get(snapshot))
        .route("/telemetry/assessment", get(assessment))
        .route("/telemetry/status", get(status))
}

/// Handle `GET /telemetry/snapshot`: the full latest published state.
async fn snapshot(State((snapshots, _)): State<AppState>) -> impl IntoResponse {
    // ---
    debug!("GET /telemetry/snapshot");

    match snapshots.borrow().clone() {
        Some(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json("No snapshot published yet"),
        )
            .into_response(),
    }
}

/// Handle `GET /telemetry/assessment`: just the latest risk classification.
async fn assessment(State((snapshots, _)): State<AppState>) -> impl IntoResponse {
    // ---
    debug!("GET /telemetry/assessment");

    let assessment = snapshots.borrow().as_ref().map(|s| s.assessment);
    match assessment {
        Some(assessment) => (StatusCode::OK, Json(assessment)).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json("No assessment published yet"),
        )
            .into_response(),
    }
}

/// JSON response body for the `/telemetry/status` endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    running: bool,
    cycles_completed: u64,
}

/// Handle `GET /telemetry/status`: scheduler liveness, independent of
/// whether a snapshot has been published yet.
async fn status(State((_, scheduler)): State<AppState>) -> Json<StatusResponse> {
    // ---
    debug!("GET /telemetry/status");

    Json(StatusResponse {
        running: scheduler.is_running(),
        cycles_completed: scheduler.cycles_completed(),
    })
}
