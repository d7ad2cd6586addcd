// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP control surface.
//!
//! Two thin endpoints delegating straight to the engine:
//!   `GET /rescan`          — run reconciliation synchronously
//!   `GET /trigger/{name}`  — reschedule a task's job to fire now
//!
//! An unknown task name on trigger is a normal caller mistake, answered
//! with 404 and not logged as an error.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tasse_core::{JobId, SystemClock};
use tasse_engine::{Scheduler, SchedulerError, TaskRegistry};

/// Shared handles for the request handlers.
#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<Scheduler<SystemClock>>,
    pub registry: Arc<TaskRegistry<SystemClock>>,
}

/// Build the control router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/rescan", get(rescan))
        .route("/trigger/:name", get(trigger))
        .with_state(state)
}

/// Synchronously reconcile; always ok once the pass completes (task-level
/// failures never escape the scanner).
pub async fn rescan(State(state): State<AppState>) -> Json<Value> {
    let summary = state.registry.reconcile().await;
    tracing::debug!(?summary, "rescan requested via api");
    Json(json!({"status": "ok"}))
}

/// Force the named task's next firing to now.
pub async fn trigger(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> (StatusCode, Json<Value>) {
    let id = JobId::for_task(&name);
    match state.scheduler.fire_now(&id) {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "ok"}))),
        Err(SchedulerError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, Json(json!({"status": "not found"})))
        }
        Err(e) => {
            tracing::error!(task = %name, error = %e, "force-trigger failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error"})),
            )
        }
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
