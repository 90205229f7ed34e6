use axum::{Json, extract::State};
use serde::Serialize;

use crate::app::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HealthReport {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    upload_enabled: Option<bool>,
}

pub(crate) async fn ready(State(state): State<AppState>) -> Json<HealthReport> {
    state.telemetry().record_ready_check();
    Json(HealthReport {
        status: "ready",
        upload_enabled: Some(state.exporter().upload_enabled()),
    })
}

pub(crate) async fn live(State(state): State<AppState>) -> Json<HealthReport> {
    state.telemetry().record_live_check();
    Json(HealthReport {
        status: "live",
        upload_enabled: None,
    })
}
