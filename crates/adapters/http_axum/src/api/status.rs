//! Diagnostics handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use intentcp_app::ports::{BackendClient, DeviceRegistry};

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /status`
pub async fn overview<R, B>(State(state): State<AppState<R, B>>) -> Json<Value>
where
    R: DeviceRegistry + Send + Sync + 'static,
    B: BackendClient + Send + Sync + 'static,
{
    let stats = state.dispatch.scheduler_stats();
    let devices = state.dispatch.device_count().await;
    Json(json!({
        "ok": true,
        "service": "intentcp-core",
        "scope": "status",
        "devices": devices,
        "scheduler": {
            "scheduled": stats.scheduled,
            "completed": stats.completed,
            "failed": stats.failed,
            "pending": stats.pending(),
        },
    }))
}

/// `GET /status/backend/{target_id}`
///
/// Raw status read against a backend target id, bypassing the registry.
pub async fn backend<R, B>(
    State(state): State<AppState<R, B>>,
    Path(target_id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
    R: DeviceRegistry + Send + Sync + 'static,
    B: BackendClient + Send + Sync + 'static,
{
    let response = state.dispatch.probe_target(&target_id).await?;
    Ok(Json(json!({
        "ok": true,
        "target_id": target_id,
        "backend_response": response,
    })))
}
