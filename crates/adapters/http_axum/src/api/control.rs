//! Unified action, sequence and preset handlers.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use intentcp_app::ports::{BackendClient, DeviceRegistry};
use intentcp_domain::action::ActionRequest;

use super::{ActionResponse, PresetResponse, SequenceResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters of the single-action endpoint.
///
/// Kept as text so that bad values are reported as validation errors.
#[derive(Debug, Default, Deserialize)]
pub struct ActionQuery {
    pub delay: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SequenceQuery {
    pub actions: Option<String>,
}

/// `GET|POST /tuya/{device}/{action}`
pub async fn action<R, B>(
    State(state): State<AppState<R, B>>,
    Path((device, action)): Path<(String, String)>,
    query: Result<Query<ActionQuery>, QueryRejection>,
) -> Result<ActionResponse, ApiError>
where
    R: DeviceRegistry + Send + Sync + 'static,
    B: BackendClient + Send + Sync + 'static,
{
    let Query(query) = query?;
    let request = ActionRequest::parse(
        &device,
        &action,
        query.value.as_deref(),
        query.delay.as_deref(),
    )?;
    let dispatched = state.dispatch.dispatch_single(request).await?;
    Ok(dispatched.into())
}

/// `GET|POST /tuya/sequence?actions=...`
pub async fn sequence<R, B>(
    State(state): State<AppState<R, B>>,
    query: Result<Query<SequenceQuery>, QueryRejection>,
) -> Result<SequenceResponse, ApiError>
where
    R: DeviceRegistry + Send + Sync + 'static,
    B: BackendClient + Send + Sync + 'static,
{
    let Query(query) = query?;
    let ack = state
        .dispatch
        .dispatch_sequence(query.actions.as_deref().unwrap_or_default())?;
    Ok(SequenceResponse::Scheduled(ack))
}

/// `GET|POST /tuya/sequence/{preset}`
pub async fn preset<R, B>(
    State(state): State<AppState<R, B>>,
    Path(preset): Path<String>,
) -> Result<PresetResponse, ApiError>
where
    R: DeviceRegistry + Send + Sync + 'static,
    B: BackendClient + Send + Sync + 'static,
{
    let report = state.dispatch.run_preset(&preset).await?;
    Ok(PresetResponse::Ok(report))
}
