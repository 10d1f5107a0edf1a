//! Per-device legacy handlers.
//!
//! Same resolution as the unified endpoint, but immediate only, and an
//! unknown device is a 404 instead of a skipped outcome, even when the
//! request is otherwise invalid.

use axum::extract::{Path, State};

use intentcp_app::ports::{BackendClient, DeviceRegistry};
use intentcp_domain::action::{Action, parse_brightness};

use super::ActionResponse;
use crate::error::ApiError;
use crate::state::AppState;

async fn run<R, B>(
    state: &AppState<R, B>,
    device: &str,
    action: Action,
) -> Result<ActionResponse, ApiError>
where
    R: DeviceRegistry + Send + Sync + 'static,
    B: BackendClient + Send + Sync + 'static,
{
    let outcome = state.dispatch.execute_strict(device, &action).await?;
    Ok(ActionResponse::Completed(outcome))
}

/// `GET|POST /tuya/devices/{device}/on`
pub async fn on<R, B>(
    State(state): State<AppState<R, B>>,
    Path(device): Path<String>,
) -> Result<ActionResponse, ApiError>
where
    R: DeviceRegistry + Send + Sync + 'static,
    B: BackendClient + Send + Sync + 'static,
{
    run(&state, &device, Action::On).await
}

/// `GET|POST /tuya/devices/{device}/off`
pub async fn off<R, B>(
    State(state): State<AppState<R, B>>,
    Path(device): Path<String>,
) -> Result<ActionResponse, ApiError>
where
    R: DeviceRegistry + Send + Sync + 'static,
    B: BackendClient + Send + Sync + 'static,
{
    run(&state, &device, Action::Off).await
}

/// `GET|POST /tuya/devices/{device}/status`
pub async fn status<R, B>(
    State(state): State<AppState<R, B>>,
    Path(device): Path<String>,
) -> Result<ActionResponse, ApiError>
where
    R: DeviceRegistry + Send + Sync + 'static,
    B: BackendClient + Send + Sync + 'static,
{
    run(&state, &device, Action::Status).await
}

/// `GET|POST /tuya/devices/{device}/brightness/{value}`
pub async fn brightness<R, B>(
    State(state): State<AppState<R, B>>,
    Path((device, value)): Path<(String, String)>,
) -> Result<ActionResponse, ApiError>
where
    R: DeviceRegistry + Send + Sync + 'static,
    B: BackendClient + Send + Sync + 'static,
{
    let value = match parse_brightness(&value) {
        Ok(value) => value,
        Err(err) => {
            state.dispatch.require_device(&device).await?;
            return Err(err.into());
        }
    };
    run(&state, &device, Action::Brightness(value)).await
}
