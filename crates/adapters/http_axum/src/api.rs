//! Dispatch endpoints, mounted under `/tuya`.
//!
//! | Path | Behaviour |
//! |------|-----------|
//! | `/{device}/{action}?delay=N&value=V` | single action, now or deferred |
//! | `/sequence?actions=<steps>` | schedule every step of a sequence |
//! | `/sequence/{preset}` | run a named preset now |
//! | `/devices/{device}/on`, `/off`, `/status` | legacy single action, unknown device is a 404 |
//! | `/devices/{device}/brightness/{value}` | legacy brightness |

#[allow(clippy::missing_errors_doc)]
pub mod control;
#[allow(clippy::missing_errors_doc)]
pub mod legacy;
#[allow(clippy::missing_errors_doc)]
pub mod status;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Serialize;

use intentcp_app::ports::{BackendClient, DeviceRegistry};
use intentcp_domain::outcome::{
    DispatchOutcome, DispatchReason, Dispatched, PresetReport, ScheduledAck, SequenceAck,
};

use crate::state::AppState;

/// Build the `/tuya` sub-router.
pub fn routes<R, B>() -> Router<AppState<R, B>>
where
    R: DeviceRegistry + Send + Sync + 'static,
    B: BackendClient + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/sequence",
            get(control::sequence::<R, B>).post(control::sequence::<R, B>),
        )
        .route(
            "/sequence/{preset}",
            get(control::preset::<R, B>).post(control::preset::<R, B>),
        )
        .route(
            "/devices/{device}/on",
            get(legacy::on::<R, B>).post(legacy::on::<R, B>),
        )
        .route(
            "/devices/{device}/off",
            get(legacy::off::<R, B>).post(legacy::off::<R, B>),
        )
        .route(
            "/devices/{device}/status",
            get(legacy::status::<R, B>).post(legacy::status::<R, B>),
        )
        .route(
            "/devices/{device}/brightness/{value}",
            get(legacy::brightness::<R, B>).post(legacy::brightness::<R, B>),
        )
        .route(
            "/{device}/{action}",
            get(control::action::<R, B>).post(control::action::<R, B>),
        )
}

/// HTTP status for an immediate outcome.
///
/// Unknown devices are a successful, skipped envelope.
fn outcome_status(outcome: &DispatchOutcome) -> StatusCode {
    match outcome.reason {
        DispatchReason::None | DispatchReason::UnknownDevice => StatusCode::OK,
        DispatchReason::UnsupportedAction | DispatchReason::ValidationError => {
            StatusCode::BAD_REQUEST
        }
        DispatchReason::MissingTarget | DispatchReason::TransportError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[derive(Serialize)]
struct ScheduledBody {
    ok: bool,
    scheduled: bool,
    #[serde(flatten)]
    ack: ScheduledAck,
}

#[derive(Serialize)]
struct SequenceBody {
    ok: bool,
    scheduled: bool,
    #[serde(flatten)]
    ack: SequenceAck,
}

#[derive(Serialize)]
struct PresetBody {
    ok: bool,
    #[serde(flatten)]
    report: PresetReport,
}

/// Possible responses from the single-action endpoints.
pub enum ActionResponse {
    Completed(DispatchOutcome),
    Scheduled(ScheduledAck),
}

impl From<Dispatched> for ActionResponse {
    fn from(dispatched: Dispatched) -> Self {
        match dispatched {
            Dispatched::Completed(outcome) => Self::Completed(outcome),
            Dispatched::Scheduled(ack) => Self::Scheduled(ack),
        }
    }
}

impl IntoResponse for ActionResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Completed(outcome) => (outcome_status(&outcome), Json(outcome)).into_response(),
            Self::Scheduled(ack) => Json(ScheduledBody {
                ok: true,
                scheduled: true,
                ack,
            })
            .into_response(),
        }
    }
}

/// Possible responses from the sequence endpoint.
pub enum SequenceResponse {
    Scheduled(SequenceAck),
}

impl IntoResponse for SequenceResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Scheduled(ack) => Json(SequenceBody {
                ok: true,
                scheduled: true,
                ack,
            })
            .into_response(),
        }
    }
}

/// Possible responses from the preset endpoint.
pub enum PresetResponse {
    Ok(PresetReport),
}

impl IntoResponse for PresetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(report) => Json(PresetBody { ok: true, report }).into_response(),
        }
    }
}
