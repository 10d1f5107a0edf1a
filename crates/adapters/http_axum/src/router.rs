//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use intentcp_app::ports::{BackendClient, DeviceRegistry};

use crate::api::status;
use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the dispatch routes under `/tuya` next to `/health` and `/status`.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<R, B>(state: AppState<R, B>) -> Router
where
    R: DeviceRegistry + Send + Sync + 'static,
    B: BackendClient + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(status::overview::<R, B>))
        .route("/status/backend/{target_id}", get(status::backend::<R, B>))
        .nest("/tuya", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
