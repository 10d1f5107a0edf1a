//! Shared application state for axum handlers.

use std::sync::Arc;

use intentcp_app::ports::{BackendClient, DeviceRegistry};
use intentcp_app::services::dispatch_service::DispatchService;

/// Application state shared across all axum handlers.
///
/// Generic over the registry and backend types to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`.
pub struct AppState<R, B> {
    pub dispatch: Arc<DispatchService<R, B>>,
}

impl<R, B> Clone for AppState<R, B> {
    fn clone(&self) -> Self {
        Self {
            dispatch: Arc::clone(&self.dispatch),
        }
    }
}

impl<R, B> AppState<R, B>
where
    R: DeviceRegistry + Send + Sync + 'static,
    B: BackendClient + Send + Sync + 'static,
{
    pub fn new(dispatch: DispatchService<R, B>) -> Self {
        Self::from_arc(Arc::new(dispatch))
    }

    /// Use this when the service is also shared with other tasks.
    pub fn from_arc(dispatch: Arc<DispatchService<R, B>>) -> Self {
        Self { dispatch }
    }
}
