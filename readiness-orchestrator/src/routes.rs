use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use readiness_common::events::{WaitErrorKind, WaitForInstancesEvent};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::handler::handle_event;
use crate::poller::ReadinessPoller;

pub struct AppState {
    pub poller: ReadinessPoller,
    /// Cancelled on shutdown; every in-flight wait listens on a child token.
    pub shutdown: CancellationToken,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/invoke", post(invoke))
        .with_state(state)
}

async fn root() -> &'static str {
    "Readiness Orchestrator Online"
}

async fn invoke(
    State(state): State<Arc<AppState>>,
    Json(event): Json<WaitForInstancesEvent>,
) -> Response {
    let cancel = state.shutdown.child_token();
    match handle_event(&state.poller, event, &cancel).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => {
            let status = match e.kind() {
                WaitErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
                WaitErrorKind::UpstreamQueryFailure => StatusCode::BAD_GATEWAY,
                WaitErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            };
            (status, Json(e.to_payload())).into_response()
        }
    }
}
