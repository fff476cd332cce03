use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::core::ServerState;
use crate::server::middleware;

/// Room for multipart boundaries and the text fields next to the image
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all API routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(api::maps::router())
        .merge(api::items::router())
        .merge(api::search::router())
        .merge(api::bulk::router())
        .merge(api::assets::router())
        .merge(api::health::router())
}

/// Build a fully configured application with static files and middleware
///
/// Used by the HTTP server and by the integration tests.
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_router()
        // 地图底图与物品缩略图
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        // ========== Tower HTTP Middleware ==========
        .layer(CorsLayer::permissive())
        // Request logging
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        // Request ID - outermost, so every inner layer sees it
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
}
