use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::health::{ApiTestResponse, HealthResponse},
    services::health_service,
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/healthcheck",
    tag = "health",
    responses((status = 200, description = "Storage status", body = HealthResponse))
)]
/// Report whether a working storage backend is installed.
pub async fn healthcheck(State(state): State<SharedState>) -> Json<HealthResponse> {
    let status = health_service::health_status(&state).await;
    Json(status)
}

#[utoipa::path(
    get,
    path = "/api/test",
    tag = "health",
    responses((status = 200, description = "API is reachable", body = ApiTestResponse))
)]
/// Liveness probe used by the editor page.
pub async fn api_test() -> Json<ApiTestResponse> {
    Json(ApiTestResponse::default())
}

/// Configure the health routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/healthcheck", get(healthcheck))
        .route("/api/test", get(api_test))
}
