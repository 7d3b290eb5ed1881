use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
}

impl HealthResponse {
    /// A working storage backend is installed.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }

    /// No storage backend is installed or the installed one is failing.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
        }
    }
}

/// Liveness payload served by `/api/test`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiTestResponse {
    /// Always `true`.
    pub success: bool,
    /// Always `API OK`.
    pub message: String,
}

impl Default for ApiTestResponse {
    fn default() -> Self {
        Self {
            success: true,
            message: "API OK".to_string(),
        }
    }
}
