use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Floppy Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::health::api_test,
        crate::routes::game::save_game,
        crate::routes::game::load_game,
        crate::routes::replay::replay_game,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::ApiTestResponse,
            crate::dto::game::SaveGameRequest,
            crate::dto::game::SaveGameResponse,
            crate::dto::game::GameConfigResponse,
            crate::dto::replay::ReplayResponse,
            crate::engine::ReplayLog,
            crate::engine::Canvas,
            crate::engine::SpriteSize,
            crate::engine::DeathCause,
            crate::engine::replay::Death,
            crate::engine::Physics,
            crate::error::ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Liveness and storage status"),
        (name = "game", description = "Sharing, loading and verifying game configs"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_api_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/healthcheck",
            "/api/test",
            "/api/save",
            "/api/game/{id}",
            "/api/game/{id}/replay",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
