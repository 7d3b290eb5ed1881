/// OpenAPI documentation generation.
pub mod documentation;
/// Saving and loading shared game configs.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Server-side re-simulation of recorded runs.
pub mod replay_service;
/// Background storage connection and degraded-mode tracking.
pub mod storage_supervisor;
