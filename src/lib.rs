//! Library crate for floppy-back, exposing modules for binaries and integration tests.

/// Runtime configuration loaded from disk.
pub mod config;
/// Persistence layer and storage backends.
pub mod dao;
/// Request and response payloads.
pub mod dto;
/// Deterministic game simulation.
pub mod engine;
/// Service and HTTP error types.
pub mod error;
/// HTTP routes.
pub mod routes;
/// Business logic behind the routes.
pub mod services;
/// Shared application state.
pub mod state;
