//! HTTP server for the vessel query service.
//!
//! # Endpoints
//!
//! - `GET  /health`   — Liveness probe
//! - `POST /process`  — Answer a free-text vessel question
//! - `GET  /download` — CSV export of a reply's result set

pub mod routes;

pub use routes::{app_router, AppState};
