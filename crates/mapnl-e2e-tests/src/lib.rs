//! End-to-end tests for mapnl live under `tests/`.
//!
//! Each scenario drives the HTTP router with real providers pointed at
//! wiremock servers, so requests cross every crate boundary.
