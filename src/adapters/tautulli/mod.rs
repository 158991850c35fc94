//! Tautulli adapter implementation
//!
//! This module provides the integration with the Tautulli HTTP API: the
//! [`TautulliApi`] trait the workflow depends on, the reqwest-backed
//! [`TautulliClient`], and the response envelope models.

pub mod api;
pub mod client;
pub mod models;

pub use api::TautulliApi;
pub use client::TautulliClient;
pub use models::{ApiEnvelope, ApiResponse, ExportsTable};
