//! Virtual try-on studio backend
//!
//! Forwards model-generation, try-on and image-to-video requests to an
//! external prediction provider, polls for completion, and normalizes the
//! provider's result payloads into plain output URLs.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
