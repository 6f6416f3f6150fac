//! HTTP handlers for the gateway's own endpoints.

pub mod health;
pub mod manage;
pub mod metrics;
pub mod settings;
