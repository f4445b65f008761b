//! HTTP handlers for chat-service.

pub mod chat;
pub mod health;
pub mod image_log;
pub mod metrics;

pub use chat::chat;
pub use health::{health_check, healthz, readiness_check};
pub use image_log::image_log;
pub use metrics::metrics;
