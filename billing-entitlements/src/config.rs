// src/config.rs
pub mod app;
pub mod fastspring;

pub use app::{AppConfig, EntitlementConfig};
pub use fastspring::FastspringConfig;
