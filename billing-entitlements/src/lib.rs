// src/lib.rs
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use domain::entitlement_subject::EntitlementSubject;
pub use error::{AppError, AppResult};
pub use service::entitlement_service::{EntitlementReport, EntitlementService, TeamResetOutcome};
