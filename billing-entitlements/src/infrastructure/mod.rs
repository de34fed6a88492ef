// src/infrastructure/mod.rs
pub mod fastspring;
