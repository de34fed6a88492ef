// src/service/mod.rs
pub mod customer_service;
pub mod entitlement_service;
