// src/repository/mod.rs
pub mod account_repository;
pub mod invoice_repository;
pub mod plan_repository;
pub mod subscription_repository;
pub mod team_repository;
