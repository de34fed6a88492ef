// src/domain/mod.rs
pub mod account_model;
pub mod entitlement_rules;
pub mod entitlement_subject;
pub mod invoice_model;
pub mod plan_model;
pub mod subscription_model;
pub mod team_member_model;
pub mod team_model;
