// src/repository/mod.rs

pub mod audit_log_repository;
pub mod company_repository;
pub mod evaluation_item_repository;
pub mod evaluation_repository;
pub mod partial_assessment_repository;
pub mod performance_cycle_repository;
pub mod user_repository;
