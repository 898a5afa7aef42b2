// src/domain/mod.rs

pub mod audit_log_model;
pub mod company_model;
pub mod cycle_status;
pub mod evaluation_item_assignment_model;
pub mod evaluation_item_model;
pub mod evaluation_model;
pub mod evaluation_status;
pub mod partial_assessment_model;
pub mod performance_cycle_model;
pub mod period_type;
pub mod user_model;
pub mod user_role;
