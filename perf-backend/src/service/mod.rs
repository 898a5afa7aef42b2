// src/service/mod.rs

pub mod audit_log_service;
pub mod auth_service;
pub mod cycle_service;
pub mod evaluation_item_service;
pub mod evaluation_service;
pub mod user_service;
