// src/api/handlers/mod.rs

pub mod audit_log_handler;
pub mod auth_handler;
pub mod cycle_handler;
pub mod evaluation_handler;
pub mod evaluation_item_handler;
pub mod user_handler;
