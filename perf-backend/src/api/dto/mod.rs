// src/api/dto/mod.rs

pub mod audit_log_dto;
pub mod auth_dto;
pub mod cycle_dto;
pub mod evaluation_dto;
pub mod evaluation_item_dto;
pub mod user_dto;
