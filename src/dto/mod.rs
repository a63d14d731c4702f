pub mod auth_dto;
pub mod common;
pub mod inventory_dto;
pub mod owner_dto;
pub mod reminder_dto;
pub mod vehicle_dto;
