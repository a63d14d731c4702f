//! Fleet administration API
//!
//! Vehicles, owners, service reminders, workshop inventory and the admin
//! accounts of the console, served over HTTP from PostgreSQL.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::build_router;
pub use state::AppState;
