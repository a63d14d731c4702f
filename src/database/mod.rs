//! Database module
//!
//! Connection and migrations for PostgreSQL.

pub mod connection;

pub use connection::{DatabaseConnection, MIGRATOR};
