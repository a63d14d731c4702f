//! Shared utilities
//!
//! Error handling, request extractors, validation and JWT helpers.

pub mod errors;
pub mod extract;
pub mod jwt;
pub mod validation;
