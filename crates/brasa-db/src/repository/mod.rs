//! # Repositories
//!
//! Row-level access to the Brasa POS schema. Each repository owns a pool
//! handle and maps rows into brasa-core domain types.

pub mod catalog;
pub mod sale;
