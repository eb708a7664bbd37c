//! Core types shared across the table engine.
//!
//! This module provides:
//! - `error`: structured error types for table construction and queries
//!
//! # Re-exports
//!
//! [`TableError`] is re-exported at this module level for convenience.

pub mod error;

pub use error::TableError;
