//! # AEP Domain
//!
//! Data types for the platform API client.
//!
//! This crate contains:
//! - The error type and Result alias
//! - Configuration structures
//! - Endpoint descriptors, request/response shapes and poll specs
//! - Resource objects and the resource-kind table
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
