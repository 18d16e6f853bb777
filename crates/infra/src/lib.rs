//! # AEP Infrastructure
//!
//! Adapters implementing the `aep-core` ports over the network.
//!
//! This crate contains:
//! - The blocking HTTP session and the `PlatformClient` request primitive
//! - Auth headers and access token providers
//! - Config and endpoint registry loading
//! - The `Platform` facade and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `aep-core`
//! - Contains all "impure" code (HTTP, files, environment)

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod platform;
pub mod registry;

// Re-export commonly used items
pub use auth::{
    auth_headers, bearer, token_provider_from_config, AccessTokenProvider, ImsTokenExchange,
    StaticTokenProvider,
};
pub use client::PlatformClient;
pub use errors::InfraError;
pub use http::{HttpSession, HttpSessionBuilder};
pub use observability::{init_tracing, LogFormat, ObservabilityError};
pub use platform::Platform;
pub use registry::{known_endpoints, RegistryLoader};
