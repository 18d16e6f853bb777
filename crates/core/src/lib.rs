//! # AEP Core
//!
//! Client logic with no network code.
//!
//! This crate contains:
//! - The `PlatformApi` port implemented by the HTTP adapter
//! - The endpoint registry and `${NAME}` substitution
//! - Response status classification and the status poller
//! - Generic resource operations and per-collection services
//!
//! ## Architecture Principles
//! - Only depends on `aep-domain`
//! - All I/O goes through `PlatformApi` and `Sleeper`

pub mod polling;
pub mod ports;
pub mod registry;
pub mod resources;
pub mod response;
pub mod services;
pub mod template;

// Re-export specific items to avoid ambiguity
pub use polling::{Sleeper, StatusPoller, ThreadSleeper};
pub use ports::PlatformApi;
pub use registry::EndpointRegistry;
pub use resources::Collection;
pub use response::classify;
pub use services::{
    CatalogService, DataAccessService, FlowService, QueryService, ScheduleUpdate,
    SchemaRegistryService, SegmentationService, SenseiService,
};
pub use template::Substitutions;
