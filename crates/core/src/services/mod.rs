//! Per-collection services built on the generic resource operations

pub mod catalog;
pub mod data_access;
pub mod flow;
pub mod query;
pub mod schema_registry;
pub mod segmentation;
pub mod sensei;

pub use catalog::CatalogService;
pub use data_access::DataAccessService;
pub use flow::FlowService;
pub use query::{QueryService, ScheduleUpdate};
pub use schema_registry::SchemaRegistryService;
pub use segmentation::SegmentationService;
pub use sensei::SenseiService;
