//! Domain types shared by the request primitive, the poller and the
//! resource wrappers

pub mod endpoint;
pub mod http;
pub mod poll;
pub mod resource;

pub use endpoint::{EndpointDescriptor, EndpointPath};
pub use http::{
    Advisory, ApiRequest, ApiResponse, HeaderMapping, HttpMethod, PatchOp, QueryParams,
};
pub use poll::PollSpec;
pub use resource::{ExperimentRun, IdLocator, ListLocator, Resource, ResourceKind};
