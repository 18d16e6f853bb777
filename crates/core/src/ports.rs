//! Port interfaces for the platform API
//!
//! These traits define the boundary between the collection services and
//! the HTTP adapter in the infra crate.

use aep_domain::{ApiRequest, ApiResponse, HeaderMapping, Result};
use serde_json::Value;

/// Authenticated access to the platform's REST endpoints
///
/// Every call resolves a dotted registry path to exactly one endpoint and
/// classifies the response status the same way.
pub trait PlatformApi {
    /// Issue one JSON request and classify the response.
    fn request(&self, request: &ApiRequest) -> Result<ApiResponse>;

    /// GET an absolute URL with the session's authentication.
    fn get_url(&self, url: &str, headers: &HeaderMapping) -> Result<ApiResponse>;

    /// Retrieve raw bytes; the status is checked but the body is not parsed.
    fn download(&self, request: &ApiRequest) -> Result<Vec<u8>>;

    /// POST a multipart form carrying one JSON text field.
    fn post_multipart(&self, path: &str, field: &str, value: &Value) -> Result<ApiResponse>;
}
