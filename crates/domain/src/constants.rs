//! Platform constants
//!
//! Centralized location for wire-level constants shared by core and infra.

// Gateways
pub const EXPERIENCE_GATEWAY: &str = "https://platform.adobe.io";
pub const CAMPAIGN_GATEWAY: &str = "https://mc.adobe.io";

// Configuration defaults
pub const DEFAULT_SANDBOX: &str = "prod";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const IMS_TOKEN_PLACEHOLDER: &str = "<ims_token>";
pub const BEARER_PREFIX: &str = "Bearer ";

// Authentication headers
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_API_KEY: &str = "x-api-key";
pub const HEADER_ORG_ID: &str = "x-gw-ims-org-id";
pub const HEADER_SANDBOX: &str = "x-sandbox-name";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_ACCEPT: &str = "Accept";

/// Statuses treated as success by the request primitive
pub const ACCEPTED_STATUSES: [u16; 4] = [200, 201, 202, 207];
pub const STATUS_ACCEPTED: u16 = 202;
pub const STATUS_MULTI_STATUS: u16 = 207;

// Content types
pub const EXPERIMENT_RUN_CONTENT_TYPE: &str =
    "application/vnd.adobe.platform.sensei+json;profile=experimentRun.v1.json";

/// The only file format the data access download understands
pub const SUPPORTED_DOWNLOAD_EXTENSION: &str = "parquet";
