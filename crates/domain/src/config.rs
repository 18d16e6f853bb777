//! Configuration structures
//!
//! Mirrors the sectioned layout of the platform config document
//! (`Enterprise`, `Platform`, `Server`, `Titles`). Loading and `${ENV}`
//! substitution live in the infra crate.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CAMPAIGN_GATEWAY, DEFAULT_SANDBOX, DEFAULT_TIMEOUT_SECS, EXPERIENCE_GATEWAY,
    IMS_TOKEN_PLACEHOLDER,
};
use crate::errors::{AepError, Result};

/// Platform client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlatformConfig {
    #[serde(rename = "Enterprise")]
    pub enterprise: EnterpriseConfig,
    #[serde(rename = "Platform")]
    pub platform: GatewayConfig,
    #[serde(rename = "Server", default)]
    pub server: Option<ServerConfig>,
    #[serde(rename = "Titles", default)]
    pub titles: TitlesConfig,
    #[serde(rename = "Http", default)]
    pub http: HttpConfig,
}

/// Credentials of the technical account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnterpriseConfig {
    pub api_key: String,
    pub org_id: String,
    #[serde(default, skip_serializing)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub tech_acct: Option<String>,
    #[serde(default, skip_serializing)]
    pub priv_key: Option<String>,
    /// Pre-signed JWT assertion for the IMS token exchange
    #[serde(default, skip_serializing)]
    pub jwt_token: Option<String>,
}

/// Gateway selection and pre-issued token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewayConfig {
    pub platform_gateway: String,
    #[serde(default, skip_serializing)]
    pub ims_token: Option<String>,
}

impl GatewayConfig {
    /// The configured token, ignoring empty values and the template placeholder.
    pub fn issued_token(&self) -> Option<&str> {
        self.ims_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty() && *token != IMS_TOKEN_PLACEHOLDER)
    }
}

/// Identity management host used for the token exchange
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub ims_host: String,
    pub ims_endpoint_jwt: String,
}

impl ServerConfig {
    /// Full URL of the JWT exchange endpoint.
    pub fn exchange_url(&self) -> String {
        if self.ims_host.starts_with("http://") || self.ims_host.starts_with("https://") {
            format!("{}{}", self.ims_host, self.ims_endpoint_jwt)
        } else {
            format!("https://{}{}", self.ims_host, self.ims_endpoint_jwt)
        }
    }
}

/// Sandbox selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitlesConfig {
    #[serde(default = "default_sandbox")]
    pub sandbox_name: String,
}

impl Default for TitlesConfig {
    fn default() -> Self {
        Self { sandbox_name: default_sandbox() }
    }
}

/// HTTP session settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: default_timeout_secs(), user_agent: None }
    }
}

fn default_sandbox() -> String {
    DEFAULT_SANDBOX.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// The two API gateways the client knows how to authenticate against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gateway {
    /// Experience Platform: org and sandbox scoped
    Experience,
    /// Campaign: api key only
    Campaign,
}

impl Gateway {
    /// Match a configured gateway URL. Unknown gateways are a configuration error.
    pub fn from_url(url: &str) -> Result<Self> {
        match url.trim_end_matches('/') {
            EXPERIENCE_GATEWAY => Ok(Self::Experience),
            CAMPAIGN_GATEWAY => Ok(Self::Campaign),
            other => Err(AepError::Config(format!(
                "Not able to set headers for unknown platform_gateway: {other}"
            ))),
        }
    }

    pub fn url(self) -> &'static str {
        match self {
            Self::Experience => EXPERIENCE_GATEWAY,
            Self::Campaign => CAMPAIGN_GATEWAY,
        }
    }
}
