//! Endpoint descriptors and dotted registry paths

use serde::{Deserialize, Serialize};

use super::http::HeaderMapping;
use crate::errors::{AepError, Result};

/// Where a registry path points and which headers it needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    pub base_url: String,
    #[serde(default)]
    pub extra_headers: HeaderMapping,
}

/// A parsed `collection.endpoint` path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointPath<'a> {
    pub collection: &'a str,
    pub endpoint: &'a str,
}

impl<'a> EndpointPath<'a> {
    /// Split a dotted path into its two segments.
    ///
    /// Anything other than exactly two non-empty segments is a
    /// configuration error.
    pub fn parse(path: &'a str) -> Result<Self> {
        let mut segments = path.split('.');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(collection), Some(endpoint), None)
                if !collection.is_empty() && !endpoint.is_empty() =>
            {
                Ok(Self { collection, endpoint })
            }
            _ => Err(AepError::Config(format!(
                "endpoint path '{path}' must have the form collection.endpoint"
            ))),
        }
    }
}

impl std::fmt::Display for EndpointPath<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.collection, self.endpoint)
    }
}
