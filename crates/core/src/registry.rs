//! Endpoint registry
//!
//! Maps dotted `collection.endpoint` paths to endpoint descriptors. The
//! registry is built once from a declarative document of the form
//!
//! ```yaml
//! catalogservice:
//!   dataset:
//!     endpoint_url: ${PLATFORM_GATEWAY}/data/foundation/catalog/dataSets
//!     extra_headers:
//!       Content-Type: application/json
//! ```
//!
//! and is read-only afterwards.

use std::collections::BTreeMap;

use aep_domain::utils::json_path::scalar_to_string;
use aep_domain::{AepError, EndpointDescriptor, EndpointPath, HeaderMapping, Result};
use serde_json::Value;
use url::Url;

use crate::template::Substitutions;

const ENDPOINT_URL_KEY: &str = "endpoint_url";
const EXTRA_HEADERS_KEY: &str = "extra_headers";

/// Two-level mapping `collection -> endpoint -> descriptor`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointRegistry {
    collections: BTreeMap<String, BTreeMap<String, EndpointDescriptor>>,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one endpoint, validating its base URL.
    pub fn with_endpoint(
        mut self,
        collection: impl Into<String>,
        endpoint: impl Into<String>,
        descriptor: EndpointDescriptor,
    ) -> Result<Self> {
        let collection = collection.into();
        let endpoint = endpoint.into();
        validate_base_url(&collection, &endpoint, &descriptor.base_url)?;
        self.collections.entry(collection).or_default().insert(endpoint, descriptor);
        Ok(self)
    }

    /// Build from an already substituted endpoint document.
    pub fn from_value(document: &Value) -> Result<Self> {
        let Value::Object(collections) = document else {
            return Err(AepError::Config("endpoint document must be a mapping".to_string()));
        };

        let mut registry = Self::new();
        for (collection, endpoints) in collections {
            let Value::Object(endpoints) = endpoints else {
                return Err(AepError::Config(format!(
                    "collection '{collection}' must map endpoint names to definitions"
                )));
            };
            for (endpoint, definition) in endpoints {
                let descriptor = parse_descriptor(collection, endpoint, definition)?;
                registry = registry.with_endpoint(collection.clone(), endpoint.clone(), descriptor)?;
            }
        }
        Ok(registry)
    }

    /// Substitute `${NAME}` tokens in the endpoint document, then build.
    pub fn from_template(document: Value, substitutions: &Substitutions) -> Result<Self> {
        let document = substitutions.apply(document)?;
        Self::from_value(&document)
    }

    /// Resolve a dotted path to its descriptor.
    ///
    /// A malformed path is a configuration error; a well-formed path that is
    /// not registered is [`AepError::UnknownEndpoint`].
    pub fn resolve(&self, path: &str) -> Result<&EndpointDescriptor> {
        let parsed = EndpointPath::parse(path)?;
        self.collections
            .get(parsed.collection)
            .and_then(|endpoints| endpoints.get(parsed.endpoint))
            .ok_or_else(|| AepError::UnknownEndpoint { path: path.to_string() })
    }

    pub fn contains(&self, path: &str) -> bool {
        self.resolve(path).is_ok()
    }

    pub fn collections(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Endpoint names registered under a collection.
    pub fn endpoints(&self, collection: &str) -> Vec<&str> {
        self.collections
            .get(collection)
            .map(|endpoints| endpoints.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Number of registered endpoints across all collections.
    pub fn len(&self) -> usize {
        self.collections.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_descriptor(collection: &str, endpoint: &str, definition: &Value) -> Result<EndpointDescriptor> {
    let base_url = definition
        .get(ENDPOINT_URL_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            AepError::Config(format!("{collection}.{endpoint} is missing '{ENDPOINT_URL_KEY}'"))
        })?
        .to_string();

    let extra_headers = match definition.get(EXTRA_HEADERS_KEY) {
        None | Some(Value::Null) => HeaderMapping::new(),
        Some(Value::Object(headers)) => headers
            .iter()
            .map(|(name, value)| {
                scalar_to_string(value).map(|v| (name.clone(), v)).ok_or_else(|| {
                    AepError::Config(format!(
                        "{collection}.{endpoint} header '{name}' must be a scalar value"
                    ))
                })
            })
            .collect::<Result<HeaderMapping>>()?,
        Some(_) => {
            return Err(AepError::Config(format!(
                "{collection}.{endpoint} '{EXTRA_HEADERS_KEY}' must be a mapping"
            )))
        }
    };

    Ok(EndpointDescriptor { base_url, extra_headers })
}

fn validate_base_url(collection: &str, endpoint: &str, base_url: &str) -> Result<()> {
    if base_url.is_empty() {
        return Err(AepError::Config(format!("{collection}.{endpoint} has an empty base url")));
    }
    Url::parse(base_url).map(|_| ()).map_err(|e| {
        AepError::Config(format!("{collection}.{endpoint} has an invalid base url '{base_url}': {e}"))
    })
}
