//! Endpoint registry loading
//!
//! The bundled endpoint table lives in `resources/known_endpoints.yaml` and
//! references the named values in `resources/endpoint_parameters.yaml` as
//! `${NAME}`. Both are embedded at compile time and resolved once when the
//! registry is built.

use std::collections::BTreeMap;

use aep_core::{EndpointRegistry, Substitutions};
use aep_domain::Result;
use tracing::debug;

use crate::config::loader::parse_document;
use crate::config::ConfigFormat;

/// Bundled endpoint table
pub const KNOWN_ENDPOINTS: &str = include_str!("../resources/known_endpoints.yaml");

/// Bundled endpoint parameters
pub const ENDPOINT_PARAMETERS: &str = include_str!("../resources/endpoint_parameters.yaml");

/// Parameter holding the gateway every bundled endpoint is rooted at
pub const PLATFORM_GATEWAY_PARAM: &str = "PLATFORM_GATEWAY";

/// Builds an [`EndpointRegistry`] from YAML endpoint and parameter documents
#[derive(Debug, Clone)]
pub struct RegistryLoader {
    endpoints: String,
    parameters: String,
    overrides: BTreeMap<String, String>,
}

impl Default for RegistryLoader {
    fn default() -> Self {
        Self {
            endpoints: KNOWN_ENDPOINTS.to_string(),
            parameters: ENDPOINT_PARAMETERS.to_string(),
            overrides: BTreeMap::new(),
        }
    }
}

impl RegistryLoader {
    /// Loader over the bundled documents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the endpoint document.
    pub fn endpoints(mut self, yaml: impl Into<String>) -> Self {
        self.endpoints = yaml.into();
        self
    }

    /// Replace the parameter document.
    pub fn parameters(mut self, yaml: impl Into<String>) -> Self {
        self.parameters = yaml.into();
        self
    }

    /// Override one parameter; overrides win over the parameter document.
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(name.into(), value.into());
        self
    }

    /// Root every bundled endpoint at another gateway, e.g. a local mock.
    pub fn gateway(self, url: impl Into<String>) -> Self {
        self.parameter(PLATFORM_GATEWAY_PARAM, url)
    }

    /// Parse both documents and substitute parameters.
    ///
    /// A `${NAME}` missing from the parameters is read from the environment,
    /// and falls back to the bare name when unset.
    pub fn load(&self) -> Result<EndpointRegistry> {
        let parameters = parse_document(&self.parameters, ConfigFormat::Yaml)?;
        let substitutions = Substitutions::from_env()
            .with_mapping(Substitutions::mapping_from_document(&parameters)?)
            .with_mapping(self.overrides.clone());

        let endpoints = parse_document(&self.endpoints, ConfigFormat::Yaml)?;
        let registry = EndpointRegistry::from_template(endpoints, &substitutions)?;
        debug!(endpoints = registry.len(), "loaded endpoint registry");
        Ok(registry)
    }
}

/// Registry over the bundled endpoint table.
pub fn known_endpoints() -> Result<EndpointRegistry> {
    RegistryLoader::new().load()
}
