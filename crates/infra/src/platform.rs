//! Platform facade
//!
//! Wires config, token, auth headers, session and endpoint registry into
//! one [`PlatformClient`] and hands out the collection services over it.

use std::path::PathBuf;
use std::time::Duration;

use aep_core::{
    CatalogService, DataAccessService, EndpointRegistry, FlowService, QueryService,
    SchemaRegistryService, SegmentationService, SenseiService, StatusPoller,
};
use aep_domain::{Gateway, PlatformConfig, Result};
use tracing::{info, info_span, Span};

use crate::auth::{auth_headers, token_provider_from_config};
use crate::client::PlatformClient;
use crate::config;
use crate::http::{HttpSession, HttpSessionBuilder};
use crate::registry::known_endpoints;

/// Entry point: one authenticated client and its services
pub struct Platform {
    client: PlatformClient,
    span: Span,
}

impl Platform {
    /// Authenticate with the bundled endpoint table.
    pub fn from_config(config: &PlatformConfig) -> Result<Self> {
        Self::with_registry(config, known_endpoints()?)
    }

    /// Load the config file at `path` and authenticate.
    pub fn from_config_file(path: impl Into<PathBuf>) -> Result<Self> {
        Self::from_config(&config::load_from_file(Some(path.into()))?)
    }

    /// Load the config from the standard locations and authenticate.
    pub fn from_default_config() -> Result<Self> {
        Self::from_config(&config::load()?)
    }

    /// Authenticate against a caller-supplied endpoint registry.
    pub fn with_registry(config: &PlatformConfig, registry: EndpointRegistry) -> Result<Self> {
        let gateway = Gateway::from_url(&config.platform.platform_gateway)?;
        let span = info_span!(
            "platform",
            gateway = gateway.url(),
            sandbox = %config.titles.sandbox_name
        );

        let token = {
            let _entered = span.enter();
            let plain = session_builder(config).build()?;
            token_provider_from_config(config, &plain)?.access_token()?
        };

        let session =
            session_builder(config).default_headers(auth_headers(config, &token)?).build()?;
        let client = PlatformClient::new(session, registry).with_span(span.clone());
        {
            let _entered = span.enter();
            info!(endpoints = client.registry().len(), "platform client ready");
        }
        Ok(Self { client, span })
    }

    /// Wrap an already built client.
    pub fn from_client(client: PlatformClient) -> Self {
        let span = client.span().clone();
        Self { client, span }
    }

    pub fn client(&self) -> &PlatformClient {
        &self.client
    }

    pub fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(&self.client).with_span(self.child_span(CatalogService::NAME))
    }

    pub fn data_access(&self) -> DataAccessService<'_> {
        DataAccessService::new(&self.client).with_span(self.child_span(DataAccessService::NAME))
    }

    pub fn flow_service(&self) -> FlowService<'_> {
        FlowService::new(&self.client).with_span(self.child_span(FlowService::NAME))
    }

    pub fn query_service(&self) -> QueryService<'_> {
        QueryService::new(&self.client).with_span(self.child_span(QueryService::NAME))
    }

    pub fn schema_registry(&self) -> SchemaRegistryService<'_> {
        SchemaRegistryService::new(&self.client)
            .with_span(self.child_span(SchemaRegistryService::NAME))
    }

    pub fn segmentation(&self) -> SegmentationService<'_> {
        SegmentationService::new(&self.client)
            .with_span(self.child_span(SegmentationService::NAME))
    }

    pub fn sensei(&self) -> SenseiService<'_> {
        SenseiService::new(&self.client).with_span(self.child_span(SenseiService::NAME))
    }

    /// Poller that sleeps on the calling thread.
    pub fn poller(&self) -> StatusPoller {
        StatusPoller::new().with_span(self.child_span("poller"))
    }

    fn child_span(&self, name: &'static str) -> Span {
        info_span!(parent: &self.span, "collection", collection = name)
    }
}

fn session_builder(config: &PlatformConfig) -> HttpSessionBuilder {
    let mut builder = HttpSession::builder().timeout(Duration::from_secs(config.http.timeout_secs));
    if let Some(agent) = &config.http.user_agent {
        builder = builder.user_agent(agent.clone());
    }
    builder
}
