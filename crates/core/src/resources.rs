//! Generic resource operations
//!
//! A [`Collection`] issues create/get/list/delete calls for any
//! [`ResourceKind`] of one platform collection, turning responses into
//! [`Resource`] handles with the kind's id strategy.

use aep_domain::utils::json_path::lookup;
use aep_domain::{AepError, ApiRequest, QueryParams, Resource, ResourceKind, Result};
use serde_json::Value;
use tracing::{debug, Span};

use crate::ports::PlatformApi;

/// Operations shared by every platform collection
pub struct Collection<'a> {
    api: &'a dyn PlatformApi,
    name: &'static str,
    span: Span,
}

impl<'a> Collection<'a> {
    pub fn new(api: &'a dyn PlatformApi, name: &'static str) -> Self {
        Self { api, name, span: Span::none() }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn api(&self) -> &'a dyn PlatformApi {
        self.api
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// POST a definition and build a resource from the response.
    pub fn create(&self, kind: &'static ResourceKind, body: Value) -> Result<Resource> {
        let _entered = self.span.enter();
        let response = self.api.request(&ApiRequest::post(kind.path()).body(body))?;
        let resource = Resource::from_definition(kind, response.body)?;
        debug!(collection = self.name, kind = kind.name, id = resource.id(), "created resource");
        Ok(resource)
    }

    /// GET a resource by id.
    pub fn get(&self, kind: &'static ResourceKind, id: &str) -> Result<Resource> {
        let _entered = self.span.enter();
        let response = self.api.request(&ApiRequest::get(kind.path()).suffix(format!("/{id}")))?;
        Ok(Resource::with_id(kind, id, response.body))
    }

    /// Re-fetch the definition of an existing resource.
    pub fn refresh(&self, resource: &mut Resource) -> Result<()> {
        let _entered = self.span.enter();
        let kind = resource.kind();
        let id = resource.require_id()?.to_string();
        let response = self.api.request(&ApiRequest::get(kind.path()).suffix(format!("/{id}")))?;
        resource.set_definition(response.body);
        Ok(())
    }

    /// GET a listing and split it into resources.
    pub fn list(&self, kind: &'static ResourceKind, params: QueryParams) -> Result<Vec<Resource>> {
        let _entered = self.span.enter();
        let response = self.api.request(&ApiRequest::get(kind.path()).params(params))?;
        let resources: Vec<_> = kind
            .extract_items(&response.body)?
            .into_iter()
            .map(|(id, definition)| Resource::with_id(kind, id, definition))
            .collect();
        debug!(
            collection = self.name,
            kind = kind.name,
            count = resources.len(),
            "listed resources"
        );
        Ok(resources)
    }

    /// DELETE a resource and invalidate the local handle.
    pub fn delete(&self, resource: &mut Resource) -> Result<()> {
        let _entered = self.span.enter();
        let kind = resource.kind();
        let id = resource.require_id()?.to_string();
        self.api.request(&ApiRequest::delete(kind.path()).suffix(format!("/{id}")))?;
        resource.invalidate();
        debug!(collection = self.name, kind = kind.name, id = %id, "deleted resource");
        Ok(())
    }

    /// GET a listing and return the raw body.
    pub fn query(&self, kind: &'static ResourceKind, params: QueryParams) -> Result<Value> {
        let _entered = self.span.enter();
        self.api.request(&ApiRequest::get(kind.path()).params(params)).map(|r| r.body)
    }
}

/// Read `_page.count` from a paged listing.
pub(crate) fn page_count(body: &Value, context: &str) -> Result<u64> {
    lookup(body, "_page.count").and_then(Value::as_u64).ok_or_else(|| AepError::MissingField {
        field: "_page.count".to_string(),
        context: context.to_string(),
    })
}
