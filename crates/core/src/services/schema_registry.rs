//! Schema registry: schemas, field groups and descriptors
//!
//! Schema and field group ids are URIs, so they are percent-encoded before
//! being used as a URL segment.

use aep_domain::types::resource::{DESCRIPTOR, FIELD_GROUP, SCHEMA};
use aep_domain::{ApiRequest, PatchOp, Resource, ResourceKind, Result};
use serde_json::{json, Value};
use tracing::{warn, Span};

use crate::ports::PlatformApi;
use crate::resources::Collection;

const IMMUTABLE_TAGS_PATH: &str = "/meta:immutableTags";
const PROFILE_UNION_TAG: &str = "union";

/// Endpoints under `schemaregistry`
pub struct SchemaRegistryService<'a> {
    collection: Collection<'a>,
}

impl<'a> SchemaRegistryService<'a> {
    pub const NAME: &'static str = "schemaregistry";

    pub fn new(api: &'a dyn PlatformApi) -> Self {
        Self { collection: Collection::new(api, Self::NAME) }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.collection = self.collection.with_span(span);
        self
    }

    pub fn create_schema(&self, definition: Value) -> Result<Resource> {
        self.collection.create(&SCHEMA, definition)
    }

    pub fn get_schema(&self, id: &str) -> Result<Resource> {
        self.get_encoded(&SCHEMA, id)
    }

    pub fn refresh_schema(&self, schema: &mut Resource) -> Result<()> {
        let refreshed = self.get_encoded(&SCHEMA, schema.require_id()?)?;
        if let Some(definition) = refreshed.definition() {
            schema.set_definition(definition.clone());
        }
        Ok(())
    }

    /// Apply one JSON Patch operation and refresh the definition.
    pub fn patch_schema(
        &self,
        schema: &mut Resource,
        op: PatchOp,
        path: &str,
        value: Value,
    ) -> Result<()> {
        let encoded = urlencoding::encode(schema.require_id()?).into_owned();
        {
            let _entered = self.collection.span().enter();
            let body = json!([{ "op": op.as_str(), "path": path, "value": value }]);
            self.collection.api().request(
                &ApiRequest::patch(SCHEMA.path()).suffix(format!("/{encoded}")).body(body),
            )?;
        }
        self.refresh_schema(schema)
    }

    /// Tag the schema for use in the real-time customer profile. The
    /// platform does not allow this to be undone.
    pub fn enable_schema_for_profile(&self, schema: &mut Resource) -> Result<()> {
        {
            let _entered = self.collection.span().enter();
            warn!(id = schema.id(), "enabling a schema for profile is irreversible");
        }
        self.patch_schema(schema, PatchOp::Add, IMMUTABLE_TAGS_PATH, json!([PROFILE_UNION_TAG]))
    }

    pub fn create_fieldgroup(&self, definition: Value) -> Result<Resource> {
        self.collection.create(&FIELD_GROUP, definition)
    }

    pub fn get_fieldgroup(&self, id: &str) -> Result<Resource> {
        self.get_encoded(&FIELD_GROUP, id)
    }

    pub fn create_descriptor(&self, definition: Value) -> Result<Resource> {
        self.collection.create(&DESCRIPTOR, definition)
    }

    pub fn get_descriptor(&self, id: &str) -> Result<Resource> {
        self.collection.get(&DESCRIPTOR, id)
    }

    fn get_encoded(&self, kind: &'static ResourceKind, id: &str) -> Result<Resource> {
        let _entered = self.collection.span().enter();
        let encoded = urlencoding::encode(id);
        let request = ApiRequest::get(kind.path()).suffix(format!("/{encoded}"));
        let response = self.collection.api().request(&request)?;
        match kind.extract_id(&response.body) {
            Ok(_) => Resource::from_definition(kind, response.body),
            Err(_) => Ok(Resource::with_id(kind, id, response.body)),
        }
    }
}
