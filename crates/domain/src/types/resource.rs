//! Resource objects and the per-kind identifier strategy table
//!
//! Different platform APIs bury the identifier at different places in their
//! JSON. Each [`ResourceKind`] carries an [`IdLocator`] for single documents
//! and a [`ListLocator`] for listing responses, selected once per kind.

use serde_json::Value;

use crate::errors::{AepError, Result};

/// Where the identifier sits in a single-resource document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdLocator {
    /// Top-level key (`id`, `$id`, `@id`, ...)
    Key(&'static str),
    /// First key of the object; for an array of reference strings, the
    /// last path segment of the first element
    FirstKey,
    /// `items[0][key]`
    FirstItem(&'static str),
}

/// How a listing response is turned into resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListLocator {
    /// Array under `field`, each element's id under `id_key`
    Items { field: &'static str, id_key: &'static str },
    /// Object whose keys are ids and values are definitions
    Entries,
}

/// Static metadata for one resource type
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceKind {
    pub collection: &'static str,
    pub name: &'static str,
    pub id_locator: IdLocator,
    pub list_locator: ListLocator,
}

impl ResourceKind {
    /// Registry path `collection.name`.
    pub fn path(&self) -> String {
        format!("{}.{}", self.collection, self.name)
    }

    /// Extract the identifier from a single-resource document.
    pub fn extract_id(&self, definition: &Value) -> Result<String> {
        let found = match self.id_locator {
            IdLocator::Key(key) => definition.get(key).and_then(id_string),
            IdLocator::FirstKey => first_key(definition),
            IdLocator::FirstItem(key) => definition
                .get("items")
                .and_then(|items| items.get(0))
                .and_then(|item| item.get(key))
                .and_then(id_string),
        };
        found.ok_or_else(|| AepError::MissingField {
            field: self.id_field_name(),
            context: format!("{} definition", self.name),
        })
    }

    /// Split a listing response into `(id, definition)` pairs.
    pub fn extract_items(&self, listing: &Value) -> Result<Vec<(String, Value)>> {
        match self.list_locator {
            ListLocator::Items { field, id_key } => {
                let items = listing.get(field).and_then(Value::as_array).ok_or_else(|| {
                    AepError::MissingField {
                        field: field.to_string(),
                        context: format!("{} listing", self.name),
                    }
                })?;
                items
                    .iter()
                    .map(|item| {
                        let id = item.get(id_key).and_then(id_string).ok_or_else(|| {
                            AepError::MissingField {
                                field: id_key.to_string(),
                                context: format!("{} listing item", self.name),
                            }
                        })?;
                        Ok((id, item.clone()))
                    })
                    .collect()
            }
            ListLocator::Entries => match listing {
                Value::Object(map) => {
                    Ok(map.iter().map(|(id, definition)| (id.clone(), definition.clone())).collect())
                }
                _ => Err(AepError::MissingField {
                    field: "<entries>".to_string(),
                    context: format!("{} listing", self.name),
                }),
            },
        }
    }

    fn id_field_name(&self) -> String {
        match self.id_locator {
            IdLocator::Key(key) => key.to_string(),
            IdLocator::FirstKey => "<first key>".to_string(),
            IdLocator::FirstItem(key) => format!("items.0.{key}"),
        }
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_key(definition: &Value) -> Option<String> {
    match definition {
        Value::Object(map) => map.keys().next().cloned(),
        Value::Array(items) => items
            .first()
            .and_then(Value::as_str)
            .and_then(|reference| reference.rsplit('/').next())
            .filter(|id| !id.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

/// Local handle on a server-side artifact
///
/// `id` and `definition` are both `None` once the artifact has been deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    kind: &'static ResourceKind,
    id: Option<String>,
    definition: Option<Value>,
}

impl Resource {
    /// Build from a definition, extracting the id with the kind's locator.
    pub fn from_definition(kind: &'static ResourceKind, definition: Value) -> Result<Self> {
        let id = kind.extract_id(&definition)?;
        Ok(Self { kind, id: Some(id), definition: Some(definition) })
    }

    /// Build with a known id.
    pub fn with_id(kind: &'static ResourceKind, id: impl Into<String>, definition: Value) -> Self {
        Self { kind, id: Some(id.into()), definition: Some(definition) }
    }

    pub fn kind(&self) -> &'static ResourceKind {
        self.kind
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn definition(&self) -> Option<&Value> {
        self.definition.as_ref()
    }

    /// The id, or an error if the resource has been deleted.
    pub fn require_id(&self) -> Result<&str> {
        self.id.as_deref().ok_or_else(|| {
            AepError::InvalidInput(format!("{} has been deleted", self.kind.name))
        })
    }

    pub fn set_definition(&mut self, definition: Value) {
        self.definition = Some(definition);
    }

    /// Clear id and definition after the server-side artifact is gone.
    pub fn invalidate(&mut self) {
        self.id = None;
        self.definition = None;
    }

    pub fn is_deleted(&self) -> bool {
        self.id.is_none() && self.definition.is_none()
    }
}

/// An experiment run always lives under an experiment
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentRun {
    pub run: Resource,
    pub experiment_id: String,
}

const ITEMS_BY_ID: ListLocator = ListLocator::Items { field: "items", id_key: "id" };

pub const DATASET: ResourceKind = ResourceKind {
    collection: "catalogservice",
    name: "dataset",
    id_locator: IdLocator::FirstKey,
    list_locator: ListLocator::Entries,
};

pub const BATCH: ResourceKind = ResourceKind {
    collection: "catalogservice",
    name: "batch",
    id_locator: IdLocator::Key("id"),
    list_locator: ListLocator::Entries,
};

pub const DATASET_FILE: ResourceKind = ResourceKind {
    collection: "dataaccess",
    name: "datasetfile",
    id_locator: IdLocator::Key("dataSetFileId"),
    list_locator: ListLocator::Items { field: "data", id_key: "dataSetFileId" },
};

pub const FLOW: ResourceKind = ResourceKind {
    collection: "flowservice",
    name: "flows",
    id_locator: IdLocator::FirstItem("id"),
    list_locator: ITEMS_BY_ID,
};

pub const FLOW_RUN: ResourceKind = ResourceKind {
    collection: "flowservice",
    name: "runs",
    id_locator: IdLocator::FirstItem("id"),
    list_locator: ITEMS_BY_ID,
};

pub const QUERY: ResourceKind = ResourceKind {
    collection: "queryservice",
    name: "query",
    id_locator: IdLocator::Key("id"),
    list_locator: ListLocator::Items { field: "queries", id_key: "id" },
};

pub const SCHEDULED_QUERY: ResourceKind = ResourceKind {
    collection: "queryservice",
    name: "scheduledquery",
    id_locator: IdLocator::Key("id"),
    list_locator: ListLocator::Items { field: "schedules", id_key: "id" },
};

pub const SCHEMA: ResourceKind = ResourceKind {
    collection: "schemaregistry",
    name: "schema",
    id_locator: IdLocator::Key("$id"),
    list_locator: ListLocator::Items { field: "results", id_key: "$id" },
};

pub const FIELD_GROUP: ResourceKind = ResourceKind {
    collection: "schemaregistry",
    name: "fieldgroup",
    id_locator: IdLocator::Key("$id"),
    list_locator: ListLocator::Items { field: "results", id_key: "$id" },
};

pub const DESCRIPTOR: ResourceKind = ResourceKind {
    collection: "schemaregistry",
    name: "descriptor",
    id_locator: IdLocator::Key("@id"),
    list_locator: ListLocator::Items { field: "results", id_key: "@id" },
};

pub const SEGMENT_JOB: ResourceKind = ResourceKind {
    collection: "segmentationservice",
    name: "segmentjob",
    id_locator: IdLocator::Key("id"),
    list_locator: ListLocator::Items { field: "children", id_key: "id" },
};

pub const ENGINE: ResourceKind = ResourceKind {
    collection: "sensei",
    name: "engine",
    id_locator: IdLocator::Key("id"),
    list_locator: ListLocator::Items { field: "children", id_key: "id" },
};

pub const ML_INSTANCE: ResourceKind = ResourceKind {
    collection: "sensei",
    name: "mlinstance",
    id_locator: IdLocator::Key("id"),
    list_locator: ListLocator::Items { field: "children", id_key: "id" },
};

pub const EXPERIMENT: ResourceKind = ResourceKind {
    collection: "sensei",
    name: "experiment",
    id_locator: IdLocator::Key("id"),
    list_locator: ListLocator::Items { field: "children", id_key: "id" },
};

/// Runs are nested under `/experiments/{id}/runs`, so this kind has no
/// registry entry of its own. It only names runs and extracts their ids;
/// requests go through [`EXPERIMENT`] with a URL suffix.
pub const EXPERIMENT_RUN: ResourceKind = ResourceKind {
    collection: "sensei",
    name: "experimentrun",
    id_locator: IdLocator::Key("id"),
    list_locator: ListLocator::Items { field: "children", id_key: "id" },
};

pub const MODEL: ResourceKind = ResourceKind {
    collection: "sensei",
    name: "model",
    id_locator: IdLocator::Key("id"),
    list_locator: ListLocator::Items { field: "children", id_key: "id" },
};
