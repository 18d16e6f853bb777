//! Catalog service: datasets, batches and the files under a batch

use aep_domain::types::resource::{BATCH, DATASET, DATASET_FILE};
use aep_domain::{ApiRequest, QueryParams, Resource, Result};
use tracing::{warn, Span};

use crate::ports::PlatformApi;
use crate::resources::{page_count, Collection};

/// Batch status used when listing a dataset's batches without a filter
pub const DEFAULT_BATCH_STATUS: &str = "success";

/// Endpoints under `catalogservice`
pub struct CatalogService<'a> {
    collection: Collection<'a>,
}

impl<'a> CatalogService<'a> {
    pub const NAME: &'static str = "catalogservice";

    pub fn new(api: &'a dyn PlatformApi) -> Self {
        Self { collection: Collection::new(api, Self::NAME) }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.collection = self.collection.with_span(span);
        self
    }

    /// The create response is a list of dataset references; the id is the
    /// last segment of the first one.
    pub fn create_dataset(&self, definition: serde_json::Value) -> Result<Resource> {
        self.collection.create(&DATASET, definition)
    }

    pub fn get_dataset(&self, id: &str) -> Result<Resource> {
        self.collection.get(&DATASET, id)
    }

    pub fn list_datasets(&self, params: QueryParams) -> Result<Vec<Resource>> {
        self.collection.list(&DATASET, params)
    }

    pub fn delete_dataset(&self, dataset: &mut Resource) -> Result<()> {
        self.collection.delete(dataset)
    }

    /// Batches of a dataset, filtered by status. `None` lists batches in
    /// any status.
    pub fn batches_for_dataset(
        &self,
        dataset_id: &str,
        status: Option<&str>,
    ) -> Result<Vec<Resource>> {
        let mut params = vec![("dataSet".to_string(), dataset_id.to_string())];
        if let Some(status) = status {
            params.push(("status".to_string(), status.to_string()));
        }
        self.collection.list(&BATCH, params)
    }

    /// Batches of a dataset that finished successfully.
    pub fn successful_batches(&self, dataset_id: &str) -> Result<Vec<Resource>> {
        self.batches_for_dataset(dataset_id, Some(DEFAULT_BATCH_STATUS))
    }

    /// Dataset files written by a batch. An empty batch yields an empty list.
    pub fn dataset_files(&self, batch_id: &str) -> Result<Vec<Resource>> {
        let _entered = self.collection.span().enter();
        let response = self.collection.api().request(
            &ApiRequest::get("dataaccess.dataaccess").suffix(format!("/{batch_id}/files")),
        )?;

        if page_count(&response.body, "batch file listing")? == 0 {
            warn!(batch_id, "batch has no underlying dataset files");
            return Ok(Vec::new());
        }

        Ok(DATASET_FILE
            .extract_items(&response.body)?
            .into_iter()
            .map(|(id, definition)| Resource::with_id(&DATASET_FILE, id, definition))
            .collect())
    }
}
