//! Data access service: file listings and raw downloads

use std::collections::BTreeMap;

use aep_domain::constants::SUPPORTED_DOWNLOAD_EXTENSION;
use aep_domain::{AepError, ApiRequest, Result};
use serde_json::Value;
use tracing::{debug, Span};

use crate::ports::PlatformApi;
use crate::resources::Collection;

const FILES_PATH: &str = "dataaccess.files";

/// Endpoints under `dataaccess`
pub struct DataAccessService<'a> {
    collection: Collection<'a>,
}

impl<'a> DataAccessService<'a> {
    pub const NAME: &'static str = "dataaccess";

    pub fn new(api: &'a dyn PlatformApi) -> Self {
        Self { collection: Collection::new(api, Self::NAME) }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.collection = self.collection.with_span(span);
        self
    }

    /// Names of the physical files behind a dataset file.
    pub fn file_pathnames(&self, file_id: &str) -> Result<Vec<String>> {
        let _entered = self.collection.span().enter();
        let response = self
            .collection
            .api()
            .request(&ApiRequest::get(FILES_PATH).suffix(format!("/{file_id}")))?;

        let data = response.body.get("data").and_then(Value::as_array).ok_or_else(|| {
            AepError::MissingField { field: "data".to_string(), context: "file listing".to_string() }
        })?;
        data.iter()
            .map(|entry| {
                entry.get("name").and_then(Value::as_str).map(str::to_string).ok_or_else(|| {
                    AepError::MissingField {
                        field: "name".to_string(),
                        context: "file listing entry".to_string(),
                    }
                })
            })
            .collect()
    }

    /// Raw bytes of one file. Only parquet files are downloaded; anything
    /// else fails before a request is made.
    pub fn download_file(&self, file_id: &str, pathname: &str) -> Result<Vec<u8>> {
        let extension = pathname.rsplit('.').next().unwrap_or_default();
        if !pathname.contains('.') || extension != SUPPORTED_DOWNLOAD_EXTENSION {
            return Err(AepError::UnsupportedContent(format!(
                "the filetype {extension} is not implemented"
            )));
        }

        let _entered = self.collection.span().enter();
        debug!(file_id, pathname, "downloading file");
        self.collection.api().download(
            &ApiRequest::get(FILES_PATH).suffix(format!("/{file_id}")).param("path", pathname),
        )
    }

    /// Every file behind a dataset file, keyed by pathname.
    pub fn download_all(&self, file_id: &str) -> Result<BTreeMap<String, Vec<u8>>> {
        self.file_pathnames(file_id)?
            .into_iter()
            .map(|pathname| {
                let bytes = self.download_file(file_id, &pathname)?;
                Ok((pathname, bytes))
            })
            .collect()
    }
}
