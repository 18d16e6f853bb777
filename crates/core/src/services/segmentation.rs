//! Segmentation service: segment evaluation jobs

use aep_domain::types::resource::SEGMENT_JOB;
use aep_domain::{ApiRequest, PollSpec, Resource, Result};
use serde_json::Value;
use tracing::Span;

use crate::polling::{Sleeper, StatusPoller};
use crate::ports::PlatformApi;
use crate::resources::Collection;

/// Endpoints under `segmentationservice`
pub struct SegmentationService<'a> {
    collection: Collection<'a>,
}

impl<'a> SegmentationService<'a> {
    pub const NAME: &'static str = "segmentationservice";

    pub fn new(api: &'a dyn PlatformApi) -> Self {
        Self { collection: Collection::new(api, Self::NAME) }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.collection = self.collection.with_span(span);
        self
    }

    pub fn create_segment_job(&self, definition: Value) -> Result<Resource> {
        self.collection.create(&SEGMENT_JOB, definition)
    }

    pub fn get_segment_job(&self, id: &str) -> Result<Resource> {
        self.collection.get(&SEGMENT_JOB, id)
    }

    /// Current job document, for polling.
    pub fn segment_job_status(&self, id: &str) -> Result<Value> {
        let _entered = self.collection.span().enter();
        self.collection
            .api()
            .request(&ApiRequest::get(SEGMENT_JOB.path()).suffix(format!("/{id}")))
            .map(|response| response.body)
    }

    /// New jobs report NEW or QUEUED before PROCESSING; `spec` has a single
    /// wait value, so choose an initial wait that outlasts the queue.
    pub fn wait_for_segment_job<S: Sleeper>(
        &self,
        poller: &StatusPoller<S>,
        id: &str,
        spec: &PollSpec,
    ) -> Result<Value> {
        poller.poll(spec, || self.segment_job_status(id))
    }
}
