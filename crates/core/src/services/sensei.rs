//! ML service: engines, instances, experiments, runs and trained models

use aep_domain::constants::{EXPERIMENT_RUN_CONTENT_TYPE, HEADER_ACCEPT, HEADER_CONTENT_TYPE};
use aep_domain::types::resource::{ENGINE, EXPERIMENT, EXPERIMENT_RUN, ML_INSTANCE, MODEL};
use aep_domain::{AepError, ApiRequest, ExperimentRun, PollSpec, Resource, Result};
use serde_json::Value;
use tracing::{info, Span};

use crate::polling::{Sleeper, StatusPoller};
use crate::ports::PlatformApi;
use crate::resources::{page_count, Collection};

const ENGINE_FORM_FIELD: &str = "engine";

/// Endpoints under `sensei`
pub struct SenseiService<'a> {
    collection: Collection<'a>,
}

impl<'a> SenseiService<'a> {
    pub const NAME: &'static str = "sensei";

    pub fn new(api: &'a dyn PlatformApi) -> Self {
        Self { collection: Collection::new(api, Self::NAME) }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.collection = self.collection.with_span(span);
        self
    }

    /// Engines are created with a multipart form carrying the definition
    /// as a JSON text field.
    pub fn create_engine(&self, definition: &Value) -> Result<Resource> {
        let _entered = self.collection.span().enter();
        let response =
            self.collection.api().post_multipart(&ENGINE.path(), ENGINE_FORM_FIELD, definition)?;
        Resource::from_definition(&ENGINE, response.body)
    }

    pub fn get_engine(&self, id: &str) -> Result<Resource> {
        self.collection.get(&ENGINE, id)
    }

    pub fn create_mlinstance(&self, definition: Value) -> Result<Resource> {
        self.collection.create(&ML_INSTANCE, definition)
    }

    pub fn get_mlinstance(&self, id: &str) -> Result<Resource> {
        self.collection.get(&ML_INSTANCE, id)
    }

    pub fn create_experiment(&self, definition: Value) -> Result<Resource> {
        self.collection.create(&EXPERIMENT, definition)
    }

    pub fn get_experiment(&self, id: &str) -> Result<Resource> {
        self.collection.get(&EXPERIMENT, id)
    }

    /// Start a training or scoring run under an experiment.
    pub fn start_experiment_run(
        &self,
        experiment_id: &str,
        definition: Value,
    ) -> Result<ExperimentRun> {
        let _entered = self.collection.span().enter();
        let request = ApiRequest::post(EXPERIMENT.path())
            .suffix(format!("/{experiment_id}/runs"))
            .header(HEADER_CONTENT_TYPE, EXPERIMENT_RUN_CONTENT_TYPE)
            .header(HEADER_ACCEPT, EXPERIMENT_RUN_CONTENT_TYPE)
            .body(definition);
        let response = self.collection.api().request(&request)?;
        let run = Resource::from_definition(&EXPERIMENT_RUN, response.body)?;
        info!(experiment_id, run_id = run.id(), "started experiment run");
        Ok(ExperimentRun { run, experiment_id: experiment_id.to_string() })
    }

    /// Status document of a run.
    pub fn experiment_run_status(&self, run: &ExperimentRun) -> Result<Value> {
        let _entered = self.collection.span().enter();
        let run_id = run.run.require_id()?;
        self.collection
            .api()
            .request(
                &ApiRequest::get(EXPERIMENT.path())
                    .suffix(format!("/{}/runs/{run_id}/status", run.experiment_id)),
            )
            .map(|response| response.body)
    }

    pub fn wait_for_experiment_run<S: Sleeper>(
        &self,
        poller: &StatusPoller<S>,
        run: &ExperimentRun,
        spec: &PollSpec,
    ) -> Result<Value> {
        poller.poll(spec, || self.experiment_run_status(run))
    }

    /// All models trained under an experiment.
    pub fn models_for_experiment(&self, experiment_id: &str) -> Result<Vec<Resource>> {
        let params = vec![("property".to_string(), format!("experimentId=={experiment_id}"))];
        let models = self.models(params, experiment_id)?;
        if models.is_empty() {
            return Err(AepError::NotFound(format!("no model found for {experiment_id}")));
        }
        Ok(models)
    }

    /// The first model of an experiment, sorted on creation time.
    pub fn latest_model(&self, experiment_id: &str) -> Result<Resource> {
        let params = vec![
            ("property".to_string(), format!("experimentId=={experiment_id}")),
            ("sortDescending".to_string(), "0".to_string()),
            ("sortField".to_string(), "created".to_string()),
        ];
        self.models(params, experiment_id)?
            .into_iter()
            .next()
            .ok_or_else(|| AepError::NotFound(format!("no model found for {experiment_id}")))
    }

    /// The single model produced by a run.
    pub fn model_for_run(&self, run_id: &str) -> Result<Resource> {
        let params = vec![("property".to_string(), format!("experimentRunId=={run_id}"))];
        let mut models = self.models(params, run_id)?;
        match models.len() {
            0 => Err(AepError::NotFound(format!("no model found for {run_id}"))),
            1 => Ok(models.remove(0)),
            _ => Err(AepError::InvalidInput(format!("more than 1 model found for {run_id}"))),
        }
    }

    fn models(&self, params: Vec<(String, String)>, owner: &str) -> Result<Vec<Resource>> {
        let body = self.collection.query(&MODEL, params)?;
        if page_count(&body, "model listing")? == 0 {
            return Err(AepError::NotFound(format!("no model found for {owner}")));
        }
        Ok(MODEL
            .extract_items(&body)?
            .into_iter()
            .map(|(id, definition)| Resource::with_id(&MODEL, id, definition))
            .collect())
    }
}
