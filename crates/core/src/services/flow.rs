//! Flow service: dataflows and their runs

use aep_domain::types::resource::{FLOW, FLOW_RUN};
use aep_domain::utils::json_path::lookup_str;
use aep_domain::{AepError, ApiRequest, PollSpec, Resource, Result};
use serde_json::{json, Value};
use tracing::{info, Span};

use crate::polling::{Sleeper, StatusPoller};
use crate::ports::PlatformApi;
use crate::resources::Collection;

/// Endpoints under `flowservice`
pub struct FlowService<'a> {
    collection: Collection<'a>,
}

impl<'a> FlowService<'a> {
    pub const NAME: &'static str = "flowservice";

    pub fn new(api: &'a dyn PlatformApi) -> Self {
        Self { collection: Collection::new(api, Self::NAME) }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.collection = self.collection.with_span(span);
        self
    }

    pub fn create_flow(&self, definition: Value) -> Result<Resource> {
        self.collection.create(&FLOW, definition)
    }

    pub fn get_flow(&self, id: &str) -> Result<Resource> {
        self.collection.get(&FLOW, id)
    }

    /// All flows, optionally narrowed by a `property` filter such as
    /// `name==ingest`.
    pub fn list_flows(&self, property_filter: Option<&str>) -> Result<Vec<Resource>> {
        self.collection.list(&FLOW, property_params(property_filter))
    }

    pub fn get_flowrun(&self, id: &str) -> Result<Resource> {
        self.collection.get(&FLOW_RUN, id)
    }

    pub fn list_flowruns(&self, property_filter: Option<&str>) -> Result<Vec<Resource>> {
        self.collection.list(&FLOW_RUN, property_params(property_filter))
    }

    pub fn flowruns_for_flow(&self, flow_id: &str) -> Result<Vec<Resource>> {
        self.list_flowruns(Some(&format!("flowId=={flow_id}")))
    }

    /// Start a run of a flow and fetch its full definition.
    pub fn start_flowrun(&self, flow_id: &str) -> Result<Resource> {
        let run_id = {
            let _entered = self.collection.span().enter();
            let body = json!({ "status": "active", "flowId": flow_id });
            let response =
                self.collection.api().request(&ApiRequest::post(FLOW_RUN.path()).body(body))?;
            let run_id = lookup_str(&response.body, "id").map(str::to_string).ok_or_else(|| {
                AepError::MissingField { field: "id".to_string(), context: "flow run".to_string() }
            })?;
            info!(flow_id, run_id = %run_id, "started flow run");
            run_id
        };
        self.get_flowrun(&run_id)
    }

    pub fn refresh_flowrun(&self, run: &mut Resource) -> Result<()> {
        self.collection.refresh(run)
    }

    /// Block until a run reaches a terminal status.
    pub fn wait_for_flowrun<S: Sleeper>(
        &self,
        poller: &StatusPoller<S>,
        run_id: &str,
        spec: &PollSpec,
    ) -> Result<Value> {
        poller.poll(spec, || {
            self.get_flowrun(run_id)
                .map(|run| run.definition().cloned().unwrap_or(Value::Null))
        })
    }
}

fn property_params(property_filter: Option<&str>) -> Vec<(String, String)> {
    property_filter
        .map(|filter| vec![("property".to_string(), filter.to_string())])
        .unwrap_or_default()
}
