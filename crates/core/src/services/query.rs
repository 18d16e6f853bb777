//! Query service: ad-hoc and scheduled queries

use aep_domain::types::resource::{QUERY, SCHEDULED_QUERY};
use aep_domain::utils::json_path::lookup_str;
use aep_domain::{AepError, ApiRequest, PatchOp, Resource, Result};
use serde_json::{json, Value};
use tracing::{info, warn, Span};

use crate::ports::PlatformApi;
use crate::resources::Collection;

const STATE_PATH: &str = "/state";
const SCHEDULE_CRON_PATH: &str = "schedule/schedule";
const DISABLED_STATE: &str = "disable";

/// Outcome of applying a new definition to a scheduled query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleUpdate {
    /// The schedule changed and was patched
    Updated,
    /// Nothing to change
    Unchanged,
}

/// Endpoints under `queryservice`
pub struct QueryService<'a> {
    collection: Collection<'a>,
}

impl<'a> QueryService<'a> {
    pub const NAME: &'static str = "queryservice";

    pub fn new(api: &'a dyn PlatformApi) -> Self {
        Self { collection: Collection::new(api, Self::NAME) }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.collection = self.collection.with_span(span);
        self
    }

    pub fn create_query(&self, definition: Value) -> Result<Resource> {
        self.collection.create(&QUERY, definition)
    }

    pub fn get_query(&self, id: &str) -> Result<Resource> {
        self.collection.get(&QUERY, id)
    }

    pub fn create_scheduled_query(&self, definition: Value) -> Result<Resource> {
        self.collection.create(&SCHEDULED_QUERY, definition)
    }

    pub fn get_scheduled_query(&self, id: &str) -> Result<Resource> {
        self.collection.get(&SCHEDULED_QUERY, id)
    }

    /// Scheduled queries whose `query.name` contains `name`, ignoring case.
    ///
    /// Each match is fetched individually so the returned definitions are
    /// complete. No schedules at all, or no match, is [`AepError::NotFound`].
    pub fn scheduled_queries_matching(&self, name: &str) -> Result<Vec<Resource>> {
        let listing = self.collection.list(&SCHEDULED_QUERY, Vec::new())?;
        if listing.is_empty() {
            return Err(AepError::NotFound("no scheduled queries have been found".to_string()));
        }

        let needle = name.to_lowercase();
        let matches = listing
            .iter()
            .filter(|schedule| {
                schedule
                    .definition()
                    .and_then(|definition| lookup_str(definition, "query.name"))
                    .is_some_and(|query_name| query_name.to_lowercase().contains(&needle))
            })
            .filter_map(Resource::id)
            .map(|id| self.get_scheduled_query(id))
            .collect::<Result<Vec<_>>>()?;

        if matches.is_empty() {
            return Err(AepError::NotFound(format!(
                "no scheduled queries have been found with the name {name}"
            )));
        }
        Ok(matches)
    }

    /// Re-fetch a scheduled query; its state moves from preparing to active
    /// after creation.
    pub fn refresh_scheduled_query(&self, scheduled: &mut Resource) -> Result<()> {
        self.collection.refresh(scheduled)
    }

    /// Replace the value at `path` and refresh the definition.
    pub fn patch_scheduled_query(
        &self,
        scheduled: &mut Resource,
        path: &str,
        value: Value,
    ) -> Result<()> {
        let id = scheduled.require_id()?.to_string();
        {
            let _entered = self.collection.span().enter();
            let body = json!({
                "body": [{ "op": PatchOp::Replace.as_str(), "path": path, "value": value }]
            });
            self.collection.api().request(
                &ApiRequest::patch(SCHEDULED_QUERY.path()).suffix(format!("/{id}")).body(body),
            )?;
        }
        self.refresh_scheduled_query(scheduled)
    }

    pub fn change_state(&self, scheduled: &mut Resource, state: &str) -> Result<()> {
        self.patch_scheduled_query(scheduled, STATE_PATH, Value::String(state.to_string()))
    }

    pub fn change_schedule_cron(&self, scheduled: &mut Resource, cron: &str) -> Result<()> {
        self.patch_scheduled_query(scheduled, SCHEDULE_CRON_PATH, Value::String(cron.to_string()))
    }

    /// Bring a scheduled query in line with a new definition.
    ///
    /// Only the schedule can change in place. A different query text fails
    /// with [`AepError::QueryImmutable`]; the query has to be deleted and
    /// deployed again.
    pub fn update_scheduled_query(
        &self,
        scheduled: &mut Resource,
        new_definition: &Value,
    ) -> Result<ScheduleUpdate> {
        let current = scheduled.definition().cloned().unwrap_or(Value::Null);
        if current.get("query") != new_definition.get("query") {
            return Err(AepError::QueryImmutable(
                "query changed, delete this scheduled query and deploy the new definition"
                    .to_string(),
            ));
        }

        let wanted = new_definition.get("schedule");
        if schedule_contained(wanted, current.get("schedule")) {
            info!(id = scheduled.id(), "no schedule changes detected");
            return Ok(ScheduleUpdate::Unchanged);
        }

        let cron = wanted.and_then(|s| s.get("schedule")).and_then(Value::as_str).ok_or_else(|| {
            AepError::MissingField {
                field: "schedule.schedule".to_string(),
                context: "scheduled query definition".to_string(),
            }
        })?;
        info!(id = scheduled.id(), cron, "schedule changed, updating existing scheduled query");
        self.change_schedule_cron(scheduled, cron)?;
        Ok(ScheduleUpdate::Updated)
    }

    /// Disable, then delete a scheduled query.
    ///
    /// The platform often rejects the disable step transiently; an HTTP
    /// failure there is logged and the delete goes ahead regardless.
    pub fn delete_scheduled_query(&self, scheduled: &mut Resource) -> Result<()> {
        match self.change_state(scheduled, DISABLED_STATE) {
            Ok(()) => {}
            Err(err @ AepError::HttpRequest { .. }) => {
                let _entered = self.collection.span().enter();
                warn!(
                    error = %err,
                    kind = err.label(),
                    "disabling scheduled query failed, deleting anyway"
                );
            }
            Err(err) => return Err(err),
        }
        self.collection.delete(scheduled)
    }
}

/// Whether every entry of `wanted` is present with the same value in `current`.
fn schedule_contained(wanted: Option<&Value>, current: Option<&Value>) -> bool {
    match (wanted, current) {
        (None, _) => true,
        (Some(Value::Object(wanted)), Some(Value::Object(current))) => {
            wanted.iter().all(|(key, value)| current.get(key) == Some(value))
        }
        (Some(wanted), current) => Some(wanted) == current,
    }
}
