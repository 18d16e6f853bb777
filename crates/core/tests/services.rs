//! Collection services against a scripted platform

mod support;

use std::time::Duration;

use aep_core::{
    CatalogService, DataAccessService, FlowService, SchemaRegistryService, SegmentationService,
    SenseiService, StatusPoller,
};
use aep_domain::constants::EXPERIMENT_RUN_CONTENT_TYPE;
use aep_domain::types::resource::SCHEMA;
use aep_domain::{AepError, ErrorCategory, HttpMethod, PatchOp, PollSpec, Resource};
use serde_json::{json, Value};
use support::platform::MockPlatformApi;
use support::sleeper::RecordingSleeper;

fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

// ============================================================================
// Catalog
// ============================================================================

#[test]
fn test_create_and_delete_dataset() {
    let api = MockPlatformApi::new()
        .respond(201, json!(["@/dataSets/5f3a"]))
        .respond(200, json!(["@/dataSets/5f3a"]));
    let catalog = CatalogService::new(&api);

    let mut dataset = catalog.create_dataset(json!({ "name": "profiles" })).unwrap();
    assert_eq!(dataset.id(), Some("5f3a"));

    catalog.delete_dataset(&mut dataset).unwrap();
    assert!(dataset.is_deleted());
    assert_eq!(
        api.call_summary(),
        [
            (HttpMethod::Post, "catalogservice.dataset".to_string()),
            (HttpMethod::Delete, "catalogservice.dataset/5f3a".to_string()),
        ]
    );
}

#[test]
fn test_batches_for_dataset_filters_on_status() {
    let listing = json!({ "b-1": { "status": "success" }, "b-2": { "status": "success" } });
    let api = MockPlatformApi::new().respond(200, listing.clone()).respond(200, listing);
    let catalog = CatalogService::new(&api);

    let batches = catalog.successful_batches("ds-1").unwrap();
    assert_eq!(batches.iter().filter_map(Resource::id).collect::<Vec<_>>(), ["b-1", "b-2"]);
    catalog.batches_for_dataset("ds-1", None).unwrap();

    let requests = api.requests();
    assert_eq!(param(&requests[0].params, "dataSet"), Some("ds-1"));
    assert_eq!(param(&requests[0].params, "status"), Some("success"));
    assert_eq!(param(&requests[1].params, "status"), None);
}

#[test]
fn test_dataset_files_of_empty_batch() {
    let api = MockPlatformApi::new().respond(200, json!({ "data": [], "_page": { "count": 0 } }));
    let catalog = CatalogService::new(&api);

    assert!(catalog.dataset_files("batch-1").unwrap().is_empty());
    assert_eq!(
        api.call_summary(),
        [(HttpMethod::Get, "dataaccess.dataaccess/batch-1/files".to_string())]
    );
}

#[test]
fn test_dataset_files_of_batch() {
    let api = MockPlatformApi::new().respond(
        200,
        json!({
            "data": [{ "dataSetFileId": "f-1" }, { "dataSetFileId": "f-2" }],
            "_page": { "count": 2 }
        }),
    );
    let catalog = CatalogService::new(&api);

    let files = catalog.dataset_files("batch-1").unwrap();
    assert_eq!(files.iter().filter_map(Resource::id).collect::<Vec<_>>(), ["f-1", "f-2"]);
}

// ============================================================================
// Data access
// ============================================================================

#[test]
fn test_download_all_parquet_files() {
    let api = MockPlatformApi::new()
        .respond(200, json!({ "data": [{ "name": "part-0.parquet" }, { "name": "part-1.parquet" }] }))
        .respond_bytes(b"PAR1-a")
        .respond_bytes(b"PAR1-b");
    let data_access = DataAccessService::new(&api);

    let files = data_access.download_all("f-1").unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(files["part-0.parquet"], b"PAR1-a");
    assert_eq!(files["part-1.parquet"], b"PAR1-b");
    let requests = api.requests();
    assert_eq!(requests[1].url_suffix, "/f-1");
    assert_eq!(param(&requests[1].params, "path"), Some("part-0.parquet"));
}

#[test]
fn test_non_parquet_download_makes_no_request() {
    let api = MockPlatformApi::new();
    let data_access = DataAccessService::new(&api);

    for pathname in ["export.csv", "README"] {
        let err = data_access.download_file("f-1", pathname).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Content);
    }
    assert!(api.calls().is_empty());
}

// ============================================================================
// Flow service
// ============================================================================

#[test]
fn test_start_flowrun_posts_then_fetches() {
    let api = MockPlatformApi::new()
        .respond(201, json!({ "id": "run-1", "etag": "\"1\"" }))
        .respond(200, json!({ "items": [{ "id": "run-1", "flowId": "flow-1" }] }));
    let flows = FlowService::new(&api);

    let run = flows.start_flowrun("flow-1").unwrap();

    assert_eq!(run.id(), Some("run-1"));
    let requests = api.requests();
    assert_eq!(requests[0].body, json!({ "status": "active", "flowId": "flow-1" }));
    assert_eq!(requests[1].url_suffix, "/run-1");
}

#[test]
fn test_flowruns_for_flow_uses_property_filter() {
    let api = MockPlatformApi::new()
        .respond(200, json!({ "items": [{ "id": "run-1" }, { "id": "run-2" }] }));
    let flows = FlowService::new(&api);

    let runs = flows.flowruns_for_flow("flow-1").unwrap();

    assert_eq!(runs.len(), 2);
    assert_eq!(param(&api.requests()[0].params, "property"), Some("flowId==flow-1"));
}

#[test]
fn test_wait_for_flowrun() {
    let running = json!({ "items": [{ "id": "r", "metrics": { "statusSummary": { "status": "inProgress" } } }] });
    let done = json!({ "items": [{ "id": "r", "metrics": { "statusSummary": { "status": "success" } } }] });
    let api = MockPlatformApi::new().respond(200, running).respond(200, done.clone());
    let flows = FlowService::new(&api);
    let poller = StatusPoller::with_sleeper(RecordingSleeper::new());
    let spec = PollSpec::flow_run().initial_wait(Duration::ZERO).poll_interval(Duration::ZERO);

    let document = flows.wait_for_flowrun(&poller, "r", &spec).unwrap();
    assert_eq!(document, done);
}

// ============================================================================
// Schema registry
// ============================================================================

const SCHEMA_ID: &str = "https://ns.adobe.com/tenant/schemas/abc123";

#[test]
fn test_get_schema_encodes_id() {
    let api = MockPlatformApi::new().respond(200, json!({ "$id": SCHEMA_ID, "title": "Profile" }));
    let registry = SchemaRegistryService::new(&api);

    let schema = registry.get_schema(SCHEMA_ID).unwrap();

    assert_eq!(schema.id(), Some(SCHEMA_ID));
    assert_eq!(
        api.requests()[0].url_suffix,
        "/https%3A%2F%2Fns.adobe.com%2Ftenant%2Fschemas%2Fabc123"
    );
}

#[test]
fn test_enable_for_profile_patches_immutable_tags() {
    let tagged = json!({ "$id": SCHEMA_ID, "meta:immutableTags": ["union"] });
    let api = MockPlatformApi::new().respond(200, json!({})).respond(200, tagged.clone());
    let registry = SchemaRegistryService::new(&api);
    let mut schema = Resource::from_definition(&SCHEMA, json!({ "$id": SCHEMA_ID })).unwrap();

    registry.enable_schema_for_profile(&mut schema).unwrap();

    let requests = api.requests();
    assert_eq!(requests[0].method, HttpMethod::Patch);
    assert_eq!(
        requests[0].body,
        json!([{ "op": "add", "path": "/meta:immutableTags", "value": ["union"] }])
    );
    assert_eq!(requests[1].method, HttpMethod::Get);
    assert_eq!(schema.definition(), Some(&tagged));
}

#[test]
fn test_patch_schema_replace() {
    let api = MockPlatformApi::new().respond(200, json!({})).respond(200, json!({ "$id": SCHEMA_ID }));
    let registry = SchemaRegistryService::new(&api);
    let mut schema = Resource::from_definition(&SCHEMA, json!({ "$id": SCHEMA_ID })).unwrap();

    registry.patch_schema(&mut schema, PatchOp::Replace, "/title", json!("Renamed")).unwrap();

    assert_eq!(api.requests()[0].body[0]["op"], "replace");
}

#[test]
fn test_descriptor_id_is_not_encoded() {
    let api = MockPlatformApi::new().respond(200, json!({ "@id": "d-1" }));
    let registry = SchemaRegistryService::new(&api);

    registry.get_descriptor("d-1").unwrap();
    assert_eq!(api.requests()[0].url_suffix, "/d-1");
}

// ============================================================================
// Segmentation
// ============================================================================

fn segment_job_spec() -> PollSpec {
    PollSpec::new("status", "SUCCEEDED", "PROCESSING", "FAILED")
}

#[test]
fn test_wait_for_segment_job() {
    let api = MockPlatformApi::new()
        .respond(201, json!({ "id": "job-1", "status": "NEW" }))
        .respond(200, json!({ "id": "job-1", "status": "PROCESSING" }))
        .respond(200, json!({ "id": "job-1", "status": "SUCCEEDED" }));
    let segmentation = SegmentationService::new(&api);
    let sleeper = RecordingSleeper::new();
    let poller = StatusPoller::with_sleeper(sleeper.clone());

    let job = segmentation.create_segment_job(json!({ "segments": [] })).unwrap();
    let spec = segment_job_spec()
        .initial_wait(Duration::from_secs(1))
        .poll_interval(Duration::from_secs(2));
    let document = segmentation.wait_for_segment_job(&poller, job.id().unwrap(), &spec).unwrap();

    assert_eq!(document["status"], "SUCCEEDED");
    assert_eq!(sleeper.sleeps(), [Duration::from_secs(1), Duration::from_secs(2)]);
}

#[test]
fn test_failed_segment_job() {
    let api = MockPlatformApi::new().respond(200, json!({ "status": "FAILED" }));
    let segmentation = SegmentationService::new(&api);
    let poller = StatusPoller::with_sleeper(RecordingSleeper::new());

    let err = segmentation
        .wait_for_segment_job(&poller, "job-1", &segment_job_spec())
        .unwrap_err();
    assert_eq!(err, AepError::ProcessFailed { status: "FAILED".into() });
}

// ============================================================================
// Sensei
// ============================================================================

#[test]
fn test_create_engine_uses_multipart_field() {
    let api = MockPlatformApi::new().respond(200, json!({ "id": "engine-1" }));
    let sensei = SenseiService::new(&api);

    let engine = sensei.create_engine(&json!({ "name": "recommender" })).unwrap();

    assert_eq!(engine.id(), Some("engine-1"));
    let call = &api.calls()[0];
    assert_eq!(call.multipart_field.as_deref(), Some("engine"));
    assert_eq!(call.request.path, "sensei.engine");
    assert_eq!(call.request.body, json!({ "name": "recommender" }));
}

#[test]
fn test_experiment_run_lifecycle() {
    let api = MockPlatformApi::new()
        .respond(200, json!({ "id": "run-9", "mode": "train" }))
        .respond(200, json!({ "id": "run-9", "tasks": [{ "state": "DONE" }] }));
    let sensei = SenseiService::new(&api);

    let run = sensei.start_experiment_run("exp-1", json!({ "mode": "train" })).unwrap();
    assert_eq!(run.experiment_id, "exp-1");
    assert_eq!(run.run.id(), Some("run-9"));

    let status = sensei.experiment_run_status(&run).unwrap();
    assert_eq!(status["tasks"][0]["state"], "DONE");

    let requests = api.requests();
    assert_eq!(requests[0].url_suffix, "/exp-1/runs");
    assert_eq!(
        requests[0].headers.get("Content-Type").map(String::as_str),
        Some(EXPERIMENT_RUN_CONTENT_TYPE)
    );
    assert_eq!(
        requests[0].headers.get("Accept").map(String::as_str),
        Some(EXPERIMENT_RUN_CONTENT_TYPE)
    );
    assert_eq!(requests[1].path, "sensei.experiment");
    assert_eq!(requests[1].url_suffix, "/exp-1/runs/run-9/status");
}

fn models(ids: &[&str]) -> Value {
    let children: Vec<_> = ids.iter().map(|id| json!({ "id": id })).collect();
    json!({ "children": children, "_page": { "count": ids.len() } })
}

#[test]
fn test_model_lookups() {
    let api = MockPlatformApi::new()
        .respond(200, models(&["m-1", "m-2"]))
        .respond(200, models(&["m-2", "m-1"]))
        .respond(200, models(&["m-1"]));
    let sensei = SenseiService::new(&api);

    assert_eq!(sensei.models_for_experiment("exp-1").unwrap().len(), 2);
    assert_eq!(sensei.latest_model("exp-1").unwrap().id(), Some("m-2"));
    assert_eq!(sensei.model_for_run("run-9").unwrap().id(), Some("m-1"));

    let requests = api.requests();
    assert_eq!(param(&requests[0].params, "property"), Some("experimentId==exp-1"));
    assert_eq!(param(&requests[1].params, "sortDescending"), Some("0"));
    assert_eq!(param(&requests[1].params, "sortField"), Some("created"));
    assert_eq!(param(&requests[2].params, "property"), Some("experimentRunId==run-9"));
}

#[test]
fn test_model_for_run_cardinality() {
    let api = MockPlatformApi::new()
        .respond(200, models(&[]))
        .respond(200, models(&["m-1", "m-2"]));
    let sensei = SenseiService::new(&api);

    assert!(matches!(sensei.model_for_run("run-1"), Err(AepError::NotFound(_))));
    assert!(matches!(sensei.model_for_run("run-1"), Err(AepError::InvalidInput(_))));
}
