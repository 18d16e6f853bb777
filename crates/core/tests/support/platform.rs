//! Scripted in-memory implementation of `PlatformApi`.
//!
//! Responses are consumed in the order they were scripted, regardless of
//! which operation asks for them. Every call is recorded so tests can assert
//! on the exact request sequence.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use aep_core::{classify, PlatformApi};
use aep_domain::{
    AepError, ApiRequest, ApiResponse, EndpointDescriptor, EndpointPath, HeaderMapping,
    HttpMethod, Result as DomainResult,
};
use serde_json::Value;

pub const BASE_URL: &str = "https://platform.test";

/// One recorded call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub request: ApiRequest,
    /// Form field name for multipart posts
    pub multipart_field: Option<String>,
    /// Absolute URL for `get_url`
    pub absolute_url: Option<String>,
}

#[derive(Default)]
struct State {
    responses: VecDeque<DomainResult<ApiResponse>>,
    downloads: VecDeque<DomainResult<Vec<u8>>>,
    calls: Vec<RecordedCall>,
}

/// In-memory mock for `PlatformApi`.
#[derive(Default, Clone)]
pub struct MockPlatformApi {
    state: Arc<Mutex<State>>,
}

impl MockPlatformApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response, classified exactly like the HTTP adapter does.
    pub fn respond(self, status: u16, body: Value) -> Self {
        let text = if body.is_null() { String::new() } else { body.to_string() };
        let response = classify(status, BASE_URL, &text);
        self.state.lock().unwrap().responses.push_back(response);
        self
    }

    /// Script a transport-level failure.
    pub fn fail(self, error: AepError) -> Self {
        self.state.lock().unwrap().responses.push_back(Err(error));
        self
    }

    pub fn respond_bytes(self, bytes: &[u8]) -> Self {
        self.state.lock().unwrap().downloads.push_back(Ok(bytes.to_vec()));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.calls().into_iter().map(|call| call.request).collect()
    }

    /// `(METHOD, path + suffix)` pairs in call order.
    pub fn call_summary(&self) -> Vec<(HttpMethod, String)> {
        self.requests()
            .into_iter()
            .map(|request| (request.method, format!("{}{}", request.path, request.url_suffix)))
            .collect()
    }

    pub fn remaining(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.responses.len() + state.downloads.len()
    }

    /// Paths resolve under `BASE_URL` as long as they are well-formed.
    fn endpoint(&self, path: &str) -> DomainResult<EndpointDescriptor> {
        let parsed = EndpointPath::parse(path)?;
        Ok(EndpointDescriptor {
            base_url: format!("{BASE_URL}/{}/{}", parsed.collection, parsed.endpoint),
            extra_headers: HeaderMapping::new(),
        })
    }

    fn record(&self, call: RecordedCall) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn next_response(&self) -> DomainResult<ApiResponse> {
        self.state
            .lock()
            .unwrap()
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(AepError::Transport("no scripted response left".into())))
    }
}

impl PlatformApi for MockPlatformApi {
    fn request(&self, request: &ApiRequest) -> DomainResult<ApiResponse> {
        self.endpoint(&request.path)?;
        self.record(RecordedCall {
            request: request.clone(),
            multipart_field: None,
            absolute_url: None,
        });
        self.next_response()
    }

    fn get_url(&self, url: &str, headers: &HeaderMapping) -> DomainResult<ApiResponse> {
        let mut request = ApiRequest::get(url);
        request.headers = headers.clone();
        self.record(RecordedCall {
            request,
            multipart_field: None,
            absolute_url: Some(url.to_string()),
        });
        self.next_response()
    }

    fn download(&self, request: &ApiRequest) -> DomainResult<Vec<u8>> {
        self.endpoint(&request.path)?;
        self.record(RecordedCall {
            request: request.clone(),
            multipart_field: None,
            absolute_url: None,
        });
        self.state
            .lock()
            .unwrap()
            .downloads
            .pop_front()
            .unwrap_or_else(|| Err(AepError::Transport("no scripted download left".into())))
    }

    fn post_multipart(&self, path: &str, field: &str, value: &Value) -> DomainResult<ApiResponse> {
        self.endpoint(path)?;
        self.record(RecordedCall {
            request: ApiRequest::post(path).body(value.clone()),
            multipart_field: Some(field.to_string()),
            absolute_url: None,
        });
        self.next_response()
    }
}
