//! Authenticated request primitive
//!
//! [`PlatformClient`] is the only place that talks to the platform. Every
//! call resolves a dotted registry path, sends through the shared
//! [`HttpSession`] and classifies the status with
//! [`aep_core::response::classify`].

use aep_core::response::{classify, ensure_accepted};
use aep_core::{EndpointRegistry, PlatformApi, StatusPoller};
use aep_domain::constants::HEADER_CONTENT_TYPE;
use aep_domain::{
    AepError, ApiRequest, ApiResponse, EndpointDescriptor, HeaderMapping, HttpMethod, PollSpec,
    QueryParams, Result,
};
use reqwest::blocking::multipart::Form;
use reqwest::blocking::Response;
use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::{debug, warn, Span};

use crate::errors::InfraError;
use crate::http::{header_map, HttpSession};

/// Platform API client over one authenticated session
pub struct PlatformClient {
    session: HttpSession,
    registry: EndpointRegistry,
    span: Span,
}

impl PlatformClient {
    pub fn new(session: HttpSession, registry: EndpointRegistry) -> Self {
        Self { session, registry, span: Span::none() }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    pub fn session(&self) -> &HttpSession {
        &self.session
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn get(&self, path: &str, params: QueryParams, url_suffix: &str) -> Result<ApiResponse> {
        self.request(&ApiRequest::get(path).params(params).suffix(url_suffix))
    }

    pub fn post(
        &self,
        path: &str,
        body: Value,
        params: QueryParams,
        url_suffix: &str,
    ) -> Result<ApiResponse> {
        self.request(&ApiRequest::post(path).body(body).params(params).suffix(url_suffix))
    }

    /// PATCH
    pub fn update(
        &self,
        path: &str,
        body: Value,
        params: QueryParams,
        url_suffix: &str,
    ) -> Result<ApiResponse> {
        self.request(&ApiRequest::patch(path).body(body).params(params).suffix(url_suffix))
    }

    pub fn delete(
        &self,
        path: &str,
        body: Value,
        params: QueryParams,
        url_suffix: &str,
    ) -> Result<ApiResponse> {
        self.request(&ApiRequest::delete(path).body(body).params(params).suffix(url_suffix))
    }

    /// Poll an absolute status URL until the job reaches a terminal status.
    pub fn poll(&self, poll_url: &str, headers: &HeaderMapping, spec: &PollSpec) -> Result<Value> {
        StatusPoller::new().with_span(self.span.clone()).poll_url(self, poll_url, headers, spec)
    }

    fn resolve_url(&self, request: &ApiRequest) -> Result<(String, &EndpointDescriptor)> {
        let endpoint = self.registry.resolve(&request.path)?;
        Ok((format!("{}{}", endpoint.base_url, request.url_suffix), endpoint))
    }

    fn read_classified(&self, response: Response, url: &str) -> Result<ApiResponse> {
        let status = response.status().as_u16();
        let text = response.text().map_err(|err| AepError::from(InfraError::from(err)))?;
        let parsed = classify(status, url, &text)?;
        if let Some(advisory) = parsed.advisory {
            warn!(status, url, advisory = advisory.message(), "non-fatal response status");
        }
        Ok(parsed)
    }
}

impl PlatformApi for PlatformClient {
    fn request(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let _entered = self.span.enter();
        let (url, endpoint) = self.resolve_url(request)?;

        let headers = request_headers(endpoint, request)?;

        let body = serde_json::to_string(&request.body)
            .map_err(|err| AepError::from(InfraError::from(err)))?;

        let mut builder =
            self.session.request(request.method, url.as_str()).headers(headers);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }

        let response = self.session.send(builder.body(body))?;
        self.read_classified(response, &url)
    }

    fn get_url(&self, url: &str, headers: &HeaderMapping) -> Result<ApiResponse> {
        let _entered = self.span.enter();
        let builder = self.session.request(HttpMethod::Get, url).headers(header_map(headers)?);
        let response = self.session.send(builder)?;
        self.read_classified(response, url)
    }

    fn download(&self, request: &ApiRequest) -> Result<Vec<u8>> {
        let _entered = self.span.enter();
        let (url, endpoint) = self.resolve_url(request)?;

        let headers = request_headers(endpoint, request)?;

        let mut builder =
            self.session.request(request.method, url.as_str()).headers(headers);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }

        let response = self.session.send(builder)?;
        let status = response.status().as_u16();
        let bytes = response.bytes().map_err(|err| AepError::from(InfraError::from(err)))?;
        ensure_accepted(status, &url, &String::from_utf8_lossy(&bytes))?;
        debug!(url = %url, size = bytes.len(), "downloaded file");
        Ok(bytes.to_vec())
    }

    fn post_multipart(&self, path: &str, field: &str, value: &Value) -> Result<ApiResponse> {
        let _entered = self.span.enter();
        let request = ApiRequest::post(path);
        let (url, endpoint) = self.resolve_url(&request)?;

        // reqwest sets the multipart boundary in its own Content-Type
        let headers: HeaderMapping = endpoint
            .extra_headers
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case(HEADER_CONTENT_TYPE))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let text =
            serde_json::to_string(value).map_err(|err| AepError::from(InfraError::from(err)))?;
        let form = Form::new().text(field.to_string(), text);

        let builder = self
            .session
            .request(request.method, url.as_str())
            .headers(header_map(&headers)?)
            .multipart(form);

        let response = self.session.send(builder)?;
        self.read_classified(response, &url)
    }
}

/// Endpoint headers overlaid with the call's own; names match ignoring case.
fn request_headers(endpoint: &EndpointDescriptor, request: &ApiRequest) -> Result<HeaderMap> {
    let mut headers = header_map(&endpoint.extra_headers)?;
    headers.extend(header_map(&request.headers)?);
    Ok(headers)
}
