use std::time::Duration;

use aep_domain::constants::DEFAULT_TIMEOUT_SECS;
use aep_domain::{AepError, HeaderMapping, HttpMethod, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use tracing::debug;

use crate::errors::InfraError;

/// Authenticated blocking HTTP session.
///
/// Default headers (authentication) are attached to every request unless
/// the request sets the same header itself. Nothing is retried.
#[derive(Clone)]
pub struct HttpSession {
    client: Client,
    default_headers: HeaderMapping,
}

impl HttpSession {
    /// Start building a new session.
    pub fn builder() -> HttpSessionBuilder {
        HttpSessionBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Headers sent with every request.
    pub fn default_headers(&self) -> &HeaderMapping {
        &self.default_headers
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: HttpMethod, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(to_reqwest_method(method), url)
    }

    /// Execute a request once.
    pub fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build().map_err(|err| AepError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request) {
            Ok(response) => {
                let status = response.status();
                debug!(%method, %url, %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }
}

/// Builder for [`HttpSession`].
#[derive(Debug)]
pub struct HttpSessionBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: HeaderMapping,
}

impl Default for HttpSessionBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            default_headers: HeaderMapping::new(),
        }
    }
}

impl HttpSessionBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Headers attached to every request, typically the auth headers.
    pub fn default_headers(mut self, headers: HeaderMapping) -> Self {
        self.default_headers.extend(headers);
        self
    }

    pub fn build(self) -> Result<HttpSession> {
        let mut builder = Client::builder()
            .timeout(self.timeout)
            .default_headers(header_map(&self.default_headers)?)
            .no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(|err| AepError::from(InfraError::from(err)))?;

        Ok(HttpSession { client, default_headers: self.default_headers })
    }
}

/// Convert a header mapping into a reqwest header map.
///
/// Invalid header names or values are configuration errors.
pub fn header_map(headers: &HeaderMapping) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| AepError::Config(format!("invalid header name '{name}': {err}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|err| AepError::Config(format!("invalid value for header '{name}': {err}")))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}
