//! Request and response shapes exchanged with the request primitive

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{STATUS_ACCEPTED, STATUS_MULTI_STATUS};
use crate::impl_wire_name_conversions;

/// Extra header names and values, ordered for stable logging
pub type HeaderMapping = BTreeMap<String, String>;

/// Query parameters in the order they are sent
pub type QueryParams = Vec<(String, String)>;

/// The HTTP methods the platform API is driven with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl_wire_name_conversions!(HttpMethod {
    Get => "GET",
    Post => "POST",
    Patch => "PATCH",
    Delete => "DELETE",
});

/// JSON Patch operations accepted by PATCH endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchOp {
    Add,
    Replace,
    Remove,
}

impl_wire_name_conversions!(PatchOp {
    Add => "add",
    Replace => "replace",
    Remove => "remove",
});

/// Non-fatal signal returned next to a successful response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advisory {
    /// 202: accepted, processing may not be complete
    Accepted,
    /// 207: multi-status, inspect the body for per-item outcomes
    MultiStatus,
}

impl Advisory {
    /// Advisory implied by an accepted status code.
    pub fn for_status(status: u16) -> Option<Self> {
        match status {
            STATUS_ACCEPTED => Some(Self::Accepted),
            STATUS_MULTI_STATUS => Some(Self::MultiStatus),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Accepted => "request accepted but processing might not be complete",
            Self::MultiStatus => "multi-status response, check the body for individual status",
        }
    }
}

/// One call through the request primitive
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Dotted registry path, `collection.endpoint`
    pub path: String,
    pub body: Value,
    pub params: QueryParams,
    pub url_suffix: String,
    /// Per-call headers; these win over endpoint and session headers
    pub headers: HeaderMapping,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: Value::Object(serde_json::Map::new()),
            params: Vec::new(),
            url_suffix: String::new(),
            headers: HeaderMapping::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn params(mut self, params: QueryParams) -> Self {
        self.params.extend(params);
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.url_suffix = suffix.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Parsed response of an accepted call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
    pub advisory: Option<Advisory>,
}

impl ApiResponse {
    pub fn into_body(self) -> Value {
        self.body
    }
}
