//! Response status classification
//!
//! The request primitive accepts 200, 201, 202 and 207. 202 and 207 succeed
//! with an advisory attached; every other status is an HTTP request error
//! carrying the status, the response text and the URL.

use aep_domain::constants::ACCEPTED_STATUSES;
use aep_domain::{Advisory, AepError, ApiResponse, Result};
use serde_json::Value;

/// Classify a response and parse its JSON body.
///
/// An empty body on an accepted status parses as `null`.
pub fn classify(status: u16, url: &str, text: &str) -> Result<ApiResponse> {
    ensure_accepted(status, url, text)?;

    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(text).map_err(|e| AepError::InvalidJson {
            url: url.to_string(),
            message: e.to_string(),
        })?
    };

    Ok(ApiResponse { status, body, advisory: Advisory::for_status(status) })
}

/// Status check without body parsing, for binary downloads.
pub fn ensure_accepted(status: u16, url: &str, text: &str) -> Result<()> {
    if ACCEPTED_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AepError::HttpRequest { status, body: text.to_string(), url: url.to_string() })
    }
}
