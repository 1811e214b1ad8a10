use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest plain-text error body that is still shown to the user verbatim.
const MAX_PLAIN_TEXT_ERROR_LEN: usize = 240;

/// Error body a solver may attach to a non-2xx response.
///
/// Servers in the wild use either `message` or `error`; `code` is optional
/// context only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}

/// Pulls a human readable message out of an error response body.
///
/// JSON bodies are searched for `message`/`error`; short plain-text bodies are
/// used as-is. HTML pages and empty bodies yield `None`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('{') {
        return serde_json::from_str::<ApiErrorBody>(trimmed)
            .ok()
            .and_then(ApiErrorBody::into_message);
    }
    if trimmed.starts_with('<') || trimmed.len() > MAX_PLAIN_TEXT_ERROR_LEN {
        return None;
    }
    Some(trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("end coordinate requires both end_lat and end_lng")]
    UnpairedEndCoordinate,
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
