//! Summarization provider adapters.
//!
//! Two HTTP implementations of the `SummaryProvider` port: a
//! `generateContent` style endpoint and a chat-completions style endpoint.
//! Both share the status and transport error mapping in this module.

mod chat_completions;
mod dto;
mod gemini;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::ports::SummaryProviderError;

pub use chat_completions::{
    ChatCompletionsSummaryProvider, DEFAULT_CHAT_BASE_URL, DEFAULT_CHAT_MODEL,
};
pub use gemini::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GeminiSummaryProvider};

const RESPONSE_PREVIEW_CHARS: usize = 100;

fn map_transport_error(error: reqwest::Error) -> SummaryProviderError {
    if error.is_timeout() {
        SummaryProviderError::timeout(error.to_string())
    } else {
        SummaryProviderError::transport(error.to_string())
    }
}

/// Map a non-success response onto the port error.
///
/// Prefers the provider's `error.message`, falls back to a generic status
/// line for any JSON body without one (including a non-object `error`), and
/// quotes the start of the body when it is not JSON at all.
fn map_status_error(status: StatusCode, body: &[u8]) -> SummaryProviderError {
    let code = status.as_u16();
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return SummaryProviderError::authentication(code);
    }

    let message = match serde_json::from_slice::<Value>(body) {
        Ok(value) => value
            .pointer("/error/message")
            .and_then(Value::as_str)
            .filter(|message| !message.trim().is_empty())
            .map_or_else(|| format!("API error: {code}"), str::to_owned),
        Err(_) => {
            let text = String::from_utf8_lossy(body);
            let preview: String = text.chars().take(RESPONSE_PREVIEW_CHARS).collect();
            format!("Failed to generate summary. Status: {code}, Response: {preview}")
        }
    };
    SummaryProviderError::status(code, message)
}

/// Decode a success body.
///
/// A body that is not JSON is a decode error; JSON that does not match the
/// expected shape yields `None` so callers fall back to a placeholder.
fn decode_success<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, SummaryProviderError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| SummaryProviderError::decode(format!("invalid JSON payload: {err}")))?;
    Ok(serde_json::from_value(value).ok())
}
