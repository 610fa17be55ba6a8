//! Driven port for the text summarization provider.
//!
//! The domain owns the prompt; adapters only transport it and extract text.

use async_trait::async_trait;

use super::define_port_error;

/// What to send to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    /// Instructions for chat-style providers that accept a system role.
    pub system_instruction: String,
    /// Full prompt, including the content to summarize.
    pub prompt: String,
}

define_port_error! {
    /// Errors surfaced while calling the summarization provider.
    pub enum SummaryProviderError {
        /// Provider rejected the configured API key.
        Authentication { status: u16 } =>
            "provider rejected credentials with status {status}",
        /// Provider answered with a non-success status.
        Status { status: u16, message: String } =>
            "provider failed with status {status}: {message}",
        /// Network transport failed before receiving a response.
        Transport { message: String } => "provider transport failed: {message}",
        /// The call exceeded the configured timeout.
        Timeout { message: String } => "provider timeout: {message}",
        /// The response body was not JSON.
        Decode { message: String } => "provider response decode failed: {message}",
    }
}

/// Port for generating summaries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Return the generated text, or `None` when the response carried none.
    async fn summarize(&self, request: &SummaryRequest)
    -> Result<Option<String>, SummaryProviderError>;
}
