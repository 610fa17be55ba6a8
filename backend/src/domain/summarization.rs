//! Summarization workflow implementing [`SummarizeCommand`].
//!
//! Checks run in a fixed order: provider configuration first, then content.
//! Neither failure reaches the provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::Error;
use crate::domain::ports::{
    SummarizeCommand, SummaryProvider, SummaryProviderError, SummaryRequest,
};

/// Message returned when no provider is configured.
pub const CONFIGURATION_MESSAGE: &str = "API configuration error. Please contact the administrator.";
/// Summary used when the provider answered without text.
pub const EMPTY_SUMMARY: &str = "No summary generated.";

const SYSTEM_INSTRUCTION: &str = "You are an expert summarizer with exceptional skills in \
distilling information into clear, concise, and insightful summaries.";

const PROMPT_TEMPLATE: &str = "Please create a thoughtful, well-crafted summary of the following \
text. The summary should:
- Capture the core ideas and key points
- Be concise yet comprehensive (2-3 sentences)
- Use engaging language that's easy to understand
- Preserve the original tone and intent of the content
- Highlight any important insights or conclusions

Here's the text to summarize:

";

/// Build the provider request for `content`.
///
/// The prompt repeats the system instruction so providers without a system
/// role receive the same guidance.
pub fn build_request(content: &str) -> SummaryRequest {
    SummaryRequest {
        system_instruction: SYSTEM_INSTRUCTION.to_owned(),
        prompt: format!("{SYSTEM_INSTRUCTION}\n\n{PROMPT_TEMPLATE}{content}"),
    }
}

fn map_provider_error(error: SummaryProviderError) -> Error {
    match error {
        SummaryProviderError::Authentication { status } => {
            Error::upstream("API authentication error. Please check API key configuration.")
                .with_upstream_status(status)
        }
        SummaryProviderError::Status { status, message } => {
            Error::upstream(message).with_upstream_status(status)
        }
        SummaryProviderError::Transport { .. } => {
            Error::upstream("Failed to reach the summarization service").with_upstream_status(502)
        }
        SummaryProviderError::Timeout { .. } => {
            Error::upstream("The summarization service timed out").with_upstream_status(504)
        }
        SummaryProviderError::Decode { .. } => Error::upstream("Failed to generate summary")
            .with_upstream_status(500),
    }
}

/// Summarization service backed by an optional provider.
#[derive(Clone)]
pub struct SummarizationService {
    provider: Option<Arc<dyn SummaryProvider>>,
}

impl SummarizationService {
    pub fn new(provider: Arc<dyn SummaryProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Service without a provider; every call fails with a configuration
    /// error.
    pub fn unconfigured() -> Self {
        Self { provider: None }
    }
}

#[async_trait]
impl SummarizeCommand for SummarizationService {
    async fn summarize(&self, content: Option<String>) -> Result<String, Error> {
        let Some(provider) = self.provider.as_ref() else {
            error!("summarization provider API key is not configured");
            return Err(Error::configuration(CONFIGURATION_MESSAGE));
        };

        let content = content.unwrap_or_default();
        if content.trim().is_empty() {
            return Err(Error::invalid_request("Content is required"));
        }

        info!(content_length = content.len(), "requesting summary");
        let request = build_request(&content);
        match provider.summarize(&request).await {
            Ok(Some(summary)) if !summary.trim().is_empty() => Ok(summary),
            Ok(_) => Ok(EMPTY_SUMMARY.to_owned()),
            Err(err) => {
                warn!(error = %err, "summarization provider failed");
                Err(map_provider_error(err))
            }
        }
    }
}
