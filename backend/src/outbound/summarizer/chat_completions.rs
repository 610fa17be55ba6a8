//! Chat-completions summarization adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::dto::{ChatMessageDto, ChatRequestDto, ChatResponseDto};
use super::{decode_success, map_status_error, map_transport_error};
use crate::domain::ports::{SummaryProvider, SummaryProviderError, SummaryRequest};

/// API root used when no base URL is configured.
pub const DEFAULT_CHAT_BASE_URL: &str = "https://api.openai.com/v1";
/// Model used when none is configured.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 250;

/// Summary provider posting to `{base}/chat/completions` with bearer auth.
///
/// The system instruction travels as its own message, so the user message
/// carries the prompt exactly as built by the domain.
pub struct ChatCompletionsSummaryProvider {
    client: Client,
    endpoint: Url,
    model: String,
    api_key: String,
}

impl ChatCompletionsSummaryProvider {
    /// # Errors
    ///
    /// Returns an error when the endpoint is not a valid URL or the reqwest
    /// client cannot be constructed.
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SummaryProviderError> {
        let endpoint = Url::parse(&format!(
            "{}/chat/completions",
            base_url.trim_end_matches('/')
        ))
        .map_err(|err| SummaryProviderError::transport(format!("invalid endpoint: {err}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(map_transport_error)?;
        Ok(Self {
            client,
            endpoint,
            model: model.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl SummaryProvider for ChatCompletionsSummaryProvider {
    async fn summarize(
        &self,
        request: &SummaryRequest,
    ) -> Result<Option<String>, SummaryProviderError> {
        let payload = ChatRequestDto {
            model: &self.model,
            messages: [
                ChatMessageDto {
                    role: "system",
                    content: &request.system_instruction,
                },
                ChatMessageDto {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let decoded = decode_success::<ChatResponseDto>(body.as_ref())?;
        Ok(decoded.and_then(ChatResponseDto::into_text))
    }
}
