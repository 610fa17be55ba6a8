//! `generateContent` summarization adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::dto::{
    GeminiContentDto, GeminiPartDto, GeminiRequestDto, GeminiResponseDto, GenerationConfigDto,
};
use super::{decode_success, map_status_error, map_transport_error};
use crate::domain::ports::{SummaryProvider, SummaryProviderError, SummaryRequest};

/// Public API host used when no base URL is configured.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

const API_KEY_HEADER: &str = "x-goog-api-key";
const TEMPERATURE: f32 = 0.2;
const MAX_OUTPUT_TOKENS: u32 = 250;

/// Summary provider posting to `{base}/v1/models/{model}:generateContent`.
pub struct GeminiSummaryProvider {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl GeminiSummaryProvider {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint cannot be formed from `base_url`
    /// and `model`, or when the reqwest client cannot be constructed.
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SummaryProviderError> {
        let endpoint = Url::parse(&format!(
            "{}/v1/models/{model}:generateContent",
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
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl SummaryProvider for GeminiSummaryProvider {
    async fn summarize(
        &self,
        request: &SummaryRequest,
    ) -> Result<Option<String>, SummaryProviderError> {
        let payload = GeminiRequestDto {
            contents: [GeminiContentDto {
                parts: [GeminiPartDto {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfigDto {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let decoded = decode_success::<GeminiResponseDto>(body.as_ref())?;
        Ok(decoded.and_then(GeminiResponseDto::into_text))
    }
}
