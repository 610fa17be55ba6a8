//! Wire DTOs for the summarization providers.
//!
//! Response DTOs make every field optional so that partial responses decode
//! and extraction decides what is missing.

use serde::{Deserialize, Serialize};

// generateContent

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GeminiRequestDto<'a> {
    pub(super) contents: [GeminiContentDto<'a>; 1],
    pub(super) generation_config: GenerationConfigDto,
}

#[derive(Debug, Serialize)]
pub(super) struct GeminiContentDto<'a> {
    pub(super) parts: [GeminiPartDto<'a>; 1],
}

#[derive(Debug, Serialize)]
pub(super) struct GeminiPartDto<'a> {
    pub(super) text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerationConfigDto {
    pub(super) temperature: f32,
    pub(super) max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct GeminiResponseDto {
    #[serde(default)]
    candidates: Vec<GeminiCandidateDto>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateDto {
    content: Option<GeminiCandidateContentDto>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContentDto {
    #[serde(default)]
    parts: Vec<GeminiCandidatePartDto>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePartDto {
    text: Option<String>,
}

impl GeminiResponseDto {
    /// Text of the first part of the first candidate.
    pub(super) fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

// chat completions

#[derive(Debug, Serialize)]
pub(super) struct ChatRequestDto<'a> {
    pub(super) model: &'a str,
    pub(super) messages: [ChatMessageDto<'a>; 2],
    pub(super) temperature: f32,
    pub(super) max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct ChatMessageDto<'a> {
    pub(super) role: &'static str,
    pub(super) content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ChatResponseDto {
    #[serde(default)]
    choices: Vec<ChatChoiceDto>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceDto {
    message: Option<ChatChoiceMessageDto>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessageDto {
    content: Option<String>,
}

impl ChatResponseDto {
    /// Content of the first choice's message.
    pub(super) fn into_text(self) -> Option<String> {
        self.choices.into_iter().next()?.message?.content
    }
}
