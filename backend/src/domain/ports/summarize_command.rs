//! Driving port for stateless text summarization.

use async_trait::async_trait;

use crate::domain::Error;

/// Domain use-case port for summarizing arbitrary content.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SummarizeCommand: Send + Sync {
    /// Summarize `content`.
    ///
    /// Configuration is checked before the content, and neither failure
    /// reaches the provider.
    async fn summarize(&self, content: Option<String>) -> Result<String, Error>;
}
