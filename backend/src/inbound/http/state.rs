//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, NotesCommand, NotesQuery, SummarizeCommand, UserProfileQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub notes: Arc<dyn NotesQuery>,
    pub notes_command: Arc<dyn NotesCommand>,
    pub summarize: Arc<dyn SummarizeCommand>,
    pub accounts: Arc<dyn AccountCommand>,
    pub profiles: Arc<dyn UserProfileQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub notes: Arc<dyn NotesQuery>,
    pub notes_command: Arc<dyn NotesCommand>,
    pub summarize: Arc<dyn SummarizeCommand>,
    pub accounts: Arc<dyn AccountCommand>,
    pub profiles: Arc<dyn UserProfileQuery>,
    /// Origin prefixed to redirect targets; relative redirects when absent.
    pub public_origin: Option<String>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use notes_backend::domain::{AccountService, NotesService, SummarizationService};
    /// use notes_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use notes_backend::outbound::memory::{
    ///     InMemoryIdentityProvider, InMemoryNoteRepository, InMemoryProfileRepository,
    /// };
    ///
    /// let summarize = Arc::new(SummarizationService::unconfigured());
    /// let notes = Arc::new(NotesService::new(
    ///     Arc::new(InMemoryNoteRepository::default()),
    ///     summarize.clone(),
    ///     std::time::Duration::from_secs(300),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let accounts = Arc::new(AccountService::new(
    ///     Arc::new(InMemoryIdentityProvider::default()),
    ///     Arc::new(InMemoryProfileRepository::default()),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(HttpStatePorts {
    ///     notes: notes.clone(),
    ///     notes_command: notes,
    ///     summarize,
    ///     accounts: accounts.clone(),
    ///     profiles: accounts,
    /// });
    /// assert!(state.public_origin.is_none());
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            notes,
            notes_command,
            summarize,
            accounts,
            profiles,
        } = ports;
        Self {
            notes,
            notes_command,
            summarize,
            accounts,
            profiles,
            public_origin: None,
        }
    }

    /// Prefix redirect targets with `origin` (for example `https://notes.example`).
    pub fn with_public_origin(mut self, origin: Option<String>) -> Self {
        self.public_origin = origin.map(|origin| origin.trim_end_matches('/').to_owned());
        self
    }

    /// Absolute or relative location for `path`.
    pub(crate) fn location(&self, path: &str) -> String {
        match &self.public_origin {
            Some(origin) => format!("{origin}{path}"),
            None => path.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::mock_ports;
    use rstest::rstest;

    #[rstest]
    #[case(None, "/dashboard")]
    #[case(Some("https://notes.example/"), "https://notes.example/dashboard")]
    fn locations_honour_the_public_origin(#[case] origin: Option<&str>, #[case] expected: &str) {
        let state = HttpState::new(mock_ports()).with_public_origin(origin.map(str::to_owned));
        assert_eq!(state.location("/dashboard"), expected);
    }
}
