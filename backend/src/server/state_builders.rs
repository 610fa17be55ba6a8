//! Builders turning [`AppSettings`] into the adapters behind [`HttpState`].
//!
//! Each concern picks its production adapter when configured and falls back
//! to the in-memory implementation otherwise, logging which one was chosen.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::ports::{
    IdentityProvider, IdentityProviderError, NoteRepository, ProfileRepository, SummaryProvider,
    SummaryProviderError,
};
use crate::domain::{AccountService, NotesService, SummarizationService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::identity::HostedIdentityProvider;
use crate::outbound::memory::{
    InMemoryIdentityProvider, InMemoryNoteRepository, InMemoryProfileRepository,
};
use crate::outbound::persistence::{
    DbPool, DieselNoteRepository, DieselProfileRepository, PoolConfig, PoolError,
    run_pending_migrations,
};
use crate::outbound::summarizer::{
    ChatCompletionsSummaryProvider, DEFAULT_CHAT_BASE_URL, DEFAULT_CHAT_MODEL,
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GeminiSummaryProvider,
};

use super::config::{AppSettings, SettingsError, SummaryProviderKind};

/// Startup failures while wiring adapters.
#[derive(Debug, Error)]
pub enum StateBuildError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("database setup failed: {0}")]
    Database(#[from] PoolError),
    #[error("identity provider setup failed: {0}")]
    Identity(#[from] IdentityProviderError),
    #[error("summary provider setup failed: {0}")]
    Summary(#[from] SummaryProviderError),
}

/// Note and profile storage sharing one backend.
struct Storage {
    notes: Arc<dyn NoteRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

async fn build_storage(settings: &AppSettings) -> Result<Storage, StateBuildError> {
    match settings.database_url() {
        Some(url) => {
            let config = PoolConfig::new(url);
            run_pending_migrations(&config).await?;
            let pool = DbPool::new(config).await?;
            info!("using PostgreSQL storage");
            Ok(Storage {
                notes: Arc::new(DieselNoteRepository::new(pool.clone())),
                profiles: Arc::new(DieselProfileRepository::new(pool)),
            })
        }
        None => {
            warn!("NOTES_DATABASE_URL not set; notes are kept in memory and lost on restart");
            Ok(Storage {
                notes: Arc::new(InMemoryNoteRepository::default()),
                profiles: Arc::new(InMemoryProfileRepository::default()),
            })
        }
    }
}

fn build_identity(settings: &AppSettings) -> Result<Arc<dyn IdentityProvider>, StateBuildError> {
    match settings.auth()? {
        Some((url, key)) => {
            info!(auth_url = url, "using hosted identity provider");
            Ok(Arc::new(HostedIdentityProvider::new(
                url,
                key,
                settings.http_timeout(),
            )?))
        }
        None => {
            warn!("NOTES_AUTH_URL not set; accounts are kept in memory");
            Ok(Arc::new(InMemoryIdentityProvider::default()))
        }
    }
}

fn build_summary_provider(
    settings: &AppSettings,
) -> Result<Option<Arc<dyn SummaryProvider>>, StateBuildError> {
    let kind = settings.summary_provider()?;
    let Some(api_key) = settings.summary_api_key() else {
        warn!(provider = ?kind, "summary API key not set; summaries are disabled");
        return Ok(None);
    };
    let timeout = settings.http_timeout();
    let provider: Arc<dyn SummaryProvider> = match kind {
        SummaryProviderKind::Gemini => Arc::new(GeminiSummaryProvider::new(
            settings.summary_base_url().unwrap_or(DEFAULT_GEMINI_BASE_URL),
            settings.summary_model().unwrap_or(DEFAULT_GEMINI_MODEL),
            api_key,
            timeout,
        )?),
        SummaryProviderKind::Chat => Arc::new(ChatCompletionsSummaryProvider::new(
            settings.summary_base_url().unwrap_or(DEFAULT_CHAT_BASE_URL),
            settings.summary_model().unwrap_or(DEFAULT_CHAT_MODEL),
            api_key,
            timeout,
        )?),
    };
    info!(provider = ?kind, "summaries enabled");
    Ok(Some(provider))
}

/// Assemble services and ports for the HTTP layer.
pub async fn build_http_state(settings: &AppSettings) -> Result<HttpState, StateBuildError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let public_origin = settings.public_base_url()?;
    let storage = build_storage(settings).await?;
    let identity = build_identity(settings)?;
    let summarize = Arc::new(match build_summary_provider(settings)? {
        Some(provider) => SummarizationService::new(provider),
        None => SummarizationService::unconfigured(),
    });

    let notes = Arc::new(NotesService::new(
        storage.notes,
        summarize.clone(),
        settings.cache_freshness(),
        clock.clone(),
    ));
    let accounts = Arc::new(AccountService::new(identity, storage.profiles, clock));

    Ok(HttpState::new(HttpStatePorts {
        notes: notes.clone(),
        notes_command: notes,
        summarize,
        accounts: accounts.clone(),
        profiles: accounts,
    })
    .with_public_origin(public_origin))
}
