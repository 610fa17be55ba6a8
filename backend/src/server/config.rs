//! Application settings loaded via OrthoConfig.
//!
//! Every value can come from the environment (`NOTES_*`), the command line
//! or a configuration file. Numeric fields carry OrthoConfig defaults so an
//! unconfigured process still loads; optional fields fall back to the
//! defaults exposed by the accessor methods.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Summarization backend selected by `NOTES_SUMMARY_PROVIDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryProviderKind {
    Gemini,
    Chat,
}

/// Settings that cannot be turned into a running server.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
    #[error("unknown summary provider {0:?}; expected \"gemini\" or \"chat\"")]
    UnknownSummaryProvider(String),
    #[error("NOTES_AUTH_URL and NOTES_AUTH_KEY must be set together")]
    PartialAuthConfig,
    #[error("invalid public base URL {value:?}: {message}")]
    InvalidPublicBaseUrl { value: String, message: String },
}

/// Process-wide configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "NOTES")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string; in-memory storage when absent.
    pub database_url: Option<String>,
    /// Base URL of the hosted identity service.
    pub auth_url: Option<String>,
    /// Public API key sent to the identity service.
    pub auth_key: Option<String>,
    /// `gemini` (default) or `chat`.
    pub summary_provider: Option<String>,
    /// Provider API key; summaries are disabled without it.
    pub summary_api_key: Option<String>,
    pub summary_model: Option<String>,
    pub summary_base_url: Option<String>,
    /// Origin used for absolute redirects, e.g. `https://notes.example`.
    pub public_base_url: Option<String>,
    /// Seconds a cached note list stays fresh.
    #[ortho_config(default = 300)]
    pub cache_freshness_secs: u64,
    /// Timeout for outbound HTTP calls, in seconds.
    #[ortho_config(default = 30)]
    pub http_timeout_secs: u64,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

impl AppSettings {
    /// Parse the bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = non_blank(&self.bind_addr).unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                message: err.to_string(),
            })
    }

    pub fn database_url(&self) -> Option<&str> {
        non_blank(&self.database_url)
    }

    /// Identity service URL and key, when both are configured.
    pub fn auth(&self) -> Result<Option<(&str, &str)>, SettingsError> {
        match (non_blank(&self.auth_url), non_blank(&self.auth_key)) {
            (Some(url), Some(key)) => Ok(Some((url, key))),
            (None, None) => Ok(None),
            _ => Err(SettingsError::PartialAuthConfig),
        }
    }

    pub fn summary_provider(&self) -> Result<SummaryProviderKind, SettingsError> {
        match non_blank(&self.summary_provider).map(str::to_ascii_lowercase) {
            None => Ok(SummaryProviderKind::Gemini),
            Some(value) if value == "gemini" => Ok(SummaryProviderKind::Gemini),
            Some(value) if value == "chat" => Ok(SummaryProviderKind::Chat),
            Some(value) => Err(SettingsError::UnknownSummaryProvider(value)),
        }
    }

    pub fn summary_api_key(&self) -> Option<&str> {
        non_blank(&self.summary_api_key)
    }

    pub fn summary_model(&self) -> Option<&str> {
        non_blank(&self.summary_model)
    }

    pub fn summary_base_url(&self) -> Option<&str> {
        non_blank(&self.summary_base_url)
    }

    /// Origin used to build absolute redirect targets.
    ///
    /// Must be an `http` or `https` URL with a host and no query.
    pub fn public_base_url(&self) -> Result<Option<String>, SettingsError> {
        let Some(value) = non_blank(&self.public_base_url) else {
            return Ok(None);
        };
        let invalid = |message: &str| SettingsError::InvalidPublicBaseUrl {
            value: value.to_owned(),
            message: message.to_owned(),
        };
        let parsed = Url::parse(value).map_err(|err| invalid(&err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if parsed.host_str().is_none() {
            return Err(invalid("missing host"));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed"));
        }
        Ok(Some(value.to_owned()))
    }

    pub const fn cache_freshness(&self) -> Duration {
        Duration::from_secs(self.cache_freshness_secs)
    }

    /// Outbound HTTP timeout; zero falls back to the default.
    pub fn http_timeout(&self) -> Duration {
        let secs = match self.http_timeout_secs {
            0 => DEFAULT_HTTP_TIMEOUT_SECS,
            secs => secs,
        };
        Duration::from_secs(secs)
    }
}
