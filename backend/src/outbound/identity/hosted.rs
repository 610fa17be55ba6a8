//! Reqwest-backed `IdentityProvider`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;

use super::dto::{
    AuthErrorDto, AuthResponseDto, CodeGrantDto, PasswordGrantDto, SignUpDto, SignUpMetadataDto,
};
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{AuthenticatedIdentity, LoginCredentials, Registration};

const API_KEY_HEADER: &str = "apikey";
const INVALID_GRANT: &str = "invalid_grant";
const USER_ALREADY_EXISTS: &str = "user_already_exists";
const ALREADY_REGISTERED_TEXT: &str = "already registered";

#[derive(Debug, Clone, Copy)]
enum Grant {
    Password,
    Code,
    SignUp,
}

/// Identity provider calling a hosted auth service over HTTPS.
pub struct HostedIdentityProvider {
    client: Client,
    base: Url,
    api_key: String,
}

impl HostedIdentityProvider {
    /// Build an adapter for the auth service rooted at `base`.
    ///
    /// # Errors
    ///
    /// Returns an error when `base` is not a URL or the reqwest client cannot
    /// be constructed.
    pub fn new(
        base: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, IdentityProviderError> {
        let base = Url::parse(&format!("{}/", base.trim_end_matches('/')))
            .map_err(|err| IdentityProviderError::unavailable(format!("invalid auth url: {err}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| IdentityProviderError::unavailable(err.to_string()))?;
        Ok(Self {
            client,
            base,
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, grant: Grant) -> Result<Url, IdentityProviderError> {
        let path = match grant {
            Grant::Password => "auth/v1/token?grant_type=password",
            Grant::Code => "auth/v1/token?grant_type=pkce",
            Grant::SignUp => "auth/v1/signup",
        };
        self.base
            .join(path)
            .map_err(|err| IdentityProviderError::unavailable(format!("invalid auth url: {err}")))
    }

    async fn post<B: Serialize + Sync>(
        &self,
        grant: Grant,
        body: &B,
    ) -> Result<AuthenticatedIdentity, IdentityProviderError> {
        let response = self
            .client
            .post(self.endpoint(grant)?)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(grant, status, bytes.as_ref()));
        }

        let decoded: AuthResponseDto = serde_json::from_slice(bytes.as_ref())
            .map_err(|err| IdentityProviderError::decode(err.to_string()))?;
        decoded.into_identity().map_err(IdentityProviderError::decode)
    }
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    IdentityProviderError::unavailable(error.to_string())
}

fn map_status_error(grant: Grant, status: StatusCode, body: &[u8]) -> IdentityProviderError {
    let dto: AuthErrorDto = serde_json::from_slice(body).unwrap_or_default();
    debug!(?grant, status = status.as_u16(), error = ?dto.error, "auth request rejected");

    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        return IdentityProviderError::unavailable(format!("status {}", status.as_u16()));
    }

    let text = dto.text().unwrap_or("Authentication failed").to_owned();
    match grant {
        Grant::Password if dto.error.as_deref() == Some(INVALID_GRANT) => {
            IdentityProviderError::invalid_credentials()
        }
        Grant::Password if status == StatusCode::BAD_REQUEST => {
            IdentityProviderError::invalid_credentials()
        }
        Grant::SignUp
            if dto.error_code.as_deref() == Some(USER_ALREADY_EXISTS)
                || text.to_lowercase().contains(ALREADY_REGISTERED_TEXT) =>
        {
            IdentityProviderError::already_registered()
        }
        Grant::Code => IdentityProviderError::invalid_code(text),
        _ => IdentityProviderError::rejected(text),
    }
}

#[async_trait]
impl IdentityProvider for HostedIdentityProvider {
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedIdentity, IdentityProviderError> {
        let body = PasswordGrantDto {
            email: credentials.email().as_ref(),
            password: credentials.password(),
        };
        self.post(Grant::Password, &body).await
    }

    async fn sign_up(
        &self,
        registration: &Registration,
    ) -> Result<AuthenticatedIdentity, IdentityProviderError> {
        let body = SignUpDto {
            email: registration.email().as_ref(),
            password: registration.password(),
            data: SignUpMetadataDto {
                full_name: registration.full_name().map(AsRef::as_ref),
            },
        };
        self.post(Grant::SignUp, &body).await
    }

    async fn exchange_code(
        &self,
        code: &str,
    ) -> Result<AuthenticatedIdentity, IdentityProviderError> {
        self.post(Grant::Code, &CodeGrantDto { auth_code: code }).await
    }
}
