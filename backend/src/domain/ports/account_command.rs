//! Driving ports for sign-in flows and profile reads.
//!
//! HTTP handlers persist the returned [`AccountSession`] in the cookie
//! session; the services never see cookies.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{Error, LoginCredentials, Profile, Registration, UserId};

/// Everything the session layer needs after a successful sign-in.
#[derive(Clone)]
pub struct AccountSession {
    pub profile: Profile,
    pub access_token: Option<Zeroizing<String>>,
}

impl std::fmt::Debug for AccountSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSession")
            .field("profile", &self.profile)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Domain use-case port for authentication flows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Password sign-in followed by a profile fetch.
    async fn login(&self, credentials: LoginCredentials) -> Result<AccountSession, Error>;

    /// Sign-up; creates the profile.
    async fn register(&self, registration: Registration) -> Result<AccountSession, Error>;

    /// OAuth callback: exchange the code and make sure a profile exists.
    async fn complete_oauth(&self, code: String) -> Result<AccountSession, Error>;
}

/// Domain use-case port for reading the current user's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Return the profile for the authenticated user.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Profile, Error>;
}
