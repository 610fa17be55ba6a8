//! Driven port for the authentication backend.
//!
//! The provider owns credentials; the service only ever sees the resulting
//! [`AuthenticatedIdentity`].

use async_trait::async_trait;

use crate::domain::{AuthenticatedIdentity, LoginCredentials, Registration};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by identity provider adapters.
    pub enum IdentityProviderError {
        /// Email/password pair was rejected.
        InvalidCredentials => "Invalid login credentials",
        /// The email is already registered.
        AlreadyRegistered => "User already registered",
        /// The authorization code was rejected or expired.
        InvalidCode { message: String } => "authorization code rejected: {message}",
        /// The provider answered with a message worth showing the user.
        Rejected { message: String } => "{message}",
        /// Network transport failed or the provider was unreachable.
        Unavailable { message: String } => "identity provider unavailable: {message}",
        /// Provider response could not be decoded.
        Decode { message: String } => "identity provider response invalid: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Password sign-in.
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedIdentity, IdentityProviderError>;

    /// Create a new identity.
    async fn sign_up(
        &self,
        registration: &Registration,
    ) -> Result<AuthenticatedIdentity, IdentityProviderError>;

    /// Exchange an OAuth authorization code for an identity.
    async fn exchange_code(&self, code: &str)
    -> Result<AuthenticatedIdentity, IdentityProviderError>;
}
