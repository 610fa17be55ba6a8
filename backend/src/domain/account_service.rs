//! Account domain service: sign-in flows and profile reads.
//!
//! The identity provider owns credentials; this service keeps the profile
//! table in step with it and hands the session layer what it needs.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountCommand, AccountSession, IdentityProvider, IdentityProviderError, ProfileRepository,
    ProfileRepositoryError, UserProfileQuery,
};
use crate::domain::{
    AuthenticatedIdentity, Error, LoginCredentials, Profile, Registration, UserId,
};

/// Message returned when the profile cannot be loaded after authentication.
pub const PROFILE_UNAVAILABLE_MESSAGE: &str =
    "Could not load your profile. Retry or return to login.";

fn map_identity_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::InvalidCredentials => {
            Error::unauthorized("Invalid login credentials")
        }
        IdentityProviderError::AlreadyRegistered => Error::conflict("User already registered"),
        IdentityProviderError::InvalidCode { message } => {
            Error::unauthorized(format!("authorization code rejected: {message}"))
        }
        IdentityProviderError::Rejected { message } => Error::invalid_request(message),
        IdentityProviderError::Unavailable { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
        IdentityProviderError::Decode { message } => Error::upstream(format!(
            "identity provider response invalid: {message}"
        )),
    }
}

fn session_error(error: ProfileRepositoryError) -> Error {
    warn!(error = %error, "profile unavailable after authentication");
    Error::service_unavailable(PROFILE_UNAVAILABLE_MESSAGE)
}

/// Account service implementing [`AccountCommand`] and [`UserProfileQuery`].
pub struct AccountService<I: ?Sized, P: ?Sized> {
    identity: Arc<I>,
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<I: ?Sized, P: ?Sized> AccountService<I, P> {
    pub fn new(identity: Arc<I>, profiles: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            identity,
            profiles,
            clock,
        }
    }
}

impl<I, P> AccountService<I, P>
where
    I: IdentityProvider + ?Sized,
    P: ProfileRepository + ?Sized,
{
    fn profile_from_identity(&self, identity: &AuthenticatedIdentity) -> Profile {
        Profile::new(
            identity.user_id.clone(),
            identity.email.clone(),
            self.clock.utc(),
        )
        .with_full_name(identity.full_name.clone())
        .with_avatar_url(identity.avatar_url.clone())
    }

    fn session(identity: AuthenticatedIdentity, profile: Profile) -> AccountSession {
        AccountSession {
            profile,
            access_token: identity.access_token,
        }
    }
}

#[async_trait]
impl<I, P> AccountCommand for AccountService<I, P>
where
    I: IdentityProvider + ?Sized,
    P: ProfileRepository + ?Sized,
{
    async fn login(&self, credentials: LoginCredentials) -> Result<AccountSession, Error> {
        let identity = self
            .identity
            .sign_in(&credentials)
            .await
            .map_err(map_identity_error)?;

        let profile = match self
            .profiles
            .find_by_id(&identity.user_id)
            .await
            .map_err(session_error)?
        {
            Some(profile) => profile,
            None => self
                .profiles
                .insert_if_absent(&self.profile_from_identity(&identity))
                .await
                .map_err(session_error)?,
        };

        info!(user_id = %profile.id, "user signed in");
        Ok(Self::session(identity, profile))
    }

    async fn register(&self, registration: Registration) -> Result<AccountSession, Error> {
        let mut identity = self
            .identity
            .sign_up(&registration)
            .await
            .map_err(map_identity_error)?;
        if identity.full_name.is_none() {
            identity.full_name = registration.full_name().cloned();
        }

        let profile = self
            .profiles
            .insert_if_absent(&self.profile_from_identity(&identity))
            .await
            .map_err(session_error)?;

        info!(user_id = %profile.id, "user registered");
        Ok(Self::session(identity, profile))
    }

    async fn complete_oauth(&self, code: String) -> Result<AccountSession, Error> {
        let identity = self
            .identity
            .exchange_code(&code)
            .await
            .map_err(map_identity_error)?;

        let fresh = self.profile_from_identity(&identity);
        let existing = self
            .profiles
            .find_by_id(&identity.user_id)
            .await
            .map_err(session_error)?;
        let profile = match existing {
            None => self.profiles.insert_if_absent(&fresh).await,
            Some(current) => {
                let merged = Profile {
                    created_at: current.created_at,
                    full_name: fresh.full_name.or(current.full_name),
                    avatar_url: fresh.avatar_url.or(current.avatar_url),
                    ..fresh
                };
                self.profiles.upsert(&merged).await
            }
        }
        .map_err(session_error)?;

        info!(user_id = %profile.id, "oauth sign-in completed");
        Ok(Self::session(identity, profile))
    }
}

#[async_trait]
impl<I, P> UserProfileQuery for AccountService<I, P>
where
    I: IdentityProvider + ?Sized,
    P: ProfileRepository + ?Sized,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Profile, Error> {
        self.profiles
            .find_by_id(user_id)
            .await
            .map_err(session_error)?
            .ok_or_else(|| Error::not_found("profile not found"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockIdentityProvider, MockProfileRepository};
    use crate::domain::{Email, ErrorCode, FullName};
    use crate::test_support::MutableClock;
    use chrono::{TimeDelta, Utc};
    use rstest::rstest;

    fn identity(user_id: &UserId) -> AuthenticatedIdentity {
        AuthenticatedIdentity::new(
            user_id.clone(),
            Email::new("ada@example.com").expect("email"),
        )
    }

    fn service(
        identity: MockIdentityProvider,
        profiles: MockProfileRepository,
    ) -> AccountService<MockIdentityProvider, MockProfileRepository> {
        AccountService::new(
            Arc::new(identity),
            Arc::new(profiles),
            Arc::new(MutableClock::new(Utc::now())),
        )
    }

    fn credentials() -> LoginCredentials {
        LoginCredentials::try_from_parts("ada@example.com", "secret").expect("credentials")
    }

    #[tokio::test]
    async fn login_returns_stored_profile() {
        let user_id = UserId::random();
        let stored = Profile::new(
            user_id.clone(),
            Email::new("ada@example.com").expect("email"),
            Utc::now(),
        );
        let expected = stored.clone();

        let mut provider = MockIdentityProvider::new();
        let signed_in = identity(&user_id);
        provider
            .expect_sign_in()
            .times(1)
            .return_once(move |_| Ok(signed_in));
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(stored)));

        let session = service(provider, profiles)
            .login(credentials())
            .await
            .expect("login");
        assert_eq!(session.profile, expected);
    }

    #[tokio::test]
    async fn login_profile_failure_is_a_session_error() {
        let user_id = UserId::random();
        let mut provider = MockIdentityProvider::new();
        let signed_in = identity(&user_id);
        provider
            .expect_sign_in()
            .times(1)
            .return_once(move |_| Ok(signed_in));
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_by_id()
            .times(1)
            .returning(|_| Err(ProfileRepositoryError::connection("refused")));

        let err = service(provider, profiles)
            .login(credentials())
            .await
            .expect_err("profile unavailable");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(err.message(), PROFILE_UNAVAILABLE_MESSAGE);
    }

    #[rstest]
    #[case(IdentityProviderError::invalid_credentials(), ErrorCode::Unauthorized)]
    #[case(IdentityProviderError::already_registered(), ErrorCode::Conflict)]
    #[case(IdentityProviderError::unavailable("timeout"), ErrorCode::ServiceUnavailable)]
    #[case(IdentityProviderError::rejected("Password is too weak"), ErrorCode::InvalidRequest)]
    #[tokio::test]
    async fn identity_failures_map_to_domain_codes(
        #[case] failure: IdentityProviderError,
        #[case] expected: ErrorCode,
    ) {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_sign_in()
            .times(1)
            .return_once(move |_| Err(failure));
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find_by_id().never();

        let err = service(provider, profiles)
            .login(credentials())
            .await
            .expect_err("identity failure");
        assert_eq!(err.code(), expected);
    }

    #[tokio::test]
    async fn register_creates_profile_with_full_name() {
        let user_id = UserId::random();
        let mut provider = MockIdentityProvider::new();
        let signed_up = identity(&user_id);
        provider
            .expect_sign_up()
            .times(1)
            .return_once(move |_| Ok(signed_up));
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_insert_if_absent()
            .withf(|profile| {
                profile.full_name.as_ref().map(AsRef::as_ref) == Some("Ada Lovelace")
            })
            .times(1)
            .returning(|profile| Ok(profile.clone()));

        let registration =
            Registration::try_from_parts("ada@example.com", "secret", Some("Ada Lovelace"))
                .expect("registration");
        let session = service(provider, profiles)
            .register(registration)
            .await
            .expect("register");
        assert_eq!(session.profile.id, user_id);
    }

    #[tokio::test]
    async fn oauth_inserts_missing_profile() {
        let user_id = UserId::random();
        let mut provider = MockIdentityProvider::new();
        let exchanged = identity(&user_id);
        provider
            .expect_exchange_code()
            .withf(|code| code == "abc")
            .times(1)
            .return_once(move |_| Ok(exchanged));
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find_by_id().times(1).returning(|_| Ok(None));
        profiles
            .expect_insert_if_absent()
            .times(1)
            .returning(|profile| Ok(profile.clone()));
        profiles.expect_upsert().never();

        service(provider, profiles)
            .complete_oauth("abc".to_owned())
            .await
            .expect("oauth");
    }

    #[tokio::test]
    async fn repeat_oauth_updates_without_resetting_creation_time() {
        let user_id = UserId::random();
        let created_at = Utc::now() - TimeDelta::days(30);
        let existing = Profile::new(
            user_id.clone(),
            Email::new("old@example.com").expect("email"),
            created_at,
        )
        .with_full_name(Some(FullName::new("Ada").expect("name")));

        let mut provider = MockIdentityProvider::new();
        let exchanged = identity(&user_id);
        provider
            .expect_exchange_code()
            .times(1)
            .return_once(move |_| Ok(exchanged));
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(existing)));
        profiles.expect_insert_if_absent().never();
        profiles
            .expect_upsert()
            .withf(move |profile| {
                profile.created_at == created_at
                    && profile.email.as_ref() == "ada@example.com"
                    && profile.full_name.as_ref().map(AsRef::as_ref) == Some("Ada")
            })
            .times(1)
            .returning(|profile| Ok(profile.clone()));

        service(provider, profiles)
            .complete_oauth("code".to_owned())
            .await
            .expect("oauth");
    }

    #[tokio::test]
    async fn fetch_profile_reports_missing_rows() {
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find_by_id().times(1).returning(|_| Ok(None));

        let err = service(MockIdentityProvider::new(), profiles)
            .fetch_profile(&UserId::random())
            .await
            .expect_err("missing profile");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
