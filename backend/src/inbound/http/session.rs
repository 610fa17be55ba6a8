//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting or retrieving a user id.
//! The provider's access token, when one was issued, travels alongside the
//! user id so the session can be refreshed without a second sign-in.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use zeroize::Zeroizing;

use crate::domain::ports::AccountSession;
use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ACCESS_TOKEN_KEY: &str = "access_token";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Start a fresh session for a completed sign-in.
    ///
    /// The session id is renewed first so a pre-login cookie can never be
    /// promoted to an authenticated one.
    pub fn establish(&self, account: &AccountSession) -> Result<(), Error> {
        self.0.renew();
        self.persist_user(&account.profile.id)?;
        match account.access_token.as_deref() {
            Some(token) => self
                .0
                .insert(ACCESS_TOKEN_KEY, token.as_str())
                .map_err(|error| Error::internal(format!("failed to persist session: {error}"))),
            None => {
                self.0.remove(ACCESS_TOKEN_KEY);
                Ok(())
            }
        }
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Provider access token stored at sign-in, if any.
    pub fn access_token(&self) -> Result<Option<Zeroizing<String>>, Error> {
        self.0
            .get::<String>(ACCESS_TOKEN_KEY)
            .map(|token| token.map(Zeroizing::new))
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Extend the session lifetime by reissuing its cookie under a new id.
    pub fn renew(&self) {
        self.0.renew();
    }

    /// Drop every session value and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
