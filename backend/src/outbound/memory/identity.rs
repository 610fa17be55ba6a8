//! In-memory `IdentityProvider`.
//!
//! Passwords are kept as salted SHA-256 digests; plaintext never outlives
//! the request. OAuth codes are issued explicitly through
//! [`InMemoryIdentityProvider::issue_code`] and are single use.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{AuthenticatedIdentity, Email, FullName, LoginCredentials, Registration, UserId};

use super::lock;

#[derive(Debug, Clone)]
struct Account {
    user_id: UserId,
    email: Email,
    full_name: Option<FullName>,
    password_digest: String,
}

impl Account {
    fn identity(&self) -> AuthenticatedIdentity {
        let mut identity = AuthenticatedIdentity::new(self.user_id.clone(), self.email.clone());
        identity.full_name = self.full_name.clone();
        identity
    }
}

fn digest(user_id: &UserId, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_uuid().as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn normalise(email: &Email) -> String {
    email.as_ref().to_lowercase()
}

#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    accounts: Mutex<HashMap<String, Account>>,
    codes: Mutex<HashMap<String, AuthenticatedIdentity>>,
}

impl InMemoryIdentityProvider {
    /// Issue a single-use authorization code for `email`, creating a
    /// password-less account when none exists.
    pub fn issue_code(&self, email: &Email, full_name: Option<FullName>) -> String {
        let account = lock(&self.accounts)
            .entry(normalise(email))
            .or_insert_with(|| {
                let user_id = UserId::random();
                Account {
                    password_digest: String::new(),
                    user_id,
                    email: email.clone(),
                    full_name: full_name.clone(),
                }
            })
            .clone();
        let mut identity = account.identity();
        if full_name.is_some() {
            identity.full_name = full_name;
        }
        let code = Uuid::new_v4().simple().to_string();
        lock(&self.codes).insert(code.clone(), identity);
        code
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedIdentity, IdentityProviderError> {
        let accounts = lock(&self.accounts);
        let account = accounts
            .get(&normalise(credentials.email()))
            .filter(|account| {
                !account.password_digest.is_empty()
                    && account.password_digest == digest(&account.user_id, credentials.password())
            })
            .ok_or_else(IdentityProviderError::invalid_credentials)?;
        Ok(account.identity())
    }

    async fn sign_up(
        &self,
        registration: &Registration,
    ) -> Result<AuthenticatedIdentity, IdentityProviderError> {
        let mut accounts = lock(&self.accounts);
        let key = normalise(registration.email());
        if accounts.contains_key(&key) {
            return Err(IdentityProviderError::already_registered());
        }
        let user_id = UserId::random();
        let account = Account {
            password_digest: digest(&user_id, registration.password()),
            user_id,
            email: registration.email().clone(),
            full_name: registration.full_name().cloned(),
        };
        let identity = account.identity();
        accounts.insert(key, account);
        Ok(identity)
    }

    async fn exchange_code(
        &self,
        code: &str,
    ) -> Result<AuthenticatedIdentity, IdentityProviderError> {
        lock(&self.codes)
            .remove(code)
            .ok_or_else(|| IdentityProviderError::invalid_code("unknown or used code"))
    }
}
