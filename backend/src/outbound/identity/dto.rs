//! Wire DTOs for the hosted auth API.

use serde::{Deserialize, Serialize};

use crate::domain::{AuthenticatedIdentity, Email, FullName, UserId};

#[derive(Debug, Serialize)]
pub(super) struct PasswordGrantDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct SignUpDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) data: SignUpMetadataDto<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct SignUpMetadataDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) full_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct CodeGrantDto<'a> {
    pub(super) auth_code: &'a str,
}

/// Either a full session or, when email confirmation is pending, a bare user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum AuthResponseDto {
    Session {
        access_token: String,
        user: UserDto,
    },
    User(UserDto),
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    id: String,
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadataDto,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadataDto {
    full_name: Option<String>,
    avatar_url: Option<String>,
}

/// Error bodies vary by endpoint; any of these fields may carry the text.
#[derive(Debug, Default, Deserialize)]
pub(super) struct AuthErrorDto {
    pub(super) error: Option<String>,
    pub(super) error_code: Option<String>,
    pub(super) error_description: Option<String>,
    pub(super) msg: Option<String>,
    pub(super) message: Option<String>,
}

impl AuthErrorDto {
    pub(super) fn text(&self) -> Option<&str> {
        [&self.msg, &self.error_description, &self.message]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|text| !text.trim().is_empty())
    }
}

impl AuthResponseDto {
    pub(super) fn into_identity(self) -> Result<AuthenticatedIdentity, String> {
        let (user, access_token) = match self {
            Self::Session { access_token, user } => (user, Some(access_token)),
            Self::User(user) => (user, None),
        };
        let user_id = UserId::new(&user.id).map_err(|err| format!("user id: {err}"))?;
        let email = user
            .email
            .ok_or_else(|| "user has no email".to_owned())
            .and_then(|email| Email::new(email).map_err(|err| format!("email: {err}")))?;

        let mut identity = AuthenticatedIdentity::new(user_id, email);
        identity.full_name = user
            .user_metadata
            .full_name
            .and_then(|name| FullName::new(name).ok());
        identity.avatar_url = user.user_metadata.avatar_url;
        identity.access_token = access_token.map(Into::into);
        Ok(identity)
    }
}
