//! Account HTTP handlers.
//!
//! ```text
//! POST /api/v1/auth/login    {"email":"ada@example.com","password":"secret"}
//! POST /api/v1/auth/register {"email":"ada@example.com","password":"secret","fullName":"Ada"}
//! POST /api/v1/auth/logout
//! POST /api/v1/auth/refresh
//! GET  /api/v1/auth/me
//! GET  /api/auth/callback?code=...
//! ```

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};

use crate::domain::route_guard::{LOGIN_PATH, WORKSPACE_PATH};
use crate::domain::{LoginCredentials, Profile, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_credentials_validation_error;

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = crate::domain::CredentialsValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Sign-up request body for `POST /api/v1/auth/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
    #[schema(example = "Ada Lovelace")]
    pub full_name: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = crate::domain::CredentialsValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password, value.full_name.as_deref())
    }
}

/// Profile returned to the browser.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id.to_string(),
            email: profile.email.as_ref().to_owned(),
            full_name: profile.full_name.map(|name| name.as_ref().to_owned()),
            avatar_url: profile.avatar_url,
            created_at: profile.created_at,
        }
    }
}

/// Query string of the OAuth callback.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

/// Sign in with email and password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = ProfileResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Identity provider unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(map_credentials_validation_error)?;
    let account = state.accounts.login(credentials).await?;
    session.establish(&account)?;
    Ok(web::Json(ProfileResponse::from(account.profile)))
}

/// Create an account and sign in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ProfileResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Identity provider unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())
        .map_err(map_credentials_validation_error)?;
    let account = state.accounts.register(registration).await?;
    session.establish(&account)?;
    Ok(HttpResponse::Created().json(ProfileResponse::from(account.profile)))
}

/// Drop the session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Extend the session by re-issuing the cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    responses(
        (status = 204, description = "Session renewed"),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "refreshSession"
)]
#[post("/auth/refresh")]
pub async fn refresh(session: SessionContext) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    session.renew();
    session.persist_user(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Profile missing", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user_id = session.require_user_id()?;
    let profile = state.profiles.fetch_profile(&user_id).await?;
    Ok(web::Json(ProfileResponse::from(profile)))
}

fn see_other(location: String) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}

/// OAuth redirect target.
///
/// Always answers with a redirect: the dashboard on success or when no code
/// was supplied, the login page when the exchange fails.
#[utoipa::path(
    get,
    path = "/api/auth/callback",
    params(CallbackQuery),
    responses((status = 303, description = "Redirect to the dashboard or login page")),
    tags = ["auth"],
    operation_id = "oauthCallback",
    security([])
)]
#[get("/api/auth/callback")]
pub async fn oauth_callback(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CallbackQuery>,
) -> HttpResponse {
    let Some(code) = query.into_inner().code.filter(|code| !code.is_empty()) else {
        return see_other(state.location(WORKSPACE_PATH));
    };

    let established = match state.accounts.complete_oauth(code).await {
        Ok(account) => session.establish(&account).map(|()| account),
        Err(error) => Err(error),
    };
    match established {
        Ok(account) => {
            info!(user_id = %account.profile.id, "oauth sign-in completed");
            see_other(state.location(WORKSPACE_PATH))
        }
        Err(error) => {
            warn!(code = ?error.code(), message = %error.message(), "oauth exchange failed");
            see_other(state.location(LOGIN_PATH))
        }
    }
}

/// Register the `/auth` routes under the versioned API scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(register)
        .service(logout)
        .service(refresh)
        .service(current_user);
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
