//! Shared helpers for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! each test file pulls this module in with `mod support;`. The helpers build
//! the full application over in-memory adapters; no network or database is
//! needed unless a test points the summarizer at a mockito server.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::Arc;
use std::time::Duration;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};

use notes_backend::domain::{AccountService, NotesService, SummarizationService};
use notes_backend::inbound::http::health::HealthState;
use notes_backend::inbound::http::session_config::{SESSION_COOKIE_NAME, SessionSettings};
use notes_backend::inbound::http::state::{HttpState, HttpStatePorts};
use notes_backend::outbound::memory::{
    InMemoryIdentityProvider, InMemoryNoteRepository, InMemoryProfileRepository,
};
use notes_backend::outbound::summarizer::GeminiSummaryProvider;
use notes_backend::server::{AppDependencies, build_app};

pub const PASSWORD: &str = "correct-horse";

/// Summarization without an API key.
pub fn unconfigured_summaries() -> SummarizationService {
    SummarizationService::unconfigured()
}

/// Summarization against a Gemini-compatible server at `base_url`.
pub fn gemini_summaries(base_url: &str) -> SummarizationService {
    let provider = GeminiSummaryProvider::new(
        base_url,
        "gemini-1.5-flash",
        "test-key",
        Duration::from_secs(5),
    )
    .expect("provider");
    SummarizationService::new(Arc::new(provider))
}

/// HTTP state over fresh in-memory adapters.
pub fn http_state(summaries: SummarizationService) -> HttpState {
    http_state_with_identity(summaries, Arc::new(InMemoryIdentityProvider::default()))
}

/// HTTP state sharing `identity` with the caller, e.g. to issue OAuth codes.
pub fn http_state_with_identity(
    summaries: SummarizationService,
    identity: Arc<InMemoryIdentityProvider>,
) -> HttpState {
    let clock = Arc::new(DefaultClock);
    let summarize = Arc::new(summaries);
    let notes = Arc::new(NotesService::new(
        Arc::new(InMemoryNoteRepository::default()),
        summarize.clone(),
        Duration::from_secs(300),
        clock.clone(),
    ));
    let accounts = Arc::new(AccountService::new(
        identity,
        Arc::new(InMemoryProfileRepository::default()),
        clock,
    ));
    HttpState::new(HttpStatePorts {
        notes: notes.clone(),
        notes_command: notes,
        summarize,
        accounts: accounts.clone(),
        profiles: accounts,
    })
}

fn session_settings() -> SessionSettings {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
        ttl: actix_web::cookie::time::Duration::hours(1),
    }
}

/// Initialise the production app around `state`.
pub async fn init_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(build_app(AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(state),
        session: session_settings(),
    }))
    .await
}

/// Extract the session cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME && !cookie.value().is_empty())
        .map(Cookie::into_owned)
}

/// Register `email` and return its session cookie.
pub async fn register<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({"email": email, "password": PASSWORD}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status().as_u16(), 201, "registration failed");
    session_cookie(&response).expect("session cookie")
}

/// Send a JSON request with the session cookie and return status and body.
pub async fn send<S, B>(
    app: &S,
    request: test::TestRequest,
    cookie: &Cookie<'static>,
) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(app, request.cookie(cookie.clone()).to_request()).await;
    let status = response.status().as_u16();
    let bytes = test::read_body(response).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
