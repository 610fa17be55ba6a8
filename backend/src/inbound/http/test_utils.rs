//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

use crate::domain::ports::{
    MockAccountCommand, MockNotesCommand, MockNotesQuery, MockSummarizeCommand,
    MockUserProfileQuery,
};
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
use crate::inbound::http::state::HttpStatePorts;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build()
}

/// Mock-backed ports with no expectations; any call panics.
pub fn mock_ports() -> HttpStatePorts {
    HttpStatePorts {
        notes: Arc::new(MockNotesQuery::new()),
        notes_command: Arc::new(MockNotesCommand::new()),
        summarize: Arc::new(MockSummarizeCommand::new()),
        accounts: Arc::new(MockAccountCommand::new()),
        profiles: Arc::new(MockUserProfileQuery::new()),
    }
}

/// Fixed user id persisted by [`sign_in_test_user`].
pub const TEST_USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
/// Route that stores [`TEST_USER_ID`] in the session.
pub const TEST_SIGN_IN_PATH: &str = "/test/sign-in";

/// Handler that stores [`TEST_USER_ID`] in the session.
pub async fn sign_in_test_user(
    session: crate::inbound::http::session::SessionContext,
) -> Result<actix_web::HttpResponse, crate::domain::Error> {
    let id = crate::domain::UserId::new(TEST_USER_ID)
        .map_err(|err| crate::domain::Error::internal(err.to_string()))?;
    session.persist_user(&id)?;
    Ok(actix_web::HttpResponse::NoContent().finish())
}

/// Call [`TEST_SIGN_IN_PATH`] and return the session cookie it sets.
pub async fn session_cookie<S, B>(app: &S) -> actix_web::cookie::Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
{
    let response = actix_web::test::call_service(
        app,
        actix_web::test::TestRequest::get()
            .uri(TEST_SIGN_IN_PATH)
            .to_request(),
    )
    .await;
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .expect("session cookie set")
        .into_owned()
}
