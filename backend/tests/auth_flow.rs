//! Sign-in flows and navigation redirects through the full middleware stack.

mod support;

use std::sync::Arc;

use actix_web::http::header::LOCATION;
use actix_web::test::{self, TestRequest};
use rstest::rstest;
use serde_json::json;

use notes_backend::domain::Email;
use notes_backend::outbound::memory::InMemoryIdentityProvider;
use support::{
    PASSWORD, http_state, http_state_with_identity, init_app, register, send, session_cookie,
    unconfigured_summaries,
};

#[actix_web::test]
async fn registered_users_can_log_in_and_read_their_profile() {
    let app = init_app(http_state(unconfigured_summaries())).await;
    register(&app, "ada@example.com").await;

    let response = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "ada@example.com", "password": PASSWORD}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status().as_u16(), 200);
    let cookie = session_cookie(&response).expect("session cookie");

    let (status, profile) = send(&app, TestRequest::get().uri("/api/v1/auth/me"), &cookie).await;
    assert_eq!(status, 200);
    assert_eq!(profile["email"], "ada@example.com");
}

#[rstest]
#[case("ada@example.com", "wrong-password", 401)]
#[case("nobody@example.com", PASSWORD, 401)]
#[case("ada@example.com", "short", 400)]
#[actix_web::test]
async fn bad_logins_are_rejected(
    #[case] email: &str,
    #[case] password: &str,
    #[case] expected: u16,
) {
    let app = init_app(http_state(unconfigured_summaries())).await;
    register(&app, "ada@example.com").await;

    let response = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": email, "password": password}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status().as_u16(), expected);
    assert!(session_cookie(&response).is_none());
}

#[actix_web::test]
async fn duplicate_registration_conflicts() {
    let app = init_app(http_state(unconfigured_summaries())).await;
    register(&app, "ada@example.com").await;

    let response = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({"email": "ada@example.com", "password": PASSWORD}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status().as_u16(), 409);
}

#[actix_web::test]
async fn logout_ends_the_session() {
    let app = init_app(http_state(unconfigured_summaries())).await;
    let cookie = register(&app, "ada@example.com").await;

    let response = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status().as_u16(), 204);

    let response = test::call_service(
        &app,
        TestRequest::get().uri("/api/v1/notes").to_request(),
    )
    .await;
    assert_eq!(response.status().as_u16(), 401);
}

#[rstest]
#[case("/", None)]
#[case("/auth/login", None)]
#[case("/dashboard", Some("/auth/login"))]
#[case("/dashboard/notes/1", Some("/auth/login"))]
#[actix_web::test]
async fn anonymous_navigation_is_guarded(#[case] path: &str, #[case] target: Option<&str>) {
    let app = init_app(http_state(unconfigured_summaries())).await;

    let response = test::call_service(&app, TestRequest::get().uri(path).to_request()).await;
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok());
    assert_eq!(location, target);
    if target.is_some() {
        assert_eq!(response.status().as_u16(), 303);
    }
}

#[rstest]
#[case("/", Some("/dashboard"))]
#[case("/auth/login", Some("/dashboard"))]
#[case("/dashboard", None)]
#[actix_web::test]
async fn signed_in_navigation_is_guarded(#[case] path: &str, #[case] target: Option<&str>) {
    let app = init_app(http_state(unconfigured_summaries())).await;
    let cookie = register(&app, "ada@example.com").await;

    let response = test::call_service(
        &app,
        TestRequest::get().uri(path).cookie(cookie).to_request(),
    )
    .await;
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok());
    assert_eq!(location, target);
}

#[actix_web::test]
async fn oauth_codes_establish_a_session_once() {
    let identity = Arc::new(InMemoryIdentityProvider::default());
    let email = Email::new("oauth@example.com").expect("email");
    let code = identity.issue_code(&email, None);
    let app = init_app(http_state_with_identity(
        unconfigured_summaries(),
        identity.clone(),
    ))
    .await;

    let response = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/api/auth/callback?code={code}"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(
        response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
        Some("/dashboard")
    );
    let cookie = session_cookie(&response).expect("session cookie");
    let (status, profile) = send(&app, TestRequest::get().uri("/api/v1/auth/me"), &cookie).await;
    assert_eq!(status, 200);
    assert_eq!(profile["email"], "oauth@example.com");

    let replay = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/api/auth/callback?code={code}"))
            .to_request(),
    )
    .await;
    assert_eq!(
        replay.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
        Some("/auth/login")
    );
}

#[actix_web::test]
async fn responses_carry_a_trace_id() {
    let app = init_app(http_state(unconfigured_summaries())).await;

    let response = test::call_service(
        &app,
        TestRequest::get().uri("/api/v1/notes").to_request(),
    )
    .await;
    assert_eq!(response.status().as_u16(), 401);
    let header = response
        .headers()
        .get("trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["traceId"], header.as_str());
}
