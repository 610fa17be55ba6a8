//! Session-aware redirects for page navigation.
//!
//! Must be registered inside the session middleware so the cookie has been
//! decoded by the time the guard runs:
//!
//! ```text
//! App::new().wrap(RouteGuard).wrap(session_middleware)
//! ```

use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::Error;
use actix_web::HttpResponse;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::LOCATION;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::UserId;
use crate::domain::route_guard::{GuardDecision, decide};
use crate::inbound::http::session::USER_ID_KEY;

fn has_session(req: &ServiceRequest) -> bool {
    req.get_session()
        .get::<String>(USER_ID_KEY)
        .ok()
        .flatten()
        .is_some_and(|id| UserId::new(id).is_ok())
}

/// Middleware redirecting signed-in users away from the login pages and
/// anonymous users away from the workspace.
#[derive(Clone, Copy, Debug, Default)]
pub struct RouteGuard;

impl<S, B> Transform<S, ServiceRequest> for RouteGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RouteGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RouteGuardMiddleware { service }))
    }
}

/// Service wrapper produced by [`RouteGuard`].
pub struct RouteGuardMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RouteGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match decide(req.path(), has_session(&req)) {
            GuardDecision::Redirect(target) => {
                debug!(path = %req.path(), location = target, "route guard redirect");
                let response = HttpResponse::SeeOther()
                    .insert_header((LOCATION, target))
                    .finish();
                Box::pin(ready(Ok(req.into_response(response).map_into_right_body())))
            }
            GuardDecision::Pass => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{
        TEST_SIGN_IN_PATH, session_cookie, sign_in_test_user, test_session_middleware,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use rstest::rstest;

    macro_rules! init_app {
        () => {
            test::init_service(
                App::new()
                    .wrap(RouteGuard)
                    .wrap(test_session_middleware())
                    .route(TEST_SIGN_IN_PATH, web::get().to(sign_in_test_user))
                    .default_service(web::to(|| async { HttpResponse::Ok().body("page") })),
            )
            .await
        };
    }

    fn location<B>(res: &ServiceResponse<B>) -> Option<&str> {
        res.headers().get(LOCATION).and_then(|v| v.to_str().ok())
    }

    #[rstest]
    #[case("/dashboard", StatusCode::SEE_OTHER, Some("/auth/login"))]
    #[case("/dashboard/notes", StatusCode::SEE_OTHER, Some("/auth/login"))]
    #[case("/", StatusCode::OK, None)]
    #[case("/auth/login", StatusCode::OK, None)]
    #[case("/api/v1/notes", StatusCode::OK, None)]
    #[actix_web::test]
    async fn anonymous_navigation(
        #[case] path: &str,
        #[case] status: StatusCode,
        #[case] target: Option<&str>,
    ) {
        let app = init_app!();
        let res = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
        assert_eq!(res.status(), status);
        assert_eq!(location(&res), target);
    }

    #[rstest]
    #[case("/", StatusCode::SEE_OTHER, Some("/dashboard"))]
    #[case("/auth/login", StatusCode::SEE_OTHER, Some("/dashboard"))]
    #[case("/auth/signup", StatusCode::SEE_OTHER, Some("/dashboard"))]
    #[case("/dashboard", StatusCode::OK, None)]
    #[case("/api/auth/callback", StatusCode::OK, None)]
    #[actix_web::test]
    async fn signed_in_navigation(
        #[case] path: &str,
        #[case] status: StatusCode,
        #[case] target: Option<&str>,
    ) {
        let app = init_app!();
        let cookie = session_cookie(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri(path).cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), status);
        assert_eq!(location(&res), target);
    }
}
