//! Server construction and middleware wiring.
//!
//! Middleware order matters: `Trace` is outermost so every response carries
//! a trace id, the session middleware decodes the cookie next, and the route
//! guard runs last because it reads the session.

mod config;
mod state_builders;

pub use config::{AppSettings, SettingsError, SummaryProviderKind};
pub use state_builders::{StateBuildError, build_http_state};

use std::net::SocketAddr;

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::session_config::SessionSettings;
use crate::inbound::http::session_config::fingerprint::key_fingerprint;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{auth, notes, summarize};
use crate::middleware::{RouteGuard, Trace};

/// Everything a worker needs to build its `App`.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub session: SessionSettings,
}

/// Register every HTTP route.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(notes::configure)
            .configure(auth::configure),
    )
    .service(auth::oauth_callback)
    .service(summarize::summarize_preflight)
    .service(summarize::summarize)
    .service(ready)
    .service(live);
}

/// Build the application with its middleware stack.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(RouteGuard)
        .wrap(session.middleware())
        .wrap(Trace)
        .configure(configure_routes);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the listener and start serving.
///
/// The returned server ignores OS signals; stop it through its handle.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    session: SessionSettings,
    bind_addr: SocketAddr,
) -> std::io::Result<Server> {
    info!(
        fingerprint = %key_fingerprint(&session.key),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );

    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state: web::Data::new(http_state),
        session,
    };
    // Signals are handled by the caller so liveness can drop before draining.
    let server = HttpServer::new(move || build_app(deps.clone()))
        .disable_signals()
        .shutdown_timeout(30)
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
