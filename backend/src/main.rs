//! Backend entry-point: loads settings, wires adapters and serves HTTP.

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use notes_backend::inbound::http::health::HealthState;
use notes_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use notes_backend::server::{AppSettings, build_http_state, create_server};

fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let bind_addr = settings.bind_addr()?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    let http_state = build_http_state(&settings)
        .await
        .wrap_err("failed to initialise adapters")?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), http_state, session, bind_addr)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    let handle = server.handle();

    let shutdown_health = health_state.clone();
    actix_web::rt::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            shutdown_health.mark_unhealthy();
            handle.stop(true).await;
        }
    });

    server.await.wrap_err("server terminated with an error")
}
