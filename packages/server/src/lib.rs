#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the Kerbside vehicle data platform.
//!
//! Exposes the gateway operations as a small JSON API for the
//! marketplace front-end: every lookup is a POST with an identifier in
//! the body, success responses pass the upstream-shaped payload
//! through, and failures mirror the upstream status code where one
//! exists (local validation is 400, configuration and unknown
//! failures are 500, unreachable upstreams are 502).

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use kerbside_vehicle_data::VehicleDataGateway;

/// Shared application state.
pub struct AppState {
    /// The vehicle data gateway, including its OAuth token cache.
    pub gateway: Arc<VehicleDataGateway>,
}

/// Registers the API routes. Shared between [`run_server`] and the
/// handler tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/vehicle-enquiry", web::post().to(handlers::vehicle_enquiry))
            .route("/driver-enquiry", web::post().to(handlers::driver_enquiry))
            .route("/mot-history", web::post().to(handlers::mot_history))
            .route("/valuation", web::post().to(handlers::valuation))
            .route("/insurance", web::post().to(handlers::insurance))
            .route("/history-check", web::post().to(handlers::history_check))
            .route("/vehicle-report", web::post().to(handlers::vehicle_report)),
    );
}

/// Starts the Kerbside API server.
///
/// Builds the gateway and its token cache from the environment and
/// binds the Actix-Web server. Missing credentials are logged but do
/// not prevent startup; the affected operations answer with a
/// configuration error instead.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = kerbside_vehicle_data::GatewayConfig::from_env();
    for (name, value) in [
        ("DVLA_API_KEY", &config.dvla_api_key),
        ("DVLA_DRIVER_API_TOKEN", &config.driver_api_token),
        ("MOT_API_KEY", &config.mot_api_key),
        ("CAP_HPI_API_TOKEN", &config.cap_api_token),
    ] {
        if value.is_none() {
            log::warn!("{name} is not set; the operations that need it will report it");
        }
    }

    let tokens = kerbside_auth::TokenCache::new(kerbside_auth::OAuthConfig::from_env());
    let gateway = Arc::new(VehicleDataGateway::new(config, tokens));
    let state = web::Data::new(AppState { gateway });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
