//! # BlogHub API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod realtime;
mod state;

use config::AppConfig;
use middleware::rate_limit::RateLimitMiddleware;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting BlogHub API server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::from_env();

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RateLimitMiddleware::new(state.rate_limiter.clone()))
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
            .route("/ws", web::get().to(realtime::socket))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,api_server=debug,bloghub_infra=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}
