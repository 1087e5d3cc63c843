/// MealBridge - food donation platform
///
/// Main server entry point. Handles:
/// - Command-line argument parsing
/// - Database initialization
/// - HTTP server startup
use actix_web::web;
use mealbridge::config::Config;
use mealbridge::{db, server};
use std::fs;
use std::process;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();

    let config = Config::from_args();

    log::info!("Starting MealBridge");
    log::info!("Database: {:?}", config.database);
    log::info!("Port: {}", config.port);
    if config.session_secret.is_none() {
        log::info!("No session secret configured; existing sessions will not survive a restart");
    }

    // Write PID file if specified
    if let Some(pidfile) = &config.pidfile {
        let pid = process::id().to_string();
        fs::write(pidfile, pid).expect("Failed to write PID file");
        log::info!("PID file written to: {:?}", pidfile);
    }

    // Initialize database
    let pool = db::create_pool(&config.database).expect("Failed to create database pool");

    log::info!("Database initialized");

    let pool_data = web::Data::new(pool);
    let key = server::session_key(config.session_secret.as_deref());

    // Start HTTP server
    let bind_addr = format!("127.0.0.1:{}", config.port);
    log::info!("Starting HTTP server on {}", bind_addr);

    let http_server = server::create_http_server(pool_data, key, &bind_addr)?;
    http_server.await
}
