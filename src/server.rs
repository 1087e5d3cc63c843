/// HTTP server factory and configuration.
/// Provides reusable functions to create the session middleware, route
/// table, and HTTP server for use in both the main binary and tests.

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::{middleware, web, App, HttpServer};
use sha2::{Digest, Sha512};

use crate::db::DbPool;
use crate::handlers::{
    accept_donation, dashboard_role_redirect, donate_page, donor_dashboard, home, login,
    login_page, logout, ngo_dashboard, register, register_page, submit_donation, toggle_status,
};

/// Session signing key. A configured secret is stretched to the 64 bytes a
/// cookie key requires via SHA-512; without one a random key is generated,
/// so existing sessions invalidate on restart.
pub fn session_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) => {
            let digest = Sha512::digest(secret.as_bytes());
            Key::from(digest.as_slice())
        }
        None => Key::generate(),
    }
}

/// Cookie-backed session middleware. Cookies are not marked secure so the
/// server works over plain HTTP on localhost.
pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .build()
}

/// Register the full route table
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/login", web::get().to(login_page))
        .route("/login", web::post().to(login))
        .route("/register", web::get().to(register_page))
        .route("/register", web::post().to(register))
        .route("/donate", web::get().to(donate_page))
        .route("/donate", web::post().to(submit_donation))
        .route("/donor-dashboard", web::get().to(donor_dashboard))
        .route("/ngo-dashboard", web::get().to(ngo_dashboard))
        .route("/toggle-status/{id}", web::post().to(toggle_status))
        .route("/accept-donation/{id}", web::post().to(accept_donation))
        .route("/dashboard-role-redirect", web::get().to(dashboard_role_redirect))
        .route("/logout", web::get().to(logout));
}

/// Create a configured HTTP server
///
/// Takes a database pool, session key, and bind address, then returns a
/// fully configured `HttpServer` ready to be run.
pub fn create_http_server(
    pool: web::Data<DbPool>,
    key: Key,
    bind_addr: &str,
) -> std::io::Result<actix_web::dev::Server> {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .wrap(middleware::Logger::default())
            .wrap(session_middleware(key.clone()))
            .configure(configure_routes)
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
