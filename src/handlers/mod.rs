/// HTTP handlers module
/// Provides auth and donation endpoints

pub mod auth;
pub mod donations;

use actix_web::http::header;
use actix_web::HttpResponse;

pub use auth::{
    dashboard_role_redirect, home, login, login_page, logout, register, register_page,
};
pub use donations::{
    accept_donation, donate_page, donor_dashboard, ngo_dashboard, submit_donation, toggle_status,
};

/// 302 redirect to the given path. Auth and store failures are masked
/// behind redirects rather than surfaced as error pages.
pub(crate) fn redirect(path: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, path))
        .finish()
}

/// Render an HTML page body.
pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(header::ContentType::html())
        .body(body)
}
