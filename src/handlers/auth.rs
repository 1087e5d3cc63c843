/// Handlers for registration, login, logout, and the role-based redirect.
///
/// Failures are never surfaced as error pages: a failed registration or
/// login redirects back to the originating form with the detail only
/// logged, matching the access-control contract.
use actix_session::Session;
use actix_web::{web, HttpResponse, Result as ActixResult};

use super::{html, redirect};
use crate::auth;
use crate::db::models::{LoginForm, RegisterForm, Role};
use crate::db::{Database, DbPool};
use crate::pages;

/// Render home
/// GET /
pub async fn home() -> ActixResult<HttpResponse> {
    Ok(html(pages::home()))
}

/// Render the login form
/// GET /login
pub async fn login_page() -> ActixResult<HttpResponse> {
    Ok(html(pages::login_form()))
}

/// Render the registration form
/// GET /register
pub async fn register_page() -> ActixResult<HttpResponse> {
    Ok(html(pages::register_form()))
}

/// Create a user and log the session in
/// POST /register
pub async fn register(
    pool: web::Data<DbPool>,
    session: Session,
    form: web::Form<RegisterForm>,
) -> ActixResult<HttpResponse> {
    let role = match Role::parse(&form.role) {
        Some(role) => role,
        None => {
            log::warn!("Registration with unknown role {:?}", form.role);
            return Ok(redirect("/register"));
        }
    };

    let password_hash = match auth::hash_password(&form.password) {
        Ok(hash) => hash,
        Err(e) => {
            log::error!("Failed to hash password: {}", e);
            return Ok(redirect("/register"));
        }
    };

    match Database::create_user(&pool, &form.username, &form.name, &password_hash, role).await {
        Ok(user) => {
            if let Err(e) = auth::login_session(&session, &user) {
                log::error!("Failed to establish session: {}", e);
                return Ok(redirect("/login"));
            }
            Ok(redirect(role.dashboard_path()))
        }
        Err(e) => {
            // Duplicate usernames land here as a UNIQUE constraint error.
            log::error!("Failed to register user: {}", e);
            Ok(redirect("/register"))
        }
    }
}

/// Verify credentials and log the session in
/// POST /login
pub async fn login(
    pool: web::Data<DbPool>,
    session: Session,
    form: web::Form<LoginForm>,
) -> ActixResult<HttpResponse> {
    let user = match Database::get_user(&pool, &form.username).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(redirect("/login")),
        Err(e) => {
            log::error!("Failed to look up user: {}", e);
            return Ok(redirect("/login"));
        }
    };

    match auth::verify_password(&form.password, &user.password_hash) {
        Ok(true) => {
            if let Err(e) = auth::login_session(&session, &user) {
                log::error!("Failed to establish session: {}", e);
                return Ok(redirect("/login"));
            }
            Ok(redirect("/dashboard-role-redirect"))
        }
        Ok(false) => Ok(redirect("/login")),
        Err(e) => {
            log::error!("Failed to verify password for {}: {}", user.username, e);
            Ok(redirect("/login"))
        }
    }
}

/// Redirect an authenticated session to its role's dashboard
/// GET /dashboard-role-redirect
pub async fn dashboard_role_redirect(
    pool: web::Data<DbPool>,
    session: Session,
) -> ActixResult<HttpResponse> {
    match auth::authenticated_user(&pool, &session).await {
        Some(user) => Ok(redirect(user.role.dashboard_path())),
        None => Ok(redirect("/login")),
    }
}

/// End the session
/// GET /logout
pub async fn logout(session: Session) -> ActixResult<HttpResponse> {
    auth::clear_session(&session);
    Ok(redirect("/"))
}
