/// Handlers for the donation lifecycle: creation, the two dashboards, the
/// status toggle, and acceptance.
use actix_session::Session;
use actix_web::{web, HttpResponse, Result as ActixResult};
use rand::Rng;

use super::{html, redirect};
use crate::auth;
use crate::db::models::{
    DashboardPage, DashboardQuery, DonateForm, Role, User, STATUS_ACCEPTED, STATUS_PENDING,
};
use crate::db::{self, Database, DbPool};
use crate::pages;

/// Access-control gate for role-restricted pages: unauthenticated requests
/// go to the login form, authenticated requests of the wrong role go to
/// that user's own dashboard. Never an error page.
async fn require_role(pool: &DbPool, session: &Session, role: Role) -> Result<User, HttpResponse> {
    let user = match auth::authenticated_user(pool, session).await {
        Some(user) => user,
        None => return Err(redirect("/login")),
    };
    if user.role != role {
        return Err(redirect(user.role.dashboard_path()));
    }
    Ok(user)
}

/// Render the donation form
/// GET /donate
pub async fn donate_page(pool: web::Data<DbPool>, session: Session) -> ActixResult<HttpResponse> {
    let user = match require_role(&pool, &session, Role::Donor).await {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(html(pages::donate_form(&user)))
}

/// Create a donation owned by the current donor
/// POST /donate
pub async fn submit_donation(
    pool: web::Data<DbPool>,
    session: Session,
    form: web::Form<DonateForm>,
) -> ActixResult<HttpResponse> {
    let user = match require_role(&pool, &session, Role::Donor).await {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match Database::create_donation(
        &pool,
        user.id,
        &form.food_type,
        &form.quantity,
        &form.pickup_address,
        &form.contact_number,
    )
    .await
    {
        Ok(_) => Ok(redirect("/donor-dashboard")),
        Err(e) => {
            log::error!("Failed to create donation: {}", e);
            Ok(redirect("/donate"))
        }
    }
}

/// List the current donor's own donations, unfiltered and unpaginated
/// GET /donor-dashboard
pub async fn donor_dashboard(
    pool: web::Data<DbPool>,
    session: Session,
) -> ActixResult<HttpResponse> {
    let user = match require_role(&pool, &session, Role::Donor).await {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match Database::donations_for_donor(&pool, user.id).await {
        Ok(donations) => Ok(html(pages::donor_dashboard(&user, &donations))),
        Err(e) => {
            log::error!("Failed to list donations: {}", e);
            Ok(HttpResponse::InternalServerError().body("Server Error"))
        }
    }
}

/// Filtered, paginated list of all donations with donor details
/// GET /ngo-dashboard
pub async fn ngo_dashboard(
    pool: web::Data<DbPool>,
    session: Session,
    query: web::Query<DashboardQuery>,
) -> ActixResult<HttpResponse> {
    let user = match require_role(&pool, &session, Role::Ngo).await {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let filter = query.filter();
    let page = query.page_number();

    let total = match Database::count_donations(&pool, &filter).await {
        Ok(total) => total,
        Err(e) => {
            log::error!("Failed to count donations: {}", e);
            return Ok(HttpResponse::InternalServerError().body("Server Error"));
        }
    };
    let donations = match Database::list_donations(&pool, &filter, page).await {
        Ok(donations) => donations,
        Err(e) => {
            log::error!("Failed to list donations: {}", e);
            return Ok(HttpResponse::InternalServerError().body("Server Error"));
        }
    };

    let dashboard = DashboardPage {
        donations,
        status_filter: query.status_label().to_string(),
        pickup_filter: query.pickup_label().to_string(),
        current_page: page,
        total_pages: db::page_count(total),
        total,
    };
    Ok(html(pages::ngo_dashboard(&user, &dashboard)))
}

/// Flip a donation's status between Pending and Accepted. Deliberately an
/// open endpoint (no session check), and it leaves accepted_by/people_fed
/// untouched, diverging from the accept flow.
/// POST /toggle-status/{id}
pub async fn toggle_status(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let donation_id = path.into_inner();

    let donation = match Database::get_donation(&pool, donation_id).await {
        Ok(Some(donation)) => donation,
        Ok(None) => return Ok(HttpResponse::NotFound().body("Donation not found")),
        Err(e) => {
            log::error!("Failed to load donation {}: {}", donation_id, e);
            return Ok(HttpResponse::InternalServerError().body("Server Error"));
        }
    };

    let new_status = if donation.status == STATUS_PENDING {
        STATUS_ACCEPTED
    } else {
        STATUS_PENDING
    };

    match Database::update_status(&pool, donation_id, new_status).await {
        Ok(()) => Ok(redirect("/ngo-dashboard")),
        Err(e) => {
            log::error!("Failed to toggle status of {}: {}", donation_id, e);
            Ok(HttpResponse::InternalServerError().body("Server Error"))
        }
    }
}

/// Accept a donation as the current NGO, stamping the accepting identity
/// and a placeholder people-fed count
/// POST /accept-donation/{id}
pub async fn accept_donation(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let user = match require_role(&pool, &session, Role::Ngo).await {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let donation_id = path.into_inner();

    // Placeholder impact metric, not a measured quantity.
    let people_fed = rand::thread_rng().gen_range(1..=10);

    match Database::accept_donation(&pool, donation_id, user.id, people_fed).await {
        Ok(()) => Ok(redirect("/ngo-dashboard")),
        Err(e) => {
            log::error!("Failed to accept donation {}: {}", donation_id, e);
            Ok(redirect("/ngo-dashboard"))
        }
    }
}
