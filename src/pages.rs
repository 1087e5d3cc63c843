/// Server-rendered HTML pages.
///
/// Deliberately minimal: a handful of format! templates with HTML escaping
/// for user-supplied values. Pager and filter state travel as GET form
/// fields so no URL query-string encoding is needed.
use crate::db::models::{
    DashboardPage, Donation, User, STATUS_ACCEPTED, STATUS_PENDING,
};

/// Escape a string for safe interpolation into HTML text or attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

pub fn home() -> String {
    layout(
        "MealBridge",
        "<h1>MealBridge</h1>\
         <p>Connecting food donors with NGOs.</p>\
         <nav><a href=\"/login\">Log in</a> | <a href=\"/register\">Register</a></nav>",
    )
}

pub fn login_form() -> String {
    layout(
        "Log in - MealBridge",
        "<h1>Log in</h1>\
         <form method=\"post\" action=\"/login\">\
         <label>Username <input name=\"username\" required></label><br>\
         <label>Password <input name=\"password\" type=\"password\" required></label><br>\
         <button type=\"submit\">Log in</button>\
         </form>\
         <p><a href=\"/register\">Need an account? Register</a></p>",
    )
}

pub fn register_form() -> String {
    layout(
        "Register - MealBridge",
        "<h1>Register</h1>\
         <form method=\"post\" action=\"/register\">\
         <label>Name <input name=\"name\" required></label><br>\
         <label>Username <input name=\"username\" required></label><br>\
         <label>Password <input name=\"password\" type=\"password\" required></label><br>\
         <label>Role <select name=\"role\">\
         <option value=\"donor\">Donor</option>\
         <option value=\"ngo\">NGO</option>\
         </select></label><br>\
         <button type=\"submit\">Register</button>\
         </form>\
         <p><a href=\"/login\">Already registered? Log in</a></p>",
    )
}

pub fn donate_form(user: &User) -> String {
    let body = format!(
        "<h1>Donate food</h1>\
         <p>Signed in as {}</p>\
         <form method=\"post\" action=\"/donate\">\
         <label>Food type <input name=\"foodType\" required></label><br>\
         <label>Quantity <input name=\"quantity\" required></label><br>\
         <label>Pickup address <input name=\"pickupAddress\" required></label><br>\
         <label>Contact number <input name=\"contactNumber\" required></label><br>\
         <button type=\"submit\">Submit donation</button>\
         </form>\
         <p><a href=\"/donor-dashboard\">Back to dashboard</a></p>",
        escape(&user.name)
    );
    layout("Donate - MealBridge", &body)
}

fn donation_cells(donation: &Donation) -> String {
    let people_fed = donation
        .people_fed
        .map(|n| n.to_string())
        .unwrap_or_default();
    format!(
        "<td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
        escape(&donation.food_type),
        escape(&donation.quantity),
        escape(&donation.pickup_address),
        escape(&donation.contact_number),
        escape(&donation.status),
        people_fed
    )
}

pub fn donor_dashboard(user: &User, donations: &[Donation]) -> String {
    let mut rows = String::new();
    for donation in donations {
        rows.push_str(&format!("<tr>{}</tr>", donation_cells(donation)));
    }
    let body = format!(
        "<h1>Donor dashboard</h1>\
         <p>Welcome, {}</p>\
         <p><a href=\"/donate\">Donate food</a> | <a href=\"/logout\">Log out</a></p>\
         <table border=\"1\">\
         <tr><th>Food</th><th>Quantity</th><th>Pickup address</th><th>Contact</th><th>Status</th><th>People fed</th></tr>\
         {}\
         </table>",
        escape(&user.name),
        rows
    );
    layout("Donor dashboard - MealBridge", &body)
}

pub fn ngo_dashboard(user: &User, page: &DashboardPage) -> String {
    let mut rows = String::new();
    for row in &page.donations {
        rows.push_str(&format!(
            "<tr><td>{}</td>{}<td>\
             <form method=\"post\" action=\"/accept-donation/{}\"><button type=\"submit\">Accept</button></form>\
             <form method=\"post\" action=\"/toggle-status/{}\"><button type=\"submit\">Toggle status</button></form>\
             </td></tr>",
            escape(&row.donor_name),
            donation_cells(&row.donation),
            row.donation.id,
            row.donation.id
        ));
    }

    let selected = |value: &str| {
        if page.status_filter == value {
            " selected"
        } else {
            ""
        }
    };
    let filter_form = format!(
        "<form method=\"get\" action=\"/ngo-dashboard\">\
         <label>Status <select name=\"status\">\
         <option value=\"All\"{}>All</option>\
         <option value=\"{STATUS_PENDING}\"{}>{STATUS_PENDING}</option>\
         <option value=\"{STATUS_ACCEPTED}\"{}>{STATUS_ACCEPTED}</option>\
         </select></label>\
         <label>Pickup address <input name=\"pickupAddress\" value=\"{}\"></label>\
         <button type=\"submit\">Filter</button>\
         </form>",
        selected("All"),
        selected(STATUS_PENDING),
        selected(STATUS_ACCEPTED),
        escape(&page.pickup_filter)
    );

    let pager_form = |label: &str, target: i64| {
        format!(
            "<form method=\"get\" action=\"/ngo-dashboard\" style=\"display:inline\">\
             <input type=\"hidden\" name=\"status\" value=\"{}\">\
             <input type=\"hidden\" name=\"pickupAddress\" value=\"{}\">\
             <input type=\"hidden\" name=\"page\" value=\"{}\">\
             <button type=\"submit\">{}</button>\
             </form>",
            escape(&page.status_filter),
            escape(&page.pickup_filter),
            target,
            escape(label)
        )
    };
    let mut pager = String::new();
    if page.current_page > 1 {
        pager.push_str(&pager_form("Previous", page.current_page - 1));
    }
    pager.push_str(&format!(
        " Page {} of {} ({} donations) ",
        page.current_page, page.total_pages, page.total
    ));
    if page.current_page < page.total_pages {
        pager.push_str(&pager_form("Next", page.current_page + 1));
    }

    let body = format!(
        "<h1>NGO dashboard</h1>\
         <p>Welcome, {}</p>\
         <p><a href=\"/logout\">Log out</a></p>\
         {}\
         <table border=\"1\">\
         <tr><th>Donor</th><th>Food</th><th>Quantity</th><th>Pickup address</th><th>Contact</th><th>Status</th><th>People fed</th><th>Actions</th></tr>\
         {}\
         </table>\
         <p>{}</p>",
        escape(&user.name),
        filter_form,
        rows,
        pager
    );
    layout("NGO dashboard - MealBridge", &body)
}
