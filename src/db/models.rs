/// Data models for database operations.
/// Represents users, donations, and the form/query payloads handlers receive.
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Donation status values. Stored as free text so the column tolerates
/// whatever historic data holds, but these two are the only values the
/// application itself writes.
pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_ACCEPTED: &str = "Accepted";

/// Number of donations shown per NGO dashboard page.
pub const PAGE_SIZE: i64 = 5;

/// User role. Closed enum rather than a free-text string so the stored
/// value and the dashboard route it maps to cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Ngo,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Donor => "donor",
            Role::Ngo => "ngo",
        }
    }

    /// Parse the serialised form; returns None for anything unknown.
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "donor" => Some(Role::Donor),
            "ngo" => Some(Role::Ngo),
            _ => None,
        }
    }

    /// Dashboard route for this role.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Donor => "/donor-dashboard",
            Role::Ngo => "/ngo-dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()
            .and_then(|s| Role::parse(s).ok_or(FromSqlError::InvalidType))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Donation {
    pub id: i64,
    pub donor_id: i64,
    pub food_type: String,
    pub quantity: String,
    pub expiry: Option<i64>,
    pub pickup_address: String,
    pub contact_number: String,
    pub status: String,
    pub people_fed: Option<i64>,
    pub accepted_by: Option<i64>,
    pub created_at: String,
}

/// A donation row with the owning donor's details joined in, as shown on
/// the NGO dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationWithDonor {
    pub donation: Donation,
    pub donor_username: String,
    pub donor_name: String,
}

// Form payloads (application/x-www-form-urlencoded)

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub username: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct DonateForm {
    #[serde(rename = "foodType")]
    pub food_type: String,
    pub quantity: String,
    #[serde(rename = "pickupAddress")]
    pub pickup_address: String,
    #[serde(rename = "contactNumber")]
    pub contact_number: String,
}

/// Query string accepted by the NGO dashboard. `page` arrives as text so a
/// malformed value falls back to page 1 instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub status: Option<String>,
    #[serde(rename = "pickupAddress")]
    pub pickup_address: Option<String>,
    pub page: Option<String>,
}

impl DashboardQuery {
    /// Requested page number, defaulting to 1 for missing or unusable input.
    pub fn page_number(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    /// Normalised filter: "All" and empty strings mean no filter.
    pub fn filter(&self) -> DonationFilter {
        let status = self
            .status
            .as_deref()
            .filter(|s| !s.is_empty() && *s != "All")
            .map(str::to_string);
        let pickup_address = self
            .pickup_address
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        DonationFilter {
            status,
            pickup_address,
        }
    }

    /// Status filter as echoed back to the page.
    pub fn status_label(&self) -> &str {
        self.status.as_deref().filter(|s| !s.is_empty()).unwrap_or("All")
    }

    /// Pickup-address filter as echoed back to the page.
    pub fn pickup_label(&self) -> &str {
        self.pickup_address.as_deref().unwrap_or("")
    }
}

/// Donation list filter applied by the NGO dashboard.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DonationFilter {
    /// Exact status match when set.
    pub status: Option<String>,
    /// Case-insensitive substring match on the pickup address when set.
    /// Folding happens in SQLite's lower(), which only covers ASCII, so
    /// non-ASCII letters ("Łódź" vs "łódź") compare case-sensitively.
    pub pickup_address: Option<String>,
}

/// One page of the NGO dashboard, with the applied filters and paging
/// state echoed back for display.
#[derive(Debug)]
pub struct DashboardPage {
    pub donations: Vec<DonationWithDonor>,
    pub status_filter: String,
    pub pickup_filter: String,
    pub current_page: i64,
    pub total_pages: i64,
    pub total: i64,
}
