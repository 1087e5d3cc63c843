/// Database layer for persistent storage.
/// Handles all database operations for users and donations.

pub mod init;
pub mod models;

use chrono::Utc;
use models::{Donation, DonationFilter, DonationWithDonor, Role, User, PAGE_SIZE, STATUS_PENDING};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Result as SqliteResult};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type DbPool = Arc<Mutex<Connection>>;

/// Create a connection pool (simplified for single-threaded SQLite)
pub fn create_pool(db_path: &Path) -> SqliteResult<DbPool> {
    let conn = Connection::open(db_path)?;
    init::initialize_database(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Create an in-memory database for testing
pub fn create_test_pool() -> DbPool {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory DB");
    init::initialize_database(&conn).expect("Failed to initialize DB");
    Arc::new(Mutex::new(conn))
}

/// Total number of dashboard pages for a matching-row count.
pub fn page_count(total: i64) -> i64 {
    (total + PAGE_SIZE - 1) / PAGE_SIZE
}

const USER_COLUMNS: &str = "id, username, name, password_hash, role, created_at";

const DONATION_COLUMNS: &str = "d.id, d.donor_id, d.food_type, d.quantity, d.expiry, \
     d.pickup_address, d.contact_number, d.status, d.people_fed, d.accepted_by, d.created_at";

fn user_from_row(row: &rusqlite::Row<'_>) -> SqliteResult<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        role: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn donation_from_row(row: &rusqlite::Row<'_>) -> SqliteResult<Donation> {
    Ok(Donation {
        id: row.get(0)?,
        donor_id: row.get(1)?,
        food_type: row.get(2)?,
        quantity: row.get(3)?,
        expiry: row.get(4)?,
        pickup_address: row.get(5)?,
        contact_number: row.get(6)?,
        status: row.get(7)?,
        people_fed: row.get(8)?,
        accepted_by: row.get(9)?,
        created_at: row.get(10)?,
    })
}

/// WHERE clause and parameters for a donation filter. Status is an exact
/// match; pickup address is a case-insensitive substring match.
fn filter_clause(filter: &DonationFilter) -> (String, Vec<String>) {
    let mut conds = Vec::new();
    let mut params = Vec::new();

    if let Some(status) = &filter.status {
        params.push(status.clone());
        conds.push(format!("d.status = ?{}", params.len()));
    }
    if let Some(address) = &filter.pickup_address {
        params.push(address.clone());
        conds.push(format!(
            "instr(lower(d.pickup_address), lower(?{})) > 0",
            params.len()
        ));
    }

    if conds.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", conds.join(" AND ")), params)
    }
}

/// Database operations
pub struct Database;

impl Database {
    /// Create a new user. A duplicate username surfaces as a UNIQUE
    /// constraint error.
    pub async fn create_user(
        pool: &DbPool,
        username: &str,
        name: &str,
        password_hash: &str,
        role: Role,
    ) -> SqliteResult<User> {
        let conn = pool.lock().await;
        let created_at = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO users (username, name, password_hash, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![username, name, password_hash, role, &created_at],
        )?;

        // Retrieve the inserted user
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
        ))?;
        let user = stmt.query_row(params![username], user_from_row)?;

        Ok(user)
    }

    /// Get user by username
    pub async fn get_user(pool: &DbPool, username: &str) -> SqliteResult<Option<User>> {
        let conn = pool.lock().await;

        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
        ))?;
        let user = stmt.query_row(params![username], user_from_row).optional()?;

        Ok(user)
    }

    /// Get user by ID
    pub async fn get_user_by_id(pool: &DbPool, user_id: i64) -> SqliteResult<Option<User>> {
        let conn = pool.lock().await;

        let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;
        let user = stmt.query_row(params![user_id], user_from_row).optional()?;

        Ok(user)
    }

    /// Create a donation owned by the given donor. Status defaults to
    /// Pending; expiry and people_fed are not supplied by the form.
    pub async fn create_donation(
        pool: &DbPool,
        donor_id: i64,
        food_type: &str,
        quantity: &str,
        pickup_address: &str,
        contact_number: &str,
    ) -> SqliteResult<Donation> {
        let conn = pool.lock().await;
        let created_at = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO donations (donor_id, food_type, quantity, pickup_address, contact_number, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                donor_id,
                food_type,
                quantity,
                pickup_address,
                contact_number,
                STATUS_PENDING,
                &created_at
            ],
        )?;

        let id = conn.last_insert_rowid();
        let mut stmt = conn.prepare(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations d WHERE d.id = ?1"
        ))?;
        let donation = stmt.query_row(params![id], donation_from_row)?;

        Ok(donation)
    }

    /// Get donation by ID
    pub async fn get_donation(pool: &DbPool, donation_id: i64) -> SqliteResult<Option<Donation>> {
        let conn = pool.lock().await;

        let mut stmt = conn.prepare(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations d WHERE d.id = ?1"
        ))?;
        let donation = stmt
            .query_row(params![donation_id], donation_from_row)
            .optional()?;

        Ok(donation)
    }

    /// All donations owned by a donor, in store order. The donor dashboard
    /// shows these without filtering or pagination.
    pub async fn donations_for_donor(pool: &DbPool, donor_id: i64) -> SqliteResult<Vec<Donation>> {
        let conn = pool.lock().await;

        let mut stmt = conn.prepare(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations d WHERE d.donor_id = ?1 ORDER BY d.id"
        ))?;
        let donations = stmt
            .query_map(params![donor_id], donation_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(donations)
    }

    /// Count donations matching a filter
    pub async fn count_donations(pool: &DbPool, filter: &DonationFilter) -> SqliteResult<i64> {
        let conn = pool.lock().await;
        let (where_clause, filter_params) = filter_clause(filter);

        let sql = format!("SELECT COUNT(*) FROM donations d{where_clause}");
        let total = conn.query_row(&sql, params_from_iter(filter_params.iter()), |row| {
            row.get(0)
        })?;

        Ok(total)
    }

    /// One page of donations matching a filter, donor details joined in.
    /// Pages are 1-based with a fixed size of PAGE_SIZE; an out-of-range
    /// page yields an empty slice.
    pub async fn list_donations(
        pool: &DbPool,
        filter: &DonationFilter,
        page: i64,
    ) -> SqliteResult<Vec<DonationWithDonor>> {
        let conn = pool.lock().await;
        let (where_clause, filter_params) = filter_clause(filter);
        // page comes from the query string, so keep the arithmetic
        // saturating; an absurdly large page is just an empty slice.
        let offset = page.max(1).saturating_sub(1).saturating_mul(PAGE_SIZE);

        let sql = format!(
            "SELECT {DONATION_COLUMNS}, u.username, u.name
             FROM donations d JOIN users u ON u.id = d.donor_id{where_clause}
             ORDER BY d.id LIMIT {PAGE_SIZE} OFFSET {offset}"
        );
        let mut stmt = conn.prepare(&sql)?;
        let donations = stmt
            .query_map(params_from_iter(filter_params.iter()), |row| {
                Ok(DonationWithDonor {
                    donation: donation_from_row(row)?,
                    donor_username: row.get(11)?,
                    donor_name: row.get(12)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(donations)
    }

    /// Update a donation's status only. Used by the status toggle, which
    /// deliberately leaves accepted_by and people_fed untouched.
    pub async fn update_status(pool: &DbPool, donation_id: i64, status: &str) -> SqliteResult<()> {
        let conn = pool.lock().await;

        conn.execute(
            "UPDATE donations SET status = ?1 WHERE id = ?2",
            params![status, donation_id],
        )?;

        Ok(())
    }

    /// Accept a donation: status, accepting organisation, and the
    /// placeholder people-fed count in a single update. Last write wins on
    /// concurrent accepts.
    pub async fn accept_donation(
        pool: &DbPool,
        donation_id: i64,
        ngo_id: i64,
        people_fed: i64,
    ) -> SqliteResult<()> {
        let conn = pool.lock().await;

        conn.execute(
            "UPDATE donations SET status = ?1, accepted_by = ?2, people_fed = ?3 WHERE id = ?4",
            params![models::STATUS_ACCEPTED, ngo_id, people_fed, donation_id],
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::STATUS_ACCEPTED;

    async fn seed_user(pool: &DbPool, username: &str, role: Role) -> User {
        Database::create_user(pool, username, "Test User", "hash", role)
            .await
            .expect("Failed to create user")
    }

    async fn seed_donation(pool: &DbPool, donor_id: i64, food: &str, address: &str) -> Donation {
        Database::create_donation(pool, donor_id, food, "5kg", address, "555-1234")
            .await
            .expect("Failed to create donation")
    }

    #[tokio::test]
    async fn test_create_user() {
        let pool = create_test_pool();
        let user = Database::create_user(&pool, "alice", "Alice", "phc-hash", Role::Donor)
            .await
            .expect("Failed to create user");

        assert_eq!(user.username, "alice");
        assert_eq!(user.name, "Alice");
        assert_eq!(user.role, Role::Donor);
        assert!(user.id > 0);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let pool = create_test_pool();
        seed_user(&pool, "alice", Role::Donor).await;

        let result = Database::create_user(&pool, "alice", "Other", "hash", Role::Ngo).await;
        assert!(result.is_err(), "duplicate username should fail");

        let total: i64 = {
            let conn = pool.lock().await;
            conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
                .expect("Count failed")
        };
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_get_user() {
        let pool = create_test_pool();
        seed_user(&pool, "bob", Role::Ngo).await;

        let user = Database::get_user(&pool, "bob")
            .await
            .expect("Query failed")
            .expect("User not found");
        assert_eq!(user.username, "bob");
        assert_eq!(user.role, Role::Ngo);

        let by_id = Database::get_user_by_id(&pool, user.id)
            .await
            .expect("Query failed")
            .expect("User not found");
        assert_eq!(by_id, user);
    }

    #[tokio::test]
    async fn test_get_nonexistent_user() {
        let pool = create_test_pool();
        let user = Database::get_user(&pool, "nonexistent")
            .await
            .expect("Query failed");
        assert!(user.is_none());

        let by_id = Database::get_user_by_id(&pool, 42).await.expect("Query failed");
        assert!(by_id.is_none());
    }

    #[tokio::test]
    async fn test_create_donation_defaults() {
        let pool = create_test_pool();
        let donor = seed_user(&pool, "alice", Role::Donor).await;

        let donation =
            Database::create_donation(&pool, donor.id, "Rice", "5kg", "12 Elm St", "555-1234")
                .await
                .expect("Failed to create donation");

        assert_eq!(donation.donor_id, donor.id);
        assert_eq!(donation.food_type, "Rice");
        assert_eq!(donation.status, STATUS_PENDING);
        assert_eq!(donation.expiry, None);
        assert_eq!(donation.people_fed, None);
        assert_eq!(donation.accepted_by, None);
    }

    #[tokio::test]
    async fn test_donations_for_donor_only_own() {
        let pool = create_test_pool();
        let alice = seed_user(&pool, "alice", Role::Donor).await;
        let bob = seed_user(&pool, "bob", Role::Donor).await;

        seed_donation(&pool, alice.id, "Rice", "12 Elm St").await;
        seed_donation(&pool, bob.id, "Bread", "3 Oak Ave").await;
        seed_donation(&pool, alice.id, "Soup", "12 Elm St").await;

        let donations = Database::donations_for_donor(&pool, alice.id)
            .await
            .expect("Query failed");
        assert_eq!(donations.len(), 2);
        assert!(donations.iter().all(|d| d.donor_id == alice.id));
    }

    #[tokio::test]
    async fn test_status_filter_exact_match() {
        let pool = create_test_pool();
        let donor = seed_user(&pool, "alice", Role::Donor).await;
        let ngo = seed_user(&pool, "shelter", Role::Ngo).await;

        let first = seed_donation(&pool, donor.id, "Rice", "12 Elm St").await;
        seed_donation(&pool, donor.id, "Bread", "3 Oak Ave").await;
        Database::accept_donation(&pool, first.id, ngo.id, 4)
            .await
            .expect("Accept failed");

        let filter = DonationFilter {
            status: Some(STATUS_ACCEPTED.to_string()),
            pickup_address: None,
        };
        let rows = Database::list_donations(&pool, &filter, 1)
            .await
            .expect("Query failed");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].donation.id, first.id);
        assert_eq!(rows[0].donation.status, STATUS_ACCEPTED);

        // No filter returns everything
        let rows = Database::list_donations(&pool, &DonationFilter::default(), 1)
            .await
            .expect("Query failed");
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_pickup_address_substring_case_insensitive() {
        let pool = create_test_pool();
        let donor = seed_user(&pool, "alice", Role::Donor).await;

        seed_donation(&pool, donor.id, "Rice", "12 Elm Street").await;
        seed_donation(&pool, donor.id, "Bread", "3 Oak Avenue").await;

        let filter = DonationFilter {
            status: None,
            pickup_address: Some("elm".to_string()),
        };
        let rows = Database::list_donations(&pool, &filter, 1)
            .await
            .expect("Query failed");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].donation.pickup_address, "12 Elm Street");

        let count = Database::count_donations(&pool, &filter)
            .await
            .expect("Count failed");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_pagination_page_two_of_seven() {
        let pool = create_test_pool();
        let donor = seed_user(&pool, "alice", Role::Donor).await;

        let mut ids = Vec::new();
        for i in 0..7 {
            let donation = seed_donation(&pool, donor.id, &format!("Food {i}"), "12 Elm St").await;
            ids.push(donation.id);
        }

        let filter = DonationFilter::default();
        let total = Database::count_donations(&pool, &filter)
            .await
            .expect("Count failed");
        assert_eq!(total, 7);
        assert_eq!(page_count(total), 2);

        let page_two = Database::list_donations(&pool, &filter, 2)
            .await
            .expect("Query failed");
        assert_eq!(page_two.len(), 2);
        assert_eq!(page_two[0].donation.id, ids[5]);
        assert_eq!(page_two[1].donation.id, ids[6]);

        // Out-of-range page yields an empty slice
        let page_three = Database::list_donations(&pool, &filter, 3)
            .await
            .expect("Query failed");
        assert!(page_three.is_empty());
    }

    #[tokio::test]
    async fn test_huge_page_number_yields_empty_slice() {
        let pool = create_test_pool();
        let donor = seed_user(&pool, "alice", Role::Donor).await;
        seed_donation(&pool, donor.id, "Rice", "12 Elm St").await;

        // The page number is attacker-controllable; the offset arithmetic
        // must saturate instead of overflowing.
        let rows = Database::list_donations(&pool, &DonationFilter::default(), i64::MAX)
            .await
            .expect("Query failed");
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_list_donations_joins_donor() {
        let pool = create_test_pool();
        let donor = seed_user(&pool, "alice", Role::Donor).await;
        seed_donation(&pool, donor.id, "Rice", "12 Elm St").await;

        let rows = Database::list_donations(&pool, &DonationFilter::default(), 1)
            .await
            .expect("Query failed");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].donor_username, "alice");
        assert_eq!(rows[0].donor_name, "Test User");
    }

    #[tokio::test]
    async fn test_accept_then_toggle_keeps_acceptance_fields() {
        let pool = create_test_pool();
        let donor = seed_user(&pool, "alice", Role::Donor).await;
        let ngo = seed_user(&pool, "shelter", Role::Ngo).await;
        let donation = seed_donation(&pool, donor.id, "Rice", "12 Elm St").await;

        Database::accept_donation(&pool, donation.id, ngo.id, 7)
            .await
            .expect("Accept failed");

        let accepted = Database::get_donation(&pool, donation.id)
            .await
            .expect("Query failed")
            .expect("Donation not found");
        assert_eq!(accepted.status, STATUS_ACCEPTED);
        assert_eq!(accepted.accepted_by, Some(ngo.id));
        assert_eq!(accepted.people_fed, Some(7));

        // The toggle only touches the status column; the acceptance stamp
        // stays behind, which is the documented inconsistency.
        Database::update_status(&pool, donation.id, STATUS_PENDING)
            .await
            .expect("Update failed");

        let toggled = Database::get_donation(&pool, donation.id)
            .await
            .expect("Query failed")
            .expect("Donation not found");
        assert_eq!(toggled.status, STATUS_PENDING);
        assert_eq!(toggled.accepted_by, Some(ngo.id));
        assert_eq!(toggled.people_fed, Some(7));
    }

    #[tokio::test]
    async fn test_get_nonexistent_donation() {
        let pool = create_test_pool();
        let donation = Database::get_donation(&pool, 99).await.expect("Query failed");
        assert!(donation.is_none());
    }

    #[test]
    fn test_page_count_ceiling() {
        assert_eq!(page_count(0), 0);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(5), 1);
        assert_eq!(page_count(6), 2);
        assert_eq!(page_count(7), 2);
        assert_eq!(page_count(10), 2);
        assert_eq!(page_count(11), 3);
    }
}
