/// Database schema initialization.
/// Sets up SQLite WAL mode and creates tables on startup.
use rusqlite::{Connection, Result as SqliteResult};

/// Initialize database connection with WAL mode and schema
pub fn initialize_database(conn: &Connection) -> SqliteResult<()> {
    // Enable WAL mode (for file-based DB only, ignore error for in-memory)
    let _ = conn.execute("PRAGMA journal_mode = WAL", []);
    let _ = conn.execute("PRAGMA synchronous = NORMAL", []);

    // Create tables
    create_schema(conn)?;

    Ok(())
}

/// Create all database tables
fn create_schema(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            username TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS donations (
            id INTEGER PRIMARY KEY,
            donor_id INTEGER NOT NULL,
            food_type TEXT NOT NULL,
            quantity TEXT NOT NULL,
            expiry INTEGER,
            pickup_address TEXT NOT NULL,
            contact_number TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'Pending',
            people_fed INTEGER,
            accepted_by INTEGER,
            created_at TEXT NOT NULL,
            FOREIGN KEY(donor_id) REFERENCES users(id),
            FOREIGN KEY(accepted_by) REFERENCES users(id)
        );

        CREATE INDEX IF NOT EXISTS idx_donations_donor ON donations(donor_id);
        CREATE INDEX IF NOT EXISTS idx_donations_status ON donations(status);
        "#,
    )?;

    Ok(())
}
