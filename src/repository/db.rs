//! Database Connection and Setup
//!
//! Manages the SQLite connection and migrations.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    conn: Arc<Mutex<Connection>>,
}

impl DbState {
    /// Shared handle for repositories
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }
}

/// Open (or create) the database at `db_path` and run migrations.
///
/// `":memory:"` gives a private in-memory database.
pub async fn init_db(db_path: &Path) -> Result<DbState, String> {
    let db_path_str = db_path.to_str().ok_or("Invalid DB path")?;

    let conn = if db_path_str == ":memory:" {
        Connection::open_in_memory()
    } else {
        Connection::open(db_path_str)
    }
    .map_err(|e| format!("Failed to open db: {}", e))?;

    run_migrations(&conn)?;

    log::info!("Database ready at {}", db_path_str);
    Ok(DbState {
        conn: Arc::new(Mutex::new(conn)),
    })
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let query = format!("PRAGMA table_info({})", table);
    let Ok(mut stmt) = conn.prepare(&query) else {
        return false;
    };
    let Ok(names) = stmt.query_map([], |row| row.get::<_, String>(1)) else {
        return false;
    };
    let found = names.flatten().any(|name| name == column);
    found
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> Result<(), String> {
    // Descriptive columns stay nullable: older rows may lack them and get
    // defaults when read.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS found_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT,
            category TEXT,
            location TEXT,
            found_date TEXT,
            description TEXT,
            secret_code TEXT,
            masked_code TEXT,
            reported_by TEXT,
            contact_email TEXT,
            contact_phone TEXT,
            is_returned INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER
        )",
        [],
    )
    .map_err(|e| e.to_string())?;

    if !column_exists(conn, "found_items", "image_url") {
        conn.execute("ALTER TABLE found_items ADD COLUMN image_url TEXT", [])
            .map_err(|e| format!("Failed to add image_url: {}", e))?;
    }

    if !column_exists(conn, "found_items", "updated_at") {
        conn.execute("ALTER TABLE found_items ADD COLUMN updated_at INTEGER", [])
            .map_err(|e| format!("Failed to add updated_at: {}", e))?;
    }

    // Dashboard looks items up by contact email
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_found_items_contact ON found_items(contact_email)",
        [],
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}
