//! SQLite-backed persistence for the application state.
//!
//! The whole state is stored as one JSON blob in a key-value table, written
//! after every mutation and read once at startup. A blob that fails to parse
//! (or predates the current layout) is discarded and replaced by the seed
//! dataset rather than surfaced as an error.

use rusqlite::{Connection, OptionalExtension, params};

use crate::error::Result;
use crate::models::AppState;

/// Key under which the serialized state lives, doubling as a format version.
pub const STORAGE_KEY: &str = "microlearn:v1";

/// Opens the on-disk database and creates the schema if needed.
pub fn init_database() -> Result<Connection> {
    open_database("db.sqlite3")
}

pub fn open_database(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;
    create_schema(&conn)?;
    Ok(conn)
}

/// In-memory database, used by tests.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;
    Ok(())
}

/// Loads the persisted state. Returns `None` when nothing was saved yet or
/// when the blob is malformed; the caller falls back to the seed dataset.
pub fn load_state(conn: &Connection) -> Option<AppState> {
    let raw: String = conn
        .query_row(
            "SELECT value FROM app_state WHERE key = ?1",
            params![STORAGE_KEY],
            |row| row.get(0),
        )
        .optional()
        .unwrap_or_else(|e| {
            log::warn!("failed to read saved state: {e}");
            None
        })?;

    match serde_json::from_str::<AppState>(&raw) {
        Ok(state) => Some(state),
        Err(e) => {
            log::warn!("discarding corrupt saved state: {e}");
            None
        }
    }
}

/// Writes the whole state as one blob. A failure here is reportable but must
/// not invalidate the in-memory state.
pub fn save_state(conn: &Connection, state: &AppState) -> Result<()> {
    let blob = serde_json::to_string(state)?;
    conn.execute(
        "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2)",
        params![STORAGE_KEY, blob],
    )?;
    Ok(())
}

/// Startup policy: hydrate from storage, or install and persist the seed
/// dataset when nothing usable is there.
pub fn load_or_seed(conn: &Connection) -> AppState {
    if let Some(state) = load_state(conn) {
        return state;
    }
    let state = AppState::seeded();
    if let Err(e) = save_state(conn, &state) {
        log::error!("failed to persist seed dataset: {e}");
    }
    state
}
