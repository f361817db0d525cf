//! SQLite access: connection factory and schema bootstrap.
//!
//! Handlers open a fresh connection per operation against the configured
//! database file. WAL journaling lets readers proceed while a writer holds
//! the file, and the busy timeout bounds writer waits instead of failing
//! immediately. Counter columns are only ever changed with in-place
//! `UPDATE ... SET x = x + 1` statements, and the `UNIQUE` constraint on
//! `guides.slug` is the backstop for concurrent slug allocation.

use std::path::PathBuf;
use std::time::Duration;

use rusqlite::Connection;

use crate::error::ApiError;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS guides (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    slug             TEXT NOT NULL UNIQUE,
    category         TEXT NOT NULL,
    featured_image   TEXT,
    is_published     INTEGER NOT NULL DEFAULT 1,
    is_featured      INTEGER NOT NULL DEFAULT 0,
    publication_date TEXT NOT NULL,
    view_count       INTEGER NOT NULL DEFAULT 0,
    likes            INTEGER NOT NULL DEFAULT 0,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS guide_translations (
    guide_id          INTEGER NOT NULL REFERENCES guides(id) ON DELETE CASCADE,
    lang              TEXT NOT NULL,
    title             TEXT NOT NULL,
    short_description TEXT NOT NULL,
    content           TEXT NOT NULL,
    meta_description  TEXT,
    keywords          TEXT,
    PRIMARY KEY (guide_id, lang)
);

CREATE INDEX IF NOT EXISTS idx_guides_category ON guides(category, is_published);

CREATE TABLE IF NOT EXISTS service_requests (
    id                     INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name              TEXT NOT NULL,
    email_address          TEXT NOT NULL,
    phone_number           TEXT NOT NULL,
    country_code           TEXT NOT NULL DEFAULT '+998',
    services_needed        TEXT NOT NULL,
    location               TEXT,
    estimated_budget       TEXT,
    detailed_requirements  TEXT NOT NULL,
    additional_information TEXT,
    business_type          TEXT,
    business_requirements  TEXT,
    is_processed           INTEGER NOT NULL DEFAULT 0,
    status                 TEXT NOT NULL DEFAULT 'pending',
    created_at             TEXT NOT NULL,
    updated_at             TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user_reviews (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    reviewer_name    TEXT NOT NULL,
    reviewer_email   TEXT,
    reviewer_country TEXT,
    reviewer_avatar  TEXT,
    title            TEXT,
    content          TEXT NOT NULL,
    rating           INTEGER NOT NULL,
    service_used     TEXT,
    is_approved      INTEGER NOT NULL DEFAULT 0,
    is_featured      INTEGER NOT NULL DEFAULT 0,
    is_verified      INTEGER NOT NULL DEFAULT 0,
    helpful_votes    INTEGER NOT NULL DEFAULT 0,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);
";

/// Handle to the database file, shared through `web::Data`.
#[derive(Debug, Clone)]
pub struct Db {
    path: PathBuf,
}

impl Db {
    pub fn new(path: impl Into<PathBuf>) -> Db {
        Db { path: path.into() }
    }

    pub fn open(&self) -> Result<Connection, ApiError> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(conn)
    }
}

/// Creates all tables if they do not exist yet. Run once at startup.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}
