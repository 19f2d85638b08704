//! SQL schema for the Utsav SQLite store.
//!
//! Executed once at connection startup. Every statement is idempotent.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    username      TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    purpose       TEXT NOT NULL,
    gender        TEXT NOT NULL,
    dob           TEXT NOT NULL,   -- YYYY-MM-DD
    religion      TEXT NOT NULL,
    country       TEXT NOT NULL,
    mobile        TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

-- Only the SHA-256 of a session token is stored.
CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    expires_at INTEGER NOT NULL    -- unix seconds
);

-- Shop items and admin-maintained providers, partitioned by item_type.
-- Names are not unique.
CREATE TABLE IF NOT EXISTS catalog_items (
    item_type  TEXT NOT NULL,      -- collection name, e.g. 'Halls'
    item_id    TEXT NOT NULL,      -- 24 hex characters
    name       TEXT NOT NULL,
    price      REAL,
    attributes TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL,
    PRIMARY KEY (item_type, item_id)
);

-- One row per user; created lazily, never deleted.
CREATE TABLE IF NOT EXISTS carts (
    user_id    TEXT PRIMARY KEY,
    created_at TEXT NOT NULL
);

-- name/unit_price are snapshots taken when the line was created.
CREATE TABLE IF NOT EXISTS cart_lines (
    user_id    TEXT NOT NULL REFERENCES carts(user_id),
    item_type  TEXT NOT NULL,
    item_id    TEXT NOT NULL,
    name       TEXT,
    unit_price REAL,
    quantity   INTEGER NOT NULL CHECK (quantity >= 1),
    added_at   TEXT NOT NULL,
    PRIMARY KEY (user_id, item_type, item_id)
);

-- Append-only.
CREATE TABLE IF NOT EXISTS ratings (
    rating_id   TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    review      TEXT NOT NULL,
    score       REAL NOT NULL,
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS catalog_name_idx   ON catalog_items(item_type, name);
CREATE INDEX IF NOT EXISTS sessions_user_idx  ON sessions(user_id);

PRAGMA user_version = 1;
";
