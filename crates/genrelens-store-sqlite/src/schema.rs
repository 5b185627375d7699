//! SQL schema for the GenreLens SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS genres (
    genre_id INTEGER PRIMARY KEY,
    name     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS products (
    product_id         TEXT PRIMARY KEY,
    genre_id           INTEGER NOT NULL,
    first_release_date TEXT,            -- YYYY-MM-DD or NULL
    last_update_date   TEXT,            -- YYYY-MM-DD or NULL
    status             TEXT NOT NULL DEFAULT 'active'   -- 'active' | 'dead'
);

-- One row per (product, country, day). Rating and version columns are NULL
-- on days without a rating observation or version change.
CREATE TABLE IF NOT EXISTS daily_records (
    product_id   TEXT    NOT NULL,
    country_code TEXT    NOT NULL,
    date         TEXT    NOT NULL,      -- YYYY-MM-DD
    downloads    INTEGER NOT NULL DEFAULT 0,
    revenue      INTEGER NOT NULL DEFAULT 0,   -- currency minor units
    active_users REAL    NOT NULL DEFAULT 0,
    install_base REAL    NOT NULL DEFAULT 0,
    rating_value REAL,
    rating_count INTEGER,
    version_old  TEXT,
    version_new  TEXT,
    PRIMARY KEY (product_id, country_code, date)
);

CREATE INDEX IF NOT EXISTS daily_records_date_idx ON daily_records(date);
CREATE INDEX IF NOT EXISTS products_genre_idx     ON products(genre_id);

PRAGMA user_version = 1;
";
