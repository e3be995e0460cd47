//! SQL schema for the collector SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS collectors (
    collector_id       TEXT PRIMARY KEY,
    first_name         TEXT NOT NULL,
    last_name          TEXT NOT NULL,
    entry_date         TEXT NOT NULL,   -- YYYY-MM-DD
    expiration_date    TEXT NOT NULL,   -- YYYY-MM-DD
    status             TEXT NOT NULL DEFAULT 'Active',
    birth_date         TEXT NOT NULL,
    place_of_birth     TEXT NOT NULL,
    address            TEXT NOT NULL,
    place_of_residence TEXT NOT NULL,
    postal_code        TEXT NOT NULL,
    personal_number    TEXT UNIQUE,     -- NULLs never collide
    email              TEXT NOT NULL UNIQUE,
    phone_number       TEXT,
    whatsapp_opt_in    INTEGER NOT NULL DEFAULT 1,
    print_card         INTEGER NOT NULL DEFAULT 0,
    reminder_count     INTEGER NOT NULL DEFAULT 0,
    note               TEXT,
    created_at         TEXT NOT NULL,   -- RFC 3339 UTC; store-assigned
    last_modified_at   TEXT NOT NULL,   -- RFC 3339 UTC; bumped on every write
    CHECK (expiration_date >= entry_date),
    CHECK (reminder_count >= 0)
);

CREATE INDEX IF NOT EXISTS collectors_expiration_idx ON collectors(expiration_date);
CREATE INDEX IF NOT EXISTS collectors_name_idx       ON collectors(last_name, first_name);

PRAGMA user_version = 1;
";

/// Column list shared by every `SELECT`, in [`crate::encode::CollectorRow`]
/// field order.
pub const COLUMNS: &str = "collector_id, first_name, last_name, entry_date, \
  expiration_date, status, birth_date, place_of_birth, address, \
  place_of_residence, postal_code, personal_number, email, phone_number, \
  whatsapp_opt_in, print_card, reminder_count, note, created_at, \
  last_modified_at";
