//! SQL schema for the gatelog SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS check_ins (
    record_id      TEXT PRIMARY KEY,
    person_id      TEXT NOT NULL,
    position       TEXT NOT NULL,   -- 'Student' | 'Staff' | 'Visitor'
    full_name      TEXT,
    purpose        TEXT,
    location       TEXT NOT NULL,
    check_in_time  TEXT NOT NULL,   -- ISO 8601 UTC; service-assigned
    check_out_time TEXT,            -- NULL while the session is open
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

-- The one-open-session rule. The INSERT is the atomic check-then-act;
-- any open-session read before it is advisory only.
CREATE UNIQUE INDEX IF NOT EXISTS check_ins_open_person_idx
    ON check_ins(person_id) WHERE check_out_time IS NULL;

CREATE INDEX IF NOT EXISTS check_ins_time_idx     ON check_ins(check_in_time);
CREATE INDEX IF NOT EXISTS check_ins_position_idx ON check_ins(position);

CREATE TABLE IF NOT EXISTS positions (
    position_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    type        TEXT NOT NULL,      -- 'Student' | 'Staff' | 'Visitor'
    is_active   INTEGER NOT NULL DEFAULT 1
);

PRAGMA user_version = 1;
";
