//! SQL schema for the Dahan SQLite store.
//!
//! Executed on every open. `PRAGMA foreign_keys` is per-connection, so it has
//! to be re-applied each time anyway.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per recorded game. Never updated once written.
CREATE TABLE IF NOT EXISTS games_fact (
    game_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    game_difficulty INTEGER,
    game_win        INTEGER,         -- 1 = win, 0 = loss
    game_cards      INTEGER,
    game_dahan      INTEGER,
    game_blight     INTEGER,
    game_score      INTEGER,         -- difficulty + cards + dahan + blight
    game_info       TEXT
);

-- Spirit x adversary x scenario expansion of a game.
-- Dimension ids are not foreign keys: a refresh recreates dimension rows.
-- A negative dimension id is a reference retired by a refresh.
CREATE TABLE IF NOT EXISTS events_fact (
    event_id        INTEGER PRIMARY KEY AUTOINCREMENT,
    game_id         INTEGER NOT NULL,
    spirit_id       INTEGER NOT NULL,
    aspect_id       INTEGER,
    adversary_id    INTEGER,
    adversary_level INTEGER,
    scenario_id     INTEGER,
    FOREIGN KEY (game_id) REFERENCES games_fact(game_id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS spirits_dim (
    spirit_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    spirit_name  TEXT NOT NULL UNIQUE,
    complexity   TEXT,
    spirit_image TEXT,
    nemesis_name TEXT
);

CREATE TABLE IF NOT EXISTS aspects_dim (
    aspect_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    aspect_name  TEXT NOT NULL UNIQUE,
    spirit_id    INTEGER,            -- NULL = orphaned, never offered
    aspect_image TEXT
);

CREATE TABLE IF NOT EXISTS adversaries_dim (
    adversary_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    adversary_name  TEXT NOT NULL UNIQUE,
    adversary_image TEXT,
    nemesis_name    TEXT
);

CREATE TABLE IF NOT EXISTS scenarios_dim (
    scenario_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    scenario_name       TEXT NOT NULL UNIQUE,
    scenario_difficulty INTEGER,
    scenario_image      TEXT
);

CREATE INDEX IF NOT EXISTS events_game_idx ON events_fact(game_id);

PRAGMA user_version = 1;
";
