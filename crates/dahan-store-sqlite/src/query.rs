//! Read queries: dimension options, the game read model, raw table dumps.

use dahan_core::{
  dimension::{
    Adversary, AdversaryId, Aspect, AspectId, Dimension, Scenario, ScenarioId, Spirit,
    SpiritId,
  },
  tabular::write_record,
  view::{AdversaryLine, SpiritLine},
};
use rusqlite::{Connection, types::Value};
use strum::IntoEnumIterator as _;

use crate::encode::{RawGame, RawGameView, render_value};

pub const GAMES_COLUMNS: &[&str] = &[
  "game_id",
  "game_difficulty",
  "game_win",
  "game_cards",
  "game_dahan",
  "game_blight",
  "game_score",
  "game_info",
];

pub const EVENTS_COLUMNS: &[&str] = &[
  "event_id",
  "game_id",
  "spirit_id",
  "aspect_id",
  "adversary_id",
  "adversary_level",
  "scenario_id",
];

// ─── Dimensions ──────────────────────────────────────────────────────────────

pub fn count_rows(conn: &Connection, dimension: Dimension) -> rusqlite::Result<i64> {
  conn.query_row(&format!("SELECT COUNT(*) FROM {}", dimension.table()), [], |r| r.get(0))
}

pub fn spirits(conn: &Connection) -> rusqlite::Result<Vec<Spirit>> {
  let mut stmt = conn.prepare(
    "SELECT spirit_id, spirit_name, complexity, spirit_image, nemesis_name
     FROM spirits_dim ORDER BY spirit_name",
  )?;
  let rows = stmt
    .query_map([], |row| {
      Ok(Spirit {
        id:         SpiritId(row.get(0)?),
        name:       row.get(1)?,
        complexity: row.get(2)?,
        image:      row.get(3)?,
        nemesis:    row.get(4)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

/// Aspects owned by `spirit`. Orphaned aspects never match.
pub fn aspects(conn: &Connection, spirit: SpiritId) -> rusqlite::Result<Vec<Aspect>> {
  let mut stmt = conn.prepare(
    "SELECT aspect_id, aspect_name, spirit_id, aspect_image
     FROM aspects_dim WHERE spirit_id = ?1 ORDER BY aspect_name",
  )?;
  let rows = stmt
    .query_map([spirit.0], |row| {
      Ok(Aspect {
        id:     AspectId(row.get(0)?),
        name:   row.get(1)?,
        spirit: row.get::<_, Option<i64>>(2)?.map(SpiritId),
        image:  row.get(3)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn adversaries(conn: &Connection) -> rusqlite::Result<Vec<Adversary>> {
  let mut stmt = conn.prepare(
    "SELECT adversary_id, adversary_name, adversary_image, nemesis_name
     FROM adversaries_dim ORDER BY adversary_name",
  )?;
  let rows = stmt
    .query_map([], |row| {
      Ok(Adversary {
        id:      AdversaryId(row.get(0)?),
        name:    row.get(1)?,
        image:   row.get(2)?,
        nemesis: row.get(3)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn scenarios(conn: &Connection) -> rusqlite::Result<Vec<Scenario>> {
  let mut stmt = conn.prepare(
    "SELECT scenario_id, scenario_name, scenario_difficulty, scenario_image
     FROM scenarios_dim ORDER BY scenario_name",
  )?;
  let rows = stmt
    .query_map([], |row| {
      Ok(Scenario {
        id:         ScenarioId(row.get(0)?),
        name:       row.get(1)?,
        difficulty: row.get(2)?,
        image:      row.get(3)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

// ─── Games ───────────────────────────────────────────────────────────────────

/// Every game, newest first, with its event rows grouped back into spirit,
/// adversary and scenario lines.
///
/// A reference to a dimension row that no longer exists is shown as `#<id>`,
/// using the id it had before it was retired.
pub fn games(conn: &Connection) -> rusqlite::Result<Vec<RawGameView>> {
  let mut games_stmt = conn.prepare(
    "SELECT game_id, game_difficulty, game_win, game_cards, game_dahan,
            game_blight, game_score, game_info
     FROM games_fact ORDER BY game_id DESC",
  )?;
  let games = games_stmt
    .query_map([], |row| {
      Ok(RawGame {
        game_id:    row.get(0)?,
        difficulty: row.get(1)?,
        win:        row.get(2)?,
        cards:      row.get(3)?,
        dahan:      row.get(4)?,
        blight:     row.get(5)?,
        score:      row.get(6)?,
        info:       row.get(7)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut spirits_stmt = conn.prepare(
    "SELECT COALESCE(s.spirit_name, '#' || ABS(e.spirit_id)) AS spirit,
            COALESCE(a.aspect_name, '#' || ABS(e.aspect_id)) AS aspect
     FROM events_fact e
     LEFT JOIN spirits_dim s ON s.spirit_id = e.spirit_id
     LEFT JOIN aspects_dim a ON a.aspect_id = e.aspect_id
     WHERE e.game_id = ?1 AND e.spirit_id IS NOT NULL
     GROUP BY spirit, aspect
     ORDER BY MIN(e.event_id)",
  )?;
  let mut adversaries_stmt = conn.prepare(
    "SELECT COALESCE(d.adversary_name, '#' || ABS(e.adversary_id)) AS adversary,
            e.adversary_level
     FROM events_fact e
     LEFT JOIN adversaries_dim d ON d.adversary_id = e.adversary_id
     WHERE e.game_id = ?1 AND e.adversary_id IS NOT NULL
     GROUP BY adversary, e.adversary_level
     ORDER BY MIN(e.event_id)",
  )?;
  let mut scenarios_stmt = conn.prepare(
    "SELECT COALESCE(d.scenario_name, '#' || ABS(e.scenario_id)) AS scenario
     FROM events_fact e
     LEFT JOIN scenarios_dim d ON d.scenario_id = e.scenario_id
     WHERE e.game_id = ?1 AND e.scenario_id IS NOT NULL
     GROUP BY scenario
     ORDER BY MIN(e.event_id)",
  )?;

  let mut out = Vec::with_capacity(games.len());
  for game in games {
    let id = game.game_id;
    let spirits = spirits_stmt
      .query_map([id], |r| Ok(SpiritLine { spirit: r.get(0)?, aspect: r.get(1)? }))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    let adversaries = adversaries_stmt
      .query_map([id], |r| Ok(AdversaryLine { name: r.get(0)?, level: r.get(1)? }))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    let scenarios = scenarios_stmt
      .query_map([id], |r| r.get(0))?
      .collect::<rusqlite::Result<Vec<String>>>()?;

    out.push(RawGameView { game, spirits, adversaries, scenarios });
  }
  Ok(out)
}

// ─── Integrity ───────────────────────────────────────────────────────────────

/// Event references, across all four dimensions, with no matching row.
pub fn orphaned_refs(conn: &Connection) -> rusqlite::Result<i64> {
  let mut total = 0;
  for d in Dimension::iter() {
    let id = d.id_column();
    let n: i64 = conn.query_row(
      &format!(
        "SELECT COUNT(*) FROM events_fact
         WHERE {id} IS NOT NULL AND {id} NOT IN (SELECT {id} FROM {})",
        d.table()
      ),
      [],
      |r| r.get(0),
    )?;
    total += n;
  }
  Ok(total)
}

// ─── Raw dumps ───────────────────────────────────────────────────────────────

/// Dump `table` as CSV with `columns` as the header, ordered by the first
/// column.
pub fn table_csv(conn: &Connection, table: &str, columns: &[&str]) -> rusqlite::Result<String> {
  let mut out = String::new();
  write_record(&mut out, columns);

  let mut stmt = conn.prepare(&format!(
    "SELECT {} FROM {table} ORDER BY {}",
    columns.join(", "),
    columns[0]
  ))?;
  let mut rows = stmt.query([])?;
  while let Some(row) = rows.next()? {
    let cells = (0..columns.len())
      .map(|i| row.get::<_, Value>(i).map(render_value))
      .collect::<rusqlite::Result<Vec<_>>>()?;
    write_record(&mut out, cells);
  }
  Ok(out)
}
