//! Game fact recording.

use dahan_core::{dimension::GameId, game::GameForm};
use rusqlite::Connection;

use crate::encode::encode_outcome;

/// Insert one `games_fact` row and its expanded `events_fact` rows in a
/// single transaction.
///
/// Returns `None`, with nothing committed, if the game insert yields no row
/// id.
pub fn insert_game(conn: &mut Connection, form: &GameForm) -> rusqlite::Result<Option<GameId>> {
  let tx = conn.transaction()?;

  let changed = tx.execute(
    "INSERT INTO games_fact (
       game_difficulty, game_win, game_cards, game_dahan,
       game_blight, game_score, game_info
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    rusqlite::params![
      form.difficulty(),
      encode_outcome(form.outcome()),
      form.invader_cards(),
      form.dahan_health(),
      form.blight(),
      form.total_score(),
      form.notes(),
    ],
  )?;
  let game_id = tx.last_insert_rowid();
  if changed == 0 || game_id <= 0 {
    return Ok(None);
  }

  let rows = form.event_rows();
  {
    let mut stmt = tx.prepare(
      "INSERT INTO events_fact (
         game_id, spirit_id, aspect_id, adversary_id, adversary_level, scenario_id
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for row in &rows {
      stmt.execute(rusqlite::params![
        game_id,
        row.spirit.0,
        row.aspect.map(|a| a.0),
        row.adversary.map(|a| a.0),
        row.adversary_level,
        row.scenario.map(|s| s.0),
      ])?;
    }
  }

  tx.commit()?;
  tracing::debug!(game_id, events = rows.len(), score = form.total_score(), "recorded game");
  Ok(Some(GameId(game_id)))
}
