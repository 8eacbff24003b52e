//! Encoding and decoding helpers between domain types and SQLite columns.

use dahan_core::{
  dimension::GameId,
  game::Outcome,
  view::{AdversaryLine, GameView, SpiritLine},
};
use rusqlite::types::Value;

use crate::{Error, Result};

// ─── Outcome ─────────────────────────────────────────────────────────────────

pub fn encode_outcome(outcome: Outcome) -> i64 {
  match outcome {
    Outcome::Win => 1,
    Outcome::Loss => 0,
  }
}

pub fn decode_outcome(value: Option<i64>) -> Result<Outcome> {
  match value {
    Some(1) => Ok(Outcome::Win),
    Some(0) => Ok(Outcome::Loss),
    other => Err(Error::Decode {
      column: "game_win",
      value:  other.map_or_else(|| "NULL".to_owned(), |v| v.to_string()),
    }),
  }
}

// ─── Raw cells ───────────────────────────────────────────────────────────────

/// Render a cell for raw CSV export. NULL becomes an empty field.
pub fn render_value(value: Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::Integer(i) => i.to_string(),
    Value::Real(f) => f.to_string(),
    Value::Text(s) => s,
    Value::Blob(b) => String::from_utf8_lossy(&b).into_owned(),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Columns read directly from a `games_fact` row.
pub struct RawGame {
  pub game_id:    i64,
  pub difficulty: Option<i64>,
  pub win:        Option<i64>,
  pub cards:      Option<i64>,
  pub dahan:      Option<i64>,
  pub blight:     Option<i64>,
  pub score:      Option<i64>,
  pub info:       Option<String>,
}

/// A `games_fact` row together with its grouped event lines.
pub struct RawGameView {
  pub game:        RawGame,
  pub spirits:     Vec<SpiritLine>,
  pub adversaries: Vec<AdversaryLine>,
  pub scenarios:   Vec<String>,
}

impl RawGameView {
  pub fn into_view(self) -> Result<GameView> {
    let g = self.game;
    Ok(GameView {
      id:            GameId(g.game_id),
      difficulty:    g.difficulty.unwrap_or(0),
      outcome:       decode_outcome(g.win)?,
      invader_cards: g.cards.unwrap_or(0),
      dahan_health:  g.dahan.unwrap_or(0),
      blight:        g.blight.unwrap_or(0),
      total_score:   g.score.unwrap_or(0),
      notes:         g.info.unwrap_or_default(),
      spirits:       self.spirits,
      adversaries:   self.adversaries,
      scenarios:     self.scenarios,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn outcome_round_trips_through_integer() {
    for o in [Outcome::Win, Outcome::Loss] {
      assert_eq!(decode_outcome(Some(encode_outcome(o))).unwrap(), o);
    }
  }

  #[test]
  fn unknown_outcome_is_an_error() {
    assert!(matches!(decode_outcome(Some(2)), Err(Error::Decode { .. })));
    assert!(matches!(decode_outcome(None), Err(Error::Decode { .. })));
  }

  #[test]
  fn null_renders_empty() {
    assert_eq!(render_value(Value::Null), "");
    assert_eq!(render_value(Value::Integer(7)), "7");
  }
}
