//! Read models rebuilt from the fact tables for display and export.

use serde::{Deserialize, Serialize};

use crate::{dimension::GameId, game::Outcome};

/// A spirit as played, with the aspect it was played with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpiritLine {
  pub spirit: String,
  pub aspect: Option<String>,
}

/// An adversary as played. `level` is shown as stored, even when older
/// data holds a value outside 0..=6.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversaryLine {
  pub name:  String,
  pub level: Option<i64>,
}

/// One recorded game with its dimension references resolved back to names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
  pub id:            GameId,
  pub difficulty:    i64,
  pub outcome:       Outcome,
  pub invader_cards: i64,
  pub dahan_health:  i64,
  pub blight:        i64,
  pub total_score:   i64,
  pub notes:         String,
  pub spirits:       Vec<SpiritLine>,
  pub adversaries:   Vec<AdversaryLine>,
  pub scenarios:     Vec<String>,
}

impl SpiritLine {
  /// `Spirit` or `Spirit (Aspect)`.
  pub fn label(&self) -> String {
    match &self.aspect {
      Some(aspect) => format!("{} ({aspect})", self.spirit),
      None => self.spirit.clone(),
    }
  }
}

impl AdversaryLine {
  /// `Adversary (L3)`, or the bare name when no level was stored.
  pub fn label(&self) -> String {
    match self.level {
      Some(level) => format!("{} (L{level})", self.name),
      None => self.name.clone(),
    }
  }
}
