//! Error types for `dahan-core`.

use thiserror::Error;

use crate::dimension::{AdversaryId, Dimension};

/// A game draft was rejected before anything was written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("outcome (win or loss) is required")]
  MissingOutcome,

  #[error("at least one spirit must be selected")]
  NoSpirit,

  #[error("adversary {0} has no level selected")]
  MissingAdversaryLevel(AdversaryId),

  #[error("adversary {adversary} level {level} is outside 0..=6")]
  AdversaryLevelOutOfRange { adversary: AdversaryId, level: u8 },

  #[error("{field} cannot be negative (got {value})")]
  NegativeCounter { field: &'static str, value: i64 },

  #[error("total score does not fit in a 64-bit integer")]
  ScoreOverflow,

  #[error("too many {kind} entries: {count} (max {max})")]
  TooManyEntries {
    kind:  &'static str,
    count: usize,
    max:   usize,
  },
}

/// Fetching a master-data payload failed. Either variant aborts the whole
/// sync cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
  #[error("network error fetching {dimension} data: {message}")]
  Network {
    dimension: Dimension,
    message:   String,
  },

  #[error("HTTP {status} fetching {dimension} data")]
  Http { dimension: Dimension, status: u16 },
}

impl SourceError {
  pub fn dimension(&self) -> Dimension {
    match self {
      Self::Network { dimension, .. } | Self::Http { dimension, .. } => *dimension,
    }
  }
}
