//! Error type for `dahan-store-sqlite`.

use dahan_core::{SourceError, ValidationError, dimension::Dimension};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The store could not be opened or its schema could not be created.
  /// There is no recovery; callers should treat this as a startup failure.
  #[error("schema error: {0}")]
  Schema(#[source] tokio_rusqlite::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("invalid game: {0}")]
  Validation(#[from] ValidationError),

  /// A fetch failed; the sync cycle was abandoned with no table changed.
  #[error("sync aborted: {0}")]
  Source(#[from] SourceError),

  #[error("{dimension} payload header has no {column} column")]
  InvalidHeader {
    dimension: Dimension,
    column:    &'static str,
  },

  #[error("game insert returned no row id")]
  MissingInsertId,

  #[error("unexpected value {value} in {column}")]
  Decode { column: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
