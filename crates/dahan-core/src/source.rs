//! The `MasterDataSource` trait and the types a sync cycle reports.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{dimension::Dimension, error::SourceError};

/// Where reference data comes from.
///
/// Implemented by `dahan-sheets` over HTTP; tests use in-memory fakes.
pub trait MasterDataSource: Send + Sync {
  /// Resolve the location of `dimension`'s payload. `None` means the
  /// dimension has no usable source and is skipped.
  fn locate(&self, dimension: Dimension) -> Option<String>;

  /// Fetch the raw payload at `location`.
  fn fetch<'a>(
    &'a self,
    dimension: Dimension,
    location: &'a str,
  ) -> impl Future<Output = Result<String, SourceError>> + Send + 'a;
}

/// Refresh policy for one sync cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPolicy {
  /// Refresh tables that already contain rows. When `false`, only empty
  /// tables are filled.
  pub force_update: bool,
}

/// What a sync cycle did with one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
  Refreshed,
  SkippedNoSource,
  SkippedPopulated,
  SkippedEmptyPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionReport {
  pub dimension:     Dimension,
  pub action:        SyncAction,
  /// Rows written to the table.
  pub inserted:      usize,
  /// Rows dropped because their field count did not match the header, or a
  /// numeric column held a non-number.
  pub skipped_rows:  usize,
  /// Rows ignored because their name was already taken earlier in the payload.
  pub duplicates:    usize,
  /// Fact references that could not be carried over to a new id because
  /// their name vanished from the source.
  pub orphaned_refs: u64,
}

impl DimensionReport {
  pub fn new(dimension: Dimension, action: SyncAction) -> Self {
    Self {
      dimension,
      action,
      inserted: 0,
      skipped_rows: 0,
      duplicates: 0,
      orphaned_refs: 0,
    }
  }
}

/// Outcome of a committed sync cycle, one entry per dimension in sync order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
  pub dimensions: Vec<DimensionReport>,
}

impl SyncReport {
  pub fn refreshed(&self) -> impl Iterator<Item = Dimension> + '_ {
    self
      .dimensions
      .iter()
      .filter(|d| d.action == SyncAction::Refreshed)
      .map(|d| d.dimension)
  }

  pub fn get(&self, dimension: Dimension) -> Option<&DimensionReport> {
    self.dimensions.iter().find(|d| d.dimension == dimension)
  }
}
