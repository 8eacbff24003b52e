//! The `ScoreStore` trait.
//!
//! Implemented by storage backends (e.g. `dahan-store-sqlite`). The CLI
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  dimension::{Adversary, Aspect, GameId, Scenario, Spirit, SpiritId},
  game::{GameDraft, RecordedGame},
  source::{MasterDataSource, SyncPolicy, SyncReport},
  view::GameView,
};

/// Abstraction over a score store backend.
///
/// Dimension tables are replaced wholesale by [`sync_master_data`]; fact
/// tables are append-only apart from [`delete_game`].
///
/// [`sync_master_data`]: ScoreStore::sync_master_data
/// [`delete_game`]: ScoreStore::delete_game
pub trait ScoreStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Master data ───────────────────────────────────────────────────────

  /// Refresh every dimension from `source` as one all-or-nothing unit.
  ///
  /// A fetch failure for any dimension leaves all four tables untouched.
  fn sync_master_data<'a, S>(
    &'a self,
    source: &'a S,
    policy: SyncPolicy,
  ) -> impl Future<Output = Result<SyncReport, Self::Error>> + Send + 'a
  where
    S: MasterDataSource + 'a;

  /// Spirits ordered by name.
  fn list_spirits(
    &self,
  ) -> impl Future<Output = Result<Vec<Spirit>, Self::Error>> + Send + '_;

  /// Aspects owned by `spirit`, ordered by name.
  fn list_aspects(
    &self,
    spirit: SpiritId,
  ) -> impl Future<Output = Result<Vec<Aspect>, Self::Error>> + Send + '_;

  fn list_adversaries(
    &self,
  ) -> impl Future<Output = Result<Vec<Adversary>, Self::Error>> + Send + '_;

  fn list_scenarios(
    &self,
  ) -> impl Future<Output = Result<Vec<Scenario>, Self::Error>> + Send + '_;

  // ── Facts ─────────────────────────────────────────────────────────────

  /// Validate `draft` and persist it as one game row plus its expanded
  /// event rows. Nothing is written if validation or any insert fails.
  fn record_game(
    &self,
    draft: GameDraft,
  ) -> impl Future<Output = Result<RecordedGame, Self::Error>> + Send + '_;

  /// Delete a game and, by cascade, its events. Returns `false` if no such
  /// game existed.
  fn delete_game(
    &self,
    id: GameId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All games, newest first, with references resolved to names.
  fn list_games(
    &self,
  ) -> impl Future<Output = Result<Vec<GameView>, Self::Error>> + Send + '_;

  /// `games_fact` verbatim as CSV.
  fn raw_games_csv(
    &self,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;

  /// `events_fact` verbatim as CSV.
  fn raw_events_csv(
    &self,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;

  /// Number of event references that point at no current dimension row.
  fn orphaned_event_refs(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
