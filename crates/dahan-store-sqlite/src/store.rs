//! [`SqliteStore`], the SQLite implementation of [`ScoreStore`].

use std::path::Path;

use dahan_core::{
  dimension::{Adversary, Aspect, Dimension, GameId, Scenario, Spirit, SpiritId},
  game::{GameDraft, RecordedGame},
  source::{DimensionReport, MasterDataSource, SyncAction, SyncPolicy, SyncReport},
  store::ScoreStore,
  tabular,
  view::GameView,
};
use strum::IntoEnumIterator as _;

use crate::{
  Error, Result,
  encode::RawGameView,
  query::{self, EVENTS_COLUMNS, GAMES_COLUMNS},
  record,
  schema::SCHEMA,
  sync,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A score store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Every call
/// is serialised onto the connection's own thread, so a sync and a record
/// never interleave.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and ensure the schema exists.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(Error::Schema)?;
    let store = Self { conn };
    store.ensure_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store. Used by the tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::Schema)?;
    let store = Self { conn };
    store.ensure_schema().await?;
    Ok(store)
  }

  /// Create any missing tables and apply connection pragmas. Safe to call
  /// any number of times.
  pub async fn ensure_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(Error::Schema)
  }

  async fn count_rows(&self, dimension: Dimension) -> Result<i64> {
    Ok(self.conn.call(move |conn| Ok(query::count_rows(conn, dimension)?)).await?)
  }

  async fn table_csv(&self, table: &'static str, columns: &'static [&'static str]) -> Result<String> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(query::table_csv(conn, table, columns)?))
        .await?,
    )
  }
}

// ─── ScoreStore impl ─────────────────────────────────────────────────────────

impl ScoreStore for SqliteStore {
  type Error = Error;

  // ── Master data ───────────────────────────────────────────────────────────

  async fn sync_master_data<'a, S>(&'a self, source: &'a S, policy: SyncPolicy) -> Result<SyncReport>
  where
    S: MasterDataSource + 'a,
  {
    let mut report = SyncReport::default();
    let mut prepared = Vec::new();

    // Phase 1: decide, fetch and shape every dimension. Nothing is written,
    // so returning early here leaves all tables as they were.
    for dimension in Dimension::iter() {
      let Some(location) = source.locate(dimension) else {
        tracing::warn!(%dimension, "no source configured; skipping");
        report
          .dimensions
          .push(DimensionReport::new(dimension, SyncAction::SkippedNoSource));
        continue;
      };

      if !policy.force_update {
        let existing = self.count_rows(dimension).await?;
        if existing > 0 {
          tracing::info!(%dimension, existing, "table already populated; skipping");
          report
            .dimensions
            .push(DimensionReport::new(dimension, SyncAction::SkippedPopulated));
          continue;
        }
      }

      tracing::info!(%dimension, %location, force = policy.force_update, "fetching master data");
      let payload = source.fetch(dimension, &location).await?;
      let table = tabular::parse(&payload);
      if table.records.is_empty() {
        tracing::warn!(%dimension, "payload has no data rows; leaving table unchanged");
        report
          .dimensions
          .push(DimensionReport::new(dimension, SyncAction::SkippedEmptyPayload));
        continue;
      }

      prepared.push(sync::prepare(dimension, &table)?);
      report
        .dimensions
        .push(DimensionReport::new(dimension, SyncAction::Refreshed));
    }

    if prepared.is_empty() {
      return Ok(report);
    }

    // Phase 2: one transaction across every refreshed table.
    let applied = self
      .conn
      .call(move |conn| Ok(sync::apply(conn, &prepared)?))
      .await?;

    for a in applied {
      if a.orphaned_refs > 0 {
        tracing::warn!(
          dimension = %a.dimension,
          orphaned = a.orphaned_refs,
          "event rows reference names no longer in the source"
        );
      }
      tracing::info!(
        dimension = %a.dimension,
        inserted = a.inserted,
        skipped = a.skipped_rows,
        duplicates = a.duplicates,
        "refreshed"
      );
      if let Some(entry) = report.dimensions.iter_mut().find(|d| d.dimension == a.dimension) {
        entry.inserted = a.inserted;
        entry.skipped_rows = a.skipped_rows;
        entry.duplicates = a.duplicates;
        entry.orphaned_refs = a.orphaned_refs;
      }
    }

    Ok(report)
  }

  async fn list_spirits(&self) -> Result<Vec<Spirit>> {
    Ok(self.conn.call(|conn| Ok(query::spirits(conn)?)).await?)
  }

  async fn list_aspects(&self, spirit: SpiritId) -> Result<Vec<Aspect>> {
    Ok(self.conn.call(move |conn| Ok(query::aspects(conn, spirit)?)).await?)
  }

  async fn list_adversaries(&self) -> Result<Vec<Adversary>> {
    Ok(self.conn.call(|conn| Ok(query::adversaries(conn)?)).await?)
  }

  async fn list_scenarios(&self) -> Result<Vec<Scenario>> {
    Ok(self.conn.call(|conn| Ok(query::scenarios(conn)?)).await?)
  }

  // ── Facts ─────────────────────────────────────────────────────────────────

  async fn record_game(&self, draft: GameDraft) -> Result<RecordedGame> {
    let form = draft.validate()?;
    let total_score = form.total_score();

    let id = self
      .conn
      .call(move |conn| Ok(record::insert_game(conn, &form)?))
      .await?
      .ok_or(Error::MissingInsertId)?;
    Ok(RecordedGame { id, total_score })
  }

  async fn delete_game(&self, id: GameId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM games_fact WHERE game_id = ?1", [id.0])?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_games(&self) -> Result<Vec<GameView>> {
    let raws: Vec<RawGameView> = self.conn.call(|conn| Ok(query::games(conn)?)).await?;
    raws.into_iter().map(RawGameView::into_view).collect()
  }

  async fn raw_games_csv(&self) -> Result<String> {
    self.table_csv("games_fact", GAMES_COLUMNS).await
  }

  async fn raw_events_csv(&self) -> Result<String> {
    self.table_csv("events_fact", EVENTS_COLUMNS).await
  }

  async fn orphaned_event_refs(&self) -> Result<u64> {
    let n = self.conn.call(|conn| Ok(query::orphaned_refs(conn)?)).await?;
    Ok(n as u64)
  }
}
