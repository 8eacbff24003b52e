//! Subcommand implementations. Each takes an open store and prints to stdout.

use std::{io::Read as _, path::Path};

use anyhow::{Context, Result};
use dahan_core::{
  dimension::{GameId, SpiritId},
  export,
  game::GameDraft,
  source::{SyncAction, SyncPolicy, SyncReport},
  store::ScoreStore,
  view::GameView,
};
use dahan_sheets::SheetSource;

// ─── Master data ─────────────────────────────────────────────────────────────

pub async fn sync(store: &impl ScoreStore, source: &SheetSource, force: bool) -> Result<()> {
  let report = store
    .sync_master_data(source, SyncPolicy { force_update: force })
    .await
    .context("master data sync failed")?;
  print_report(&report);
  Ok(())
}

/// Fill any empty dimension tables before a command that reads them. A
/// failure leaves the existing tables in place and is not fatal.
pub async fn startup_sync(store: &impl ScoreStore, source: &SheetSource) {
  match store.sync_master_data(source, SyncPolicy::default()).await {
    Ok(report) => {
      let refreshed: Vec<_> = report.refreshed().map(|d| d.to_string()).collect();
      if !refreshed.is_empty() {
        tracing::info!(dimensions = %refreshed.join(", "), "filled empty master data");
      }
    }
    Err(e) => {
      tracing::warn!(error = %e, "startup sync failed; continuing with existing master data");
    }
  }
}

fn print_report(report: &SyncReport) {
  for d in &report.dimensions {
    let action = match d.action {
      SyncAction::Refreshed => "refreshed",
      SyncAction::SkippedNoSource => "skipped (no source configured)",
      SyncAction::SkippedPopulated => "skipped (already populated)",
      SyncAction::SkippedEmptyPayload => "skipped (payload had no rows)",
    };
    print!("{:<10} {action}", d.dimension.to_string());
    if d.action == SyncAction::Refreshed {
      print!(
        ": {} rows, {} malformed, {} duplicate, {} orphaned references",
        d.inserted, d.skipped_rows, d.duplicates, d.orphaned_refs
      );
    }
    println!();
  }
}

// ─── Options ─────────────────────────────────────────────────────────────────

pub async fn spirits(store: &impl ScoreStore) -> Result<()> {
  for s in store.list_spirits().await.context("listing spirits")? {
    match &s.complexity {
      Some(c) => println!("{:>4}  {} [{c}]", s.id, s.name),
      None => println!("{:>4}  {}", s.id, s.name),
    }
  }
  Ok(())
}

pub async fn aspects(store: &impl ScoreStore, spirit: SpiritId) -> Result<()> {
  for a in store.list_aspects(spirit).await.context("listing aspects")? {
    println!("{:>4}  {}", a.id, a.name);
  }
  Ok(())
}

pub async fn adversaries(store: &impl ScoreStore) -> Result<()> {
  for a in store.list_adversaries().await.context("listing adversaries")? {
    println!("{:>4}  {}", a.id, a.name);
  }
  Ok(())
}

pub async fn scenarios(store: &impl ScoreStore) -> Result<()> {
  for s in store.list_scenarios().await.context("listing scenarios")? {
    match s.difficulty {
      Some(d) => println!("{:>4}  {} [difficulty {d}]", s.id, s.name),
      None => println!("{:>4}  {}", s.id, s.name),
    }
  }
  Ok(())
}

// ─── Facts ───────────────────────────────────────────────────────────────────

/// Record the JSON game draft in `file` (`-` reads stdin).
pub async fn record(store: &impl ScoreStore, file: &Path) -> Result<()> {
  let raw = if file == Path::new("-") {
    let mut buf = String::new();
    std::io::stdin()
      .read_to_string(&mut buf)
      .context("reading game from stdin")?;
    buf
  } else {
    std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?
  };
  let draft: GameDraft = serde_json::from_str(&raw).context("parsing game JSON")?;
  let recorded = store.record_game(draft).await.context("recording game")?;
  println!("recorded game {} (total score {})", recorded.id, recorded.total_score);
  Ok(())
}

pub async fn delete(store: &impl ScoreStore, id: GameId) -> Result<()> {
  if store.delete_game(id).await.context("deleting game")? {
    println!("deleted game {id}");
  } else {
    println!("no game {id}");
  }
  Ok(())
}

// ─── Reads ───────────────────────────────────────────────────────────────────

pub async fn list(store: &impl ScoreStore, json: bool) -> Result<()> {
  let games = store.list_games().await.context("listing games")?;
  if json {
    println!("{}", serde_json::to_string_pretty(&games)?);
    return Ok(());
  }

  let orphaned = store.orphaned_event_refs().await.context("auditing references")?;
  if orphaned > 0 {
    tracing::warn!(orphaned, "some game entries reference master data that no longer exists");
  }

  for game in &games {
    print_game(game);
  }
  if games.is_empty() {
    println!("no games recorded");
  }
  Ok(())
}

fn print_game(game: &GameView) {
  println!(
    "#{}  {}  score {}  (difficulty {}, cards {}, dahan {}, blight {})",
    game.id,
    game.outcome,
    game.total_score,
    game.difficulty,
    game.invader_cards,
    game.dahan_health,
    game.blight,
  );
  let spirits: Vec<_> = game.spirits.iter().map(|s| s.label()).collect();
  println!("    spirits:     {}", spirits.join(", "));
  if !game.adversaries.is_empty() {
    let adversaries: Vec<_> = game.adversaries.iter().map(|a| a.label()).collect();
    println!("    adversaries: {}", adversaries.join(", "));
  }
  if !game.scenarios.is_empty() {
    println!("    scenarios:   {}", game.scenarios.join(", "));
  }
  if !game.notes.is_empty() {
    println!("    notes:       {}", game.notes);
  }
}

pub async fn export(store: &impl ScoreStore, out: Option<&Path>) -> Result<()> {
  let games = store.list_games().await.context("listing games")?;
  emit(out, &export::to_csv(&games))
}

pub async fn export_raw(store: &impl ScoreStore, events: bool, out: Option<&Path>) -> Result<()> {
  let csv = if events {
    store.raw_events_csv().await
  } else {
    store.raw_games_csv().await
  }
  .context("dumping table")?;
  emit(out, &csv)
}

fn emit(out: Option<&Path>, contents: &str) -> Result<()> {
  match out {
    Some(path) => {
      std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
      tracing::info!(path = %path.display(), bytes = contents.len(), "wrote export");
    }
    None => print!("{contents}"),
  }
  Ok(())
}
