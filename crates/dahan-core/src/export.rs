//! CSV export of recorded games.

use crate::{
  tabular::{CELL_SEPARATOR, write_record},
  view::GameView,
};

pub const HEADER: [&str; 11] = [
  "ID",
  "Difficulty",
  "Win/Loss",
  "Invader Cards",
  "Dahan Health",
  "Blight on Boards",
  "Total Score",
  "Notes",
  "Spirits (Aspects)",
  "Adversaries (Levels)",
  "Scenarios",
];

/// Render `games` as CSV: a header row, then one row per game with its
/// spirit, adversary and scenario lists joined into single cells.
pub fn to_csv(games: &[GameView]) -> String {
  let mut out = String::new();
  write_record(&mut out, HEADER);

  for game in games {
    let spirits = join(game.spirits.iter().map(|s| s.label()));
    let adversaries = join(game.adversaries.iter().map(|a| a.label()));
    let scenarios = join(game.scenarios.iter().cloned());

    write_record(&mut out, [
      game.id.to_string(),
      game.difficulty.to_string(),
      game.outcome.to_string(),
      game.invader_cards.to_string(),
      game.dahan_health.to_string(),
      game.blight.to_string(),
      game.total_score.to_string(),
      game.notes.clone(),
      spirits,
      adversaries,
      scenarios,
    ]);
  }

  out
}

fn join(items: impl Iterator<Item = String>) -> String {
  items.collect::<Vec<_>>().join(CELL_SEPARATOR)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    dimension::GameId,
    game::Outcome,
    tabular,
    view::{AdversaryLine, SpiritLine},
  };

  fn game() -> GameView {
    GameView {
      id:            GameId(3),
      difficulty:    5,
      outcome:       Outcome::Win,
      invader_cards: 2,
      dahan_health:  10,
      blight:        0,
      total_score:   17,
      notes:         String::new(),
      spirits:       vec![
        SpiritLine { spirit: "River Surges in Sunlight".into(), aspect: Some("Sunshine".into()) },
        SpiritLine { spirit: "Lightning's Swift Strike".into(), aspect: None },
      ],
      adversaries:   vec![AdversaryLine { name: "Prussia".into(), level: Some(3) }],
      scenarios:     vec!["Blitz".into()],
    }
  }

  #[test]
  fn header_row() {
    let csv = to_csv(&[]);
    assert_eq!(
      csv,
      "ID,Difficulty,Win/Loss,Invader Cards,Dahan Health,Blight on Boards,\
       Total Score,Notes,Spirits (Aspects),Adversaries (Levels),Scenarios\n"
    );
  }

  #[test]
  fn multi_valued_cells_are_joined_and_quoted() {
    let csv = to_csv(&[game()]);
    let row = csv.lines().nth(1).unwrap();
    assert_eq!(
      row,
      "3,5,Win,2,10,0,17,,\"River Surges in Sunlight (Sunshine); Lightning's Swift Strike\",\
       Prussia (L3),Blitz"
    );
  }

  #[test]
  fn comma_in_name_survives_a_csv_reader() {
    let mut g = game();
    g.spirits = vec![SpiritLine { spirit: "A, B".into(), aspect: None }];
    g.notes = "said \"close one\"\nnext time".into();

    let parsed = tabular::parse(&to_csv(&[g]));
    let record = &parsed.records[0].fields;
    assert_eq!(record.len(), HEADER.len());
    assert_eq!(record[8], "A, B");
    assert_eq!(record[7], "said \"close one\"\nnext time");
  }
}
