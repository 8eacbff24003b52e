//! Game results: the loosely-typed draft a form produces, and the validated
//! [`GameForm`] the recorder persists.
//!
//! A draft mirrors the form state: numeric inputs may be missing and picker
//! slots may be unfilled. [`GameDraft::validate`] is the only way to obtain a
//! [`GameForm`], so every form that reaches the store has an outcome, at least
//! one spirit, and a level for every chosen adversary.

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use crate::{
  dimension::{AdversaryId, AspectId, GameId, ScenarioId, SpiritId},
  error::ValidationError,
};

pub const MAX_SPIRITS: usize = 6;
pub const MAX_ADVERSARIES: usize = 2;
pub const MAX_SCENARIOS: usize = 2;
pub const MAX_ADVERSARY_LEVEL: u8 = 6;

// ─── Outcome ─────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
  #[serde(alias = "Win")]
  Win,
  #[serde(alias = "Loss")]
  Loss,
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// One spirit picker. `spirit` is `None` until the user chooses one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiritPick {
  pub spirit: Option<SpiritId>,
  pub aspect: Option<AspectId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdversaryPick {
  pub adversary: Option<AdversaryId>,
  pub level:     Option<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioPick {
  pub scenario: Option<ScenarioId>,
}

/// Unvalidated form state. Missing numeric inputs count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameDraft {
  pub difficulty:    Option<i64>,
  pub outcome:       Option<Outcome>,
  pub invader_cards: Option<i64>,
  pub dahan_health:  Option<i64>,
  pub blight:        Option<i64>,
  pub notes:         String,
  pub spirits:       Vec<SpiritPick>,
  pub adversaries:   Vec<AdversaryPick>,
  pub scenarios:     Vec<ScenarioPick>,
}

impl GameDraft {
  /// Check every rule and produce a [`GameForm`]. Unfilled picker slots are
  /// dropped.
  pub fn validate(self) -> Result<GameForm, ValidationError> {
    let outcome = self.outcome.ok_or(ValidationError::MissingOutcome)?;

    check_len("spirit", self.spirits.len(), MAX_SPIRITS)?;
    check_len("adversary", self.adversaries.len(), MAX_ADVERSARIES)?;
    check_len("scenario", self.scenarios.len(), MAX_SCENARIOS)?;

    let spirits: Vec<SpiritSlot> = self
      .spirits
      .iter()
      .filter_map(|p| {
        p.spirit.map(|spirit| SpiritSlot { spirit, aspect: p.aspect })
      })
      .collect();
    if spirits.is_empty() {
      return Err(ValidationError::NoSpirit);
    }

    let mut adversaries = Vec::with_capacity(self.adversaries.len());
    for pick in &self.adversaries {
      let Some(adversary) = pick.adversary else { continue };
      let level = pick
        .level
        .ok_or(ValidationError::MissingAdversaryLevel(adversary))?;
      if level > MAX_ADVERSARY_LEVEL {
        return Err(ValidationError::AdversaryLevelOutOfRange { adversary, level });
      }
      adversaries.push(AdversarySlot { adversary, level });
    }

    let scenarios = self.scenarios.iter().filter_map(|p| p.scenario).collect();

    let difficulty = self.difficulty.unwrap_or(0);
    let invader_cards = counter("invader cards", self.invader_cards)?;
    let dahan_health = counter("dahan health", self.dahan_health)?;
    let blight = counter("blight", self.blight)?;
    let total_score = [invader_cards, dahan_health, blight]
      .into_iter()
      .try_fold(difficulty, i64::checked_add)
      .ok_or(ValidationError::ScoreOverflow)?;

    Ok(GameForm {
      difficulty,
      outcome,
      invader_cards,
      dahan_health,
      blight,
      total_score,
      notes: self.notes,
      spirits,
      adversaries,
      scenarios,
    })
  }
}

fn check_len(kind: &'static str, count: usize, max: usize) -> Result<(), ValidationError> {
  if count > max {
    return Err(ValidationError::TooManyEntries { kind, count, max });
  }
  Ok(())
}

fn counter(field: &'static str, value: Option<i64>) -> Result<i64, ValidationError> {
  match value.unwrap_or(0) {
    v if v < 0 => Err(ValidationError::NegativeCounter { field, value: v }),
    v => Ok(v),
  }
}

// ─── Validated form ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiritSlot {
  pub spirit: SpiritId,
  pub aspect: Option<AspectId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdversarySlot {
  pub adversary: AdversaryId,
  pub level:     u8,
}

/// A game result that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameForm {
  difficulty:    i64,
  outcome:       Outcome,
  invader_cards: i64,
  dahan_health:  i64,
  blight:        i64,
  total_score:   i64,
  notes:         String,
  spirits:       Vec<SpiritSlot>,
  adversaries:   Vec<AdversarySlot>,
  scenarios:     Vec<ScenarioId>,
}

impl GameForm {
  pub fn difficulty(&self) -> i64 { self.difficulty }

  pub fn outcome(&self) -> Outcome { self.outcome }

  pub fn invader_cards(&self) -> i64 { self.invader_cards }

  pub fn dahan_health(&self) -> i64 { self.dahan_health }

  pub fn blight(&self) -> i64 { self.blight }

  pub fn notes(&self) -> &str { &self.notes }

  pub fn spirits(&self) -> &[SpiritSlot] { &self.spirits }

  pub fn adversaries(&self) -> &[AdversarySlot] { &self.adversaries }

  pub fn scenarios(&self) -> &[ScenarioId] { &self.scenarios }

  /// Derived score, persisted alongside its components.
  pub fn total_score(&self) -> i64 { self.total_score }

  /// Expand the form into event rows: one per spirit × adversary × scenario.
  ///
  /// An empty adversary or scenario list contributes a single `None` so every
  /// game yields at least one row per spirit.
  pub fn event_rows(&self) -> Vec<EventRow> {
    let adversaries: Vec<Option<AdversarySlot>> = if self.adversaries.is_empty() {
      vec![None]
    } else {
      self.adversaries.iter().copied().map(Some).collect()
    };
    let scenarios: Vec<Option<ScenarioId>> = if self.scenarios.is_empty() {
      vec![None]
    } else {
      self.scenarios.iter().copied().map(Some).collect()
    };

    let mut rows =
      Vec::with_capacity(self.spirits.len() * adversaries.len() * scenarios.len());
    for spirit in &self.spirits {
      for adversary in &adversaries {
        for scenario in &scenarios {
          rows.push(EventRow {
            spirit:          spirit.spirit,
            aspect:          spirit.aspect,
            adversary:       adversary.map(|a| a.adversary),
            adversary_level: adversary.map(|a| a.level),
            scenario:        *scenario,
          });
        }
      }
    }
    rows
  }
}

/// What the store hands back after persisting a [`GameForm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedGame {
  pub id:          GameId,
  pub total_score: i64,
}

/// One `events_fact` row, minus the owning game id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventRow {
  pub spirit:          SpiritId,
  pub aspect:          Option<AspectId>,
  pub adversary:       Option<AdversaryId>,
  pub adversary_level: Option<u8>,
  pub scenario:        Option<ScenarioId>,
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  fn spirit(id: i64) -> SpiritPick {
    SpiritPick { spirit: Some(SpiritId(id)), aspect: None }
  }

  fn adversary(id: i64, level: Option<u8>) -> AdversaryPick {
    AdversaryPick { adversary: Some(AdversaryId(id)), level }
  }

  fn win_with(spirits: Vec<SpiritPick>) -> GameDraft {
    GameDraft { outcome: Some(Outcome::Win), spirits, ..Default::default() }
  }

  #[test]
  fn total_score_sums_components() {
    let draft = GameDraft {
      difficulty: Some(5),
      invader_cards: Some(2),
      dahan_health: Some(10),
      blight: Some(0),
      ..win_with(vec![spirit(1)])
    };
    assert_eq!(draft.validate().unwrap().total_score(), 17);
  }

  #[test]
  fn missing_numbers_count_as_zero() {
    let form = GameDraft { difficulty: Some(3), ..win_with(vec![spirit(1)]) }
      .validate()
      .unwrap();
    assert_eq!(form.invader_cards(), 0);
    assert_eq!(form.total_score(), 3);
  }

  #[test]
  fn cross_product_of_spirits_and_adversaries() {
    let draft = GameDraft {
      adversaries: vec![adversary(10, Some(2)), adversary(11, Some(4))],
      scenarios: vec![ScenarioPick { scenario: Some(ScenarioId(20)) }],
      ..win_with(vec![spirit(1), spirit(2)])
    };
    let rows = draft.validate().unwrap().event_rows();
    assert_eq!(rows.len(), 4);

    let pairs: HashSet<_> = rows.iter().map(|r| (r.spirit, r.adversary)).collect();
    assert_eq!(pairs.len(), 4);
    assert!(rows.iter().all(|r| r.scenario == Some(ScenarioId(20))));
    let lvl = rows
      .iter()
      .find(|r| r.adversary == Some(AdversaryId(11)))
      .and_then(|r| r.adversary_level);
    assert_eq!(lvl, Some(4));
  }

  #[test]
  fn empty_adversaries_and_scenarios_yield_one_sentinel_row() {
    let rows = win_with(vec![spirit(1)]).validate().unwrap().event_rows();
    assert_eq!(rows, vec![EventRow {
      spirit:          SpiritId(1),
      aspect:          None,
      adversary:       None,
      adversary_level: None,
      scenario:        None,
    }]);
  }

  #[test]
  fn unfilled_pickers_are_dropped() {
    let draft = GameDraft {
      adversaries: vec![AdversaryPick { adversary: None, level: Some(3) }],
      scenarios: vec![ScenarioPick::default(), ScenarioPick::default()],
      ..win_with(vec![SpiritPick::default(), spirit(7)])
    };
    let form = draft.validate().unwrap();
    assert_eq!(form.spirits().len(), 1);
    assert!(form.adversaries().is_empty());
    assert_eq!(form.event_rows().len(), 1);
  }

  #[test]
  fn rejects_missing_outcome() {
    let draft = GameDraft { spirits: vec![spirit(1)], ..Default::default() };
    assert_eq!(draft.validate(), Err(ValidationError::MissingOutcome));
  }

  #[test]
  fn rejects_draft_without_spirit() {
    let draft = win_with(vec![SpiritPick::default()]);
    assert_eq!(draft.validate(), Err(ValidationError::NoSpirit));
  }

  #[test]
  fn rejects_adversary_without_level() {
    let draft = GameDraft {
      adversaries: vec![adversary(4, None)],
      ..win_with(vec![spirit(1)])
    };
    assert_eq!(
      draft.validate(),
      Err(ValidationError::MissingAdversaryLevel(AdversaryId(4)))
    );
  }

  #[test]
  fn rejects_level_above_six() {
    let draft = GameDraft {
      adversaries: vec![adversary(4, Some(7))],
      ..win_with(vec![spirit(1)])
    };
    assert!(matches!(
      draft.validate(),
      Err(ValidationError::AdversaryLevelOutOfRange { level: 7, .. })
    ));
  }

  #[test]
  fn rejects_negative_blight() {
    let draft = GameDraft { blight: Some(-1), ..win_with(vec![spirit(1)]) };
    assert!(matches!(
      draft.validate(),
      Err(ValidationError::NegativeCounter { field: "blight", value: -1 })
    ));
  }

  #[test]
  fn rejects_score_that_overflows() {
    let draft = GameDraft {
      difficulty: Some(i64::MAX),
      invader_cards: Some(1),
      ..win_with(vec![spirit(1)])
    };
    assert_eq!(draft.validate(), Err(ValidationError::ScoreOverflow));

    let draft = GameDraft { difficulty: Some(i64::MIN), ..win_with(vec![spirit(1)]) };
    assert_eq!(draft.validate().unwrap().total_score(), i64::MIN);
  }

  #[test]
  fn rejects_seven_spirits() {
    let draft = win_with((1..=7).map(spirit).collect());
    assert!(matches!(
      draft.validate(),
      Err(ValidationError::TooManyEntries { kind: "spirit", count: 7, max: 6 })
    ));
  }

  #[test]
  fn draft_deserialises_from_form_json() {
    let json = r#"{
      "difficulty": 4,
      "outcome": "Win",
      "invader_cards": 3,
      "spirits": [{ "spirit": 2, "aspect": 9 }, {}],
      "adversaries": [{ "adversary": 1, "level": 2 }]
    }"#;
    let draft: GameDraft = serde_json::from_str(json).unwrap();
    assert_eq!(draft.outcome, Some(Outcome::Win));
    assert_eq!(draft.spirits[0].aspect, Some(AspectId(9)));
    assert_eq!(draft.spirits[1], SpiritPick::default());
    assert_eq!(draft.validate().unwrap().total_score(), 7);
  }
}
