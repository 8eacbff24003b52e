//! Dimension (reference) data: spirits, aspects, adversaries and scenarios.
//!
//! Dimension rows are owned by the master-data synchronizer. A forced refresh
//! deletes and reinserts every row, so surrogate ids are only stable between
//! refreshes; the natural key of every dimension is its unique name.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

// ─── Surrogate ids ───────────────────────────────────────────────────────────

macro_rules! surrogate_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
    }

    impl From<i64> for $name {
      fn from(id: i64) -> Self { Self(id) }
    }
  };
}

surrogate_id!(
  /// Row id in `games_fact`.
  GameId
);
surrogate_id!(SpiritId);
surrogate_id!(AspectId);
surrogate_id!(AdversaryId);
surrogate_id!(ScenarioId);

// ─── Dimension kinds ─────────────────────────────────────────────────────────

/// The four reference datasets.
///
/// Declaration order is the order in which a sync cycle processes them.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Dimension {
  Spirit,
  Adversary,
  Scenario,
  Aspect,
}

/// Storage class of a dimension column, used to coerce source fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
  Text,
  Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
  pub name: &'static str,
  pub kind: ColumnKind,
}

const fn text(name: &'static str) -> Column { Column { name, kind: ColumnKind::Text } }

const fn integer(name: &'static str) -> Column {
  Column { name, kind: ColumnKind::Integer }
}

const SPIRIT_COLUMNS: &[Column] = &[
  integer("spirit_id"),
  text("spirit_name"),
  text("complexity"),
  text("spirit_image"),
  text("nemesis_name"),
];

const ADVERSARY_COLUMNS: &[Column] = &[
  integer("adversary_id"),
  text("adversary_name"),
  text("adversary_image"),
  text("nemesis_name"),
];

const SCENARIO_COLUMNS: &[Column] = &[
  integer("scenario_id"),
  text("scenario_name"),
  integer("scenario_difficulty"),
  text("scenario_image"),
];

const ASPECT_COLUMNS: &[Column] = &[
  integer("aspect_id"),
  text("aspect_name"),
  integer("spirit_id"),
  text("aspect_image"),
];

impl Dimension {
  /// Destination table.
  pub fn table(self) -> &'static str {
    match self {
      Self::Spirit => "spirits_dim",
      Self::Adversary => "adversaries_dim",
      Self::Scenario => "scenarios_dim",
      Self::Aspect => "aspects_dim",
    }
  }

  /// Surrogate key column. `events_fact` uses the same column name for its
  /// reference to this dimension.
  pub fn id_column(self) -> &'static str {
    match self {
      Self::Spirit => "spirit_id",
      Self::Adversary => "adversary_id",
      Self::Scenario => "scenario_id",
      Self::Aspect => "aspect_id",
    }
  }

  /// Unique natural-key column.
  pub fn name_column(self) -> &'static str {
    match self {
      Self::Spirit => "spirit_name",
      Self::Adversary => "adversary_name",
      Self::Scenario => "scenario_name",
      Self::Aspect => "aspect_name",
    }
  }

  pub fn columns(self) -> &'static [Column] {
    match self {
      Self::Spirit => SPIRIT_COLUMNS,
      Self::Adversary => ADVERSARY_COLUMNS,
      Self::Scenario => SCENARIO_COLUMNS,
      Self::Aspect => ASPECT_COLUMNS,
    }
  }

  /// Look up a column by header name, ignoring ASCII case and surrounding
  /// whitespace.
  pub fn column(self, header: &str) -> Option<Column> {
    let header = header.trim();
    self
      .columns()
      .iter()
      .copied()
      .find(|c| c.name.eq_ignore_ascii_case(header))
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spirit {
  pub id:         SpiritId,
  pub name:       String,
  pub complexity: Option<String>,
  pub image:      Option<String>,
  pub nemesis:    Option<String>,
}

/// An aspect variant of a spirit. Aspects with no owning spirit are orphaned
/// and never offered as options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aspect {
  pub id:     AspectId,
  pub name:   String,
  pub spirit: Option<SpiritId>,
  pub image:  Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adversary {
  pub id:      AdversaryId,
  pub name:    String,
  pub image:   Option<String>,
  pub nemesis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
  pub id:         ScenarioId,
  pub name:       String,
  pub difficulty: Option<i64>,
  pub image:      Option<String>,
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator as _;

  use super::*;

  #[test]
  fn sync_order_is_fixed() {
    let order: Vec<_> = Dimension::iter().collect();
    assert_eq!(
      order,
      [Dimension::Spirit, Dimension::Adversary, Dimension::Scenario, Dimension::Aspect]
    );
  }

  #[test]
  fn every_dimension_declares_its_keys() {
    for d in Dimension::iter() {
      let id = d.column(d.id_column()).expect("id column");
      assert_eq!(id.kind, ColumnKind::Integer);
      let name = d.column(d.name_column()).expect("name column");
      assert_eq!(name.kind, ColumnKind::Text);
    }
  }

  #[test]
  fn header_lookup_ignores_case() {
    let col = Dimension::Scenario.column(" Scenario_Difficulty ").unwrap();
    assert_eq!(col.name, "scenario_difficulty");
    assert!(Dimension::Scenario.column("nemesis_name").is_none());
  }

  #[test]
  fn display_is_lowercase() {
    assert_eq!(Dimension::Adversary.to_string(), "adversary");
    let s: &'static str = Dimension::Aspect.into();
    assert_eq!(s, "aspect");
  }
}
