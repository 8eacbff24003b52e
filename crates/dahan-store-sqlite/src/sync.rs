//! Master-data refresh: shaping fetched tables into rows, then replacing the
//! dimension tables inside a single transaction.
//!
//! Fetching happens before any of this runs, so a failed download never
//! touches the database. [`apply`] then holds one transaction across every
//! refreshed dimension; a failure in any of them rolls back all of them.

use dahan_core::{
  dimension::{Column, ColumnKind, Dimension},
  tabular::Table,
};
use rusqlite::{Connection, Transaction, types::Value};

use crate::{Error, Result};

// ─── Preparation ─────────────────────────────────────────────────────────────

/// A fetched payload mapped onto a dimension table's columns.
pub struct PreparedTable {
  pub dimension:    Dimension,
  pub columns:      Vec<&'static str>,
  pub rows:         Vec<Vec<Value>>,
  pub skipped_rows: usize,
}

/// Map `table`'s header onto `dimension`'s columns and coerce every record.
///
/// Unknown header columns are dropped. Records whose field count differs from
/// the header, whose integer columns do not parse, whose name is empty, or
/// whose explicit id is not a positive integer are skipped with a warning;
/// they never fail the cycle. A header without the name column does.
///
/// Ids follow the payload's own numbering so that cross-sheet references
/// (an aspect's `spirit_id`) resolve: an id column is used as given, and
/// without one each record gets its 1-based position among the data rows.
pub fn prepare(dimension: Dimension, table: &Table) -> Result<PreparedTable> {
  let mut mapped: Vec<(usize, Column)> = Vec::with_capacity(table.header.len());
  for (i, header) in table.header.iter().enumerate() {
    match dimension.column(header) {
      Some(col) if mapped.iter().any(|(_, c)| c.name == col.name) => {
        tracing::warn!(%dimension, column = col.name, "duplicate header column; keeping the first");
      }
      Some(col) => mapped.push((i, col)),
      None => {
        tracing::warn!(%dimension, header = header.trim(), "ignoring unknown header column");
      }
    }
  }

  let name_column = dimension.name_column();
  let Some(name_pos) = mapped.iter().position(|(_, c)| c.name == name_column) else {
    return Err(Error::InvalidHeader { dimension, column: name_column });
  };
  let id_pos = mapped.iter().position(|(_, c)| c.name == dimension.id_column());

  let mut rows = Vec::with_capacity(table.records.len());
  let mut skipped_rows = 0;

  'records: for (ordinal, record) in (1_i64..).zip(&table.records) {
    if record.fields.len() != table.header.len() {
      tracing::warn!(
        %dimension,
        line = record.line,
        expected = table.header.len(),
        got = record.fields.len(),
        "skipping row: column count mismatch"
      );
      skipped_rows += 1;
      continue;
    }

    let mut row = Vec::with_capacity(mapped.len());
    for (i, col) in &mapped {
      let field = record.fields[*i].trim();
      let value = if field.is_empty() {
        Value::Null
      } else {
        match col.kind {
          ColumnKind::Text => Value::Text(field.to_owned()),
          ColumnKind::Integer => match field.parse::<i64>() {
            Ok(n) => Value::Integer(n),
            Err(_) => {
              tracing::warn!(
                %dimension,
                line = record.line,
                column = col.name,
                value = field,
                "skipping row: not an integer"
              );
              skipped_rows += 1;
              continue 'records;
            }
          },
        }
      };
      row.push(value);
    }

    if row[name_pos] == Value::Null {
      tracing::warn!(%dimension, line = record.line, "skipping row: empty name");
      skipped_rows += 1;
      continue;
    }
    match id_pos {
      Some(pos) if !matches!(row[pos], Value::Integer(id) if id > 0) => {
        tracing::warn!(%dimension, line = record.line, "skipping row: id is not a positive integer");
        skipped_rows += 1;
        continue;
      }
      Some(_) => {}
      None => row.insert(0, Value::Integer(ordinal)),
    }
    rows.push(row);
  }

  let mut columns: Vec<&'static str> = mapped.iter().map(|(_, c)| c.name).collect();
  if id_pos.is_none() {
    columns.insert(0, dimension.id_column());
  }

  Ok(PreparedTable { dimension, columns, rows, skipped_rows })
}

// ─── Application ─────────────────────────────────────────────────────────────

/// Per-dimension result of a committed refresh.
pub struct Applied {
  pub dimension:     Dimension,
  pub inserted:      usize,
  pub duplicates:    usize,
  pub skipped_rows:  usize,
  pub orphaned_refs: u64,
}

/// Replace every prepared dimension table in one transaction.
pub fn apply(conn: &mut Connection, tables: &[PreparedTable]) -> rusqlite::Result<Vec<Applied>> {
  let tx = conn.transaction()?;
  tx.execute_batch(
    "CREATE TEMP TABLE IF NOT EXISTS sync_prior (
       old_id INTEGER PRIMARY KEY,
       name   TEXT NOT NULL
     );
     CREATE TEMP TABLE IF NOT EXISTS sync_remap (
       old_id INTEGER PRIMARY KEY,
       new_id INTEGER NOT NULL
     );",
  )?;

  let mut applied = Vec::with_capacity(tables.len());
  for table in tables {
    applied.push(replace_dimension(&tx, table)?);
  }

  tx.commit()?;
  Ok(applied)
}

/// Delete-all then insert-all for one dimension, carrying existing fact
/// references over to the new ids by name.
fn replace_dimension(tx: &Transaction<'_>, prepared: &PreparedTable) -> rusqlite::Result<Applied> {
  let dimension = prepared.dimension;
  let table = dimension.table();
  let id = dimension.id_column();
  let name = dimension.name_column();

  tx.execute_batch(&format!(
    "DELETE FROM temp.sync_prior;
     DELETE FROM temp.sync_remap;
     INSERT INTO temp.sync_prior (old_id, name) SELECT {id}, {name} FROM {table};
     DELETE FROM {table};"
  ))?;

  let placeholders = vec!["?"; prepared.columns.len()].join(", ");
  let mut inserted = 0;
  {
    let mut stmt = tx.prepare(&format!(
      "INSERT OR IGNORE INTO {table} ({}) VALUES ({placeholders})",
      prepared.columns.join(", ")
    ))?;
    for row in &prepared.rows {
      inserted += stmt.execute(rusqlite::params_from_iter(row.iter()))?;
    }
  }

  tx.execute(
    &format!(
      "INSERT INTO temp.sync_remap (old_id, new_id)
       SELECT p.old_id, d.{id} FROM temp.sync_prior p JOIN {table} d ON d.{name} = p.name"
    ),
    [],
  )?;

  // Event references whose name is gone from the payload. Counted before the
  // rewrite below, since their old id may now belong to a different name.
  let orphaned: i64 = tx.query_row(
    &format!(
      "SELECT COUNT(*) FROM events_fact
       WHERE {id} IN (SELECT old_id FROM temp.sync_prior)
         AND {id} NOT IN (SELECT old_id FROM temp.sync_remap)"
    ),
    [],
    |r| r.get(0),
  )?;

  // Every live reference either follows its name to the new id or is negated.
  // A negated id still renders as `#<id>`, but no current or future row can
  // claim it.
  tx.execute(
    &format!(
      "UPDATE events_fact
       SET {id} = COALESCE(
         (SELECT new_id FROM temp.sync_remap WHERE old_id = events_fact.{id}),
         -{id})
       WHERE {id} > 0"
    ),
    [],
  )?;
  if dimension == Dimension::Spirit {
    // Aspects kept from an earlier cycle lose a vanished owner rather than
    // being offered under whichever spirit took its id.
    tx.execute(
      "UPDATE aspects_dim
       SET spirit_id = (SELECT new_id FROM temp.sync_remap WHERE old_id = aspects_dim.spirit_id)
       WHERE spirit_id IN (SELECT old_id FROM temp.sync_prior)",
      [],
    )?;
  }

  Ok(Applied {
    dimension,
    inserted,
    duplicates: prepared.rows.len() - inserted,
    skipped_rows: prepared.skipped_rows,
    orphaned_refs: orphaned as u64,
  })
}

#[cfg(test)]
mod tests {
  use dahan_core::tabular;

  use super::*;

  #[test]
  fn maps_known_columns_and_drops_unknown() {
    let t = tabular::parse("Spirit_Name,colour,complexity\nRiver,blue,Low\n");
    let p = prepare(Dimension::Spirit, &t).unwrap();
    assert_eq!(p.columns, ["spirit_id", "spirit_name", "complexity"]);
    assert_eq!(p.rows, [[
      Value::Integer(1),
      Value::Text("River".into()),
      Value::Text("Low".into()),
    ]]);
  }

  #[test]
  fn empty_fields_become_null_and_integers_parse() {
    let t = tabular::parse("scenario_name,scenario_difficulty,scenario_image\nBlitz,0,\n");
    let p = prepare(Dimension::Scenario, &t).unwrap();
    assert_eq!(p.rows[0], [
      Value::Integer(1),
      Value::Text("Blitz".into()),
      Value::Integer(0),
      Value::Null,
    ]);
  }

  #[test]
  fn mismatched_and_non_numeric_rows_are_skipped() {
    let t = tabular::parse(
      "scenario_name,scenario_difficulty\nBlitz,0\nbroken\nWard the Shores,two\n,3\nPowers Long Forgotten,1\n",
    );
    let p = prepare(Dimension::Scenario, &t).unwrap();
    assert_eq!(p.rows.len(), 2);
    assert_eq!(p.skipped_rows, 3);
  }

  #[test]
  fn ids_follow_payload_position_when_absent() {
    let t = tabular::parse("spirit_name\nRiver\nbroken,row\nLightning\n");
    let p = prepare(Dimension::Spirit, &t).unwrap();
    let ids: Vec<_> = p.rows.iter().map(|r| r[0].clone()).collect();
    assert_eq!(ids, [Value::Integer(1), Value::Integer(3)]);
  }

  #[test]
  fn explicit_ids_are_kept_and_checked() {
    let t = tabular::parse("Spirit_ID,spirit_name\n7,River\n0,Lightning\n,Shadows\n");
    let p = prepare(Dimension::Spirit, &t).unwrap();
    assert_eq!(p.columns, ["spirit_id", "spirit_name"]);
    assert_eq!(p.rows, [[Value::Integer(7), Value::Text("River".into())]]);
    assert_eq!(p.skipped_rows, 2);
  }

  #[test]
  fn header_without_name_column_is_rejected() {
    let t = tabular::parse("complexity\nLow\n");
    assert!(matches!(
      prepare(Dimension::Spirit, &t),
      Err(Error::InvalidHeader { column: "spirit_name", .. })
    ));
  }
}
