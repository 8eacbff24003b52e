//! Comma-separated text: an RFC 4180 reader for master-data payloads and the
//! matching writer used by every CSV export.
//!
//! The reader is lenient. It never fails; ragged rows are returned as-is so
//! the caller can decide what a field-count mismatch means, an unterminated
//! quote runs to end of input, and text after a closing quote is kept.

use std::borrow::Cow;

// ─── Reader ──────────────────────────────────────────────────────────────────

/// A parsed payload: the first non-blank record is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
  pub header:  Vec<String>,
  pub records: Vec<Record>,
}

/// One data record and the 1-based line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
  pub line:   usize,
  pub fields: Vec<String>,
}

impl Table {
  pub fn is_empty(&self) -> bool { self.header.is_empty() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
  FieldStart,
  Unquoted,
  Quoted,
  /// Just saw a `"` inside a quoted field: either an escaped quote or the end
  /// of the quoted section.
  QuoteInQuoted,
}

/// Parse `input` into a header and data records. Blank lines are ignored.
pub fn parse(input: &str) -> Table {
  let mut records = read_records(input).into_iter();
  match records.next() {
    Some(header) => Table { header: header.fields, records: records.collect() },
    None => Table::default(),
  }
}

fn read_records(input: &str) -> Vec<Record> {
  let mut out = Vec::new();
  let mut fields = Vec::new();
  let mut field = String::new();
  let mut state = State::FieldStart;
  let mut line = 1;
  let mut record_line = 1;
  let mut chars = input.chars().peekable();

  while let Some(c) = chars.next() {
    match (state, c) {
      (State::Quoted, '"') => state = State::QuoteInQuoted,
      (State::Quoted, c) => {
        if c == '\n' {
          line += 1;
        }
        field.push(c);
      }
      (State::QuoteInQuoted, '"') => {
        field.push('"');
        state = State::Quoted;
      }
      (State::FieldStart, '"') => state = State::Quoted,
      (_, ',') => {
        fields.push(std::mem::take(&mut field));
        state = State::FieldStart;
      }
      (_, '\r') if chars.peek() == Some(&'\n') => {}
      (_, '\n') => {
        fields.push(std::mem::take(&mut field));
        finish_record(&mut out, std::mem::take(&mut fields), record_line);
        line += 1;
        record_line = line;
        state = State::FieldStart;
      }
      (_, c) => {
        field.push(c);
        state = State::Unquoted;
      }
    }
  }

  if state != State::FieldStart || !fields.is_empty() || !field.is_empty() {
    fields.push(field);
    finish_record(&mut out, fields, record_line);
  }

  out
}

fn finish_record(out: &mut Vec<Record>, fields: Vec<String>, line: usize) {
  let blank = fields.len() == 1 && fields[0].trim().is_empty();
  if !blank {
    out.push(Record { line, fields });
  }
}

// ─── Writer ──────────────────────────────────────────────────────────────────

/// Separator between entries of a multi-valued export cell.
pub const CELL_SEPARATOR: &str = "; ";

/// Characters that force a field to be quoted. `;` is included because it
/// separates entries inside multi-valued cells.
const SPECIAL: [char; 5] = [',', '"', ';', '\r', '\n'];

/// Quote `field` if it contains a special character, doubling embedded quotes.
pub fn escape_field(field: &str) -> Cow<'_, str> {
  if field.contains(SPECIAL) {
    Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
  } else {
    Cow::Borrowed(field)
  }
}

/// Append one LF-terminated record to `out`.
pub fn write_record<I, S>(out: &mut String, fields: I)
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  for (i, field) in fields.into_iter().enumerate() {
    if i > 0 {
      out.push(',');
    }
    out.push_str(&escape_field(field.as_ref()));
  }
  out.push('\n');
}

#[cfg(test)]
mod tests {
  use super::*;

  fn fields(t: &Table) -> Vec<Vec<&str>> {
    t.records
      .iter()
      .map(|r| r.fields.iter().map(String::as_str).collect())
      .collect()
  }

  #[test]
  fn header_and_records() {
    let t = parse("spirit_name,complexity\nRiver,Low\nLightning,Moderate\n");
    assert_eq!(t.header, ["spirit_name", "complexity"]);
    assert_eq!(fields(&t), [["River", "Low"], ["Lightning", "Moderate"]]);
    assert_eq!(t.records[1].line, 3);
  }

  #[test]
  fn blank_lines_and_crlf() {
    let t = parse("a,b\r\n\r\n1,2\r\n   \r\n3,4");
    assert_eq!(fields(&t), [["1", "2"], ["3", "4"]]);
  }

  #[test]
  fn quoted_fields() {
    let t = parse("name,note\n\"Shroud, of Silent Mist\",\"say \"\"hi\"\"\"\n");
    assert_eq!(fields(&t), [["Shroud, of Silent Mist", "say \"hi\""]]);
  }

  #[test]
  fn newline_inside_quotes_keeps_record_together() {
    let t = parse("a,b\n\"line one\nline two\",x\ny,z\n");
    assert_eq!(t.records.len(), 2);
    assert_eq!(t.records[0].fields[0], "line one\nline two");
    assert_eq!(t.records[1].line, 4);
  }

  #[test]
  fn ragged_rows_are_preserved() {
    let t = parse("a,b,c\n1,2\n1,2,3,4\n");
    assert_eq!(t.records[0].fields.len(), 2);
    assert_eq!(t.records[1].fields.len(), 4);
  }

  #[test]
  fn trailing_empty_field() {
    let t = parse("a,b\n1,\n");
    assert_eq!(fields(&t), [["1", ""]]);
  }

  #[test]
  fn empty_input() {
    assert!(parse("").is_empty());
    assert!(parse("\n\n").is_empty());
  }

  #[test]
  fn escape_only_when_needed() {
    assert_eq!(escape_field("plain"), "plain");
    assert_eq!(escape_field("A, B"), "\"A, B\"");
    assert_eq!(escape_field("a;b"), "\"a;b\"");
    assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
  }

  #[test]
  fn written_records_read_back() {
    let mut out = String::new();
    write_record(&mut out, ["name", "notes"]);
    write_record(&mut out, ["A, B", "two\nlines \"quoted\""]);
    assert!(out.ends_with('\n'));

    let t = parse(&out);
    assert_eq!(t.header, ["name", "notes"]);
    assert_eq!(fields(&t), [["A, B", "two\nlines \"quoted\""]]);
  }
}
