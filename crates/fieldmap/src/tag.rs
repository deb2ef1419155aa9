//! Parser for the `map` annotation.
//!
//! ```text
//! tag   := entry (";" entry)*
//! entry := target-type-name ":" target-field-name
//! ```
//!
//! Empty entries are skipped, so an empty annotation has no entries.

use crate::error::{Error, Result};
use std::str::Split;

/// One `TargetType:target_field` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
  pub target_type: &'a str,
  pub target_field: &'a str,
}

/// Entries of a `map` annotation in declaration order.
///
/// `field` is the name of the annotated field, carried into errors.
pub fn entries<'a>(field: &'a str, tag: &'a str) -> Entries<'a> {
  Entries {
    field,
    src: tag.split(';'),
  }
}

pub fn parse<'a>(field: &'a str, tag: &'a str) -> Result<Vec<Entry<'a>>> {
  entries(field, tag).collect()
}

pub struct Entries<'a> {
  field: &'a str,
  src: Split<'a, char>,
}

impl<'a> Entries<'a> {
  fn parse_entry(&self, entry: &'a str) -> Result<Entry<'a>> {
    let mut parts = entry.split(':');
    match (parts.next(), parts.next(), parts.next()) {
      (Some(target_type), Some(target_field), None)
        if !target_type.is_empty() && !target_field.is_empty() =>
      {
        Ok(Entry {
          target_type,
          target_field,
        })
      }
      _ => Err(Error::InvalidMapSpecification {
        field: self.field.to_owned(),
        entry: entry.to_owned(),
      }),
    }
  }
}

impl<'a> Iterator for Entries<'a> {
  type Item = Result<Entry<'a>>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      let entry = self.src.next()?;
      if !entry.is_empty() {
        return Some(self.parse_entry(entry));
      }
    }
  }
}

#[test]
fn test_entries() {
  let entries = parse("a_field", "Target:a;Target2:b").unwrap();
  assert_eq!(
    entries,
    vec![
      Entry {
        target_type: "Target",
        target_field: "a",
      },
      Entry {
        target_type: "Target2",
        target_field: "b",
      },
    ]
  );
}

#[test]
fn test_empty() {
  assert!(parse("a_field", "").unwrap().is_empty());
  assert_eq!(parse("a_field", "Target:a;").unwrap().len(), 1);
}

#[test]
fn test_missing_colon() {
  let err = parse("a_field", "Target-A").unwrap_err();
  assert_eq!(
    err,
    Error::InvalidMapSpecification {
      field: "a_field".to_owned(),
      entry: "Target-A".to_owned(),
    }
  );
}

#[test]
fn test_bad_entries() {
  for entry in &["Target:a:b", ":a", "Target:", ":"] {
    match parse("f", entry) {
      Err(Error::InvalidMapSpecification { entry: e, .. }) => assert_eq!(e, *entry),
      other => panic!("{}: {:?}", entry, other),
    }
  }
}

#[test]
fn test_error_after_valid_entry() {
  let mut iter = entries("f", "Target:a;bad");
  assert!(iter.next().unwrap().is_ok());
  assert!(iter.next().unwrap().is_err());
  assert!(iter.next().is_none());
}
