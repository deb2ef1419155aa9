use crate::error::{Error, Result};
use crate::mapper::Duplicates;
use crate::record::FieldDescriptor;
use crate::tag;

/// Source field name to target field name, for one target type.
///
/// Entries keep the declaration order of the source fields. Each source field
/// appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrespondenceTable {
  entries: Vec<(&'static str, &'static str)>,
}

impl CorrespondenceTable {
  pub fn get(&self, source_field: &str) -> Option<&'static str> {
    self
      .entries
      .iter()
      .find(|(from, _)| *from == source_field)
      .map(|(_, to)| *to)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
    self.entries.iter().copied()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// Build the table for mapping a record with `fields` into the type whose
/// simple name is `target_type`.
///
/// Unannotated fields are skipped. When one field names `target_type` more
/// than once the last entry is used, unless `duplicates` is
/// [`Duplicates::Reject`]. A malformed entry anywhere in an annotation fails
/// the whole table, even if it names another type.
pub fn resolve(
  fields: &[FieldDescriptor],
  target_type: &str,
  duplicates: Duplicates,
) -> Result<CorrespondenceTable> {
  let mut table = CorrespondenceTable::default();

  for field in fields {
    let annotation = match field.annotation {
      Some(annotation) => annotation,
      None => continue,
    };

    let mut matched = None;
    for entry in tag::entries(field.name, annotation) {
      let entry = entry?;
      if entry.target_type != target_type {
        continue;
      }
      if matched.is_some() && duplicates == Duplicates::Reject {
        return Err(Error::DuplicateMapping {
          field: field.name.to_owned(),
          target_type: target_type.to_owned(),
        });
      }
      matched = Some(entry.target_field);
    }

    if let Some(target_field) = matched {
      trace!(from = field.name, to = target_field, target_type, "resolved field");
      table.entries.push((field.name, target_field));
    }
  }

  Ok(table)
}

#[cfg(test)]
fn descriptor(name: &'static str, annotation: Option<&'static str>) -> FieldDescriptor {
  use crate::record::{TypeInfo, ValueKind};
  FieldDescriptor::new(name, TypeInfo::of::<String>(), ValueKind::String, annotation)
}

#[test]
fn test_resolve_by_target_type() {
  let fields = [
    descriptor("a_field", Some("Target:a;Target2:a2")),
    descriptor("b_field", Some("Target:b")),
    descriptor("g_field", None),
  ];

  let table = resolve(&fields, "Target", Duplicates::LastWriteWins).unwrap();
  assert_eq!(
    table.iter().collect::<Vec<_>>(),
    vec![("a_field", "a"), ("b_field", "b")]
  );

  let table = resolve(&fields, "Target2", Duplicates::LastWriteWins).unwrap();
  assert_eq!(table.len(), 1);
  assert_eq!(table.get("a_field"), Some("a2"));
  assert_eq!(table.get("g_field"), None);

  let table = resolve(&fields, "Other", Duplicates::LastWriteWins).unwrap();
  assert!(table.is_empty());
}

#[test]
fn test_last_write_wins() {
  let fields = [descriptor("a_field", Some("Target:a;Target:b"))];
  let table = resolve(&fields, "Target", Duplicates::LastWriteWins).unwrap();
  assert_eq!(table.get("a_field"), Some("b"));
}

#[test]
fn test_reject_duplicates() {
  let fields = [descriptor("a_field", Some("Target:a;Target:b"))];
  let err = resolve(&fields, "Target", Duplicates::Reject).unwrap_err();
  assert_eq!(
    err,
    Error::DuplicateMapping {
      field: "a_field".to_owned(),
      target_type: "Target".to_owned(),
    }
  );
}

#[test]
fn test_malformed_entry_for_other_type() {
  let fields = [
    descriptor("a_field", Some("Target:a")),
    descriptor("b_field", Some("Other-b")),
  ];
  let err = resolve(&fields, "Target", Duplicates::LastWriteWins).unwrap_err();
  assert_eq!(
    err,
    Error::InvalidMapSpecification {
      field: "b_field".to_owned(),
      entry: "Other-b".to_owned(),
    }
  );
}
