use crate::copy;
use crate::error::{Error, Result};
use crate::record::{simple_name, Record};
use crate::resolve::resolve;

/// Map the annotated fields of `source` into `target`.
///
/// `target` has to be a mutable reference to a record; a record handed over
/// by value with [`Target::Value`] fails with [`Error::NotAPointer`]. Fields of
/// `target` that no annotation points at are left untouched.
///
/// The first error stops the copy. Fields copied before it keep their new
/// values; use [`Mapper::map_atomic`] when that is not acceptable.
pub fn map<'a, S>(source: &S, target: impl Into<Target<'a>>) -> Result<()>
where
  S: Record + ?Sized,
{
  Mapper::new().map(source, target)
}

/// The record being written into.
pub enum Target<'a> {
  Ref(&'a mut dyn Record),
  Value(Box<dyn Record>),
}

impl<'a, T: Record> From<&'a mut T> for Target<'a> {
  fn from(record: &'a mut T) -> Self {
    Target::Ref(record)
  }
}

impl<'a> From<Box<dyn Record>> for Target<'a> {
  fn from(record: Box<dyn Record>) -> Self {
    Target::Value(record)
  }
}

/// What to do when one field names the same target type more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duplicates {
  /// The last entry wins.
  LastWriteWins,
  /// Fail with [`Error::DuplicateMapping`].
  Reject,
}

impl Default for Duplicates {
  fn default() -> Self {
    Duplicates::LastWriteWins
  }
}

/// How `SharedMap` fields are copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapStrategy {
  /// The target shares the source's map.
  Alias,
  /// The target gets its own map with cloned entries.
  DeepCopy,
}

impl Default for MapStrategy {
  fn default() -> Self {
    MapStrategy::Alias
  }
}

/// Mapping options. `Mapper::default()` behaves like [`map`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mapper {
  duplicates: Duplicates,
  maps: MapStrategy,
}

impl Mapper {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn duplicates(mut self, duplicates: Duplicates) -> Self {
    self.duplicates = duplicates;
    self
  }

  pub fn maps(mut self, maps: MapStrategy) -> Self {
    self.maps = maps;
    self
  }

  pub fn map<'a, S>(&self, source: &S, target: impl Into<Target<'a>>) -> Result<()>
  where
    S: Record + ?Sized,
  {
    let target = match target.into() {
      Target::Ref(target) => target,
      Target::Value(record) => return Err(Error::NotAPointer(record.type_path().to_owned())),
    };

    let target_type = simple_name(target.type_path());
    let table = resolve(&source.fields(), target_type, self.duplicates)?;
    copy::copy(source, target, &table, self.maps)
  }

  /// Map into a fresh `T::default()`.
  pub fn map_new<S, T>(&self, source: &S) -> Result<T>
  where
    S: Record + ?Sized,
    T: Record + Default,
  {
    let mut target = T::default();
    self.map(source, &mut target)?;
    Ok(target)
  }

  /// Map into a clone of `target` and replace `target` only if every field
  /// was copied.
  pub fn map_atomic<S, T>(&self, source: &S, target: &mut T) -> Result<()>
  where
    S: Record + ?Sized,
    T: Record + Clone,
  {
    let mut scratch = target.clone();
    self.map(source, &mut scratch)?;
    *target = scratch;
    Ok(())
  }
}

pub trait MapExt: Record {
  fn map_to<'a>(&self, target: impl Into<Target<'a>>) -> Result<()> {
    map(self, target)
  }
}

impl<R: Record + ?Sized> MapExt for R {}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Side, SharedMap, TypeInfo};

  #[derive(crate::Record, Debug, Clone, PartialEq)]
  struct Source {
    #[map = "Target:a;Other:name"]
    a_field: String,
    #[map = "Target:b"]
    b_field: i64,
    #[map = "Target:m"]
    m_field: SharedMap<String, i64>,
    c_field: bool,
  }

  #[derive(crate::Record, Debug, Clone, Default, PartialEq)]
  struct Target {
    a: String,
    b: i64,
    m: SharedMap<String, i64>,
    c_field: bool,
  }

  #[derive(crate::Record, Debug, Clone, Default, PartialEq)]
  struct Other {
    name: String,
  }

  fn source() -> Source {
    Source {
      a_field: "some data".to_owned(),
      b_field: 3,
      m_field: vec![("k".to_owned(), 1)].into_iter().collect(),
      c_field: true,
    }
  }

  #[test]
  fn test_map() {
    let source = source();
    let mut target = Target::default();
    map(&source, &mut target).unwrap();
    assert_eq!(target.a, "some data");
    assert_eq!(target.b, 3);
    assert!(target.m.ptr_eq(&source.m_field));
    assert!(!target.c_field);

    let other: Other = Mapper::new().map_new(&source).unwrap();
    assert_eq!(other.name, "some data");
  }

  #[test]
  fn test_not_a_pointer() {
    let source = source();
    let target: Box<dyn Record> = Box::new(Target::default());
    let err = map(&source, target).unwrap_err();
    match err {
      Error::NotAPointer(desc) => assert!(desc.ends_with("Target"), "{}", desc),
      other => panic!("{:?}", other),
    }
  }

  #[test]
  fn test_boxed_target_by_reference() {
    let source = source();
    let mut target: Box<dyn Record> = Box::new(Other::default());
    map(&source, &mut target).unwrap();
    assert_eq!(
      target.field("name").and_then(|v| v.downcast_ref::<String>()).map(String::as_str),
      Some("some data")
    );
  }

  #[test]
  fn test_deep_copy_maps() {
    let source = source();
    let mut target = Target::default();
    Mapper::new().maps(MapStrategy::DeepCopy).map(&source, &mut target).unwrap();
    assert!(!target.m.ptr_eq(&source.m_field));
    source.m_field.insert("k".to_owned(), 2);
    assert_eq!(target.m.get("k"), Some(1));
  }

  #[test]
  fn test_map_atomic() {
    #[derive(crate::Record)]
    struct Broken {
      #[map = "Target:a"]
      a_field: String,
      #[map = "Target:missing"]
      b_field: i64,
    }

    let source = Broken {
      a_field: "new".to_owned(),
      b_field: 1,
    };
    let mut target = Target::default();
    let err = Mapper::new().map_atomic(&source, &mut target).unwrap_err();
    assert_eq!(
      err,
      Error::FieldNotFound {
        name: "missing".to_owned(),
        side: Side::Target,
      }
    );
    assert_eq!(target, Target::default());

    let err = map(&source, &mut target).unwrap_err();
    assert!(matches!(err, Error::FieldNotFound { .. }));
    assert_eq!(target.a, "new");
  }

  #[test]
  fn test_map_ext() {
    let source = source();
    let mut other = Other::default();
    source.map_to(&mut other).unwrap();
    assert_eq!(other.name, "some data");
  }

  #[test]
  fn test_type_mismatch() {
    #[derive(crate::Record)]
    struct Narrow {
      #[map = "Target:b"]
      b_field: i32,
    }

    let mut target = Target::default();
    let err = map(&Narrow { b_field: 1 }, &mut target).unwrap_err();
    assert_eq!(
      err,
      Error::TypeMismatch {
        from: TypeInfo::of::<i32>(),
        to: TypeInfo::of::<i64>(),
      }
    );
    assert_eq!(target.b, 0);
  }
}
