use crate::record::TypeInfo;
use std::fmt;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("expected target to be a mutable reference to a record, but was {0}")]
  NotAPointer(String),
  #[error("invalid map specified on field `{field}`: {entry}")]
  InvalidMapSpecification { field: String, entry: String },
  #[error("field `{name}` not found on {side}")]
  FieldNotFound { name: String, side: Side },
  #[error("cannot map {from} to {to}")]
  TypeMismatch { from: TypeInfo, to: TypeInfo },
  #[error("type {0} is not supported")]
  UnsupportedType(TypeInfo),
  #[error("field `{field}` is mapped to `{target_type}` more than once")]
  DuplicateMapping { field: String, target_type: String },
}

impl Error {
  pub(crate) fn field_not_found(name: &str, side: Side) -> Self {
    Error::FieldNotFound {
      name: name.to_owned(),
      side,
    }
  }
}

/// Which record a field lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
  Source,
  Target,
}

impl fmt::Display for Side {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self {
      Side::Source => f.write_str("source"),
      Side::Target => f.write_str("target"),
    }
  }
}

#[test]
fn test_display() {
  let err = Error::FieldNotFound {
    name: "a".to_owned(),
    side: Side::Target,
  };
  assert_eq!(err.to_string(), "field `a` not found on target");

  let err = Error::TypeMismatch {
    from: TypeInfo::of::<i64>(),
    to: TypeInfo::of::<String>(),
  };
  assert_eq!(
    err.to_string(),
    format!("cannot map i64 to {}", std::any::type_name::<String>())
  );
}
