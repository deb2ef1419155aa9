use crate::error::{Error, Result, Side};
use crate::mapper::MapStrategy;
use crate::record::{FieldDescriptor, IntegerKind, Record, TypeInfo, ValueKind};
use crate::resolve::CorrespondenceTable;
use std::any::Any;

/// Copy every entry of `table` from `source` into `target`.
///
/// Stops at the first failing entry. Entries copied before it stay copied.
pub(crate) fn copy<S: Record + ?Sized>(
  source: &S,
  target: &mut dyn Record,
  table: &CorrespondenceTable,
  maps: MapStrategy,
) -> Result<()> {
  let source_fields = source.fields();
  let target_fields = target.fields();

  for (from_name, to_name) in table.iter() {
    let from = find(&source_fields, from_name, Side::Source)?;
    let to = find(&target_fields, to_name, Side::Target)?;

    if from.ty != to.ty {
      return Err(Error::TypeMismatch {
        from: from.ty,
        to: to.ty,
      });
    }

    let value = source
      .field(from_name)
      .ok_or_else(|| Error::field_not_found(from_name, Side::Source))?;
    let slot = target
      .field_mut(to_name)
      .ok_or_else(|| Error::field_not_found(to_name, Side::Target))?;

    copy_value(from.kind, value, slot, maps, from.ty)?;
    trace!(from = from_name, to = to_name, kind = from.kind.name(), "copied field");
  }

  Ok(())
}

fn find<'a>(
  fields: &'a [FieldDescriptor],
  name: &str,
  side: Side,
) -> Result<&'a FieldDescriptor> {
  fields
    .iter()
    .find(|field| field.name == name)
    .ok_or_else(|| Error::field_not_found(name, side))
}

fn copy_value(
  kind: ValueKind,
  from: &dyn Any,
  to: &mut dyn Any,
  maps: MapStrategy,
  from_ty: TypeInfo,
) -> Result<()> {
  let copied = match kind {
    ValueKind::String => assign::<String>(from, to),
    ValueKind::Integer(kind) => copy_integer(kind, from, to),
    ValueKind::Boolean => assign::<bool>(from, to),
    ValueKind::Float32 => assign::<f32>(from, to),
    ValueKind::Float64 => assign::<f64>(from, to),
    ValueKind::Map(map) => match maps {
      MapStrategy::Alias => map.alias(from, to),
      MapStrategy::DeepCopy => map.deep_copy(from, to),
    },
    ValueKind::Unsupported => return Err(Error::UnsupportedType(from_ty)),
  };

  // The live value is not the type its kind names.
  if !copied {
    return Err(Error::UnsupportedType(from_ty));
  }

  Ok(())
}

macro_rules! copy_integer {
  ($kind:expr, $from:expr, $to:expr, { $($variant:ident => $ty:ty),* $(,)? }) => {
    match $kind {
      $(IntegerKind::$variant => assign::<$ty>($from, $to),)*
    }
  };
}

fn copy_integer(kind: IntegerKind, from: &dyn Any, to: &mut dyn Any) -> bool {
  copy_integer!(kind, from, to, {
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
    I128 => i128,
    Isize => isize,
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    U128 => u128,
    Usize => usize,
  })
}

/// Clone the `T` behind `from` into the `T` behind `to`.
///
/// Returns `false` when either side is not a `T`.
pub(crate) fn assign<T: Any + Clone>(from: &dyn Any, to: &mut dyn Any) -> bool {
  match (from.downcast_ref::<T>(), to.downcast_mut::<T>()) {
    (Some(from), Some(to)) => {
      to.clone_from(from);
      true
    }
    _ => false,
  }
}

#[test]
fn test_assign() {
  let from = String::from("a");
  let mut to = String::new();
  assert!(assign::<String>(&from, &mut to));
  assert_eq!(to, "a");

  let mut to = 0i64;
  assert!(!assign::<String>(&from, &mut to));
  assert_eq!(to, 0);
}

#[test]
fn test_copy_integer() {
  let from = 7u16;
  let mut to = 0u16;
  assert!(copy_integer(IntegerKind::U16, &from, &mut to));
  assert_eq!(to, 7);
  assert!(!copy_integer(IntegerKind::I16, &from, &mut to));
}

#[test]
fn test_unsupported() {
  let from = vec![1];
  let mut to: Vec<i32> = Vec::new();
  let ty = TypeInfo::of::<Vec<i32>>();
  let err = copy_value(ValueKind::Unsupported, &from, &mut to, MapStrategy::Alias, ty).unwrap_err();
  assert_eq!(err, Error::UnsupportedType(ty));
  assert!(to.is_empty());
}

#[test]
fn test_kind_does_not_match_value() {
  // Descriptor claims `String` but the field holds something else.
  let from = vec![1];
  let mut to: Vec<i32> = Vec::new();
  let ty = TypeInfo::of::<Vec<i32>>();
  let err = copy_value(ValueKind::String, &from, &mut to, MapStrategy::Alias, ty).unwrap_err();
  assert_eq!(err, Error::UnsupportedType(ty));
  assert!(to.is_empty());
}
