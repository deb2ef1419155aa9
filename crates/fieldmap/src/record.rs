use crate::shared_map::SharedMap;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A record whose fields can be enumerated and reached by name at runtime.
///
/// Usually implemented with `#[derive(Record)]`, which reads the `map`
/// annotation of every field and classifies its type.
pub trait Record {
  /// Fully qualified type name, as given by `std::any::type_name`.
  fn type_path(&self) -> &'static str;

  /// Declared fields, in declaration order.
  fn fields(&self) -> Vec<FieldDescriptor>;

  fn field(&self, name: &str) -> Option<&dyn Any>;

  fn field_mut(&mut self, name: &str) -> Option<&mut dyn Any>;
}

impl<R: Record + ?Sized> Record for Box<R> {
  fn type_path(&self) -> &'static str {
    (**self).type_path()
  }

  fn fields(&self) -> Vec<FieldDescriptor> {
    (**self).fields()
  }

  fn field(&self, name: &str) -> Option<&dyn Any> {
    (**self).field(name)
  }

  fn field_mut(&mut self, name: &str) -> Option<&mut dyn Any> {
    (**self).field_mut(name)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
  pub name: &'static str,
  pub ty: TypeInfo,
  pub kind: ValueKind,
  /// Raw `map` annotation. `None` when the field is not annotated.
  pub annotation: Option<&'static str>,
}

impl FieldDescriptor {
  pub fn new(
    name: &'static str,
    ty: TypeInfo,
    kind: ValueKind,
    annotation: Option<&'static str>,
  ) -> Self {
    Self {
      name,
      ty,
      kind,
      annotation,
    }
  }
}

/// Declared type of a field. Two `TypeInfo`s are equal only when the types
/// are exactly the same.
#[derive(Clone, Copy)]
pub struct TypeInfo {
  id: TypeId,
  name: &'static str,
}

impl TypeInfo {
  pub fn of<T: Any + ?Sized>() -> Self {
    Self {
      id: TypeId::of::<T>(),
      name: std::any::type_name::<T>(),
    }
  }

  pub fn id(&self) -> TypeId {
    self.id
  }

  pub fn name(&self) -> &'static str {
    self.name
  }
}

impl PartialEq for TypeInfo {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state)
  }
}

impl fmt::Debug for TypeInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("TypeInfo").field(&self.name).finish()
  }
}

impl fmt::Display for TypeInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

/// Strip module qualifiers and generic arguments from a type path.
///
/// `my_crate::api::Target` and `other::Target` both become `Target`.
pub(crate) fn simple_name(path: &str) -> &str {
  let end = path.find('<').unwrap_or_else(|| path.len());
  let start = path[..end].rfind("::").map(|pos| pos + 2).unwrap_or(0);
  &path[start..end]
}

/// Classification of a field's type. Selects how the value is copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
  String,
  Integer(IntegerKind),
  Boolean,
  Float32,
  Float64,
  Map(MapKind),
  Unsupported,
}

impl ValueKind {
  /// Kind of a scalar type, from its `TypeId`. Type aliases resolve to the
  /// aliased type. Anything that is not a supported scalar is `Unsupported`.
  pub fn of<T: Any + ?Sized>() -> Self {
    let id = TypeId::of::<T>();
    macro_rules! integer {
      ($($variant:ident => $ty:ty),* $(,)?) => {
        $(if id == TypeId::of::<$ty>() {
          return ValueKind::Integer(IntegerKind::$variant);
        })*
      };
    }

    if id == TypeId::of::<String>() {
      return ValueKind::String;
    }
    if id == TypeId::of::<bool>() {
      return ValueKind::Boolean;
    }
    if id == TypeId::of::<f32>() {
      return ValueKind::Float32;
    }
    if id == TypeId::of::<f64>() {
      return ValueKind::Float64;
    }
    integer!(
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
    );
    ValueKind::Unsupported
  }

  pub fn map<K, V>() -> Self
  where
    K: Clone + 'static,
    V: Clone + 'static,
  {
    ValueKind::Map(MapKind::of::<K, V>())
  }

  pub fn name(&self) -> &'static str {
    match *self {
      ValueKind::String => "string",
      ValueKind::Integer(_) => "integer",
      ValueKind::Boolean => "boolean",
      ValueKind::Float32 => "float32",
      ValueKind::Float64 => "float64",
      ValueKind::Map(_) => "map",
      ValueKind::Unsupported => "unsupported",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerKind {
  I8,
  I16,
  I32,
  I64,
  I128,
  Isize,
  U8,
  U16,
  U32,
  U64,
  U128,
  Usize,
}

pub(crate) type CopyFn = fn(&dyn Any, &mut dyn Any) -> bool;

/// `SharedMap<K, V>` field. Keeps the erased copy strategies for `K` and `V`.
#[derive(Clone, Copy)]
pub struct MapKind {
  key: TypeInfo,
  value: TypeInfo,
  alias: CopyFn,
  deep_copy: CopyFn,
}

impl MapKind {
  pub fn of<K, V>() -> Self
  where
    K: Clone + 'static,
    V: Clone + 'static,
  {
    Self {
      key: TypeInfo::of::<K>(),
      value: TypeInfo::of::<V>(),
      alias: crate::copy::assign::<SharedMap<K, V>>,
      deep_copy: deep_copy::<K, V>,
    }
  }

  pub fn key(&self) -> TypeInfo {
    self.key
  }

  pub fn value(&self) -> TypeInfo {
    self.value
  }

  /// Point `to` at the same map as `from`.
  pub(crate) fn alias(&self, from: &dyn Any, to: &mut dyn Any) -> bool {
    (self.alias)(from, to)
  }

  /// Give `to` a new map holding clones of the entries in `from`.
  pub(crate) fn deep_copy(&self, from: &dyn Any, to: &mut dyn Any) -> bool {
    (self.deep_copy)(from, to)
  }
}

impl PartialEq for MapKind {
  fn eq(&self, other: &Self) -> bool {
    self.key == other.key && self.value == other.value
  }
}

impl Eq for MapKind {}

impl fmt::Debug for MapKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MapKind")
      .field("key", &self.key)
      .field("value", &self.value)
      .finish()
  }
}

/// Picks the kind of `T` in derived code.
///
/// `(&&KindOf::<T>::new()).value_kind()` resolves to [`MapKindOf`] when `T` is
/// a `SharedMap` with cloneable keys and values, and to [`ScalarKindOf`]
/// otherwise. Both traits have to be in scope.
pub struct KindOf<T: ?Sized>(PhantomData<T>);

impl<T: ?Sized> KindOf<T> {
  pub const fn new() -> Self {
    KindOf(PhantomData)
  }
}

pub trait MapKindOf {
  fn value_kind(self) -> ValueKind;
}

impl<K, V> MapKindOf for &&KindOf<SharedMap<K, V>>
where
  K: Clone + 'static,
  V: Clone + 'static,
{
  fn value_kind(self) -> ValueKind {
    ValueKind::map::<K, V>()
  }
}

pub trait ScalarKindOf {
  fn value_kind(self) -> ValueKind;
}

impl<T: Any + ?Sized> ScalarKindOf for &KindOf<T> {
  fn value_kind(self) -> ValueKind {
    ValueKind::of::<T>()
  }
}

fn deep_copy<K, V>(from: &dyn Any, to: &mut dyn Any) -> bool
where
  K: Clone + 'static,
  V: Clone + 'static,
{
  match (
    from.downcast_ref::<SharedMap<K, V>>(),
    to.downcast_mut::<SharedMap<K, V>>(),
  ) {
    (Some(from), Some(to)) => {
      *to = from.deep_clone();
      true
    }
    _ => false,
  }
}

#[test]
fn test_simple_name() {
  assert_eq!(simple_name("Target"), "Target");
  assert_eq!(simple_name("my_crate::api::Target"), "Target");
  assert_eq!(simple_name("fieldmap::SharedMap<alloc::string::String, i64>"), "SharedMap");
}

#[test]
fn test_type_info_eq() {
  assert_eq!(TypeInfo::of::<i64>(), TypeInfo::of::<i64>());
  assert_ne!(TypeInfo::of::<i64>(), TypeInfo::of::<i32>());
  assert_ne!(
    TypeInfo::of::<SharedMap<String, String>>(),
    TypeInfo::of::<SharedMap<String, i64>>()
  );
}

#[test]
fn test_value_kind_of() {
  type Id = i64;
  assert_eq!(ValueKind::of::<String>(), ValueKind::String);
  assert_eq!(ValueKind::of::<Id>(), ValueKind::Integer(IntegerKind::I64));
  assert_eq!(ValueKind::of::<u8>(), ValueKind::Integer(IntegerKind::U8));
  assert_eq!(ValueKind::of::<bool>(), ValueKind::Boolean);
  assert_eq!(ValueKind::of::<f32>(), ValueKind::Float32);
  assert_eq!(ValueKind::of::<f64>(), ValueKind::Float64);
  assert_eq!(ValueKind::of::<Vec<i32>>(), ValueKind::Unsupported);
  assert_eq!(ValueKind::of::<str>(), ValueKind::Unsupported);
}

#[test]
fn test_kind_of_dispatch() {
  type Tags = SharedMap<String, String>;
  assert_eq!(
    (&&KindOf::<Tags>::new()).value_kind(),
    ValueKind::map::<String, String>()
  );
  assert_eq!(
    (&&KindOf::<i32>::new()).value_kind(),
    ValueKind::Integer(IntegerKind::I32)
  );

  // Keys that cannot be cloned fall back to the scalar path.
  struct Opaque;
  assert_eq!(
    (&&KindOf::<SharedMap<Opaque, i32>>::new()).value_kind(),
    ValueKind::Unsupported
  );
}

#[test]
fn test_map_kind() {
  let kind = ValueKind::map::<String, i64>();
  assert_eq!(kind, ValueKind::map::<String, i64>());
  assert_ne!(kind, ValueKind::map::<String, String>());
  assert_eq!(kind.name(), "map");
  if let ValueKind::Map(map) = kind {
    assert_eq!(map.key(), TypeInfo::of::<String>());
    assert_eq!(map.value(), TypeInfo::of::<i64>());
  } else {
    panic!("expected a map kind");
  }
}
