//! # FieldMap
//!
//! Copy field values from one record to another, driven by a `map` annotation
//! on the source fields.
//!
//! Each annotation lists `TargetType:target_field` pairs separated by `;`.
//! Only the pairs naming the type being mapped into are used, so one source
//! type can feed several targets. Fields without an annotation never take part.
//!
//! # Example
//! ```
//!   use fieldmap::{Record, SharedMap};
//!
//!   #[derive(Record)]
//!   struct Source {
//!     #[map = "Target:a;Target2:a"]
//!     a_field: String,
//!     #[map = "Target:b"]
//!     b_field: i64,
//!     #[map = "Target:f"]
//!     f_field: SharedMap<String, String>,
//!     g_field: String,
//!   }
//!
//!   #[derive(Record, Default)]
//!   struct Target {
//!     a: String,
//!     b: i64,
//!     f: SharedMap<String, String>,
//!   }
//!
//!   #[derive(Record, Default)]
//!   struct Target2 {
//!     a: String,
//!   }
//!
//!   let source = Source {
//!     a_field: "some data".to_string(),
//!     b_field: 42,
//!     f_field: vec![("k".to_string(), "v".to_string())].into_iter().collect(),
//!     g_field: "ignored".to_string(),
//!   };
//!
//!   let mut target = Target::default();
//!   fieldmap::map(&source, &mut target).unwrap();
//!   assert_eq!(target.a, "some data");
//!   assert_eq!(target.b, 42);
//!
//!   // Maps are shared, not copied.
//!   source.f_field.insert("k".to_string(), "v2".to_string());
//!   assert_eq!(target.f.get("k").as_deref(), Some("v2"));
//!
//!   let mut target2 = Target2::default();
//!   fieldmap::map(&source, &mut target2).unwrap();
//!   assert_eq!(target2.a, "some data");
//! ```
//!
//! # Supported field types
//!
//! `String`, the primitive integers, `bool`, `f32`, `f64` and [`SharedMap`].
//! Source and target fields must have exactly the same type. Other field types
//! can live on a record but fail with [`Error::UnsupportedType`] when mapped.
//!
//! # Features
//!
//! - `tracing`: emit `trace!` events while building the table and copying.

extern crate self as fieldmap;

macro_rules! trace {
  ($($arg:tt)*) => {
    #[cfg(feature = "tracing")]
    ::tracing::trace!($($arg)*);
  };
}

mod copy;
mod error;
mod mapper;
mod record;
mod resolve;
mod shared_map;
pub mod tag;

pub use error::{Error, Result, Side};
pub use mapper::{map, Duplicates, MapExt, MapStrategy, Mapper, Target};
pub use record::{FieldDescriptor, IntegerKind, MapKind, Record, TypeInfo, ValueKind};
pub use resolve::{resolve, CorrespondenceTable};
pub use shared_map::SharedMap;

pub use fieldmap_codegen::Record;

#[doc(hidden)]
pub mod __private {
  pub use crate::record::{KindOf, MapKindOf, ScalarKindOf};
}
