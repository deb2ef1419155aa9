#![cfg(test)]

use fieldmap::{Duplicates, Error, MapStrategy, Mapper, Record, SharedMap, Side, TypeInfo};

#[derive(Record, Debug, Clone, Default)]
struct Source {
  #[map = "Target:a;Target2:a"]
  a_field: String,
  #[map = "Target:b"]
  b_field: i64,
  #[map = "Target:c"]
  c_field: bool,
  #[map = "Target:d"]
  d_field: f32,
  #[map = "Target:e"]
  e_field: f64,
  #[map = "Target:f"]
  f_field: SharedMap<String, String>,
  g_field: String,
}

#[derive(Record, Debug, Clone, Default, PartialEq)]
struct Target {
  a: String,
  b: i64,
  c: bool,
  d: f32,
  e: f64,
  f: SharedMap<String, String>,
  g_field: String,
}

#[derive(Record, Debug, Clone, Default, PartialEq)]
struct Target2 {
  a: String,
}

fn source() -> Source {
  Source {
    a_field: "test".to_owned(),
    b_field: 1,
    c_field: true,
    d_field: 1.1,
    e_field: 1.2,
    f_field: vec![("test".to_owned(), "test".to_owned())].into_iter().collect(),
    g_field: "untagged".to_owned(),
  }
}

#[test]
fn test_map_all_kinds() {
  let source = source();
  let mut target = Target::default();
  fieldmap::map(&source, &mut target).unwrap();

  assert_eq!(target.a, source.a_field);
  assert_eq!(target.b, source.b_field);
  assert_eq!(target.c, source.c_field);
  assert_eq!(target.d, source.d_field);
  assert_eq!(target.e, source.e_field);
  assert_eq!(target.f.get("test").as_deref(), Some("test"));
}

#[test]
fn test_untagged_fields_untouched() {
  let source = source();
  let mut target = Target {
    g_field: "kept".to_owned(),
    ..Target::default()
  };
  fieldmap::map(&source, &mut target).unwrap();
  assert_eq!(target.g_field, "kept");
}

#[test]
fn test_second_target_type() {
  let source = Source {
    a_field: "some data".to_owned(),
    ..Source::default()
  };

  let mut target = Target::default();
  fieldmap::map(&source, &mut target).unwrap();
  assert_eq!(target.a, "some data");

  let mut target2 = Target2::default();
  fieldmap::map(&source, &mut target2).unwrap();
  assert_eq!(target2.a, "some data");
}

#[test]
fn test_scalars_are_independent() {
  let mut source = source();
  let mut target = Target::default();
  fieldmap::map(&source, &mut target).unwrap();

  source.a_field.push_str(" changed");
  source.b_field = 99;
  source.c_field = false;
  source.d_field = 9.9;
  source.e_field = 9.9;
  assert_eq!(target.a, "test");
  assert_eq!(target.b, 1);
  assert!(target.c);
  assert_eq!(target.d, 1.1);
  assert_eq!(target.e, 1.2);
}

#[test]
fn test_type_alias_fields() {
  type Id = i64;
  type Tags = SharedMap<String, String>;

  #[derive(Record)]
  struct Row {
    #[map = "Entity:id"]
    id: Id,
    #[map = "Entity:tags"]
    tags: Tags,
  }

  #[derive(Record, Default)]
  struct Entity {
    id: Id,
    tags: Tags,
  }

  let row = Row {
    id: 7,
    tags: vec![("k".to_owned(), "v".to_owned())].into_iter().collect(),
  };
  let mut entity = Entity::default();
  fieldmap::map(&row, &mut entity).unwrap();
  assert_eq!(entity.id, 7);
  assert!(entity.tags.ptr_eq(&row.tags));
}

#[test]
fn test_lookalike_type_unsupported() {
  mod custom {
    #[derive(Default)]
    pub struct String;
  }

  #[derive(Record, Default)]
  struct Named {
    #[map = "Named:name"]
    name: custom::String,
  }

  let err = fieldmap::map(&Named::default(), &mut Named::default()).unwrap_err();
  assert_eq!(err, Error::UnsupportedType(TypeInfo::of::<custom::String>()));
}

#[test]
fn test_maps_alias() {
  let source = source();
  let mut target = Target::default();
  fieldmap::map(&source, &mut target).unwrap();
  assert!(target.f.ptr_eq(&source.f_field));

  source.f_field.insert("test".to_owned(), "v2".to_owned());
  assert_eq!(target.f.get("test").as_deref(), Some("v2"));

  target.f.insert("new".to_owned(), "from target".to_owned());
  assert!(source.f_field.contains_key("new"));
}

#[test]
fn test_maps_deep_copy() {
  let source = source();
  let mut target = Target::default();
  Mapper::new()
    .maps(MapStrategy::DeepCopy)
    .map(&source, &mut target)
    .unwrap();

  source.f_field.insert("test".to_owned(), "v2".to_owned());
  assert_eq!(target.f.get("test").as_deref(), Some("test"));
}

#[test]
fn test_not_a_pointer() {
  let source = source();
  let target: Box<dyn Record> = Box::new(Target::default());
  match fieldmap::map(&source, target) {
    Err(Error::NotAPointer(desc)) => assert_eq!(desc, std::any::type_name::<Target>()),
    other => panic!("{:?}", other),
  }
}

#[test]
fn test_invalid_map_specification() {
  #[derive(Record, Default)]
  struct Bad {
    #[map = "Target:a"]
    a_field: String,
    #[map = "Target-A"]
    b_field: String,
  }

  let source = Bad {
    a_field: "data".to_owned(),
    b_field: "data".to_owned(),
  };
  let mut target = Target::default();
  let err = fieldmap::map(&source, &mut target).unwrap_err();
  assert_eq!(
    err,
    Error::InvalidMapSpecification {
      field: "b_field".to_owned(),
      entry: "Target-A".to_owned(),
    }
  );
  // Nothing is copied when the table cannot be built.
  assert_eq!(target, Target::default());
}

#[test]
fn test_type_mismatch_keeps_earlier_fields() {
  #[derive(Record)]
  struct Mismatch {
    #[map = "Target:a"]
    a_field: String,
    #[map = "Wrong:b"]
    b_field: i64,
  }

  #[derive(Record, Default)]
  struct Wrong {
    b: String,
  }

  let source = Mismatch {
    a_field: "copied".to_owned(),
    b_field: 1,
  };
  let mut target = Wrong::default();
  let err = fieldmap::map(&source, &mut target).unwrap_err();
  assert_eq!(
    err,
    Error::TypeMismatch {
      from: TypeInfo::of::<i64>(),
      to: TypeInfo::of::<String>(),
    }
  );
  assert!(target.b.is_empty());

  #[derive(Record)]
  struct Partial {
    #[map = "Target:a"]
    a_field: String,
    #[map = "Target:a"]
    b_field: i64,
  }

  let source = Partial {
    a_field: "copied".to_owned(),
    b_field: 1,
  };
  let mut target = Target::default();
  let err = fieldmap::map(&source, &mut target).unwrap_err();
  assert!(matches!(err, Error::TypeMismatch { .. }));
  assert_eq!(target.a, "copied");
}

#[test]
fn test_map_element_type_mismatch() {
  #[derive(Record)]
  struct Counts {
    #[map = "Target:f"]
    f_field: SharedMap<String, i64>,
  }

  let source = Counts {
    f_field: SharedMap::new(),
  };
  let mut target = Target::default();
  let err = fieldmap::map(&source, &mut target).unwrap_err();
  assert_eq!(
    err,
    Error::TypeMismatch {
      from: TypeInfo::of::<SharedMap<String, i64>>(),
      to: TypeInfo::of::<SharedMap<String, String>>(),
    }
  );
}

#[test]
fn test_field_not_found() {
  #[derive(Record)]
  struct Missing {
    #[map = "Target:nope"]
    a_field: String,
  }

  let mut target = Target::default();
  let err = fieldmap::map(
    &Missing {
      a_field: String::new(),
    },
    &mut target,
  )
  .unwrap_err();
  assert_eq!(
    err,
    Error::FieldNotFound {
      name: "nope".to_owned(),
      side: Side::Target,
    }
  );
}

#[test]
fn test_unsupported_type() {
  #[derive(Record, Default)]
  struct List {
    #[map = "List:items"]
    items: Vec<i32>,
  }

  let source = List { items: vec![1, 2] };
  let mut target = List::default();
  let err = fieldmap::map(&source, &mut target).unwrap_err();
  assert_eq!(err, Error::UnsupportedType(TypeInfo::of::<Vec<i32>>()));
  assert!(target.items.is_empty());
}

#[test]
fn test_duplicates() {
  #[derive(Record)]
  struct Twice {
    #[map = "Target2:missing;Target2:a"]
    a_field: String,
  }

  let source = Twice {
    a_field: "last".to_owned(),
  };
  let mut target = Target2::default();
  fieldmap::map(&source, &mut target).unwrap();
  assert_eq!(target.a, "last");

  let err = Mapper::new()
    .duplicates(Duplicates::Reject)
    .map(&source, &mut Target2::default())
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateMapping { .. }));
}

#[test]
fn test_idempotent() {
  let source = source();
  let mut once = Target::default();
  fieldmap::map(&source, &mut once).unwrap();

  let mut twice = Target::default();
  fieldmap::map(&source, &mut twice).unwrap();
  fieldmap::map(&source, &mut twice).unwrap();
  assert_eq!(once, twice);
}

#[test]
fn test_qualified_target_name() {
  mod api {
    #[derive(fieldmap::Record, Default)]
    pub struct Target2 {
      pub a: String,
    }
  }

  let source = source();
  let mut target = api::Target2::default();
  fieldmap::map(&source, &mut target).unwrap();
  assert_eq!(target.a, "test");
}

#[test]
fn test_map_new_and_atomic() {
  let source = source();
  let target: Target2 = Mapper::new().map_new(&source).unwrap();
  assert_eq!(target.a, "test");

  #[derive(Record)]
  struct Broken {
    #[map = "Target2:a"]
    a_field: String,
    #[map = "Target2:gone"]
    b_field: String,
  }

  let broken = Broken {
    a_field: "new".to_owned(),
    b_field: String::new(),
  };
  let mut target = Target2 {
    a: "old".to_owned(),
  };
  assert!(Mapper::new().map_atomic(&broken, &mut target).is_err());
  assert_eq!(target.a, "old");
}

#[test]
fn test_concurrent_maps() {
  let source = source();
  let handles: Vec<_> = (0..4)
    .map(|_| {
      let source = source.clone();
      std::thread::spawn(move || {
        let mut target = Target::default();
        fieldmap::map(&source, &mut target).map(|_| target)
      })
    })
    .collect();

  for handle in handles {
    let target = handle.join().unwrap().unwrap();
    assert!(target.f.ptr_eq(&source.f_field));
  }
}
