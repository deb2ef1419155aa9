use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::iter::FromIterator;
use std::sync::Arc;

/// A handle to a `HashMap` that can be shared between records.
///
/// Cloning the handle does not clone the entries: every clone reads and writes
/// the same map. This is what mapping a map field does by default, so a
/// change made through the source is visible through the target.
pub struct SharedMap<K, V>(Arc<RwLock<HashMap<K, V>>>);

impl<K, V> SharedMap<K, V> {
  pub fn new() -> Self {
    Self::from(HashMap::new())
  }

  /// `true` when both handles point at the same map.
  pub fn ptr_eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }

  pub fn read(&self) -> RwLockReadGuard<'_, HashMap<K, V>> {
    self.0.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, HashMap<K, V>> {
    self.0.write()
  }

  pub fn len(&self) -> usize {
    self.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.read().is_empty()
  }
}

impl<K: Eq + Hash, V> SharedMap<K, V> {
  pub fn insert(&self, key: K, value: V) -> Option<V> {
    self.write().insert(key, value)
  }

  pub fn remove<Q>(&self, key: &Q) -> Option<V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.write().remove(key)
  }

  pub fn contains_key<Q>(&self, key: &Q) -> bool
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.read().contains_key(key)
  }

  /// Clone of the value stored under `key`.
  pub fn get<Q>(&self, key: &Q) -> Option<V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    V: Clone,
  {
    self.read().get(key).cloned()
  }
}

impl<K: Clone, V: Clone> SharedMap<K, V> {
  /// A new, independent map holding clones of the current entries.
  pub fn deep_clone(&self) -> Self {
    Self::from(HashMap::clone(&self.read()))
  }
}

impl<K, V> Clone for SharedMap<K, V> {
  fn clone(&self) -> Self {
    Self(Arc::clone(&self.0))
  }
}

impl<K, V> Default for SharedMap<K, V> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K, V> From<HashMap<K, V>> for SharedMap<K, V> {
  fn from(map: HashMap<K, V>) -> Self {
    Self(Arc::new(RwLock::new(map)))
  }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for SharedMap<K, V> {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self::from(iter.into_iter().collect::<HashMap<_, _>>())
  }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for SharedMap<K, V> {
  fn eq(&self, other: &Self) -> bool {
    self.ptr_eq(other) || *self.read() == *other.read()
  }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SharedMap<K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(self.read().iter()).finish()
  }
}

#[test]
fn test_clone_aliases() {
  let map: SharedMap<String, String> = SharedMap::new();
  let alias = map.clone();
  map.insert("k".to_owned(), "v".to_owned());
  assert!(alias.ptr_eq(&map));
  assert_eq!(alias.get("k").as_deref(), Some("v"));

  alias.remove("k");
  assert!(map.is_empty());
}

#[test]
fn test_deep_clone() {
  let map: SharedMap<String, i64> = vec![("a".to_owned(), 1)].into_iter().collect();
  let copy = map.deep_clone();
  assert!(!copy.ptr_eq(&map));
  assert_eq!(copy, map);

  map.insert("a".to_owned(), 2);
  assert_eq!(copy.get("a"), Some(1));
  assert_ne!(copy, map);
}
