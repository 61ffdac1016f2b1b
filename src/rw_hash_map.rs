//! RwHashMap: the typed map facade over [`Guarded`].
//!
//! Every operation is a thin call into one of the two base primitives:
//! shared access for pure reads, exclusive access for any mutation.
//! Values leave the map only as clones or moved-out values, never as
//! references into the live container.

use crate::guarded::Guarded;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::{DefaultHashBuilder, Entry};
use hashbrown::HashMap;

/// A thread-safe key→value map: one `hashbrown::HashMap` behind one
/// reader-writer lock. Unique keys, no ordering guarantee.
///
/// All methods take `&self`; share the map across threads with `Arc`.
/// Lookups return clones (or the moved-out value, for [`remove`]), so
/// nothing handed to a caller can observe a later mutation or dangle.
///
/// Composite sequences that read and then mutate must go through a
/// single [`write`](RwHashMap::write) call; a `find` followed by a
/// separate `insert` admits a race between the two steps.
///
/// # Deadlock hazard
///
/// Calling any method of the same map from inside a closure passed to
/// [`read`](RwHashMap::read) or [`write`](RwHashMap::write) re-enters
/// the lock and deadlocks. There is no upgrade path from shared to
/// exclusive mode either; acquire exclusive access up front when a
/// mutation might be needed.
pub struct RwHashMap<K, V, S = DefaultHashBuilder> {
    guarded: Guarded<HashMap<K, V, S>>,
}

impl<K, V> RwHashMap<K, V>
where
    K: Eq + Hash,
{
    /// An empty map with the default hasher.
    pub fn new() -> Self {
        Self::from_map(HashMap::new())
    }

    /// An empty map pre-sized for at least `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_map(HashMap::with_capacity(capacity))
    }
}

impl<K, V> Default for RwHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> RwHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// An empty map using `hasher` for key hashing.
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_map(HashMap::with_hasher(hasher))
    }

    /// An empty map with both a capacity hint and a custom hasher.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::from_map(HashMap::with_capacity_and_hasher(capacity, hasher))
    }

    fn from_map(map: HashMap<K, V, S>) -> Self {
        Self {
            guarded: Guarded::new(map),
        }
    }

    /// Insert `key -> value` only if `key` is absent.
    ///
    /// Returns `true` if the entry was inserted. A duplicate key is a
    /// normal outcome, not an error: the call returns `false` and the
    /// stored value is left untouched. Use [`set`](RwHashMap::set) for
    /// overwrite semantics.
    pub fn insert(&self, key: K, value: V) -> bool {
        self.guarded.write(|m| match m.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(e) => {
                e.insert(value);
                true
            }
        })
    }

    /// Set the mapping for `key` to `value`, overwriting any existing
    /// entry. Returns the previous value if one was replaced.
    pub fn set(&self, key: K, value: V) -> Option<V> {
        self.guarded.write(|m| m.insert(key, value))
    }

    /// Insert `key` with a value built by `make`, only if `key` is
    /// absent; `make` runs only in that case. Returns whether an
    /// insertion occurred.
    ///
    /// `make` executes under the exclusive lock, so it must not call
    /// back into this map.
    pub fn insert_with<F>(&self, key: K, make: F) -> bool
    where
        F: FnOnce() -> V,
    {
        self.guarded.write(|m| match m.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(e) => {
                e.insert(make());
                true
            }
        })
    }

    /// Look up `key` and return a clone of its value, or `None` if the
    /// key is absent. Never a reference into the live map.
    pub fn find<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.guarded.read(|m| m.get(key).cloned())
    }

    /// Remove the entry for `key`, returning its value if it was
    /// present. Removing an absent key is not an error; it returns
    /// `None` and leaves the map unchanged.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.guarded.write(|m| m.remove(key))
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.guarded.write(|m| m.clear());
    }

    /// Number of entries holding `key`: 0 or 1 for this unique-key map.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.guarded.read(|m| usize::from(m.contains_key(key)))
    }

    /// Whether `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.guarded.read(|m| m.contains_key(key))
    }

    /// Copy every entry into a `Vec` under a single shared-lock
    /// acquisition.
    ///
    /// The result is a point-in-time copy, fully independent of the
    /// live map; mutations after `snapshot` returns are not reflected
    /// in it. The copy is O(n) and blocks writers for its duration.
    pub fn snapshot(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.guarded.read(|m| {
            let mut out = Vec::with_capacity(m.len());
            out.extend(m.iter().map(|(k, v)| (k.clone(), v.clone())));
            out
        })
    }

    /// Number of entries, read under the shared lock.
    pub fn len(&self) -> usize {
        self.guarded.len()
    }

    /// Whether the map has zero entries, read under the shared lock.
    pub fn is_empty(&self) -> bool {
        self.guarded.is_empty()
    }

    /// Run `op` with shared access to the underlying map.
    ///
    /// This is the extension point for read-only operations the named
    /// methods do not cover (aggregations, multi-key lookups). The
    /// closure contract of [`Guarded::read`] applies: no re-entry, and
    /// the result cannot borrow from the map.
    #[inline]
    pub fn read<R>(&self, op: impl FnOnce(&HashMap<K, V, S>) -> R) -> R {
        self.guarded.read(op)
    }

    /// Run `op` with exclusive access to the underlying map.
    ///
    /// This is the extension point for composite atomic sequences —
    /// e.g. "read a value and conditionally erase it" — which must be
    /// one `write` call, never a `read` followed by a separate `write`.
    /// The closure contract of [`Guarded::write`] applies.
    #[inline]
    pub fn write<R>(&self, op: impl FnOnce(&mut HashMap<K, V, S>) -> R) -> R {
        self.guarded.write(op)
    }

    /// Consume the map and return the underlying `HashMap`.
    pub fn into_inner(self) -> HashMap<K, V, S> {
        self.guarded.into_inner()
    }
}

impl<K, V, S> From<HashMap<K, V, S>> for RwHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn from(map: HashMap<K, V, S>) -> Self {
        Self::from_map(map)
    }
}

impl<K, V> FromIterator<(K, V)> for RwHashMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(HashMap::from_iter(iter))
    }
}

impl<K, V, S> fmt::Debug for RwHashMap<K, V, S>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.guarded.read(|m| f.debug_map().entries(m.iter()).finish())
    }
}
