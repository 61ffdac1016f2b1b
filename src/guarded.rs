//! Guarded: the lock-guarded container base.
//!
//! `Guarded<C>` owns exactly one container value and one reader-writer
//! lock, and is the sole choke point through which the container may be
//! touched. It exposes two primitives — [`Guarded::read`] and
//! [`Guarded::write`] — that run a caller-supplied closure while the
//! lock is held in the matching mode, plus `len`/`is_empty` derived from
//! the shared primitive via the [`Len`] trait.

use core::fmt;
use parking_lot::RwLock;

/// Containers that can report their element count.
///
/// Lets [`Guarded`] derive `len`/`is_empty` through its shared primitive
/// without knowing the container's shape.
pub trait Len {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V, S> Len for hashbrown::HashMap<K, V, S> {
    fn len(&self) -> usize {
        self.len()
    }
    fn is_empty(&self) -> bool {
        self.is_empty()
    }
}

/// A container value guarded by a reader-writer lock.
///
/// All access goes through [`read`](Guarded::read) and
/// [`write`](Guarded::write); the container is never exposed outside a
/// lock acquisition, and the lock is never exposed for external locking.
///
/// # Closure contract
///
/// The closure's return type is chosen outside the higher-ranked borrow
/// it receives, so a closure cannot return a reference into the
/// container; copies and moved-out values are the only things that leave
/// a critical section. What the borrow checker cannot rule out is
/// re-entry: calling any method of the same `Guarded` (or of a facade
/// built on it) from inside a closure already running under its lock
/// **deadlocks**. Keep closures short and free of calls back into the
/// same instance.
///
/// # Moving
///
/// `Guarded` is move-only (no `Clone`). Moving it cannot transplant
/// held-lock state: a move requires ownership, and ownership is
/// unavailable while any guard borrows the lock, so a moved `Guarded`
/// is always unlocked at its new location.
pub struct Guarded<C> {
    inner: RwLock<C>,
}

impl<C> Guarded<C> {
    /// Wrap a pre-built container. The lock starts unlocked.
    pub fn new(container: C) -> Self {
        Self {
            inner: RwLock::new(container),
        }
    }

    /// Run `op` with a shared reference to the container, holding the
    /// lock in shared mode for the duration of the call.
    ///
    /// Any number of `read`s may run concurrently; none may overlap a
    /// [`write`](Guarded::write). If `op` panics, the lock is still
    /// released and the panic propagates unchanged.
    ///
    /// Re-entering this `Guarded` from inside `op` deadlocks.
    #[inline]
    pub fn read<R>(&self, op: impl FnOnce(&C) -> R) -> R {
        let guard = self.inner.read();
        op(&guard)
    }

    /// Run `op` with an exclusive reference to the container, holding
    /// the lock in exclusive mode for the duration of the call.
    ///
    /// Excludes all other readers and writers, so a composite
    /// read-then-write sequence inside one `write` call is atomic with
    /// respect to every other operation. If `op` panics, the lock is
    /// still released and the panic propagates unchanged.
    ///
    /// Re-entering this `Guarded` from inside `op` deadlocks.
    #[inline]
    pub fn write<R>(&self, op: impl FnOnce(&mut C) -> R) -> R {
        let mut guard = self.inner.write();
        op(&mut guard)
    }

    /// Consume the guard and return the container. No locking needed:
    /// ownership proves there are no outstanding guards.
    pub fn into_inner(self) -> C {
        self.inner.into_inner()
    }
}

impl<C: Len> Guarded<C> {
    /// Element count of the underlying container, read under the shared
    /// lock.
    pub fn len(&self) -> usize {
        self.read(|c| c.len())
    }

    /// Whether the underlying container is empty, read under the shared
    /// lock.
    pub fn is_empty(&self) -> bool {
        self.read(|c| c.is_empty())
    }
}

impl<C: Default> Default for Guarded<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<C> From<C> for Guarded<C> {
    fn from(container: C) -> Self {
        Self::new(container)
    }
}

impl<C: fmt::Debug> fmt::Debug for Guarded<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read(|c| f.debug_tuple("Guarded").field(c).finish())
    }
}

#[cfg(test)]
mod tests {
    use super::{Guarded, Len};

    impl Len for Vec<u32> {
        fn len(&self) -> usize {
            self.len()
        }
    }

    #[test]
    fn read_and_write_return_closure_results() {
        let g = Guarded::new(vec![1u32, 2, 3]);
        let sum: u32 = g.read(|v| v.iter().sum());
        assert_eq!(sum, 6);

        let popped = g.write(|v| v.pop());
        assert_eq!(popped, Some(3));
        assert_eq!(g.len(), 2);
        assert!(!g.is_empty());
    }

    #[test]
    fn into_inner_returns_container() {
        let g = Guarded::new(vec![7u32]);
        g.write(|v| v.push(8));
        assert_eq!(g.into_inner(), vec![7, 8]);
    }

    #[test]
    fn moved_guard_is_usable() {
        let g = Guarded::new(vec![1u32]);
        let g2 = g; // move; lock state cannot travel while held
        g2.write(|v| v.push(2));
        assert_eq!(g2.len(), 2);
    }

    #[test]
    fn panic_in_closure_releases_lock() {
        let g = Guarded::new(vec![1u32]);
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            g.write(|v| {
                v.push(2);
                panic!("boom");
            })
        }));
        assert!(res.is_err());
        // Lock must be free again; the partial mutation is visible.
        assert_eq!(g.read(|v| v.clone()), vec![1, 2]);
    }
}
