//! rw-hashmap: a thread-safe key→value map built by composing an
//! unsynchronized `hashbrown::HashMap` with a `parking_lot` reader-writer
//! lock.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: make arbitrary read and read-write operations on a plain map
//!   safe under concurrency through one narrow locking discipline, and
//!   derive every convenience method from two primitives.
//! - Layers:
//!   - Guarded<C>: owns one container value and one `RwLock`; exposes
//!     exactly two primitives, `read` (shared mode) and `write`
//!     (exclusive mode), each running a caller-supplied closure while
//!     the lock is held; derives `len`/`is_empty` from `read`.
//!   - RwHashMap<K, V, S>: public map API; every operation is a thin
//!     call to one of the two primitives, shared for pure reads and
//!     exclusive for any mutation.
//!
//! Constraints
//! - One lock per map instance; no sharding, no fairness guarantee.
//! - Values cross the lock boundary only as clones or moved-out values;
//!   no reference, pointer, or iterator into the live map outlives the
//!   acquisition that produced it. The primitives' signatures enforce
//!   this: the closure's result type cannot capture the borrow it is
//!   handed.
//! - Keys are unique at all times; absence and duplicate insertion are
//!   normal outcomes (`Option`/`bool`), never errors.
//! - Hash algorithm, iteration order, and resizing policy are the
//!   wrapped map's business, not this crate's.
//!
//! Caller contract (not mechanically enforced)
//! - No re-entry: calling back into the same map from a closure running
//!   under its lock deadlocks. There is no shared→exclusive upgrade.
//! - A closure that never returns stalls all other access indefinitely;
//!   no timeout or cancellation is provided.
//! - Read-modify sequences must be one `write` call; a `read` followed
//!   by a separate `write` races against other writers.
//!
//! Failure behavior
//! - Locks are released on every exit path, including panic unwind, and
//!   a panicking closure propagates unchanged; `parking_lot` locks do
//!   not poison, so the map remains usable afterwards.

pub mod guarded;
mod rw_hash_map;

// Public surface
pub use guarded::{Guarded, Len};
pub use rw_hash_map::RwHashMap;
