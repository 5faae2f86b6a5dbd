//! Mutable ordered sequences with merge-style mutations.
//!
//! * [`RawList`] is the engine: set, add, merge, replace, remove, and insert,
//!   each reporting whether the contents changed.
//! * [`CachedList`] decorates any [`ListOps`] implementation with a lazily
//!   rebuilt immutable [`Snapshot`] and an on-change callback. [`List`] is the
//!   cached engine, the usual single-threaded choice.
//! * [`SyncList`] puts every call behind one lock, optionally a [`Monitor`]
//!   shared between lists.
//! * [`SerialList`] hands the list to a single-writer worker and publishes
//!   each committed snapshot to [`SnapshotStream`] subscribers.
//!
//! Merges take a [`Distinct`] choice per call: the list's bound predicate,
//! no deduplication, or an explicit `(old, new) -> bool` predicate.

mod cached;
mod config;
mod distinct;
mod error;
mod ops;
mod raw;
mod serial;
mod snapshot;
mod sync;

pub use cached::{CachedList, List, OnChange};
pub use config::SerialListConfig;
pub use distinct::{Distinct, DistinctFn, default_distinct, equals};
pub use error::{ListError, Result};
pub use ops::ListOps;
pub use raw::RawList;
pub use serial::{SerialList, SerialListBuilder, SnapshotStream};
pub use snapshot::Snapshot;
pub use sync::{Monitor, SyncList};
