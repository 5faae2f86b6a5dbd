//! Snapshot caching decorator.
//!
//! [`CachedList`] forwards every operation to the wrapped list and watches the
//! reported changed flag. A change marks the cached snapshot stale and fires
//! the on-change callback; the next [`ListOps::data`] call rebuilds the
//! snapshot once, and later reads return that same allocation until the next
//! change.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::distinct::Distinct;
use crate::error::Result;
use crate::ops::ListOps;
use crate::raw::RawList;
use crate::snapshot::Snapshot;

/// Callback fired after every state-changing operation.
pub type OnChange = Box<dyn FnMut() + Send>;

/// The standard unsynchronized list: the engine behind a snapshot cache.
pub type List<T> = CachedList<RawList<T>>;

/// Decorator materializing snapshots lazily, only after a change.
pub struct CachedList<L: ListOps> {
	inner: L,
	dirty: AtomicBool,
	cached: Mutex<Snapshot<L::Item>>,
	revision: u64,
	on_change: Option<OnChange>,
}

impl<L: ListOps> CachedList<L> {
	/// Wraps `inner`, taking an initial snapshot of its contents.
	pub fn new(inner: L) -> Self {
		Self::with_callback(inner, None)
	}

	/// Wraps `inner` and registers an on-change callback.
	pub fn with_on_change(inner: L, on_change: impl FnMut() + Send + 'static) -> Self {
		Self::with_callback(inner, Some(Box::new(on_change)))
	}

	pub(crate) fn with_callback(inner: L, on_change: Option<OnChange>) -> Self {
		let snapshot = inner.data();
		Self {
			inner,
			dirty: AtomicBool::new(false),
			cached: Mutex::new(snapshot),
			revision: 0,
			on_change,
		}
	}

	/// Replaces the on-change callback.
	pub fn set_on_change(&mut self, on_change: impl FnMut() + Send + 'static) {
		self.on_change = Some(Box::new(on_change));
	}

	/// Returns `true` if the cached snapshot is stale.
	pub fn is_dirty(&self) -> bool {
		self.dirty.load(Ordering::Acquire)
	}

	/// Number of state-changing operations applied so far.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	/// Forces the next [`ListOps::data`] call to rebuild the snapshot.
	pub fn invalidate(&self) {
		self.dirty.store(true, Ordering::Release);
	}

	fn note(&mut self, changed: bool, op: &'static str) -> bool {
		if changed {
			self.dirty.store(true, Ordering::Release);
			self.revision = self.revision.wrapping_add(1);
			tracing::trace!(op, len = self.inner.len(), revision = self.revision, "list.changed");
			if let Some(on_change) = self.on_change.as_mut() {
				on_change();
			}
		}
		changed
	}

	fn note_result(&mut self, result: Result<bool>, op: &'static str) -> Result<bool> {
		let changed = result?;
		Ok(self.note(changed, op))
	}
}

impl<T> Default for CachedList<RawList<T>>
where
	T: Clone + PartialEq + 'static,
{
	fn default() -> Self {
		Self::new(RawList::new())
	}
}

impl<T> From<Vec<T>> for CachedList<RawList<T>>
where
	T: Clone + PartialEq + 'static,
{
	fn from(items: Vec<T>) -> Self {
		Self::new(RawList::from_vec(items))
	}
}

impl<L: ListOps> ListOps for CachedList<L> {
	type Item = L::Item;

	fn data(&self) -> Snapshot<L::Item> {
		let mut cached = self.cached.lock();
		if self.dirty.swap(false, Ordering::AcqRel) {
			*cached = self.inner.data();
			tracing::trace!(len = cached.len(), revision = self.revision, "list.snapshot.rebuild");
		}
		cached.clone()
	}

	fn len(&self) -> usize {
		self.inner.len()
	}

	fn set(&mut self, elements: Vec<L::Item>) -> bool {
		let changed = self.inner.set(elements);
		self.note(changed, "set")
	}

	fn clear(&mut self) -> bool {
		let changed = self.inner.clear();
		self.note(changed, "clear")
	}

	fn add(&mut self, item: L::Item) -> bool {
		let changed = self.inner.add(item);
		self.note(changed, "add")
	}

	fn add_all(&mut self, elements: Vec<L::Item>, distinct: Distinct<L::Item>) -> bool {
		let changed = self.inner.add_all(elements, distinct);
		self.note(changed, "add_all")
	}

	fn add_all_distinct_input(&mut self, elements: Vec<L::Item>, distinct: Distinct<L::Item>) -> bool {
		let changed = self.inner.add_all_distinct_input(elements, distinct);
		self.note(changed, "add_all_distinct_input")
	}

	fn replace_first(&mut self, transform: impl FnMut(&L::Item) -> L::Item) -> bool {
		let changed = self.inner.replace_first(transform);
		self.note(changed, "replace_first")
	}

	fn replace_all(&mut self, transform: impl FnMut(&L::Item) -> L::Item) -> bool {
		let changed = self.inner.replace_all(transform);
		self.note(changed, "replace_all")
	}

	fn replace_at(&mut self, index: usize, item: L::Item) -> Result<bool> {
		let result = self.inner.replace_at(index, item);
		self.note_result(result, "replace_at")
	}

	fn remove_first(&mut self, predicate: impl FnMut(&L::Item) -> bool) -> bool {
		let changed = self.inner.remove_first(predicate);
		self.note(changed, "remove_first")
	}

	fn remove_all(&mut self, predicate: impl FnMut(&L::Item) -> bool) -> bool {
		let changed = self.inner.remove_all(predicate);
		self.note(changed, "remove_all")
	}

	fn remove_at(&mut self, index: usize) -> Result<bool> {
		let result = self.inner.remove_at(index);
		self.note_result(result, "remove_at")
	}

	fn insert(&mut self, index: usize, item: L::Item) -> Result<bool> {
		let result = self.inner.insert(index, item);
		self.note_result(result, "insert")
	}

	fn insert_all(&mut self, index: usize, elements: Vec<L::Item>, distinct: Distinct<L::Item>) -> Result<bool> {
		let result = self.inner.insert_all(index, elements, distinct);
		self.note_result(result, "insert_all")
	}

	fn insert_all_distinct_input(&mut self, index: usize, elements: Vec<L::Item>, distinct: Distinct<L::Item>) -> Result<bool> {
		let result = self.inner.insert_all_distinct_input(index, elements, distinct);
		self.note_result(result, "insert_all_distinct_input")
	}
}
