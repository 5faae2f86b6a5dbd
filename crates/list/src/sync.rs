//! Lock-synchronized list adapter.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::distinct::Distinct;
use crate::error::Result;
use crate::ops::ListOps;
use crate::snapshot::Snapshot;

/// Shared mutual-exclusion monitor.
///
/// Lists built with the same monitor never run operations concurrently with
/// each other. Do not call another list sharing the monitor from inside a
/// [`SyncList::modify`] block; the monitor is not reentrant.
#[derive(Debug, Clone, Default)]
pub struct Monitor(Arc<Mutex<()>>);

impl Monitor {
	/// Creates a fresh monitor.
	pub fn new() -> Self {
		Self::default()
	}

	fn lock(&self) -> MutexGuard<'_, ()> {
		self.0.lock()
	}
}

/// Wraps a list so every call, reads included, runs under one lock.
///
/// The lock is taken once per call at this boundary and released on every
/// exit path, unwinding included.
pub struct SyncList<L> {
	monitor: Option<Monitor>,
	inner: Mutex<L>,
}

impl<L: ListOps> SyncList<L> {
	/// Wraps `inner` behind a lock private to this adapter.
	pub fn new(inner: L) -> Self {
		Self {
			monitor: None,
			inner: Mutex::new(inner),
		}
	}

	/// Wraps `inner`, additionally serializing on a shared monitor.
	pub fn with_monitor(inner: L, monitor: Monitor) -> Self {
		Self {
			monitor: Some(monitor),
			inner: Mutex::new(inner),
		}
	}

	fn locked<R>(&self, f: impl FnOnce(&mut L) -> R) -> R {
		let _shared = self.monitor.as_ref().map(Monitor::lock);
		let mut inner = self.inner.lock();
		f(&mut inner)
	}

	/// See [`ListOps::data`].
	pub fn data(&self) -> Snapshot<L::Item> {
		self.locked(|list| list.data())
	}

	/// See [`ListOps::len`].
	pub fn len(&self) -> usize {
		self.locked(|list| list.len())
	}

	/// See [`ListOps::is_empty`].
	pub fn is_empty(&self) -> bool {
		self.locked(|list| list.is_empty())
	}

	/// See [`ListOps::set`].
	pub fn set(&self, elements: Vec<L::Item>) -> bool {
		self.locked(|list| list.set(elements))
	}

	/// See [`ListOps::clear`].
	pub fn clear(&self) -> bool {
		self.locked(|list| list.clear())
	}

	/// See [`ListOps::add`].
	pub fn add(&self, item: L::Item) -> bool {
		self.locked(|list| list.add(item))
	}

	/// See [`ListOps::add_all`].
	pub fn add_all(&self, elements: Vec<L::Item>, distinct: Distinct<L::Item>) -> bool {
		self.locked(|list| list.add_all(elements, distinct))
	}

	/// See [`ListOps::add_all_distinct_input`].
	pub fn add_all_distinct_input(&self, elements: Vec<L::Item>, distinct: Distinct<L::Item>) -> bool {
		self.locked(|list| list.add_all_distinct_input(elements, distinct))
	}

	/// See [`ListOps::replace_first`].
	pub fn replace_first(&self, transform: impl FnMut(&L::Item) -> L::Item) -> bool {
		self.locked(|list| list.replace_first(transform))
	}

	/// See [`ListOps::replace_all`].
	pub fn replace_all(&self, transform: impl FnMut(&L::Item) -> L::Item) -> bool {
		self.locked(|list| list.replace_all(transform))
	}

	/// See [`ListOps::replace_at`].
	pub fn replace_at(&self, index: usize, item: L::Item) -> Result<bool> {
		self.locked(|list| list.replace_at(index, item))
	}

	/// See [`ListOps::remove_first`].
	pub fn remove_first(&self, predicate: impl FnMut(&L::Item) -> bool) -> bool {
		self.locked(|list| list.remove_first(predicate))
	}

	/// See [`ListOps::remove_all`].
	pub fn remove_all(&self, predicate: impl FnMut(&L::Item) -> bool) -> bool {
		self.locked(|list| list.remove_all(predicate))
	}

	/// See [`ListOps::remove_at`].
	pub fn remove_at(&self, index: usize) -> Result<bool> {
		self.locked(|list| list.remove_at(index))
	}

	/// See [`ListOps::insert`].
	pub fn insert(&self, index: usize, item: L::Item) -> Result<bool> {
		self.locked(|list| list.insert(index, item))
	}

	/// See [`ListOps::insert_all`].
	pub fn insert_all(&self, index: usize, elements: Vec<L::Item>, distinct: Distinct<L::Item>) -> Result<bool> {
		self.locked(|list| list.insert_all(index, elements, distinct))
	}

	/// See [`ListOps::insert_all_distinct_input`].
	pub fn insert_all_distinct_input(&self, index: usize, elements: Vec<L::Item>, distinct: Distinct<L::Item>) -> Result<bool> {
		self.locked(|list| list.insert_all_distinct_input(index, elements, distinct))
	}

	/// Runs `block` with the lock held for its whole duration.
	pub fn modify<R>(&self, block: impl FnOnce(&mut L) -> R) -> R {
		self.locked(block)
	}
}

/// Exclusive access still takes the lock, so lists sharing a [`Monitor`]
/// stay mutually excluded.
impl<L: ListOps> ListOps for SyncList<L> {
	type Item = L::Item;

	fn data(&self) -> Snapshot<L::Item> {
		SyncList::data(self)
	}

	fn len(&self) -> usize {
		SyncList::len(self)
	}

	fn set(&mut self, elements: Vec<L::Item>) -> bool {
		SyncList::set(self, elements)
	}

	fn clear(&mut self) -> bool {
		SyncList::clear(self)
	}

	fn add(&mut self, item: L::Item) -> bool {
		SyncList::add(self, item)
	}

	fn add_all(&mut self, elements: Vec<L::Item>, distinct: Distinct<L::Item>) -> bool {
		SyncList::add_all(self, elements, distinct)
	}

	fn add_all_distinct_input(&mut self, elements: Vec<L::Item>, distinct: Distinct<L::Item>) -> bool {
		SyncList::add_all_distinct_input(self, elements, distinct)
	}

	fn replace_first(&mut self, transform: impl FnMut(&L::Item) -> L::Item) -> bool {
		SyncList::replace_first(self, transform)
	}

	fn replace_all(&mut self, transform: impl FnMut(&L::Item) -> L::Item) -> bool {
		SyncList::replace_all(self, transform)
	}

	fn replace_at(&mut self, index: usize, item: L::Item) -> Result<bool> {
		SyncList::replace_at(self, index, item)
	}

	fn remove_first(&mut self, predicate: impl FnMut(&L::Item) -> bool) -> bool {
		SyncList::remove_first(self, predicate)
	}

	fn remove_all(&mut self, predicate: impl FnMut(&L::Item) -> bool) -> bool {
		SyncList::remove_all(self, predicate)
	}

	fn remove_at(&mut self, index: usize) -> Result<bool> {
		SyncList::remove_at(self, index)
	}

	fn insert(&mut self, index: usize, item: L::Item) -> Result<bool> {
		SyncList::insert(self, index, item)
	}

	fn insert_all(&mut self, index: usize, elements: Vec<L::Item>, distinct: Distinct<L::Item>) -> Result<bool> {
		SyncList::insert_all(self, index, elements, distinct)
	}

	fn insert_all_distinct_input(&mut self, index: usize, elements: Vec<L::Item>, distinct: Distinct<L::Item>) -> Result<bool> {
		SyncList::insert_all_distinct_input(self, index, elements, distinct)
	}
}

#[cfg(test)]
mod tests;
