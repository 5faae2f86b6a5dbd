//! Unsynchronized list engine.

use crate::distinct::{Distinct, DistinctFn, default_distinct};
use crate::error::{ListError, Result};
use crate::ops::ListOps;
use crate::snapshot::Snapshot;

/// The list engine: an owned `Vec` plus the merge, replace, remove, and
/// insert algorithms.
///
/// Not thread-safe on its own; wrap it in [`SyncList`](crate::SyncList) or
/// [`SerialList`](crate::SerialList) to share it. Merges are linear scans
/// with the predicate, O(existing × incoming).
pub struct RawList<T> {
	items: Vec<T>,
	distinct: Option<DistinctFn<T>>,
}

impl<T> RawList<T>
where
	T: PartialEq + 'static,
{
	/// Creates an empty list deduplicating with [`equals`](crate::equals).
	pub fn new() -> Self {
		Self::from_vec(Vec::new())
	}

	/// Creates a list with initial contents, deduplicating with [`equals`](crate::equals).
	pub fn from_vec(items: Vec<T>) -> Self {
		Self::with_distinct(items, Some(default_distinct()))
	}
}

impl<T> RawList<T> {
	/// Creates a list with initial contents and an explicit default predicate.
	///
	/// `None` disables deduplication for calls passing [`Distinct::Default`].
	pub fn with_distinct(items: Vec<T>, distinct: Option<DistinctFn<T>>) -> Self {
		Self { items, distinct }
	}

	fn check_index(&self, index: usize) -> Result<()> {
		if index < self.items.len() {
			Ok(())
		} else {
			Err(self.out_of_range(index))
		}
	}

	fn check_insert_index(&self, index: usize) -> Result<()> {
		if index <= self.items.len() {
			Ok(())
		} else {
			Err(self.out_of_range(index))
		}
	}

	fn out_of_range(&self, index: usize) -> ListError {
		ListError::IndexOutOfRange {
			index,
			len: self.items.len(),
		}
	}
}

impl<T> Default for RawList<T>
where
	T: PartialEq + 'static,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<T> std::fmt::Debug for RawList<T>
where
	T: std::fmt::Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RawList")
			.field("items", &self.items)
			.field("distinct", &self.distinct.is_some())
			.finish()
	}
}

/// Removes from `existing` every element equivalent to any of `incoming`.
fn strip_existing<T>(existing: &mut Vec<T>, incoming: &[T], distinct: &dyn Fn(&T, &T) -> bool) {
	existing.retain(|old| !incoming.iter().any(|new| distinct(old, new)));
}

/// Drops from `incoming` every element equivalent to one already in `existing`.
fn strip_incoming<T>(existing: &[T], incoming: Vec<T>, distinct: &dyn Fn(&T, &T) -> bool) -> Vec<T> {
	incoming
		.into_iter()
		.filter(|new| !existing.iter().any(|old| distinct(old, new)))
		.collect()
}

impl<T> ListOps for RawList<T>
where
	T: Clone + PartialEq,
{
	type Item = T;

	fn data(&self) -> Snapshot<T> {
		Snapshot::from(self.items.as_slice())
	}

	fn len(&self) -> usize {
		self.items.len()
	}

	fn set(&mut self, elements: Vec<T>) -> bool {
		if self.items == elements {
			return false;
		}
		self.items = elements;
		true
	}

	fn clear(&mut self) -> bool {
		if self.items.is_empty() {
			return false;
		}
		self.items.clear();
		true
	}

	fn add(&mut self, item: T) -> bool {
		self.items.push(item);
		true
	}

	fn add_all(&mut self, elements: Vec<T>, distinct: Distinct<T>) -> bool {
		if elements.is_empty() {
			return false;
		}
		if let Some(dist) = distinct.resolve(&self.distinct) {
			strip_existing(&mut self.items, &elements, &*dist);
		}
		self.items.extend(elements);
		true
	}

	fn add_all_distinct_input(&mut self, elements: Vec<T>, distinct: Distinct<T>) -> bool {
		if elements.is_empty() {
			return false;
		}
		let survivors = match distinct.resolve(&self.distinct) {
			Some(dist) => strip_incoming(&self.items, elements, &*dist),
			None => elements,
		};
		if survivors.is_empty() {
			return false;
		}
		self.items.extend(survivors);
		true
	}

	fn replace_first(&mut self, mut transform: impl FnMut(&T) -> T) -> bool {
		for item in self.items.iter_mut() {
			let next = transform(item);
			if next != *item {
				*item = next;
				return true;
			}
		}
		false
	}

	fn replace_all(&mut self, mut transform: impl FnMut(&T) -> T) -> bool {
		let mut changed = false;
		for item in self.items.iter_mut() {
			let next = transform(item);
			if next != *item {
				*item = next;
				changed = true;
			}
		}
		changed
	}

	fn replace_at(&mut self, index: usize, item: T) -> Result<bool> {
		self.check_index(index)?;
		let slot = &mut self.items[index];
		if *slot == item {
			return Ok(false);
		}
		*slot = item;
		Ok(true)
	}

	fn remove_first(&mut self, predicate: impl FnMut(&T) -> bool) -> bool {
		match self.items.iter().position(predicate) {
			Some(index) => {
				self.items.remove(index);
				true
			}
			None => false,
		}
	}

	fn remove_all(&mut self, mut predicate: impl FnMut(&T) -> bool) -> bool {
		let before = self.items.len();
		self.items.retain(|item| !predicate(item));
		self.items.len() != before
	}

	fn remove_at(&mut self, index: usize) -> Result<bool> {
		self.check_index(index)?;
		self.items.remove(index);
		Ok(true)
	}

	fn insert(&mut self, index: usize, item: T) -> Result<bool> {
		self.check_insert_index(index)?;
		self.items.insert(index, item);
		Ok(true)
	}

	fn insert_all(&mut self, index: usize, elements: Vec<T>, distinct: Distinct<T>) -> Result<bool> {
		self.check_insert_index(index)?;
		if elements.is_empty() {
			return Ok(false);
		}
		if let Some(dist) = distinct.resolve(&self.distinct) {
			strip_existing(&mut self.items, &elements, &*dist);
		}
		let at = index.min(self.items.len());
		self.items.splice(at..at, elements);
		Ok(true)
	}

	fn insert_all_distinct_input(&mut self, index: usize, elements: Vec<T>, distinct: Distinct<T>) -> Result<bool> {
		self.check_insert_index(index)?;
		if elements.is_empty() {
			return Ok(false);
		}
		let survivors = match distinct.resolve(&self.distinct) {
			Some(dist) => strip_incoming(&self.items, elements, &*dist),
			None => elements,
		};
		if survivors.is_empty() {
			return Ok(false);
		}
		self.items.splice(index..index, survivors);
		Ok(true)
	}
}
