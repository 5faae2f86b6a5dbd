//! Common operation surface shared by the list engine and its decorators.

use crate::distinct::Distinct;
use crate::error::Result;
use crate::snapshot::Snapshot;
use crate::sync::SyncList;

/// Mutation and read surface of an ordered, duplicate-permitting list.
///
/// Every mutating method reports whether the contents changed. Position
/// arguments fail with [`ListError::IndexOutOfRange`](crate::ListError::IndexOutOfRange)
/// instead of panicking. Closures run in element order and may panic; a
/// panic propagates to the caller and leaves the list as far as the scan got.
pub trait ListOps {
	/// Element type.
	type Item: Clone + PartialEq;

	/// Returns an immutable copy of the current contents.
	fn data(&self) -> Snapshot<Self::Item>;

	/// Number of elements.
	fn len(&self) -> usize;

	/// Returns `true` when the list holds no elements.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Replaces the contents. Reports no change when `elements` equals the
	/// current contents.
	fn set(&mut self, elements: Vec<Self::Item>) -> bool;

	/// Empties the list.
	fn clear(&mut self) -> bool;

	/// Appends one element.
	fn add(&mut self, item: Self::Item) -> bool;

	/// Merge-append: removes every existing element equivalent to any of
	/// `elements`, then appends `elements` in order.
	fn add_all(&mut self, elements: Vec<Self::Item>, distinct: Distinct<Self::Item>) -> bool;

	/// Merge-append, input-filtered: drops each of `elements` equivalent to an
	/// existing element, then appends the survivors.
	fn add_all_distinct_input(&mut self, elements: Vec<Self::Item>, distinct: Distinct<Self::Item>) -> bool;

	/// Replaces the first element whose transform differs from it, then stops.
	fn replace_first(&mut self, transform: impl FnMut(&Self::Item) -> Self::Item) -> bool;

	/// Replaces every element whose transform differs from it.
	fn replace_all(&mut self, transform: impl FnMut(&Self::Item) -> Self::Item) -> bool;

	/// Overwrites the element at `index`.
	fn replace_at(&mut self, index: usize, item: Self::Item) -> Result<bool>;

	/// Removes the first element matching `predicate`.
	fn remove_first(&mut self, predicate: impl FnMut(&Self::Item) -> bool) -> bool;

	/// Removes every element matching `predicate`.
	fn remove_all(&mut self, predicate: impl FnMut(&Self::Item) -> bool) -> bool;

	/// Removes the element at `index`.
	fn remove_at(&mut self, index: usize) -> Result<bool>;

	/// Inserts `item` at `index` (`0..=len`).
	fn insert(&mut self, index: usize, item: Self::Item) -> Result<bool>;

	/// Like [`Self::add_all`], inserting the new elements at `index`.
	///
	/// `index` is checked against the length before the merge removal; the
	/// insertion point is then clamped to the length after it.
	fn insert_all(&mut self, index: usize, elements: Vec<Self::Item>, distinct: Distinct<Self::Item>) -> Result<bool>;

	/// Like [`Self::add_all_distinct_input`], inserting the survivors at `index`.
	fn insert_all_distinct_input(&mut self, index: usize, elements: Vec<Self::Item>, distinct: Distinct<Self::Item>) -> Result<bool>;

	/// Runs a composite edit against this list and returns its result.
	fn modify<R>(&mut self, block: impl FnOnce(&mut Self) -> R) -> R
	where
		Self: Sized,
	{
		block(self)
	}

	/// Wraps this list behind a private lock.
	fn synchronized(self) -> SyncList<Self>
	where
		Self: Sized,
	{
		SyncList::new(self)
	}
}
