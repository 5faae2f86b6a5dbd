//! Immutable point-in-time copies of a list.

use std::ops::Deref;
use std::sync::Arc;

/// Immutable copy of a list's contents.
///
/// Cloning is a reference-count bump. Two snapshots obtained without an
/// intervening change from a [`CachedList`](crate::CachedList) are the same
/// allocation, which [`Snapshot::ptr_eq`] detects.
pub struct Snapshot<T>(Arc<[T]>);

impl<T> Snapshot<T> {
	/// Returns an empty snapshot.
	pub fn empty() -> Self {
		Self(Arc::from(Vec::new()))
	}

	/// Returns `true` if both snapshots share one allocation.
	pub fn ptr_eq(a: &Self, b: &Self) -> bool {
		Arc::ptr_eq(&a.0, &b.0)
	}

	/// Borrows the contents.
	pub fn as_slice(&self) -> &[T] {
		&self.0
	}
}

impl<T> Clone for Snapshot<T> {
	fn clone(&self) -> Self {
		Self(Arc::clone(&self.0))
	}
}

impl<T> Default for Snapshot<T> {
	fn default() -> Self {
		Self::empty()
	}
}

impl<T> Deref for Snapshot<T> {
	type Target = [T];

	fn deref(&self) -> &[T] {
		&self.0
	}
}

impl<T> From<Vec<T>> for Snapshot<T> {
	fn from(items: Vec<T>) -> Self {
		Self(Arc::from(items))
	}
}

impl<T: Clone> From<&[T]> for Snapshot<T> {
	fn from(items: &[T]) -> Self {
		Self(Arc::from(items))
	}
}

impl<'a, T> IntoIterator for &'a Snapshot<T> {
	type Item = &'a T;
	type IntoIter = std::slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl<T: std::fmt::Debug> std::fmt::Debug for Snapshot<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.0.iter()).finish()
	}
}

impl<T: PartialEq> PartialEq for Snapshot<T> {
	fn eq(&self, other: &Self) -> bool {
		self.0[..] == other.0[..]
	}
}

impl<T: Eq> Eq for Snapshot<T> {}

impl<T: PartialEq> PartialEq<[T]> for Snapshot<T> {
	fn eq(&self, other: &[T]) -> bool {
		self.0[..] == *other
	}
}

impl<T: PartialEq> PartialEq<Vec<T>> for Snapshot<T> {
	fn eq(&self, other: &Vec<T>) -> bool {
		self.0[..] == other[..]
	}
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for Snapshot<T> {
	fn eq(&self, other: &[T; N]) -> bool {
		self.0[..] == other[..]
	}
}
