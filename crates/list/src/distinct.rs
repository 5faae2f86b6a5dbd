//! Equivalence predicates used by merge operations.

use std::sync::Arc;

/// Shared `(old, new) -> bool` predicate. Returns `true` when both values are
/// the same logical item.
pub type DistinctFn<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Per-call choice of equivalence predicate for merge operations.
pub enum Distinct<T> {
	/// Use the predicate bound to the list at construction.
	Default,
	/// No deduplication; merges degrade to plain append/insert.
	Off,
	/// Use this predicate for the call.
	By(DistinctFn<T>),
}

impl<T> Distinct<T> {
	/// Wraps a closure as a per-call predicate.
	pub fn by(f: impl Fn(&T, &T) -> bool + Send + Sync + 'static) -> Self {
		Self::By(Arc::new(f))
	}

	/// Picks the predicate to apply, given the list's bound default.
	pub(crate) fn resolve(self, bound: &Option<DistinctFn<T>>) -> Option<DistinctFn<T>> {
		match self {
			Self::Default => bound.clone(),
			Self::Off => None,
			Self::By(f) => Some(f),
		}
	}
}

impl<T> Default for Distinct<T> {
	fn default() -> Self {
		Self::Default
	}
}

impl<T> Clone for Distinct<T> {
	fn clone(&self) -> Self {
		match self {
			Self::Default => Self::Default,
			Self::Off => Self::Off,
			Self::By(f) => Self::By(Arc::clone(f)),
		}
	}
}

impl<T> std::fmt::Debug for Distinct<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Default => f.write_str("Default"),
			Self::Off => f.write_str("Off"),
			Self::By(_) => f.write_str("By(..)"),
		}
	}
}

/// Structural equality, the default equivalence predicate.
pub fn equals<T: PartialEq>(old: &T, new: &T) -> bool {
	old == new
}

/// Returns [`equals`] as a shareable predicate.
pub fn default_distinct<T>() -> DistinctFn<T>
where
	T: PartialEq + 'static,
{
	Arc::new(equals::<T>)
}
