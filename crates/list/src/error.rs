//! Error types for list operations.

use mergelist_worker::QueueError;
use thiserror::Error;

/// Errors surfaced by list operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
	/// A position argument does not address a valid slot.
	#[error("index {index} out of range for length {len}")]
	IndexOutOfRange {
		/// The rejected position.
		index: usize,
		/// Length of the sequence when the call was made.
		len: usize,
	},

	/// A caller-supplied predicate, transform, or block panicked while the
	/// async worker was running it. The sequence keeps its partial state.
	#[error("caller-supplied closure panicked: {0}")]
	PredicateFailure(String),

	/// The serializing worker has stopped.
	#[error("list worker is closed")]
	Closed,

	/// Construction parameters were rejected.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}

impl From<QueueError> for ListError {
	fn from(err: QueueError) -> Self {
		match err {
			QueueError::Closed => Self::Closed,
			QueueError::Panicked(message) => Self::PredicateFailure(message),
		}
	}
}

/// Result type for list operations.
pub type Result<T> = std::result::Result<T, ListError>;
