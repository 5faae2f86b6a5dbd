//! Serializable construction settings for [`SerialList`](crate::SerialList).

use std::num::NonZeroUsize;

use mergelist_worker::{DEFAULT_QUEUE_CAPACITY, QueueSpec};
use serde::{Deserialize, Serialize};

use crate::error::{ListError, Result};

/// Worker settings for a serial list.
///
/// Missing fields take their defaults, so an empty table is a valid config.
/// A zero capacity is rejected while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerialListConfig {
	/// Label attached to the worker's tracing events.
	pub name: String,
	/// Maximum number of queued operations waiting to start.
	pub capacity: NonZeroUsize,
}

impl Default for SerialListConfig {
	fn default() -> Self {
		Self {
			name: "mergelist".to_string(),
			capacity: DEFAULT_QUEUE_CAPACITY,
		}
	}
}

impl SerialListConfig {
	/// Rejects settings the worker cannot run with.
	pub fn validate(&self) -> Result<()> {
		if self.name.trim().is_empty() {
			return Err(ListError::InvalidConfig("name must not be empty".to_string()));
		}
		Ok(())
	}
}

impl From<SerialListConfig> for QueueSpec {
	fn from(config: SerialListConfig) -> Self {
		QueueSpec::new(config.name).capacity(config.capacity)
	}
}
