use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::panic::panic_message;
use crate::spawn::{runtime_handle, spawn_on};

/// Default admission queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(64) {
	Some(capacity) => capacity,
	None => NonZeroUsize::MIN,
};

type Job<S> = Box<dyn FnOnce(&mut S) + Send>;

/// Failure to run a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
	/// The worker has stopped; the job did not run.
	#[error("serial queue is closed")]
	Closed,
	/// The job panicked. State is left as the job left it.
	#[error("serial queue job panicked: {0}")]
	Panicked(String),
}

/// Construction parameters for a [`SerialQueue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSpec {
	/// Label attached to tracing events of this queue.
	pub name: String,
	/// Maximum number of jobs admitted but not yet started.
	pub capacity: NonZeroUsize,
}

impl Default for QueueSpec {
	fn default() -> Self {
		Self {
			name: "serial".to_string(),
			capacity: DEFAULT_QUEUE_CAPACITY,
		}
	}
}

impl QueueSpec {
	/// Names a queue with the default capacity.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	/// Sets the admission capacity.
	pub fn capacity(mut self, capacity: NonZeroUsize) -> Self {
		self.capacity = capacity;
		self
	}
}

/// Handle to a single-worker FIFO queue owning state `S`.
///
/// Handles are cheap to clone. The worker exits once every handle is dropped
/// and the admitted jobs are drained, or immediately on [`Self::shutdown`].
pub struct SerialQueue<S> {
	name: Arc<str>,
	tx: mpsc::Sender<Job<S>>,
	cancel: CancellationToken,
	join: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<S> Clone for SerialQueue<S> {
	fn clone(&self) -> Self {
		Self {
			name: Arc::clone(&self.name),
			tx: self.tx.clone(),
			cancel: self.cancel.clone(),
			join: Arc::clone(&self.join),
		}
	}
}

impl<S> std::fmt::Debug for SerialQueue<S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SerialQueue")
			.field("name", &self.name)
			.field("closed", &self.is_closed())
			.finish()
	}
}

impl<S> SerialQueue<S>
where
	S: Send + 'static,
{
	/// Starts a worker on the ambient runtime (or the shared fallback runtime).
	pub fn spawn(spec: QueueSpec, state: S) -> Self {
		Self::spawn_on(&runtime_handle(), spec, state)
	}

	/// Starts a worker on an explicit runtime.
	pub fn spawn_on(handle: &Handle, spec: QueueSpec, state: S) -> Self {
		let name: Arc<str> = Arc::from(spec.name);
		let (tx, rx) = mpsc::channel::<Job<S>>(spec.capacity.get());
		let cancel = CancellationToken::new();
		let task = spawn_on(handle, &name, run_worker(Arc::clone(&name), state, rx, cancel.clone()));

		Self {
			name,
			tx,
			cancel,
			join: Arc::new(Mutex::new(Some(task))),
		}
	}

	/// Runs `f` against the owned state once every earlier job has finished.
	///
	/// Dropping the returned future before the job starts guarantees the job
	/// never runs. A started job always runs to completion.
	pub async fn run<F, R>(&self, f: F) -> Result<R, QueueError>
	where
		F: FnOnce(&mut S) -> R + Send + 'static,
		R: Send + 'static,
	{
		let (reply_tx, reply_rx) = oneshot::channel::<Result<R, String>>();
		let name = Arc::clone(&self.name);
		let job: Job<S> = Box::new(move |state| {
			if reply_tx.is_closed() {
				tracing::trace!(queue = %name, "worker.queue.skip_abandoned");
				return;
			}
			tracing::trace!(queue = %name, "worker.queue.job");
			let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(state))).map_err(|payload| {
				let message = panic_message(payload.as_ref());
				tracing::warn!(queue = %name, %message, "worker.queue.job_panicked");
				message
			});
			let _ = reply_tx.send(outcome);
		});

		self.tx.send(job).await.map_err(|_| QueueError::Closed)?;
		match reply_rx.await {
			Ok(Ok(value)) => Ok(value),
			Ok(Err(message)) => Err(QueueError::Panicked(message)),
			Err(_) => Err(QueueError::Closed),
		}
	}
}

impl<S> SerialQueue<S> {
	/// Returns the queue label.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns `true` once the worker no longer accepts jobs.
	pub fn is_closed(&self) -> bool {
		self.tx.is_closed()
	}

	/// Stops the worker and waits for it to exit.
	///
	/// A job already running finishes; admitted jobs that have not started are
	/// dropped and their callers observe [`QueueError::Closed`].
	pub async fn shutdown(&self) {
		self.cancel.cancel();
		let handle = self.join.lock().await.take();
		if let Some(handle) = handle {
			let _ = handle.await;
		}
	}
}

async fn run_worker<S>(name: Arc<str>, mut state: S, mut rx: mpsc::Receiver<Job<S>>, cancel: CancellationToken) {
	let mut completed = 0u64;
	loop {
		let job = tokio::select! {
			biased;
			_ = cancel.cancelled() => break,
			msg = rx.recv() => {
				let Some(job) = msg else {
					break;
				};
				job
			}
		};
		job(&mut state);
		completed = completed.wrapping_add(1);
	}
	rx.close();
	tracing::debug!(queue = %name, completed, cancelled = cancel.is_cancelled(), "worker.queue.exit");
}

#[cfg(test)]
mod tests;
