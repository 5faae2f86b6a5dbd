//! Single-writer asynchronous list adapter.
//!
//! A [`SerialList`] moves its list into a [`SerialQueue`] worker. Each
//! operation is queued as one job; callers suspend until their job has run,
//! and jobs run one at a time in arrival order. After a job that changed the
//! list, the worker publishes a fresh snapshot on a latest-value channel, so
//! [`SerialList::data`] and [`SnapshotStream`] never see a half-applied edit.
//!
//! Dropping an operation future before its job starts cancels it. Jobs never
//! await, so once started they always run to completion.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use mergelist_worker::{QueueSpec, SerialQueue};
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::cached::{CachedList, OnChange};
use crate::config::SerialListConfig;
use crate::distinct::{Distinct, DistinctFn, default_distinct};
use crate::error::Result;
use crate::ops::ListOps;
use crate::raw::RawList;
use crate::snapshot::Snapshot;

/// Worker-owned state: the cached list and the publishing side of the channel.
struct Published<L: ListOps> {
	list: CachedList<L>,
	tx: Arc<watch::Sender<Snapshot<L::Item>>>,
}

impl<L: ListOps> Published<L> {
	fn apply<R>(&mut self, op: impl FnOnce(&mut CachedList<L>) -> R) -> R {
		let revision = self.list.revision();
		match panic::catch_unwind(AssertUnwindSafe(|| op(&mut self.list))) {
			Ok(value) => {
				if self.list.revision() != revision {
					self.publish();
				}
				value
			}
			Err(payload) => {
				// Keep the cache honest about partial edits; nothing is published.
				self.list.invalidate();
				panic::resume_unwind(payload)
			}
		}
	}

	fn publish(&self) {
		let snapshot = self.list.data();
		tracing::debug!(len = snapshot.len(), revision = self.list.revision(), "list.serial.publish");
		self.tx.send_replace(snapshot);
	}
}

/// List shared through a single-writer task queue.
///
/// The worker owns a [`CachedList`] over the engine `L`, a [`RawList`] unless
/// built with [`SerialList::from_engine`]. Handles are cheap to clone and all
/// refer to the same list.
pub struct SerialList<T, L = RawList<T>>
where
	L: ListOps<Item = T>,
{
	queue: SerialQueue<Published<L>>,
	tx: Arc<watch::Sender<Snapshot<T>>>,
}

impl<T, L: ListOps<Item = T>> Clone for SerialList<T, L> {
	fn clone(&self) -> Self {
		Self {
			queue: self.queue.clone(),
			tx: Arc::clone(&self.tx),
		}
	}
}

impl<T> Default for SerialList<T>
where
	T: Clone + PartialEq + Send + Sync + 'static,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<T> SerialList<T>
where
	T: Clone + PartialEq + Send + Sync + 'static,
{
	/// Creates an empty list on the ambient runtime with default settings.
	pub fn new() -> Self {
		Self::from_vec(Vec::new())
	}

	/// Creates a list with initial contents and default settings.
	pub fn from_vec(initial: Vec<T>) -> Self {
		Self::builder().initial(initial).spawn()
	}

	/// Starts a builder for custom construction.
	pub fn builder() -> SerialListBuilder<T> {
		SerialListBuilder::new()
	}
}

impl<T, L> SerialList<T, L>
where
	T: Clone + PartialEq + Send + Sync + 'static,
	L: ListOps<Item = T> + Send + 'static,
{
	/// Serializes access to an existing engine, on the ambient runtime.
	pub fn from_engine(engine: L, config: SerialListConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self::start(CachedList::new(engine), config, None))
	}

	fn start(list: CachedList<L>, config: SerialListConfig, runtime: Option<Handle>) -> Self {
		let (tx, _rx) = watch::channel(list.data());
		let tx = Arc::new(tx);
		let state = Published {
			list,
			tx: Arc::clone(&tx),
		};

		let spec = QueueSpec::from(config);
		let queue = match runtime {
			Some(handle) => SerialQueue::spawn_on(&handle, spec, state),
			None => SerialQueue::spawn(spec, state),
		};
		Self { queue, tx }
	}

	/// Latest committed snapshot. Does not wait on the queue.
	pub fn data(&self) -> Snapshot<T> {
		self.tx.borrow().clone()
	}

	/// Subscribes to committed snapshots, starting with the current one.
	pub fn subscribe(&self) -> SnapshotStream<T> {
		SnapshotStream {
			rx: self.tx.subscribe(),
			primed: false,
		}
	}

	/// Worker label.
	pub fn name(&self) -> &str {
		self.queue.name()
	}

	/// Returns `true` once the worker has stopped.
	pub fn is_closed(&self) -> bool {
		self.queue.is_closed()
	}

	/// Stops the worker. Operations still queued fail with
	/// [`ListError::Closed`](crate::ListError::Closed).
	pub async fn shutdown(&self) {
		self.queue.shutdown().await;
	}

	async fn commit<R>(&self, op: impl FnOnce(&mut CachedList<L>) -> R + Send + 'static) -> Result<R>
	where
		R: Send + 'static,
	{
		Ok(self.queue.run(move |state: &mut Published<L>| state.apply(op)).await?)
	}

	/// See [`ListOps::set`].
	pub async fn set(&self, elements: Vec<T>) -> Result<bool> {
		self.commit(move |list| list.set(elements)).await
	}

	/// See [`ListOps::clear`].
	pub async fn clear(&self) -> Result<bool> {
		self.commit(|list| list.clear()).await
	}

	/// See [`ListOps::add`].
	pub async fn add(&self, item: T) -> Result<bool> {
		self.commit(move |list| list.add(item)).await
	}

	/// See [`ListOps::add_all`].
	pub async fn add_all(&self, elements: Vec<T>, distinct: Distinct<T>) -> Result<bool> {
		self.commit(move |list| list.add_all(elements, distinct)).await
	}

	/// See [`ListOps::add_all_distinct_input`].
	pub async fn add_all_distinct_input(&self, elements: Vec<T>, distinct: Distinct<T>) -> Result<bool> {
		self.commit(move |list| list.add_all_distinct_input(elements, distinct)).await
	}

	/// See [`ListOps::replace_first`].
	pub async fn replace_first(&self, transform: impl FnMut(&T) -> T + Send + 'static) -> Result<bool> {
		self.commit(move |list| list.replace_first(transform)).await
	}

	/// See [`ListOps::replace_all`].
	pub async fn replace_all(&self, transform: impl FnMut(&T) -> T + Send + 'static) -> Result<bool> {
		self.commit(move |list| list.replace_all(transform)).await
	}

	/// See [`ListOps::replace_at`].
	pub async fn replace_at(&self, index: usize, item: T) -> Result<bool> {
		self.commit(move |list| list.replace_at(index, item)).await?
	}

	/// See [`ListOps::remove_first`].
	pub async fn remove_first(&self, predicate: impl FnMut(&T) -> bool + Send + 'static) -> Result<bool> {
		self.commit(move |list| list.remove_first(predicate)).await
	}

	/// See [`ListOps::remove_all`].
	pub async fn remove_all(&self, predicate: impl FnMut(&T) -> bool + Send + 'static) -> Result<bool> {
		self.commit(move |list| list.remove_all(predicate)).await
	}

	/// See [`ListOps::remove_at`].
	pub async fn remove_at(&self, index: usize) -> Result<bool> {
		self.commit(move |list| list.remove_at(index)).await?
	}

	/// See [`ListOps::insert`].
	pub async fn insert(&self, index: usize, item: T) -> Result<bool> {
		self.commit(move |list| list.insert(index, item)).await?
	}

	/// See [`ListOps::insert_all`].
	pub async fn insert_all(&self, index: usize, elements: Vec<T>, distinct: Distinct<T>) -> Result<bool> {
		self.commit(move |list| list.insert_all(index, elements, distinct)).await?
	}

	/// See [`ListOps::insert_all_distinct_input`].
	pub async fn insert_all_distinct_input(&self, index: usize, elements: Vec<T>, distinct: Distinct<T>) -> Result<bool> {
		self.commit(move |list| list.insert_all_distinct_input(index, elements, distinct))
			.await?
	}

	/// Runs `block` as one queued job, so a multi-step edit is atomic with
	/// respect to every other caller. Publishes once, after the block, if
	/// any step changed the list.
	pub async fn dispatch<R>(&self, block: impl FnOnce(&mut CachedList<L>) -> R + Send + 'static) -> Result<R>
	where
		R: Send + 'static,
	{
		self.commit(block).await
	}

	/// Alias of [`Self::dispatch`].
	pub async fn modify<R>(&self, block: impl FnOnce(&mut CachedList<L>) -> R + Send + 'static) -> Result<R>
	where
		R: Send + 'static,
	{
		self.dispatch(block).await
	}
}

/// Builder for [`SerialList`].
pub struct SerialListBuilder<T> {
	initial: Vec<T>,
	distinct: Option<DistinctFn<T>>,
	config: SerialListConfig,
	runtime: Option<Handle>,
	on_change: Option<OnChange>,
}

impl<T> SerialListBuilder<T>
where
	T: Clone + PartialEq + Send + Sync + 'static,
{
	fn new() -> Self {
		Self {
			initial: Vec::new(),
			distinct: Some(default_distinct()),
			config: SerialListConfig::default(),
			runtime: None,
			on_change: None,
		}
	}

	/// Initial contents, published as the first snapshot.
	pub fn initial(mut self, items: Vec<T>) -> Self {
		self.initial = items;
		self
	}

	/// Default equivalence predicate; `None` disables deduplication for
	/// calls passing [`Distinct::Default`].
	pub fn distinct(mut self, distinct: Option<DistinctFn<T>>) -> Self {
		self.distinct = distinct;
		self
	}

	/// Worker settings.
	pub fn config(mut self, config: SerialListConfig) -> Self {
		self.config = config;
		self
	}

	/// Runtime the worker is spawned on.
	pub fn runtime(mut self, handle: Handle) -> Self {
		self.runtime = Some(handle);
		self
	}

	/// Callback fired on the worker after each state-changing primitive.
	pub fn on_change(mut self, on_change: impl FnMut() + Send + 'static) -> Self {
		self.on_change = Some(Box::new(on_change));
		self
	}

	/// Validates the settings and starts the worker.
	pub fn build(self) -> Result<SerialList<T>> {
		self.config.validate()?;
		Ok(self.spawn())
	}

	fn spawn(self) -> SerialList<T> {
		let Self {
			initial,
			distinct,
			config,
			runtime,
			on_change,
		} = self;

		let list = CachedList::with_callback(RawList::with_distinct(initial, distinct), on_change);
		SerialList::start(list, config, runtime)
	}
}

/// Stream of committed snapshots.
///
/// The first [`Self::next`] yields the value current at subscription; later
/// calls wait for the next commit. Values published faster than they are
/// consumed are conflated to the latest. Ends once the list and its worker
/// are gone.
pub struct SnapshotStream<T> {
	rx: watch::Receiver<Snapshot<T>>,
	primed: bool,
}

impl<T> SnapshotStream<T> {
	/// Waits for the next snapshot.
	pub async fn next(&mut self) -> Option<Snapshot<T>> {
		if !self.primed {
			self.primed = true;
			return Some(self.rx.borrow_and_update().clone());
		}
		self.rx.changed().await.ok()?;
		Some(self.rx.borrow_and_update().clone())
	}

	/// Latest snapshot, without waiting.
	pub fn latest(&self) -> Snapshot<T> {
		self.rx.borrow().clone()
	}
}
