use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Returns the ambient runtime handle, or a lazily built shared runtime when
/// called outside of any tokio context.
pub(crate) fn runtime_handle() -> Handle {
	if let Ok(handle) = Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(2)
			.thread_name("mergelist-worker-global")
			.build()
			.expect("failed to build mergelist-worker global tokio runtime")
	});
	runtime.handle().clone()
}

/// Spawns a queue worker future on `handle`, tagged with the queue name.
pub(crate) fn spawn_on<F>(handle: &Handle, queue: &str, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(queue, "worker.spawn");
	handle.spawn(fut)
}
