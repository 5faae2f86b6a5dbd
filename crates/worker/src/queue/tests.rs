use std::num::NonZeroUsize;
use std::time::Duration;

use super::*;

#[tokio::test]
async fn jobs_run_in_admission_order() {
	let queue = SerialQueue::spawn(QueueSpec::new("order"), Vec::<u32>::new());

	let (a, b, c) = tokio::join!(
		queue.run(|log| log.push(1)),
		queue.run(|log| log.push(2)),
		queue.run(|log| log.push(3)),
	);
	assert_eq!((a, b, c), (Ok(()), Ok(()), Ok(())));

	let log = queue.run(|log| log.clone()).await;
	assert_eq!(log, Ok(vec![1, 2, 3]));
}

#[tokio::test]
async fn run_returns_job_output() {
	let queue = SerialQueue::spawn(QueueSpec::default(), 40u64);
	let out = queue
		.run(|n| {
			*n += 2;
			*n
		})
		.await;
	assert_eq!(out, Ok(42));
	assert_eq!(queue.name(), "serial");
}

#[tokio::test]
async fn panicking_job_is_reported_and_worker_keeps_serving() {
	let queue = SerialQueue::spawn(QueueSpec::new("panics"), Vec::<u32>::new());

	let err = queue
		.run(|log: &mut Vec<u32>| {
			log.push(7);
			if log.len() == 1 {
				panic!("job blew up");
			}
		})
		.await;
	assert_eq!(err, Err(QueueError::Panicked("job blew up".to_string())));

	// State keeps whatever the failed job left behind.
	let log = queue.run(|log| log.clone()).await;
	assert_eq!(log, Ok(vec![7]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn abandoned_job_never_runs() {
	let queue = SerialQueue::spawn(QueueSpec::new("abandon"), Vec::<u32>::new());
	let (started_tx, started_rx) = oneshot::channel::<()>();
	let (gate_tx, gate_rx) = std::sync::mpsc::channel::<()>();

	let busy = {
		let queue = queue.clone();
		tokio::spawn(async move {
			queue
				.run(move |log| {
					let _ = started_tx.send(());
					let _ = gate_rx.recv();
					log.push(1);
				})
				.await
		})
	};
	started_rx.await.expect("first job should start");

	// Admitted behind the busy job, then abandoned before it can start.
	let abandoned = tokio::time::timeout(Duration::from_millis(20), queue.run(|log| log.push(2))).await;
	assert!(abandoned.is_err(), "second job must still be waiting");

	gate_tx.send(()).expect("gate receiver alive");
	assert_eq!(busy.await.expect("busy task joins"), Ok(()));

	let log = queue.run(|log| log.clone()).await;
	assert_eq!(log, Ok(vec![1]));
}

#[tokio::test]
async fn shutdown_closes_queue() {
	let queue = SerialQueue::spawn(QueueSpec::new("shutdown").capacity(NonZeroUsize::new(4).expect("non-zero")), 0u8);
	assert!(!queue.is_closed());

	queue.shutdown().await;
	assert!(queue.is_closed());
	assert_eq!(queue.run(|n| *n).await, Err(QueueError::Closed));

	// Idempotent.
	queue.shutdown().await;
}

#[test]
fn spawn_outside_runtime_uses_shared_runtime() {
	let queue = SerialQueue::spawn(QueueSpec::new("detached"), 1u32);
	let rt = tokio::runtime::Builder::new_current_thread().build().expect("runtime");
	let out = rt.block_on(queue.run(|n| *n + 1));
	assert_eq!(out, Ok(2));
}

#[tokio::test]
async fn single_slot_queue_admits_callers_in_turn() {
	let queue = SerialQueue::spawn(QueueSpec::new("single").capacity(NonZeroUsize::MIN), Vec::<u32>::new());
	assert_eq!(queue.run(|log| log.len()).await, Ok(0));

	let (a, b, c) = tokio::join!(
		queue.run(|log| log.push(1)),
		queue.run(|log| log.push(2)),
		queue.run(|log| log.push(3)),
	);
	assert_eq!((a, b, c), (Ok(()), Ok(()), Ok(())));
	assert_eq!(queue.run(|log| log.clone()).await, Ok(vec![1, 2, 3]));
}

#[test]
fn default_capacity_is_sixty_four() {
	assert_eq!(QueueSpec::default().capacity.get(), 64);
	assert_eq!(DEFAULT_QUEUE_CAPACITY.get(), 64);
}
