use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use super::*;
use crate::cached::List;
use crate::raw::RawList;

#[test]
fn forwards_operations_to_wrapped_list() {
	let list = List::from(vec![1, 2, 3]).synchronized();
	assert!(list.add_all(vec![1, 2, 4], Distinct::Default));
	assert_eq!(list.data(), [3, 1, 2, 4]);
	assert!(list.add_all_distinct_input(vec![4, 5], Distinct::Default));
	assert_eq!(list.data(), [3, 1, 2, 4, 5]);
	assert_eq!(list.insert(0, 0), Ok(true));
	assert_eq!(list.remove_at(1), Ok(true));
	assert_eq!(list.replace_at(0, 9), Ok(true));
	assert_eq!(list.data(), [9, 1, 2, 4, 5]);
	assert_eq!(list.len(), 5);
	assert!(list.clear());
	assert!(list.is_empty());
}

#[test]
fn snapshot_identity_survives_locking() {
	let list = SyncList::new(List::from(vec![1]));
	let a = list.data();
	assert!(!list.remove_first(|x| *x == 2));
	assert!(Snapshot::ptr_eq(&a, &list.data()));
}

#[test]
fn concurrent_adds_lose_no_updates() {
	let list = Arc::new(SyncList::new(List::<usize>::default()));
	let handles: Vec<_> = (0..8)
		.map(|t| {
			let list = Arc::clone(&list);
			thread::spawn(move || {
				for i in 0..250 {
					list.add(t * 1000 + i);
				}
			})
		})
		.collect();
	for handle in handles {
		handle.join().expect("writer thread");
	}

	let data = list.data();
	assert_eq!(data.len(), 2000);
	for t in 0..8 {
		let ours: Vec<_> = data.iter().copied().filter(|v| v / 1000 == t).collect();
		let expected: Vec<_> = (0..250).map(|i| t * 1000 + i).collect();
		assert_eq!(ours, expected, "per-thread order must be preserved");
	}
}

#[test]
fn readers_never_observe_half_applied_modify() {
	let list = Arc::new(SyncList::new(List::<u32>::default()));
	let stop = Arc::new(AtomicBool::new(false));

	let reader = {
		let list = Arc::clone(&list);
		let stop = Arc::clone(&stop);
		thread::spawn(move || {
			let mut reads = 0usize;
			while !stop.load(Ordering::Acquire) {
				assert_eq!(list.data().len() % 2, 0);
				reads += 1;
			}
			reads
		})
	};

	for i in 0..500 {
		list.modify(|l| {
			l.add(i);
			l.add(i);
		});
	}
	stop.store(true, Ordering::Release);
	reader.join().expect("reader thread");
	assert_eq!(list.len(), 1000);
}

#[test]
fn shared_monitor_serializes_separate_lists() {
	let monitor = Monitor::new();
	let a = Arc::new(SyncList::with_monitor(RawList::<u8>::new(), monitor.clone()));
	let b = Arc::new(SyncList::with_monitor(RawList::<u8>::new(), monitor));
	let inside = Arc::new(AtomicUsize::new(0));
	let overlap = Arc::new(AtomicBool::new(false));

	let spawn_worker = |list: Arc<SyncList<RawList<u8>>>| {
		let inside = Arc::clone(&inside);
		let overlap = Arc::clone(&overlap);
		thread::spawn(move || {
			for _ in 0..200 {
				list.modify(|l| {
					if inside.fetch_add(1, Ordering::SeqCst) != 0 {
						overlap.store(true, Ordering::SeqCst);
					}
					l.add(1);
					thread::yield_now();
					inside.fetch_sub(1, Ordering::SeqCst);
				});
			}
		})
	};

	let ta = spawn_worker(Arc::clone(&a));
	let tb = spawn_worker(Arc::clone(&b));
	ta.join().expect("worker a");
	tb.join().expect("worker b");

	assert!(!overlap.load(Ordering::SeqCst), "monitor must exclude both lists");
	assert_eq!(a.len() + b.len(), 400);
}

#[test]
fn lock_is_released_when_closure_panics() {
	let list = SyncList::new(List::from(vec![1, 2, 3]));
	let result = panic::catch_unwind(AssertUnwindSafe(|| {
		list.remove_all(|x| {
			if *x == 2 {
				panic!("predicate failed");
			}
			false
		})
	}));
	assert!(result.is_err());

	// Still usable from another thread, so the guard was dropped.
	thread::scope(|s| {
		s.spawn(|| assert!(list.add(4)));
	});
	assert_eq!(list.data(), [1, 2, 3, 4]);
}
