use std::{
	future::Future,
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
	time::Duration,
};

use tokio::task::JoinHandle;

/// Admits at most one scheduled action at a time.
///
/// An accepted action runs after `interval` on the tokio runtime. Attempts made while an
/// action is waiting or running are dropped, not queued. The gate frees itself once the
/// action has finished, including when the task is aborted or panics.
#[derive(Debug)]
pub struct ThrottleGate {
	interval: Duration,
	busy: Arc<AtomicBool>,
}
impl ThrottleGate {
	pub fn new(interval: Duration) -> Self {
		Self { interval, busy: Arc::new(AtomicBool::new(false)) }
	}

	pub fn interval(&self) -> Duration {
		self.interval
	}

	pub fn is_busy(&self) -> bool {
		self.busy.load(Ordering::SeqCst)
	}

	/// Must be called from within a tokio runtime.
	pub fn attempt<F>(&self, action: F) -> Option<JoinHandle<()>>
	where
		F: Future<Output = ()> + Send + 'static,
	{
		if self.busy.swap(true, Ordering::SeqCst) {
			return None;
		}

		let guard = BusyGuard(self.busy.clone());
		let interval = self.interval;

		Some(tokio::spawn(async move {
			let _guard = guard;

			tokio::time::sleep(interval).await;

			action.await;
		}))
	}
}

struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
	fn drop(&mut self) {
		self.0.store(false, Ordering::SeqCst);
	}
}
