use std::{future::Future, time::Duration};

use tokio::task::JoinHandle;

use fischer_domain::Cursor;

use crate::ThrottleGate;

/// State a binding was created against. A change in either field means the binding is stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerDeps {
	pub cursor: Cursor,
	pub search_epoch: u64,
}

/// Watches the end-of-list sentinel and turns its not-visible to visible transitions into
/// throttled load requests.
#[derive(Debug)]
pub struct VisibilityTrigger {
	deps: TriggerDeps,
	gate: ThrottleGate,
	visible: bool,
	bindings: u64,
}
impl VisibilityTrigger {
	pub fn new(deps: TriggerDeps, interval: Duration) -> Self {
		Self { deps, gate: ThrottleGate::new(interval), visible: false, bindings: 1 }
	}

	pub fn deps(&self) -> TriggerDeps {
		self.deps
	}

	/// Number of bindings created so far, the initial one included.
	pub fn bindings(&self) -> u64 {
		self.bindings
	}

	pub fn is_busy(&self) -> bool {
		self.gate.is_busy()
	}

	/// Rebinds when `deps` differ from the current binding and reports whether it did.
	///
	/// The old gate is dropped, but an action it already scheduled keeps running. The
	/// visibility edge is reset so a sentinel that is still on screen fires again.
	pub fn sync(&mut self, deps: TriggerDeps) -> bool {
		if deps == self.deps {
			return false;
		}

		self.deps = deps;
		self.gate = ThrottleGate::new(self.gate.interval());
		self.visible = false;
		self.bindings += 1;

		true
	}

	/// Records the sentinel visibility and reports a rising edge.
	pub fn observe(&mut self, visible: bool) -> bool {
		let rising = visible && !self.visible;

		self.visible = visible;

		rising
	}

	pub fn fire<F>(&self, action: F) -> Option<JoinHandle<()>>
	where
		F: Future<Output = ()> + Send + 'static,
	{
		self.gate.attempt(action)
	}
}
