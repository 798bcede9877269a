//! Leptos views: the diagram surface, department cards and the side panel.

pub mod department_node;
pub mod org_flow;
pub mod shortcut_table;
pub mod sidebar;

use leptos::prelude::*;

use crate::chart::{ChartStore, Intent};

/// Copyable handle on the chart store, shared by every view.
///
/// Views never edit the chart directly; they dispatch [`Intent`]s and read
/// the store back through [`ChartHandle::with`].
#[derive(Clone, Copy)]
pub struct ChartHandle(RwSignal<ChartStore>);

impl ChartHandle {
	pub fn new(store: ChartStore) -> Self {
		Self(RwSignal::new(store))
	}

	pub fn dispatch(self, intent: Intent) {
		self.dispatch_all([intent]);
	}

	/// Applies `intents` in order. Subscribers are notified only when at
	/// least one of them took effect.
	pub fn dispatch_all(self, intents: impl IntoIterator<Item = Intent>) {
		self.0.maybe_update(|store| {
			intents
				.into_iter()
				.fold(false, |changed, intent| store.apply(intent).is_ok() | changed)
		});
	}

	pub fn with<R>(self, f: impl FnOnce(&ChartStore) -> R) -> R {
		self.0.with(f)
	}

	pub fn with_untracked<R>(self, f: impl FnOnce(&ChartStore) -> R) -> R {
		self.0.with_untracked(f)
	}
}
