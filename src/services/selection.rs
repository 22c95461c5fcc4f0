//! Single source of truth for what the analyst is looking at.
//!
//! Every other surface (canvas, triage list, detail panels) reads the
//! published signal and mutates only through the named transitions.

use leptos::prelude::*;

/// Which layer of the triage workflow currently has focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
	Overview,
	RingIsolated,
	NodeInspected,
}

/// Current `(isolated ring, inspected node)` pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
	isolated_ring: Option<String>,
	inspected_node: Option<String>,
}

impl Selection {
	pub fn isolated_ring(&self) -> Option<&str> {
		self.isolated_ring.as_deref()
	}

	pub fn inspected_node(&self) -> Option<&str> {
		self.inspected_node.as_deref()
	}

	pub fn focus(&self) -> Focus {
		if self.inspected_node.is_some() {
			Focus::NodeInspected
		} else if self.isolated_ring.is_some() {
			Focus::RingIsolated
		} else {
			Focus::Overview
		}
	}

	/// Isolate `id`, or return to the overview when it is already the
	/// isolated ring (toggle-off). Either way node inspection is
	/// cleared: picking a ring always resets node context.
	pub fn select_ring(&mut self, id: &str) {
		if self.isolated_ring.as_deref() == Some(id) {
			self.isolated_ring = None;
		} else {
			self.isolated_ring = Some(id.to_owned());
		}
		self.inspected_node = None;
	}

	/// Inspect a node. The isolated ring, if any, stays put.
	pub fn select_node(&mut self, id: &str) {
		self.inspected_node = Some(id.to_owned());
	}

	pub fn clear_node(&mut self) {
		self.inspected_node = None;
	}

	/// Back to the overview. Called whenever a new snapshot replaces
	/// the current one.
	pub fn reset(&mut self) {
		*self = Self::default();
	}
}

/// Reactive wrapper around [`Selection`], shared through context.
#[derive(Clone, Copy)]
pub struct SelectionStore {
	current: RwSignal<Selection>,
}

impl SelectionStore {
	fn new() -> Self {
		Self {
			current: RwSignal::new(Selection::default()),
		}
	}

	/// Reactive read of the whole selection.
	pub fn get(&self) -> Selection {
		self.current.get()
	}

	/// Reactive read of the isolated ring id.
	pub fn isolated_ring(&self) -> Option<String> {
		self.current.with(|s| s.isolated_ring.clone())
	}

	/// Reactive read of the inspected node id.
	pub fn inspected_node(&self) -> Option<String> {
		self.current.with(|s| s.inspected_node.clone())
	}

	pub fn select_ring(&self, id: &str) {
		self.current.update(|s| s.select_ring(id));
	}

	pub fn select_node(&self, id: &str) {
		self.current.update(|s| s.select_node(id));
	}

	pub fn clear_node(&self) {
		self.current.update(Selection::clear_node);
	}

	pub fn reset(&self) {
		self.current.update(Selection::reset);
	}
}

pub fn provide_selection() {
	provide_context(SelectionStore::new());
}

pub fn use_selection() -> SelectionStore {
	expect_context::<SelectionStore>()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn starts_in_overview() {
		let s = Selection::default();
		assert_eq!(s.focus(), Focus::Overview);
		assert!(s.isolated_ring().is_none());
		assert!(s.inspected_node().is_none());
	}

	#[test]
	fn selecting_the_same_ring_twice_toggles_back_to_overview() {
		let mut s = Selection::default();
		s.select_ring("R1");
		assert_eq!(s.focus(), Focus::RingIsolated);
		s.select_ring("R1");
		assert_eq!(s.focus(), Focus::Overview);
		assert!(s.isolated_ring().is_none());
	}

	#[test]
	fn ring_selection_clears_node_inspection() {
		// Scenario: R1 isolated, A inspected, then R2 selected.
		let mut s = Selection::default();
		s.select_ring("R1");
		s.select_node("A");
		assert_eq!(s.focus(), Focus::NodeInspected);
		s.select_ring("R2");
		assert_eq!(s.isolated_ring(), Some("R2"));
		assert!(s.inspected_node().is_none());
	}

	#[test]
	fn node_inspection_keeps_the_isolated_ring() {
		let mut s = Selection::default();
		s.select_ring("R1");
		s.select_node("A");
		assert_eq!(s.isolated_ring(), Some("R1"));
		assert_eq!(s.inspected_node(), Some("A"));
	}

	#[test]
	fn node_can_be_inspected_from_the_overview() {
		let mut s = Selection::default();
		s.select_node("A");
		assert_eq!(s.focus(), Focus::NodeInspected);
		assert!(s.isolated_ring().is_none());
		s.clear_node();
		assert_eq!(s.focus(), Focus::Overview);
	}

	#[test]
	fn reset_forces_overview() {
		let mut s = Selection::default();
		s.select_ring("R1");
		s.select_node("A");
		s.reset();
		assert_eq!(s, Selection::default());
	}
}
