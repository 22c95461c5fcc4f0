//! Subgraph isolation for the canvas view.
//!
//! A ring's subgraph keeps a link only when *both* endpoints are ring
//! members. No neighbor expansion, no dangling edges.

use std::collections::HashSet;

use super::graph::GraphModel;

/// Restrict `graph` to the members of `ring_id`.
///
/// With no ring selected this is the identity. The input is never
/// mutated and node/link order is preserved, so repeated calls with the
/// same arguments are interchangeable. A ring with no surviving members
/// yields an empty snapshot, which the canvas renders as an explicit
/// empty state.
pub fn isolate(graph: &GraphModel, ring_id: Option<&str>) -> GraphModel {
	let Some(ring_id) = ring_id else {
		return graph.clone();
	};

	let nodes: Vec<_> = graph
		.nodes()
		.iter()
		.filter(|n| n.ring_ids.contains(ring_id))
		.cloned()
		.collect();
	let members: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
	let links: Vec<_> = graph
		.links()
		.iter()
		.filter(|l| members.contains(l.source_id.as_str()) && members.contains(l.target_id.as_str()))
		.cloned()
		.collect();

	GraphModel::from_filtered(nodes, links)
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use super::*;
	use crate::model::graph::{AccountNode, TransactionLink};

	fn node(id: &str, rings: &[&str]) -> AccountNode {
		AccountNode {
			id: id.into(),
			ring_ids: rings.iter().map(|r| (*r).into()).collect::<BTreeSet<_>>(),
			..AccountNode::default()
		}
	}

	fn link(source: &str, target: &str) -> TransactionLink {
		TransactionLink {
			source_id: source.into(),
			target_id: target.into(),
			amount: 50.0,
			timestamp: "2024-03-01T10:00:00Z".into(),
		}
	}

	fn sample() -> GraphModel {
		GraphModel::new(
			vec![node("A", &["R1"]), node("B", &["R1"]), node("C", &[])],
			vec![link("A", "B"), link("B", "C")],
		)
		.unwrap()
	}

	#[test]
	fn strict_isolation_drops_half_member_links() {
		// Scenario: A and B are in R1, C is not; B -> C must go.
		let out = isolate(&sample(), Some("R1"));
		let ids: Vec<_> = out.nodes().iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["A", "B"]);
		assert_eq!(out.link_count(), 1);
		assert_eq!(out.links()[0].source_id, "A");
		assert_eq!(out.links()[0].target_id, "B");
	}

	#[test]
	fn every_surviving_link_has_both_endpoints_present() {
		let out = isolate(&sample(), Some("R1"));
		for l in out.links() {
			assert!(out.contains(&l.source_id));
			assert!(out.contains(&l.target_id));
		}
	}

	#[test]
	fn absent_ring_id_is_identity() {
		let g = sample();
		assert_eq!(isolate(&g, None), g);
	}

	#[test]
	fn refiltering_is_idempotent() {
		let g = sample();
		let once = isolate(&g, Some("R1"));
		let twice = isolate(&once, Some("R1"));
		assert_eq!(once, twice);
	}

	#[test]
	fn unknown_ring_yields_empty_snapshot_not_error() {
		let out = isolate(&sample(), Some("R404"));
		assert!(out.is_empty());
		assert_eq!(out.link_count(), 0);
	}

	#[test]
	fn input_graph_is_untouched() {
		let g = sample();
		let before = g.clone();
		let _ = isolate(&g, Some("R1"));
		assert_eq!(g, before);
	}

	#[test]
	fn output_preserves_input_order() {
		let g = GraphModel::new(
			vec![node("Z", &["R1"]), node("A", &["R1"]), node("M", &["R1"])],
			vec![link("M", "A"), link("Z", "M")],
		)
		.unwrap();
		let out = isolate(&g, Some("R1"));
		let ids: Vec<_> = out.nodes().iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["Z", "A", "M"]);
		assert_eq!(out.links()[0].source_id, "M");
		assert_eq!(out.links()[1].source_id, "Z");
	}
}
