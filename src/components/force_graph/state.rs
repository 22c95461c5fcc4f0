use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::model::graph::GraphModel;

use super::viewport::{Bounds, Viewport};

pub const NODE_RADIUS: f64 = 5.0;
pub const HIT_RADIUS: f64 = 12.0;

/// Per-node payload carried into the simulation. Color and radius are
/// derived from the account's suspicion score when the state is built;
/// the account itself stays immutable in the snapshot.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: String,
	pub color: &'static str,
	pub radius: f64,
	pub score: u8,
}

/// Per-edge payload: the transacted amount, for the label overlay.
#[derive(Clone, Debug, Default)]
pub struct EdgeInfo {
	pub amount: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Live state behind the canvas: the physics graph, the camera, and
/// the in-flight pointer interaction.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, EdgeInfo>,
	pub viewport: Viewport,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: Option<DefaultNodeIdx>,
	/// Account currently under inspection, drawn with a highlight ring.
	pub inspected: Option<String>,
	pub show_amounts: bool,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
}

impl ForceGraphState {
	pub fn new(model: &GraphModel, width: f64, height: f64) -> Self {
		let mut state = Self {
			graph: Self::build_graph(model),
			viewport: Viewport::new(width, height),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: None,
			inspected: None,
			show_amounts: false,
			width,
			height,
			animation_running: true,
			id_to_idx: HashMap::new(),
		};
		state.reindex();
		state
	}

	/// Swap in a new displayed subgraph. The camera and overlay toggles
	/// survive; drag/hover state refers to simulation indices of the old
	/// graph and is discarded.
	pub fn rebuild(&mut self, model: &GraphModel) {
		self.graph = Self::build_graph(model);
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hover = None;
		self.reindex();
	}

	fn build_graph(model: &GraphModel) -> ForceGraph<NodeInfo, EdgeInfo> {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});

		let count = model.node_count().max(1);
		let mut id_to_idx = HashMap::with_capacity(count);
		for (i, account) in model.nodes().iter().enumerate() {
			// Seed in a circle around the origin so the layout unfolds
			// from the viewport center.
			let angle = (i as f64) * 2.0 * PI / count as f64;
			let idx = graph.add_node(NodeData {
				x: (100.0 * angle.cos()) as f32,
				y: (100.0 * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: account.id.clone(),
					color: account.render_color(),
					radius: NODE_RADIUS * account.render_size().sqrt(),
					score: account.suspicion_score,
				},
			});
			id_to_idx.insert(account.id.clone(), idx);
		}

		for link in model.links() {
			// Endpoints are guaranteed present by snapshot validation.
			if let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(&link.source_id),
				id_to_idx.get(&link.target_id),
			) {
				let mut edge: EdgeData<EdgeInfo> = EdgeData::default();
				edge.user_data.amount = link.amount;
				graph.add_edge(src, tgt, edge);
			}
		}

		graph
	}

	fn reindex(&mut self) {
		let mut index = HashMap::new();
		self.graph.visit_nodes(|node| {
			index.insert(node.data.user_data.id.clone(), node.index());
		});
		self.id_to_idx = index;
	}

	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		self.viewport.screen_to_world(sx, sy)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (wx, wy) = self.screen_to_world(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - wx, node.y() as f64 - wy);
			// Hit radius is world-space and grows with the node.
			let reach = HIT_RADIUS.max(node.data.user_data.radius + 3.0);
			if (dx * dx + dy * dy).sqrt() < reach {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.id.clone());
			}
		});
		found
	}

	/// Current world position of an account, if it is displayed.
	pub fn node_position(&self, id: &str) -> Option<(f64, f64)> {
		let idx = *self.id_to_idx.get(id)?;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	pub fn is_displayed(&self, id: &str) -> bool {
		self.id_to_idx.contains_key(id)
	}

	pub fn node_count(&self) -> usize {
		self.id_to_idx.len()
	}

	/// World-space bounding box of all displayed nodes.
	pub fn content_bounds(&self) -> Option<Bounds> {
		let mut bounds: Option<Bounds> = None;
		self.graph.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			let b = bounds.get_or_insert(Bounds {
				min_x: x,
				min_y: y,
				max_x: x,
				max_y: y,
			});
			b.min_x = b.min_x.min(x);
			b.min_y = b.min_y.min(y);
			b.max_x = b.max_x.max(x);
			b.max_y = b.max_y.max(y);
		});
		bounds
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		let bounds = self.content_bounds();
		self.viewport.tick(f64::from(dt) * 1000.0, bounds);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.viewport.resize(width, height);
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use super::*;
	use crate::model::graph::{AccountNode, TransactionLink};

	fn model() -> GraphModel {
		let node = |id: &str, score: u8| AccountNode {
			id: id.into(),
			ring_ids: BTreeSet::new(),
			suspicion_score: score,
			inflow: 0.0,
			outflow: 0.0,
			patterns: BTreeSet::new(),
		};
		GraphModel::new(
			vec![node("A", 80), node("B", 0)],
			vec![TransactionLink {
				source_id: "A".into(),
				target_id: "B".into(),
				amount: 250.0,
				timestamp: "2024-01-01".into(),
			}],
		)
		.unwrap()
	}

	#[test]
	fn builds_simulation_from_snapshot() {
		let state = ForceGraphState::new(&model(), 800.0, 600.0);
		assert_eq!(state.node_count(), 2);
		assert!(state.is_displayed("A"));
		assert!(state.node_position("A").is_some());
		assert!(state.node_position("GHOST").is_none());
	}

	#[test]
	fn rebuild_preserves_the_camera() {
		let mut state = ForceGraphState::new(&model(), 800.0, 600.0);
		state.viewport.zoom_by(2.0, 0.0);
		let before = state.viewport.transform();
		state.rebuild(&GraphModel::default());
		assert_eq!(state.viewport.transform(), before);
		assert_eq!(state.node_count(), 0);
		assert!(state.content_bounds().is_none());
	}

	#[test]
	fn content_bounds_cover_all_nodes() {
		let state = ForceGraphState::new(&model(), 800.0, 600.0);
		let bounds = state.content_bounds().unwrap();
		for id in ["A", "B"] {
			let (x, y) = state.node_position(id).unwrap();
			assert!(x >= bounds.min_x && x <= bounds.max_x);
			assert!(y >= bounds.min_y && y <= bounds.max_y);
		}
	}

	#[test]
	fn hit_testing_resolves_the_node_under_the_cursor() {
		let state = ForceGraphState::new(&model(), 800.0, 600.0);
		let (wx, wy) = state.node_position("A").unwrap();
		let t = state.viewport.transform();
		let (sx, sy) = (wx * t.k + t.x, wy * t.k + t.y);
		let idx = state.node_at_position(sx, sy).unwrap();
		assert_eq!(state.node_id(idx).as_deref(), Some("A"));
		assert!(state.node_at_position(sx + 5000.0, sy).is_none());
	}
}
