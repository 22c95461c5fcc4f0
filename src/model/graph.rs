use std::collections::{BTreeSet, HashMap};

use super::error::DataIntegrityError;

/// One account in the transaction graph.
///
/// Immutable once the snapshot is built; a new analysis produces a new
/// snapshot rather than mutating nodes in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccountNode {
	pub id: String,
	/// Rings this account belongs to. May be empty.
	pub ring_ids: BTreeSet<String>,
	/// 0..=100, assigned by the detection service.
	pub suspicion_score: u8,
	pub inflow: f64,
	pub outflow: f64,
	/// Behavioral flags, e.g. "Cycle" or "Smurfing (Fan-In)".
	pub patterns: BTreeSet<String>,
}

impl AccountNode {
	/// Display color, derived from the suspicion score alone so it can
	/// never drift from the underlying data.
	pub fn render_color(&self) -> &'static str {
		match self.suspicion_score {
			s if s > 50 => "#ef4444",
			s if s > 0 => "#f97316",
			_ => "#cccccc",
		}
	}

	/// Relative display size (area weight), 1.0 for a clean account up
	/// to 6.0 for a maximal score.
	pub fn render_size(&self) -> f64 {
		1.0 + f64::from(self.suspicion_score) / 20.0
	}
}

/// One directed transaction between two accounts.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionLink {
	pub source_id: String,
	pub target_id: String,
	/// Strictly positive; validated at snapshot construction.
	pub amount: f64,
	/// Raw feed timestamp. Kept verbatim for display; parsed lazily by
	/// the ledger builder, which reports unparseable values instead of
	/// failing the load.
	pub timestamp: String,
}

/// Immutable snapshot of the account/transaction graph.
///
/// Nodes and links keep their feed order; lookups go through the id
/// index. All filtering operations return new snapshots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphModel {
	nodes: Vec<AccountNode>,
	index: HashMap<String, usize>,
	links: Vec<TransactionLink>,
}

impl GraphModel {
	/// Build a validated snapshot. Rejects duplicate account ids, links
	/// with unresolved endpoints, and non-positive amounts. Validation
	/// happens here, once, so filters never need to re-check shape.
	pub fn new(
		nodes: Vec<AccountNode>,
		links: Vec<TransactionLink>,
	) -> Result<Self, DataIntegrityError> {
		let mut index = HashMap::with_capacity(nodes.len());
		for (i, node) in nodes.iter().enumerate() {
			if index.insert(node.id.clone(), i).is_some() {
				return Err(DataIntegrityError::DuplicateNode(node.id.clone()));
			}
		}
		for link in &links {
			for endpoint in [&link.source_id, &link.target_id] {
				if !index.contains_key(endpoint) {
					return Err(DataIntegrityError::UnresolvedEndpoint {
						origin: link.source_id.clone(),
						target: link.target_id.clone(),
						missing: endpoint.clone(),
					});
				}
			}
			if link.amount <= 0.0 {
				return Err(DataIntegrityError::NonPositiveAmount {
					origin: link.source_id.clone(),
					target: link.target_id.clone(),
					amount: link.amount,
				});
			}
		}
		Ok(Self { nodes, index, links })
	}

	/// Constructor for outputs of the subgraph filter, whose nodes and
	/// links are drawn from an already-validated snapshot.
	pub(crate) fn from_filtered(
		nodes: Vec<AccountNode>,
		links: Vec<TransactionLink>,
	) -> Self {
		let index = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();
		Self { nodes, index, links }
	}

	pub fn nodes(&self) -> &[AccountNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[TransactionLink] {
		&self.links
	}

	pub fn node(&self, id: &str) -> Option<&AccountNode> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn link_count(&self) -> usize {
		self.links.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
