//! Wire shapes of the external detection and report services, plus the
//! conversion into the validated domain snapshot.
//!
//! Shape is checked here, at the boundary, once. Everything downstream
//! works on the closed types in [`super::graph`].

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DataIntegrityError;
use super::graph::{AccountNode, GraphModel, TransactionLink};

/// A detected fraud ring. Owned by the detection service; consumed
/// read-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ring {
	pub ring_id: String,
	pub member_accounts: Vec<String>,
	pub pattern_type: String,
	pub risk_score: i64,
	/// Aggregate transacted volume. Older service builds omit it.
	#[serde(default)]
	pub total_value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousAccount {
	pub account_id: String,
	pub suspicion_score: i64,
	#[serde(default)]
	pub detected_patterns: Vec<String>,
	/// Comma-joined ring ids, as the service emits them.
	#[serde(default)]
	pub ring_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
	pub total_accounts_analyzed: u64,
	pub suspicious_accounts_flagged: u64,
	pub fraud_rings_detected: u64,
	pub processing_time_seconds: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NodePayload {
	pub id: String,
	#[serde(default)]
	pub suspicion_score: i64,
	#[serde(default)]
	pub patterns: Vec<String>,
	/// Comma-joined ring ids; empty for clean accounts.
	#[serde(default)]
	pub ring: String,
	#[serde(default)]
	pub inflow: f64,
	#[serde(default)]
	pub outflow: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LinkPayload {
	pub source: String,
	pub target: String,
	pub amount: f64,
	pub timestamp: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GraphPayload {
	pub nodes: Vec<NodePayload>,
	pub links: Vec<LinkPayload>,
}

/// Full `/analyze` response.
#[derive(Clone, Debug, Deserialize)]
pub struct AnalysisResponse {
	pub suspicious_accounts: Vec<SuspiciousAccount>,
	pub fraud_rings: Vec<Ring>,
	pub summary: AnalysisSummary,
	pub graph_data: GraphPayload,
}

/// Validated per-session snapshot: everything the workspace renders.
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
	pub graph: GraphModel,
	pub rings: Vec<Ring>,
	pub accounts: Vec<SuspiciousAccount>,
	pub summary: AnalysisSummary,
}

impl AnalysisResponse {
	/// Normalize and validate the wire payload into a domain snapshot.
	pub fn into_analysis(self) -> Result<Analysis, DataIntegrityError> {
		let nodes = self
			.graph_data
			.nodes
			.into_iter()
			.map(|n| {
				let score = u8::try_from(n.suspicion_score)
					.ok()
					.filter(|s| *s <= 100)
					.ok_or(DataIntegrityError::ScoreOutOfRange {
						account: n.id.clone(),
						score: n.suspicion_score,
					})?;
				for (direction, amount) in [("inflow", n.inflow), ("outflow", n.outflow)] {
					if amount < 0.0 {
						return Err(DataIntegrityError::NegativeFlow {
							account: n.id.clone(),
							direction,
							amount,
						});
					}
				}
				Ok(AccountNode {
					id: n.id,
					ring_ids: split_ring_ids(&n.ring),
					suspicion_score: score,
					inflow: n.inflow,
					outflow: n.outflow,
					patterns: n.patterns.into_iter().collect(),
				})
			})
			.collect::<Result<Vec<_>, DataIntegrityError>>()?;

		let links = self
			.graph_data
			.links
			.into_iter()
			.map(|l| TransactionLink {
				source_id: l.source,
				target_id: l.target,
				amount: l.amount,
				timestamp: l.timestamp,
			})
			.collect();

		let graph = GraphModel::new(nodes, links)?;
		check_membership(&graph, &self.fraud_rings)?;

		Ok(Analysis {
			graph,
			rings: self.fraud_rings,
			accounts: self.suspicious_accounts,
			summary: self.summary,
		})
	}
}

/// Verify the ring/account membership relation in both directions:
/// every ring member exists and carries the ring id, and every ring id
/// on an account is backed by a ring listing that account. The core
/// never repairs an inconsistent payload.
pub fn check_membership(graph: &GraphModel, rings: &[Ring]) -> Result<(), DataIntegrityError> {
	for ring in rings {
		if ring.member_accounts.is_empty() {
			return Err(DataIntegrityError::EmptyRing(ring.ring_id.clone()));
		}
		for member in &ring.member_accounts {
			let Some(node) = graph.node(member) else {
				return Err(DataIntegrityError::UnknownMember {
					ring: ring.ring_id.clone(),
					account: member.clone(),
				});
			};
			if !node.ring_ids.contains(&ring.ring_id) {
				return Err(DataIntegrityError::MembershipMismatch {
					ring: ring.ring_id.clone(),
					account: member.clone(),
				});
			}
		}
	}
	for node in graph.nodes() {
		for ring_id in &node.ring_ids {
			let listed = rings
				.iter()
				.any(|r| r.ring_id == *ring_id && r.member_accounts.contains(&node.id));
			if !listed {
				return Err(DataIntegrityError::DanglingRingId {
					ring: ring_id.clone(),
					account: node.id.clone(),
				});
			}
		}
	}
	Ok(())
}

fn split_ring_ids(raw: &str) -> BTreeSet<String> {
	raw.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(str::to_owned)
		.collect()
}

/// Narrative produced by the report service for one ring.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SarReport {
	pub executive_summary: String,
	pub mule_herder: MuleHerder,
}

/// The report service emits the herder either as a bare account id or
/// as an object carrying one.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MuleHerder {
	Account { account_id: String },
	Label(String),
}

impl fmt::Display for MuleHerder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MuleHerder::Account { account_id } => f.write_str(account_id),
			MuleHerder::Label(label) => f.write_str(label),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = r#"{
		"suspicious_accounts": [
			{"account_id": "ACC-7", "suspicion_score": 70, "detected_patterns": ["Cycle"], "ring_id": "RING-0001,RING-0002"}
		],
		"fraud_rings": [
			{"ring_id": "RING-0001", "member_accounts": ["ACC-7", "ACC-8"], "pattern_type": "Cycle", "risk_score": 84},
			{"ring_id": "RING-0002", "member_accounts": ["ACC-7"], "pattern_type": "Layered Shell", "risk_score": 40, "total_value": 1200.5}
		],
		"summary": {
			"total_accounts_analyzed": 3,
			"suspicious_accounts_flagged": 1,
			"fraud_rings_detected": 2,
			"processing_time_seconds": 0.42
		},
		"graph_data": {
			"nodes": [
				{"id": "ACC-7", "suspicion_score": 70, "patterns": ["Cycle"], "ring": "RING-0001,RING-0002", "inflow": 900.0, "outflow": 850.0},
				{"id": "ACC-8", "suspicion_score": 40, "ring": "RING-0001"},
				{"id": "ACC-9"}
			],
			"links": [
				{"source": "ACC-7", "target": "ACC-8", "amount": 500.0, "timestamp": "2024-01-05T09:00:00Z"},
				{"source": "ACC-8", "target": "ACC-9", "amount": 120.0, "timestamp": "2024-01-06"}
			]
		}
	}"#;

	#[test]
	fn decodes_and_validates_full_response() {
		let response: AnalysisResponse = serde_json::from_str(SAMPLE).unwrap();
		let analysis = response.into_analysis().unwrap();
		assert_eq!(analysis.graph.node_count(), 3);
		assert_eq!(analysis.rings.len(), 2);

		let herd = analysis.graph.node("ACC-7").unwrap();
		assert_eq!(herd.ring_ids.len(), 2);
		assert!(herd.ring_ids.contains("RING-0002"));
		assert_eq!(herd.inflow, 900.0);
		assert!(analysis.graph.node("ACC-9").unwrap().ring_ids.is_empty());
	}

	#[test]
	fn rejects_out_of_range_score() {
		let mut response: AnalysisResponse = serde_json::from_str(SAMPLE).unwrap();
		response.graph_data.nodes[0].suspicion_score = 140;
		assert!(matches!(
			response.into_analysis().unwrap_err(),
			DataIntegrityError::ScoreOutOfRange { score: 140, .. }
		));
	}

	#[test]
	fn rejects_negative_flow_totals() {
		let mut response: AnalysisResponse = serde_json::from_str(SAMPLE).unwrap();
		response.graph_data.nodes[1].outflow = -5.0;
		assert!(matches!(
			response.into_analysis().unwrap_err(),
			DataIntegrityError::NegativeFlow {
				direction: "outflow",
				..
			}
		));
	}

	#[test]
	fn rejects_ring_listing_a_non_member_account() {
		let mut response: AnalysisResponse = serde_json::from_str(SAMPLE).unwrap();
		// ACC-9 carries no ring ids, so listing it breaks the relation.
		response.fraud_rings[0].member_accounts.push("ACC-9".into());
		assert!(matches!(
			response.into_analysis().unwrap_err(),
			DataIntegrityError::MembershipMismatch { .. }
		));
	}

	#[test]
	fn rejects_account_with_dangling_ring_id() {
		let mut response: AnalysisResponse = serde_json::from_str(SAMPLE).unwrap();
		response.graph_data.nodes[2].ring = "RING-0009".into();
		assert!(matches!(
			response.into_analysis().unwrap_err(),
			DataIntegrityError::DanglingRingId { .. }
		));
	}

	#[test]
	fn rejects_ring_with_unknown_member() {
		let mut response: AnalysisResponse = serde_json::from_str(SAMPLE).unwrap();
		response.fraud_rings[1].member_accounts = vec!["NOBODY".into()];
		assert!(matches!(
			response.into_analysis().unwrap_err(),
			DataIntegrityError::UnknownMember { .. }
		));
	}

	#[test]
	fn rejects_empty_ring() {
		let mut response: AnalysisResponse = serde_json::from_str(SAMPLE).unwrap();
		response.fraud_rings[1].member_accounts.clear();
		assert!(matches!(
			response.into_analysis().unwrap_err(),
			DataIntegrityError::EmptyRing(_)
		));
	}

	#[test]
	fn mule_herder_accepts_both_wire_shapes() {
		let bare: SarReport = serde_json::from_str(
			r#"{"executive_summary": "s", "mule_herder": "ACC-1"}"#,
		)
		.unwrap();
		assert_eq!(bare.mule_herder.to_string(), "ACC-1");

		let object: SarReport = serde_json::from_str(
			r#"{"executive_summary": "s", "mule_herder": {"account_id": "ACC-2"}}"#,
		)
		.unwrap();
		assert_eq!(object.mule_herder.to_string(), "ACC-2");
	}

	#[test]
	fn ring_id_splitting_trims_and_drops_empties() {
		let ids = split_ring_ids(" RING-1 , ,RING-2,");
		assert_eq!(ids.len(), 2);
		assert!(ids.contains("RING-1") && ids.contains("RING-2"));
	}
}
