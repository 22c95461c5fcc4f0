//! Chronological transaction ledger for a ring's detail timeline.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use super::detection::Ring;
use super::graph::TransactionLink;

/// One ledger row: a ring-internal transaction with resolved endpoint
/// ids and an orderable instant.
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerEntry {
	pub source_id: String,
	pub target_id: String,
	pub amount: f64,
	/// Feed timestamp, kept verbatim for display.
	pub timestamp: String,
	pub instant: NaiveDateTime,
}

/// Ledger for one ring, sorted ascending by instant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ledger {
	pub entries: Vec<LedgerEntry>,
	/// Links excluded because their timestamp would not parse. Surfaced
	/// as a badge, never as a failure.
	pub skipped_timestamps: usize,
}

impl Ledger {
	pub fn total_amount(&self) -> f64 {
		self.entries.iter().map(|e| e.amount).sum()
	}
}

/// Build the ledger of transactions internal to `ring`: both endpoints
/// must be members. Entries sort ascending by parsed instant; the sort
/// is stable, so equal instants keep feed order. A link whose timestamp
/// cannot be parsed is counted and logged, not fatal.
pub fn build_ledger(ring: &Ring, links: &[TransactionLink]) -> Ledger {
	let members: HashSet<&str> = ring.member_accounts.iter().map(String::as_str).collect();
	let mut entries = Vec::new();
	let mut skipped = 0;

	for link in links {
		if !members.contains(link.source_id.as_str()) || !members.contains(link.target_id.as_str())
		{
			continue;
		}
		match parse_instant(&link.timestamp) {
			Some(instant) => entries.push(LedgerEntry {
				source_id: link.source_id.clone(),
				target_id: link.target_id.clone(),
				amount: link.amount,
				timestamp: link.timestamp.clone(),
				instant,
			}),
			None => {
				skipped += 1;
				log::warn!(
					"ledger for {}: unparseable timestamp {:?} on {} -> {}, excluded",
					ring.ring_id,
					link.timestamp,
					link.source_id,
					link.target_id
				);
			}
		}
	}

	entries.sort_by(|a, b| a.instant.cmp(&b.instant));
	Ledger {
		entries,
		skipped_timestamps: skipped,
	}
}

/// Parse a feed timestamp into an orderable instant. The feed carries
/// zone-less CSV values; RFC 3339 inputs are normalized to naive UTC
/// and bare dates anchor at midnight.
pub fn parse_instant(raw: &str) -> Option<NaiveDateTime> {
	let raw = raw.trim();
	if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
		return Some(dt.naive_utc());
	}
	if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
		return Some(dt);
	}
	NaiveDate::parse_from_str(raw, "%Y-%m-%d")
		.ok()
		.map(|d| d.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ring(id: &str, members: &[&str]) -> Ring {
		Ring {
			ring_id: id.into(),
			member_accounts: members.iter().map(|m| (*m).into()).collect(),
			pattern_type: "Cycle".into(),
			risk_score: 60,
			total_value: 0.0,
		}
	}

	fn link(source: &str, target: &str, timestamp: &str) -> TransactionLink {
		TransactionLink {
			source_id: source.into(),
			target_id: target.into(),
			amount: 10.0,
			timestamp: timestamp.into(),
		}
	}

	#[test]
	fn orders_internal_transactions_and_drops_outsiders() {
		// Scenario: X -> Z leaves the ring and must be excluded even
		// though it is the newest transaction.
		let r = ring("R2", &["X", "Y"]);
		let links = vec![
			link("X", "Y", "2024-01-02"),
			link("Y", "X", "2024-01-01"),
			link("X", "Z", "2024-01-03"),
		];
		let ledger = build_ledger(&r, &links);
		let flows: Vec<_> = ledger
			.entries
			.iter()
			.map(|e| (e.source_id.as_str(), e.target_id.as_str()))
			.collect();
		assert_eq!(flows, [("Y", "X"), ("X", "Y")]);
		assert_eq!(ledger.skipped_timestamps, 0);
	}

	#[test]
	fn equal_instants_keep_feed_order() {
		let r = ring("R1", &["A", "B"]);
		let links = vec![
			link("A", "B", "2024-05-01 09:00:00"),
			link("B", "A", "2024-05-01 09:00:00"),
			link("A", "B", "2024-05-01 08:00:00"),
		];
		let ledger = build_ledger(&r, &links);
		let flows: Vec<_> = ledger
			.entries
			.iter()
			.map(|e| (e.source_id.as_str(), e.target_id.as_str()))
			.collect();
		assert_eq!(flows, [("A", "B"), ("A", "B"), ("B", "A")]);
	}

	#[test]
	fn every_entry_stays_inside_the_ring() {
		let r = ring("R1", &["A", "B"]);
		let links = vec![link("A", "B", "2024-01-01"), link("B", "C", "2024-01-02")];
		for entry in build_ledger(&r, &links).entries {
			assert!(r.member_accounts.contains(&entry.source_id));
			assert!(r.member_accounts.contains(&entry.target_id));
		}
	}

	#[test]
	fn unparseable_timestamp_is_counted_not_fatal() {
		let r = ring("R1", &["A", "B"]);
		let links = vec![
			link("A", "B", "not a date"),
			link("B", "A", "2024-02-02T08:30:00Z"),
		];
		let ledger = build_ledger(&r, &links);
		assert_eq!(ledger.entries.len(), 1);
		assert_eq!(ledger.entries[0].source_id, "B");
		assert_eq!(ledger.skipped_timestamps, 1);
	}

	#[test]
	fn ring_without_internal_transactions_yields_empty_ledger() {
		let r = ring("R1", &["A", "B"]);
		let links = vec![link("A", "C", "2024-01-01")];
		let ledger = build_ledger(&r, &links);
		assert!(ledger.entries.is_empty());
		assert_eq!(ledger.total_amount(), 0.0);
	}

	#[test]
	fn accepts_the_three_feed_timestamp_shapes() {
		assert!(parse_instant("2024-03-05T12:30:00Z").is_some());
		assert!(parse_instant("2024-03-05T12:30:00+02:00").is_some());
		assert!(parse_instant("2024-03-05 12:30:00").is_some());
		assert!(parse_instant("2024-03-05").is_some());
		assert!(parse_instant("05/03/2024").is_none());
		assert!(parse_instant("").is_none());
	}

	#[test]
	fn rfc3339_offsets_order_by_absolute_time() {
		let early = parse_instant("2024-03-05T12:30:00+02:00").unwrap();
		let late = parse_instant("2024-03-05T11:30:00Z").unwrap();
		assert!(early < late);
	}
}
