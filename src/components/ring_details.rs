use leptos::prelude::*;

use crate::model::detection::{Analysis, Ring};
use crate::model::ledger::{self, Ledger};
use crate::services::selection::use_selection;

/// Ring detail panel: header metrics plus the chronological ledger of
/// transactions internal to the isolated ring. The ledger recomputes
/// whenever the isolated ring (or the snapshot) changes.
#[component]
pub fn RingDetailsPanel(#[prop(into)] analysis: Signal<Option<Analysis>>) -> impl IntoView {
	let selection = use_selection();

	let detail = Memo::new(move |_| {
		let ring_id = selection.isolated_ring()?;
		analysis.with(|analysis| {
			let analysis = analysis.as_ref()?;
			let ring = analysis.rings.iter().find(|r| r.ring_id == ring_id)?.clone();
			let ledger = ledger::build_ledger(&ring, analysis.graph.links());
			Some((ring, ledger))
		})
	});

	view! { {move || detail.get().map(|(ring, ledger)| ring_panel(ring, ledger))} }
}

fn ring_panel(ring: Ring, ledger: Ledger) -> impl IntoView {
	let selection = use_selection();
	let close_id = ring.ring_id.clone();
	let critical = ring.risk_score > 80;

	view! {
		<aside class="ring-details">
			<div class="ring-details-head">
				<div>
					<h2>{ring.ring_id.clone()}</h2>
					<div class="badges">
						<span class="badge pattern-badge">{ring.pattern_type.clone()}</span>
						<span class="badge risk-badge" class:critical=critical>
							{format!("Risk {}", ring.risk_score)}
						</span>
					</div>
				</div>
				// Same toggle-off transition as clicking the card again.
				<button class="close" on:click=move |_| selection.select_ring(&close_id)>
					"\u{00D7}"
				</button>
			</div>

			<div class="ring-volume">
				<span class="section-label">"Total illicit volume"</span>
				<span class="volume-value">{format!("${:.0}", ring.total_value)}</span>
			</div>

			{(ledger.skipped_timestamps > 0)
				.then(|| {
					view! {
						<div class="ledger-warning">
							{format!(
								"{} transaction(s) excluded: unparseable timestamps",
								ledger.skipped_timestamps,
							)}
						</div>
					}
				})}

			<div class="ledger">
				{if ledger.entries.is_empty() {
					view! {
						<div class="ledger-empty">
							"No internal transactions found within ring subset."
						</div>
					}
						.into_any()
				} else {
					view! {
						<div class="ledger-entries">
							{ledger
								.entries
								.into_iter()
								.map(|entry| {
									view! {
										<div class="ledger-entry">
											<div class="entry-time">{entry.timestamp.clone()}</div>
											<div class="entry-flow">
												<span class="entry-source">{entry.source_id.clone()}</span>
												<span class="entry-arrow">"\u{2192}"</span>
												<span class="entry-target">{entry.target_id.clone()}</span>
											</div>
											<div class="entry-amount">{format!("${:.0}", entry.amount)}</div>
										</div>
									}
								})
								.collect_view()}
						</div>
					}
						.into_any()
				}}
			</div>
		</aside>
	}
}
