use leptos::prelude::*;

use crate::model::detection::Ring;
use crate::services::selection::use_selection;

/// Left-hand triage console: every detected ring as a card, filterable
/// by ring id. Card clicks drive ring isolation through the selection
/// controller; the card never filters the graph itself.
#[component]
pub fn TriageList(
	#[prop(into)] rings: Signal<Vec<Ring>>,
	#[prop(into)] on_generate_sar: Callback<Ring>,
) -> impl IntoView {
	let (query, set_query) = signal(String::new());

	let filtered = Memo::new(move |_| {
		let needle = query.with(|q| q.trim().to_lowercase());
		rings
			.get()
			.into_iter()
			.filter(|ring| needle.is_empty() || ring.ring_id.to_lowercase().contains(&needle))
			.collect::<Vec<_>>()
	});

	view! {
		<aside class="triage">
			<div class="triage-head">
				<h2>"Triage console"</h2>
				<input
					type="text"
					placeholder="Filter by ring id..."
					prop:value=query
					on:input=move |ev| set_query.set(event_target_value(&ev))
				/>
			</div>

			<div class="triage-list">
				<Show when=move || filtered.with(Vec::is_empty)>
					<div class="triage-empty">"No threats detected."</div>
				</Show>
				<For
					each=move || filtered.get()
					key=|ring| ring.ring_id.clone()
					children=move |ring| view! { <ThreatCard ring on_generate_sar /> }
				/>
			</div>
		</aside>
	}
}

#[component]
fn ThreatCard(ring: Ring, #[prop(into)] on_generate_sar: Callback<Ring>) -> impl IntoView {
	let selection = use_selection();

	let tier = match ring.risk_score {
		s if s > 80 => "critical",
		s if s > 50 => "high",
		_ => "medium",
	};

	let ring_id = ring.ring_id.clone();
	let selected_id = ring.ring_id.clone();
	let is_selected =
		move || selection.isolated_ring().as_deref() == Some(selected_id.as_str());

	let sar_ring = ring.clone();

	view! {
		<div
			class=format!("threat-card tier-{tier}")
			class:selected=is_selected
			on:click=move |_| selection.select_ring(&ring_id)
		>
			<div class="threat-card-head">
				<span class="ring-id">{ring.ring_id.clone()}</span>
				<span class="risk-tier">{tier.to_uppercase()}</span>
			</div>
			<div class="pattern">"Pattern: " <span>{ring.pattern_type.clone()}</span></div>
			<div class="threat-metrics">
				<div class="metric">
					<div class="metric-label">"Volume"</div>
					<div class="metric-value volume">{format!("${:.0}", ring.total_value)}</div>
				</div>
				<div class="metric">
					<div class="metric-label">"Risk score"</div>
					<div class="metric-value risk">{ring.risk_score}</div>
				</div>
			</div>
			<div class="threat-actions">
				<button
					class="sar-button"
					on:click=move |ev| {
						ev.stop_propagation();
						on_generate_sar.run(sar_ring.clone());
					}
				>
					"AI analysis"
				</button>
			</div>
		</div>
	}
}
