use leptos::prelude::*;

use crate::model::graph::{AccountNode, GraphModel};
use crate::services::selection::use_selection;

/// Right-hand context panel for the inspected account. Mounted only
/// while a node is under inspection; closing it is a plain
/// `clear_node` transition.
#[component]
pub fn InspectorPanel(#[prop(into)] graph: Signal<GraphModel>) -> impl IntoView {
	let selection = use_selection();

	let inspected = Memo::new(move |_| {
		selection
			.inspected_node()
			.and_then(|id| graph.with(|g| g.node(&id).cloned()))
	});

	view! { {move || inspected.get().map(|account| account_panel(account))} }
}

fn account_panel(account: AccountNode) -> impl IntoView {
	let selection = use_selection();
	let score = account.suspicion_score;

	let patterns: Vec<_> = account.patterns.iter().cloned().collect();
	let rings: Vec<_> = account.ring_ids.iter().cloned().collect();

	view! {
		<aside class="inspector">
			<div class="inspector-head">
				<span
					class="status-dot"
					class:hot={score > 50}
					style=format!("background: {}", account.render_color())
				></span>
				<h2>{account.id.clone()}</h2>
				<button class="close" on:click=move |_| selection.clear_node()>
					"\u{00D7}"
				</button>
			</div>

			<div class="inspector-body">
				<section>
					<div class="section-label">"Suspicion score"</div>
					<div class="score-value">{score} <span>"/ 100"</span></div>
					<div class="score-meter">
						<div
							class="score-fill"
							class:hot={score > 80}
							style=format!("width: {score}%")
						></div>
					</div>
				</section>

				<section>
					<div class="section-label">"Detected patterns"</div>
					{if patterns.is_empty() {
						view! { <div class="muted">"No specific patterns flagged directly."</div> }
							.into_any()
					} else {
						view! {
							<div class="pattern-chips">
								{patterns
									.into_iter()
									.map(|p| view! { <span class="chip">{p}</span> })
									.collect_view()}
							</div>
						}
							.into_any()
					}}
				</section>

				{(!rings.is_empty())
					.then(|| {
						view! {
							<section>
								<div class="section-label">"Ring membership"</div>
								<div class="ring-list">
									{rings
										.into_iter()
										.map(|r| view! { <div class="ring-entry">{r}</div> })
										.collect_view()}
								</div>
							</section>
						}
					})}

				<section class="flows">
					<div>
						<div class="section-label">"Inflow"</div>
						<div class="flow-value">{format!("${:.0}", account.inflow)}</div>
					</div>
					<div>
						<div class="section-label">"Outflow"</div>
						<div class="flow-value">{format!("${:.0}", account.outflow)}</div>
					</div>
				</section>
			</div>
		</aside>
	}
}
