use leptos::prelude::*;

use crate::model::detection::{Ring, SarReport};
use crate::services::api;
use crate::services::config::use_api_config;

/// Overlay consuming the report service: requests a narrative for the
/// chosen ring and renders the returned shape. A response that arrives
/// after the analyst has moved on to another ring (or closed the
/// panel) is dropped.
#[component]
pub fn SarPanel(ring: RwSignal<Option<Ring>>) -> impl IntoView {
	let cfg = use_api_config();
	let (report, set_report) = signal(None::<SarReport>);
	let (error, set_error) = signal(None::<String>);
	let (loading, set_loading) = signal(false);

	Effect::new(move |_| {
		let Some(target) = ring.get() else {
			set_report.set(None);
			set_error.set(None);
			return;
		};
		set_loading.set(true);
		set_error.set(None);
		set_report.set(None);

		let requested_for = target.ring_id.clone();
		api::generate_sar(&cfg, &target, move |result| {
			let still_current =
				ring.with_untracked(|r| r.as_ref().map(|r| r.ring_id.clone())) == Some(requested_for);
			if !still_current {
				return;
			}
			set_loading.set(false);
			match result {
				Ok(sar) => set_report.set(Some(sar)),
				Err(err) => set_error.set(Some(format!("AI synthesis failed: {err}"))),
			}
		});
	});

	view! {
		{move || {
			ring.get()
				.map(|target| {
					view! {
						<div class="sar-backdrop" on:click=move |_| ring.set(None)></div>
						<aside class="sar-panel">
							<div class="sar-head">
								<div>
									<h2>"AI-synthesized SAR"</h2>
									<div class="case-id">{format!("Case id: {}", target.ring_id)}</div>
								</div>
								<button class="close" on:click=move |_| ring.set(None)>
									"\u{00D7}"
								</button>
							</div>

							<div class="sar-body">
								<Show when=move || loading.get()>
									<div class="sar-loading">"Synthesizing network topography..."</div>
								</Show>

								{move || {
									error
										.get()
										.map(|message| view! { <div class="sar-error">{message}</div> })
								}}

								{move || {
									report
										.get()
										.map(|sar| {
											view! {
												<section>
													<h3>"Executive summary"</h3>
													<p class="summary-text">{sar.executive_summary.clone()}</p>
												</section>
												<section class="herder">
													<h3>"Network centrality analysis"</h3>
													<div class="herder-id">{sar.mule_herder.to_string()}</div>
													<div class="herder-note">
														"Likely mule herder / controller (highest degree centrality)"
													</div>
												</section>
											}
										})
								}}

								<section class="sar-metrics">
									<div>
										<div class="section-label">"Total illicit volume"</div>
										<div class="volume-value">{format!("${:.2}", target.total_value)}</div>
									</div>
									<div>
										<div class="section-label">"Risk severity"</div>
										<div class="risk-value">{format!("{}/100", target.risk_score)}</div>
									</div>
								</section>
							</div>
						</aside>
					}
				})
		}}
	}
}
