use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::model::detection::Analysis;

/// Global KPI ribbon with the case-report export action.
#[component]
pub fn Header(#[prop(into)] analysis: Signal<Option<Analysis>>) -> impl IntoView {
	let export = move |_| {
		analysis.with_untracked(|analysis| {
			let Some(analysis) = analysis else {
				return;
			};
			// Everything except the visualization payload goes into the
			// case report.
			let report = serde_json::json!({
				"suspicious_accounts": analysis.accounts,
				"fraud_rings": analysis.rings,
				"summary": analysis.summary,
			});
			match serde_json::to_string_pretty(&report) {
				Ok(json) => {
					let filename = format!("fraud_report_{}.json", js_sys::Date::now() as u64);
					trigger_download(&filename, &json);
				}
				Err(err) => log::error!("report export failed: {err}"),
			}
		});
	};

	view! {
		<header class="app-header">
			<div class="brand">
				<h1>"Money Mule "<span class="accent">"Defense"</span></h1>
				<div class="tagline">"Forensics engine"</div>
			</div>

			<div class="kpis">
				<div class="kpi">
					<div class="kpi-label">"Accounts"</div>
					<div class="kpi-value">
						{move || {
							analysis
								.with(|a| {
									a.as_ref().map(|a| a.summary.total_accounts_analyzed).unwrap_or(0)
								})
								.to_string()
						}}
					</div>
				</div>
				<div class="kpi">
					<div class="kpi-label">"Latency"</div>
					<div class="kpi-value accent">
						{move || {
							analysis
								.with(|a| {
									a.as_ref().map(|a| a.summary.processing_time_seconds).unwrap_or(0.0)
								})
								.to_string() + "s"
						}}
					</div>
				</div>
				<div class="kpi">
					<div class="kpi-label">"Fraud rings"</div>
					<div class="kpi-value alert">
						{move || {
							analysis
								.with(|a| {
									a.as_ref().map(|a| a.summary.fraud_rings_detected).unwrap_or(0)
								})
								.to_string()
						}}
					</div>
				</div>
			</div>

			<button class="export-button" on:click=export>
				"Export JSON"
			</button>
		</header>
	}
}

// Data-URI download, so the export needs no server round trip.
fn trigger_download(filename: &str, json: &str) {
	let href = format!(
		"data:application/json;charset=utf-8,{}",
		String::from(js_sys::encode_uri_component(json))
	);
	let Some(document) = web_sys::window().and_then(|w| w.document()) else {
		return;
	};
	let Ok(anchor) = document.create_element("a") else {
		return;
	};
	let _ = anchor.set_attribute("href", &href);
	let _ = anchor.set_attribute("download", filename);
	if let Some(el) = anchor.dyn_ref::<web_sys::HtmlElement>() {
		el.click();
	}
}
