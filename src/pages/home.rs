use leptos::prelude::*;

use crate::components::force_graph::ForceGraphCanvas;
use crate::components::{
	Header, InspectorPanel, RingDetailsPanel, SarPanel, TriageList, UploadScreen,
};
use crate::model::detection::{Analysis, Ring};
use crate::services::selection::use_selection;

/// Entry page: the upload screen until a snapshot loads cleanly, the
/// triage workspace afterwards.
#[component]
pub fn Home() -> impl IntoView {
	let analysis = RwSignal::new(None::<Analysis>);
	let sar_ring = RwSignal::new(None::<Ring>);
	let selection = use_selection();

	let on_loaded = Callback::new(move |loaded: Analysis| {
		// A fresh snapshot always starts from the overview.
		selection.reset();
		sar_ring.set(None);
		analysis.set(Some(loaded));
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<Show
				when=move || analysis.with(Option::is_some)
				fallback=move || view! { <UploadScreen on_loaded /> }
			>
				<Workspace analysis sar_ring />
			</Show>
		</ErrorBoundary>
	}
}

#[component]
fn Workspace(analysis: RwSignal<Option<Analysis>>, sar_ring: RwSignal<Option<Ring>>) -> impl IntoView {
	let graph = Signal::derive(move || {
		analysis.with(|a| a.as_ref().map(|a| a.graph.clone()).unwrap_or_default())
	});
	let rings = Signal::derive(move || {
		analysis.with(|a| a.as_ref().map(|a| a.rings.clone()).unwrap_or_default())
	});
	let on_generate_sar = Callback::new(move |ring: Ring| sar_ring.set(Some(ring)));

	view! {
		<div class="app-shell">
			<Header analysis />

			<div class="workspace">
				<TriageList rings on_generate_sar />

				<main class="canvas-pane">
					<ForceGraphCanvas graph />
				</main>

				<RingDetailsPanel analysis />
				<InspectorPanel graph />
				<SarPanel ring=sar_ring />
			</div>
		</div>
	}
}
