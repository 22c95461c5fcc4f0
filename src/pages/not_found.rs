use leptos::prelude::*;

/// 404 - Not Found page.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"404"</h1>
			<p>"Page not found."</p>
		</div>
	}
}
