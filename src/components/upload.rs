use leptos::prelude::*;
use web_sys::HtmlInputElement;

use crate::model::detection::Analysis;
use crate::services::api;
use crate::services::config::use_api_config;

/// Landing screen: pick a CSV transaction log and submit it to the
/// detection service. Fatal load errors (transport, shape, integrity)
/// surface here and block entry to the workspace until a clean
/// re-upload succeeds.
#[component]
pub fn UploadScreen(#[prop(into)] on_loaded: Callback<Analysis>) -> impl IntoView {
	let cfg = use_api_config();
	let input_ref = NodeRef::<leptos::html::Input>::new();
	let (file_name, set_file_name) = signal(None::<String>);
	let (loading, set_loading) = signal(false);
	let (error, set_error) = signal(None::<String>);

	let on_change = move |_| {
		let name = input_ref.get_untracked().and_then(|input| {
			let input: HtmlInputElement = input.into();
			input.files().and_then(|files| files.get(0)).map(|f| f.name())
		});
		set_error.set(None);
		set_file_name.set(name);
	};

	let analyze = move |_| {
		let Some(input) = input_ref.get_untracked() else {
			return;
		};
		let input: HtmlInputElement = input.into();
		let Some(file) = input.files().and_then(|files| files.get(0)) else {
			return;
		};
		set_loading.set(true);
		set_error.set(None);

		let cfg = cfg.clone();
		wasm_bindgen_futures::spawn_local(async move {
			match read_file_bytes(&file).await {
				Ok(bytes) => {
					api::analyze(&cfg, bytes, move |result| {
						set_loading.set(false);
						match result {
							Ok(analysis) => on_loaded.run(analysis),
							Err(err) => set_error.set(Some(err.to_string())),
						}
					});
				}
				Err(err) => {
					set_loading.set(false);
					set_error.set(Some(err));
				}
			}
		});
	};

	view! {
		<div class="upload-screen">
			<div class="upload-card">
				<h1>"Money Mule "<span class="accent">"Defense"</span></h1>
				<p class="upload-hint">
					"Upload your transaction log (CSV) to initiate the forensic graph analysis engine."
				</p>

				<label class="file-picker">
					<input
						node_ref=input_ref
						type="file"
						accept=".csv"
						on:change=on_change
					/>
					<span class:selected=move || file_name.with(Option::is_some)>
						{move || file_name.get().unwrap_or_else(|| "Select dataset".into())}
					</span>
				</label>

				<button
					class="analyze-button"
					prop:disabled=move || loading.get() || file_name.with(Option::is_none)
					on:click=analyze
				>
					{move || if loading.get() { "Processing chain..." } else { "Initiate scan" }}
				</button>

				{move || {
					error
						.get()
						.map(|message| view! { <div class="upload-error">{message}</div> })
				}}
			</div>
		</div>
	}
}

async fn read_file_bytes(file: &web_sys::File) -> Result<Vec<u8>, String> {
	let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
		.await
		.map_err(|_| "could not read the selected file".to_owned())?;
	Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
