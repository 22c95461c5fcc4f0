//! Service endpoint configuration.

use leptos::prelude::*;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Where the detection/report services live. Resolved once at startup
/// from a `<meta name="detection-endpoint" content="...">` tag so a
/// deployment can point the bundle elsewhere without rebuilding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
	pub base_url: String,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_owned(),
		}
	}
}

impl ApiConfig {
	/// Read the endpoint override from the document, falling back to
	/// the default.
	pub fn from_document() -> Self {
		let tag = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| {
				d.query_selector("meta[name='detection-endpoint']")
					.ok()
					.flatten()
			})
			.and_then(|m| m.get_attribute("content"))
			.map(|url| url.trim_end_matches('/').to_owned())
			.filter(|url| !url.is_empty());

		match tag {
			Some(base_url) => {
				log::info!("detection endpoint override: {base_url}");
				Self { base_url }
			}
			None => Self::default(),
		}
	}

	pub fn analyze_url(&self) -> String {
		format!("{}/analyze", self.base_url)
	}

	pub fn sar_url(&self) -> String {
		format!("{}/generate-sar", self.base_url)
	}
}

pub fn provide_api_config() {
	provide_context(ApiConfig::from_document());
}

pub fn use_api_config() -> ApiConfig {
	expect_context::<ApiConfig>()
}
