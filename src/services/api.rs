//! Clients for the two external collaborators: the detection engine
//! (`/analyze`) and the report synthesizer (`/generate-sar`).
//!
//! Both are fire-and-forget fetches whose callbacks land back on the
//! single UI thread; all payload validation happens in `model`.

use crate::model::detection::{Analysis, AnalysisResponse, Ring, SarReport};
use crate::model::error::LoadError;

use super::config::ApiConfig;

/// Submit a raw CSV transaction log for analysis. `on_done` receives
/// either a fully validated snapshot or the error to show on the
/// upload screen.
pub fn analyze(
	cfg: &ApiConfig,
	csv: Vec<u8>,
	on_done: impl FnOnce(Result<Analysis, LoadError>) + Send + 'static,
) {
	let url = cfg.analyze_url();
	log::info!("submitting {} byte dataset to {url}", csv.len());

	let mut request = ehttp::Request::post(url, csv);
	request.headers.insert("Content-Type", "text/csv");

	ehttp::fetch(request, move |result| {
		let outcome = result
			.map_err(LoadError::Http)
			.and_then(decode_json::<AnalysisResponse>)
			.and_then(|response| response.into_analysis().map_err(LoadError::from));
		if let Err(err) = &outcome {
			log::error!("analysis failed: {err}");
		}
		on_done(outcome);
	});
}

/// Ask the report service for a narrative covering `ring`.
pub fn generate_sar(
	cfg: &ApiConfig,
	ring: &Ring,
	on_done: impl FnOnce(Result<SarReport, LoadError>) + Send + 'static,
) {
	let url = cfg.sar_url();
	let body = match serde_json::to_vec(ring) {
		Ok(body) => body,
		Err(err) => {
			on_done(Err(LoadError::Decode(err.to_string())));
			return;
		}
	};

	let mut request = ehttp::Request::post(url, body);
	request.headers.insert("Content-Type", "application/json");

	ehttp::fetch(request, move |result| {
		let outcome = result.map_err(LoadError::Http).and_then(decode_json);
		if let Err(err) = &outcome {
			log::error!("report synthesis failed: {err}");
		}
		on_done(outcome);
	});
}

fn decode_json<T: serde::de::DeserializeOwned>(response: ehttp::Response) -> Result<T, LoadError> {
	if !response.ok {
		return Err(LoadError::Http(format!(
			"{} {}",
			response.status, response.status_text
		)));
	}
	serde_json::from_slice(&response.bytes).map_err(|err| LoadError::Decode(err.to_string()))
}
