//! Fetch plumbing for providers that query JSON APIs.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::ProviderError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches a URL and decodes the JSON response body.
pub(crate) async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, ProviderError> {
	let client = Client::new();

	let response = client
		.get(url)
		.timeout(REQUEST_TIMEOUT)
		.send()
		.await
		.map_err(|e| ProviderError::Network(e.to_string()))?;

	if !response.status().is_success() {
		return Err(ProviderError::Status {
			status: response.status().as_u16(),
			url: url.to_owned(),
		});
	}

	response
		.json()
		.await
		.map_err(|e| ProviderError::MalformedResponse(e.to_string()))
}
