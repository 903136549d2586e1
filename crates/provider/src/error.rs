use thiserror::Error;

/// Errors that can occur while resolving an icon locator.
///
/// Provider failures are local to one resolution attempt; callers convert
/// them into "no icon for this link" rather than propagating further.
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
	/// Network request failed or timed out.
	#[error("network error: {0}")]
	Network(String),
	/// Response status was not a success.
	#[error("unexpected status {status} from {url}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Request URL.
		url: String,
	},
	/// Response body did not match the expected shape.
	#[error("malformed response: {0}")]
	MalformedResponse(String),
	/// Provider responded but knows no icons for the domain.
	#[error("no icons for domain {0}")]
	NoIcons(String),
	/// Self-hosted provider used without a configured base URL.
	#[error("provider {0} requires a base URL")]
	MissingBaseUrl(&'static str),
}
