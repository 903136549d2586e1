//! The built-in provider set.
//!
//! Four providers are pure URL templates: the icon locator is derived from
//! the hostname without any I/O. The remaining two query a JSON API and
//! extract the first advertised icon from the response.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderError;
use crate::http::get_json;
use crate::{IconProvider, ProviderSettings};

/// Google's shared favicon service.
pub struct Google;

#[async_trait]
impl IconProvider for Google {
	fn name(&self) -> &'static str {
		"Google"
	}

	async fn resolve_url(&self, host: &str, _settings: &ProviderSettings) -> Result<String, ProviderError> {
		Ok(format!("https://www.google.com/s2/favicons?domain={host}"))
	}
}

/// DuckDuckGo's icon mirror.
pub struct DuckDuckGo;

#[async_trait]
impl IconProvider for DuckDuckGo {
	fn name(&self) -> &'static str {
		"DuckDuckGo"
	}

	async fn resolve_url(&self, host: &str, _settings: &ProviderSettings) -> Result<String, ProviderError> {
		Ok(format!("https://icons.duckduckgo.com/ip3/{host}.ico"))
	}
}

/// icon.horse hosted service.
pub struct IconHorse;

#[async_trait]
impl IconProvider for IconHorse {
	fn name(&self) -> &'static str {
		"Icon Horse"
	}

	async fn resolve_url(&self, host: &str, _settings: &ProviderSettings) -> Result<String, ProviderError> {
		Ok(format!("https://icon.horse/icon/{host}"))
	}
}

/// Splitbee's favicon proxy.
pub struct Splitbee;

#[async_trait]
impl IconProvider for Splitbee {
	fn name(&self) -> &'static str {
		"Splitbee"
	}

	async fn resolve_url(&self, host: &str, _settings: &ProviderSettings) -> Result<String, ProviderError> {
		Ok(format!("https://favicon.splitbee.io/?url={host}"))
	}
}

#[derive(Debug, Deserialize)]
pub(crate) struct BesticonResponse {
	icons: Vec<BesticonIcon>,
}

#[derive(Debug, Deserialize)]
struct BesticonIcon {
	url: String,
}

/// Picks the first icon URL out of a besticon `allicons` response.
pub(crate) fn first_besticon_url(response: BesticonResponse, host: &str) -> Result<String, ProviderError> {
	response
		.icons
		.into_iter()
		.next()
		.map(|icon| icon.url)
		.ok_or_else(|| ProviderError::NoIcons(host.to_owned()))
}

/// Self-hosted besticon deployment ("The Favicon Finder").
///
/// The only provider that needs configuration: the deployment base URL
/// comes from the per-slot settings.
pub struct Besticon;

#[async_trait]
impl IconProvider for Besticon {
	fn name(&self) -> &'static str {
		"The Favicon Finder"
	}

	async fn resolve_url(&self, host: &str, settings: &ProviderSettings) -> Result<String, ProviderError> {
		let base = settings
			.base_url
			.as_deref()
			.filter(|base| !base.is_empty())
			.ok_or(ProviderError::MissingBaseUrl("besticon"))?;

		let response: BesticonResponse = get_json(&format!("{base}/allicons.json?url={host}")).await?;
		first_besticon_url(response, host)
	}
}

#[derive(Debug, Deserialize)]
pub(crate) struct GrabberResponse {
	icons: Vec<GrabberIcon>,
}

#[derive(Debug, Deserialize)]
struct GrabberIcon {
	src: String,
}

/// Picks the first icon source out of a favicongrabber response.
pub(crate) fn first_grabber_url(response: GrabberResponse, host: &str) -> Result<String, ProviderError> {
	response
		.icons
		.into_iter()
		.next()
		.map(|icon| icon.src)
		.ok_or_else(|| ProviderError::NoIcons(host.to_owned()))
}

/// favicongrabber.com hosted API.
pub struct FaviconGrabber;

#[async_trait]
impl IconProvider for FaviconGrabber {
	fn name(&self) -> &'static str {
		"Favicon Grabber"
	}

	async fn resolve_url(&self, host: &str, _settings: &ProviderSettings) -> Result<String, ProviderError> {
		let response: GrabberResponse = get_json(&format!("https://favicongrabber.com/api/grab/{host}")).await?;
		debug!(host, icons = response.icons.len(), "favicongrabber response");
		first_grabber_url(response, host)
	}
}
