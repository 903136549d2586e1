use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which side of a link the icon is inserted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconPosition {
	/// Before the link (bare links) or its opening bracket (aliased links).
	Front,
	/// After the link text.
	Back,
}

/// A user-configured icon exception.
///
/// `pattern` is a regex matched against the hostname (domain overrides) or
/// the URI scheme (scheme overrides); `icon` is a shortcode handed to the
/// custom icon source, or a literal glyph when no source is plugged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconOverride {
	/// Hostname or scheme pattern.
	pub pattern: String,
	/// Shortcode or literal glyph.
	pub icon: String,
}

/// Engine settings, owned by the host and read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
	/// Primary provider id.
	pub provider: String,
	/// Provider consulted alongside the primary for display fallback.
	pub fallback_provider: String,
	/// Base URL for a self-hosted primary provider.
	pub provider_base: Option<String>,
	/// Base URL for a self-hosted fallback provider.
	pub fallback_provider_base: Option<String>,
	/// Hostname patterns that never get icons.
	pub ignored: Vec<String>,
	/// Per-domain icon overrides.
	pub domain_icons: Vec<IconOverride>,
	/// Per-scheme icon overrides for non-http links.
	pub scheme_icons: Vec<IconOverride>,
	/// Show icons on `[alias](url)` links.
	pub show_aliased: bool,
	/// Show icons on bare `scheme://...` links.
	pub show_bare: bool,
	/// Decorate in source mode.
	pub enable_source: bool,
	/// Decorate in live-preview mode.
	pub enable_live_preview: bool,
	/// Debounce interval for decoration rebuilds, in milliseconds.
	pub debounce_ms: u64,
	/// Icon insertion side.
	pub icon_position: IconPosition,
}

impl Default for EngineSettings {
	fn default() -> Self {
		Self {
			provider: "duckduckgo".to_owned(),
			fallback_provider: "google".to_owned(),
			provider_base: None,
			fallback_provider_base: None,
			ignored: Vec::new(),
			domain_icons: Vec::new(),
			scheme_icons: Vec::new(),
			show_aliased: true,
			show_bare: true,
			enable_source: true,
			enable_live_preview: true,
			debounce_ms: 500,
			icon_position: IconPosition::Front,
		}
	}
}

impl EngineSettings {
	/// Returns the debounce interval as a [`Duration`].
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}
}

/// Settings validation errors.
#[derive(Error, Debug)]
pub enum SettingsError {
	/// An ignore or override pattern failed to compile.
	#[error("invalid pattern {pattern:?}: {source}")]
	Pattern {
		/// The offending pattern text.
		pattern: String,
		/// The underlying regex error.
		#[source]
		source: regex::Error,
	},
}
