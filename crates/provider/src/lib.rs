//! Pluggable favicon providers.
//!
//! A provider maps a hostname to an icon locator, possibly via a network
//! request. Every provider is independently fallible: a failed lookup is an
//! error for that call site only, never a reason to take the engine down.

use async_trait::async_trait;

/// Built-in provider implementations.
pub mod builtin;
/// Provider error taxonomy.
pub mod error;
/// Provider id to implementation lookup.
pub mod registry;

mod http;

pub use error::ProviderError;
pub use registry::ProviderRegistry;

/// Per-slot provider configuration.
///
/// Self-hosted providers take their deployment base URL from here; hosted
/// providers ignore it.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
	/// Base URL of a self-hosted deployment, without a trailing slash.
	pub base_url: Option<String>,
}

/// A favicon lookup strategy.
///
/// Implementations resolve a hostname to an icon locator string. Locators
/// are either image URLs or short literal glyphs; empty strings are treated
/// as "no icon" by callers.
#[async_trait]
pub trait IconProvider: Send + Sync {
	/// Human-readable provider name for settings UIs.
	fn name(&self) -> &'static str;

	/// Resolves the icon locator for a hostname.
	async fn resolve_url(&self, host: &str, settings: &ProviderSettings) -> Result<String, ProviderError>;
}
