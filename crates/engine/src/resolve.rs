use std::sync::Arc;

use regex::Regex;
use tracing::{debug, warn};
use url::Url;

use linkfav_provider::{ProviderRegistry, ProviderSettings};

use crate::icon::{CustomIconSource, Icon};
use crate::settings::{EngineSettings, IconOverride, SettingsError};

/// Which configured provider slot a resolution goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderSlot {
	/// The main provider.
	Primary,
	/// The provider consulted for display fallback.
	Fallback,
}

/// Compiled override table entry.
#[derive(Debug)]
struct OverrideRule {
	pattern: Regex,
	icon: String,
}

fn compile_overrides(overrides: &[IconOverride]) -> Result<Vec<OverrideRule>, SettingsError> {
	overrides
		.iter()
		.map(|o| {
			let pattern = Regex::new(&o.pattern).map_err(|source| SettingsError::Pattern {
				pattern: o.pattern.clone(),
				source,
			})?;
			Ok(OverrideRule {
				pattern,
				icon: o.icon.clone(),
			})
		})
		.collect()
}

/// The ordered icon resolution algorithm.
///
/// First match wins: non-http scheme override, ignore suppression, domain
/// override, provider delegation. Every fallible step is caught locally
/// and converted to an absence; resolution never throws past its own
/// async boundary.
pub struct IconResolver {
	settings: EngineSettings,
	ignored: Vec<Regex>,
	domain_icons: Vec<OverrideRule>,
	scheme_icons: Vec<OverrideRule>,
	registry: Arc<ProviderRegistry>,
	custom: Option<Arc<dyn CustomIconSource>>,
}

impl std::fmt::Debug for IconResolver {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("IconResolver")
			.field("settings", &self.settings)
			.field("ignored", &self.ignored)
			.field("domain_icons", &self.domain_icons)
			.field("scheme_icons", &self.scheme_icons)
			.field("registry", &self.registry)
			.field("custom", &self.custom.as_ref().map(|_| "..."))
			.finish()
	}
}

impl IconResolver {
	/// Compiles settings patterns and builds a resolver.
	pub fn new(
		settings: EngineSettings,
		registry: Arc<ProviderRegistry>,
		custom: Option<Arc<dyn CustomIconSource>>,
	) -> Result<Self, SettingsError> {
		let ignored = settings
			.ignored
			.iter()
			.map(|pattern| {
				Regex::new(pattern).map_err(|source| SettingsError::Pattern {
					pattern: pattern.clone(),
					source,
				})
			})
			.collect::<Result<_, _>>()?;
		let domain_icons = compile_overrides(&settings.domain_icons)?;
		let scheme_icons = compile_overrides(&settings.scheme_icons)?;

		Ok(Self {
			settings,
			ignored,
			domain_icons,
			scheme_icons,
			registry,
			custom,
		})
	}

	/// The settings this resolver was built from.
	pub fn settings(&self) -> &EngineSettings {
		&self.settings
	}

	/// Resolves the icon for a link through one provider slot.
	///
	/// Idempotent for the same URL; `None` is the explicit "no icon"
	/// result.
	pub async fn resolve(&self, url: &Url, slot: ProviderSlot) -> Option<Icon> {
		let scheme = url.scheme();

		// Non-http schemes never fall through to network providers.
		if scheme != "http" && scheme != "https" {
			return self.override_icon(&self.scheme_icons, scheme);
		}

		let host = url.host_str()?;

		// Ignore takes precedence over all lower rules.
		if self.ignored.iter().any(|re| re.is_match(host)) {
			return None;
		}

		if let Some(icon) = self.override_icon(&self.domain_icons, host) {
			return Some(icon);
		}

		let (id, base) = match slot {
			ProviderSlot::Primary => (&self.settings.provider, &self.settings.provider_base),
			ProviderSlot::Fallback => (&self.settings.fallback_provider, &self.settings.fallback_provider_base),
		};
		let Some(provider) = self.registry.get(id) else {
			warn!(provider = %id, "misconfigured provider");
			return None;
		};
		let provider_settings = ProviderSettings {
			base_url: base.clone(),
		};

		match provider.resolve_url(host, &provider_settings).await {
			Ok(locator) => Icon::from_locator(locator),
			Err(err) => {
				debug!(provider = provider.name(), host, %err, "provider lookup failed");
				None
			}
		}
	}

	/// Resolves both configured slots.
	///
	/// Both are always attempted, even when only one ends up displayed;
	/// wasted work is accepted for simplicity.
	pub async fn resolve_pair(&self, url: &Url) -> (Option<Icon>, Option<Icon>) {
		let primary = self.resolve(url, ProviderSlot::Primary).await;
		let fallback = self.resolve(url, ProviderSlot::Fallback).await;
		(primary, fallback)
	}

	/// Looks up the first override rule matching `key`.
	///
	/// The configured value goes through the custom icon source when one
	/// is plugged; otherwise (or when the source cannot resolve it) the
	/// value is used as a literal glyph.
	fn override_icon(&self, rules: &[OverrideRule], key: &str) -> Option<Icon> {
		let rule = rules.iter().find(|rule| rule.pattern.is_match(key))?;
		if let Some(source) = &self.custom
			&& let Some(icon) = source.icon(&rule.icon)
		{
			return Some(icon);
		}
		Some(Icon::Glyph(rule.icon.clone()))
	}
}

/// The hostname a widget is tagged with: the URL host for http links, the
/// scheme otherwise.
pub fn display_host(url: &Url) -> String {
	let scheme = url.scheme();
	if scheme == "http" || scheme == "https" {
		url.host_str().unwrap_or(scheme).to_owned()
	} else {
		scheme.to_owned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fixtures::{CountingProvider, registry_with};

	fn url(s: &str) -> Url {
		Url::parse(s).unwrap()
	}

	fn resolver(settings: EngineSettings, registry: Arc<ProviderRegistry>) -> IconResolver {
		IconResolver::new(settings, registry, None).unwrap()
	}

	#[tokio::test]
	async fn provider_locator_becomes_a_remote_icon() {
		let provider = CountingProvider::returning("https://icons.test/example.com.ico");
		let resolver = resolver(EngineSettings::default(), registry_with("duckduckgo", provider));

		let icon = resolver.resolve(&url("https://example.com"), ProviderSlot::Primary).await;
		assert!(matches!(icon, Some(Icon::Remote(u)) if u == "https://icons.test/example.com.ico"));
	}

	#[tokio::test]
	async fn ignore_wins_over_domain_override() {
		let provider = CountingProvider::returning("https://icons.test/x.ico");
		let mut settings = EngineSettings::default();
		settings.ignored.push("example\\.com".to_owned());
		settings.domain_icons.push(IconOverride {
			pattern: "example\\.com".to_owned(),
			icon: "⭐".to_owned(),
		});
		let counter = provider.calls();
		let resolver = resolver(settings, registry_with("duckduckgo", provider));

		let icon = resolver.resolve(&url("https://example.com"), ProviderSlot::Primary).await;
		assert!(icon.is_none());
		assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn domain_override_bypasses_the_provider() {
		let provider = CountingProvider::returning("https://icons.test/x.ico");
		let counter = provider.calls();
		let mut settings = EngineSettings::default();
		settings.domain_icons.push(IconOverride {
			pattern: "^docs\\.".to_owned(),
			icon: "📘".to_owned(),
		});
		let resolver = resolver(settings, registry_with("duckduckgo", provider));

		let icon = resolver.resolve(&url("https://docs.example.com/page"), ProviderSlot::Primary).await;
		assert!(matches!(icon, Some(Icon::Glyph(g)) if g == "📘"));
		assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn non_http_scheme_uses_scheme_overrides_only() {
		let provider = CountingProvider::returning("https://icons.test/x.ico");
		let counter = provider.calls();
		let mut settings = EngineSettings::default();
		settings.scheme_icons.push(IconOverride {
			pattern: "^mailto$".to_owned(),
			icon: "✉".to_owned(),
		});
		let resolver = resolver(settings, registry_with("duckduckgo", provider));

		let icon = resolver.resolve(&url("mailto:someone@example.com"), ProviderSlot::Primary).await;
		assert!(matches!(icon, Some(Icon::Glyph(g)) if g == "✉"));

		// An unconfigured scheme is an absence, never a provider call.
		let icon = resolver.resolve(&url("ftp://example.com/file"), ProviderSlot::Primary).await;
		assert!(icon.is_none());
		assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn custom_source_resolves_override_shortcodes() {
		struct Source;
		impl CustomIconSource for Source {
			fn icon(&self, shortcode: &str) -> Option<Icon> {
				(shortcode == "book").then(|| Icon::Glyph("📖".to_owned()))
			}
		}

		let mut settings = EngineSettings::default();
		settings.domain_icons.push(IconOverride {
			pattern: "example\\.com".to_owned(),
			icon: "book".to_owned(),
		});
		let registry = registry_with("duckduckgo", CountingProvider::returning(""));
		let resolver = IconResolver::new(settings, registry, Some(Arc::new(Source))).unwrap();

		let icon = resolver.resolve(&url("https://example.com"), ProviderSlot::Primary).await;
		assert!(matches!(icon, Some(Icon::Glyph(g)) if g == "📖"));
	}

	#[tokio::test]
	async fn failing_provider_degrades_to_no_icon() {
		let provider = CountingProvider::failing();
		let resolver = resolver(EngineSettings::default(), registry_with("duckduckgo", provider));

		let icon = resolver.resolve(&url("https://example.com"), ProviderSlot::Primary).await;
		assert!(icon.is_none());
	}

	#[tokio::test]
	async fn unknown_provider_id_degrades_to_no_icon() {
		let mut settings = EngineSettings::default();
		settings.provider = "bing".to_owned();
		let resolver = resolver(settings, Arc::new(ProviderRegistry::new()));

		let icon = resolver.resolve(&url("https://example.com"), ProviderSlot::Primary).await;
		assert!(icon.is_none());
	}

	#[tokio::test]
	async fn both_slots_are_always_attempted() {
		let primary = CountingProvider::failing();
		let fallback = CountingProvider::returning("https://fallback.test/icon.png");
		let primary_calls = primary.calls();
		let fallback_calls = fallback.calls();

		let mut settings = EngineSettings::default();
		settings.provider = "primary".to_owned();
		settings.fallback_provider = "fallback".to_owned();
		let registry = Arc::new(
			ProviderRegistry::new()
				.with_provider("primary", Arc::new(primary))
				.with_provider("fallback", Arc::new(fallback)),
		);
		let resolver = resolver(settings, registry);

		let (icon, fallback_icon) = resolver.resolve_pair(&url("https://example.com")).await;
		assert!(icon.is_none());
		assert!(matches!(fallback_icon, Some(Icon::Remote(_))));
		assert_eq!(primary_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
		assert_eq!(fallback_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
	}

	#[test]
	fn invalid_pattern_is_a_settings_error() {
		let mut settings = EngineSettings::default();
		settings.ignored.push("[unclosed".to_owned());
		let err = IconResolver::new(settings, Arc::new(ProviderRegistry::new()), None).unwrap_err();
		assert!(matches!(err, SettingsError::Pattern { pattern, .. } if pattern == "[unclosed"));
	}

	#[test]
	fn display_host_uses_scheme_for_non_http() {
		assert_eq!(display_host(&url("https://example.com/page")), "example.com");
		assert_eq!(display_host(&url("mailto:a@b.c")), "mailto");
		assert_eq!(display_host(&url("zotero://select/library/items")), "zotero");
	}
}
