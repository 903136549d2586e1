use std::collections::BTreeMap;
use std::sync::Arc;

use crate::IconProvider;
use crate::builtin::{Besticon, DuckDuckGo, FaviconGrabber, Google, IconHorse, Splitbee};

/// Immutable provider id to implementation lookup.
///
/// Built once at startup and shared by reference into every resolution;
/// there is no mutable state to guard. Ids are stable strings used in
/// persisted settings, names are for display.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
	providers: BTreeMap<&'static str, Arc<dyn IconProvider>>,
}

impl ProviderRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a registry holding the built-in provider set.
	pub fn builtin() -> Self {
		Self::new()
			.with_provider("google", Arc::new(Google))
			.with_provider("duckduckgo", Arc::new(DuckDuckGo))
			.with_provider("iconhorse", Arc::new(IconHorse))
			.with_provider("splitbee", Arc::new(Splitbee))
			.with_provider("besticon", Arc::new(Besticon))
			.with_provider("favicongrabber", Arc::new(FaviconGrabber))
	}

	/// Adds or replaces a provider under the given id.
	pub fn with_provider(mut self, id: &'static str, provider: Arc<dyn IconProvider>) -> Self {
		self.providers.insert(id, provider);
		self
	}

	/// Looks up a provider by id.
	pub fn get(&self, id: &str) -> Option<Arc<dyn IconProvider>> {
		self.providers.get(id).cloned()
	}

	/// Iterates over `(id, provider)` pairs in id order.
	pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Arc<dyn IconProvider>)> {
		self.providers.iter().map(|(id, provider)| (*id, provider))
	}

	/// Returns the number of registered providers.
	pub fn len(&self) -> usize {
		self.providers.len()
	}

	/// Returns true if no providers are registered.
	pub fn is_empty(&self) -> bool {
		self.providers.is_empty()
	}
}

impl std::fmt::Debug for ProviderRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.providers.keys()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builtin_set_is_complete() {
		let registry = ProviderRegistry::builtin();
		assert_eq!(registry.len(), 6);
		for id in ["google", "duckduckgo", "iconhorse", "splitbee", "besticon", "favicongrabber"] {
			assert!(registry.get(id).is_some(), "missing builtin provider {id}");
		}
	}

	#[test]
	fn unknown_id_is_none() {
		assert!(ProviderRegistry::builtin().get("bing").is_none());
	}

	#[test]
	fn iteration_yields_display_names() {
		let names: Vec<&str> = ProviderRegistry::builtin().iter().map(|(_, p)| p.name()).collect();
		assert!(names.contains(&"DuckDuckGo"));
		assert!(names.contains(&"The Favicon Finder"));
	}
}
