use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::debug;
use url::Url;

use crate::debounce::Debouncer;
use crate::deco::{Decoration, DecorationSet};
use crate::host::DecorationHost;
use crate::resolve::{IconResolver, display_host};
use crate::settings::EngineSettings;
use crate::token::LinkToken;
use crate::widget::IconWidget;

/// Decoration cache and debounced update pipeline for one view's icon
/// store.
///
/// Widgets are memoized per distinct link value for the life of the view:
/// two tokens sharing a value share the exact same widget instance, and a
/// failed resolution is cached as an empty widget rather than retried.
/// The cache is mutated only by this view's own resolution path, so a
/// mutex (never held across an await) is all the guarding it needs.
pub struct DecorationManager {
	resolver: Arc<IconResolver>,
	host: Arc<dyn DecorationHost>,
	cache: Mutex<FxHashMap<String, Arc<IconWidget>>>,
	debounce: Debouncer<Vec<LinkToken>>,
	generation: AtomicU64,
}

impl DecorationManager {
	/// Creates a manager dispatching into `host`.
	pub fn new(resolver: Arc<IconResolver>, host: Arc<dyn DecorationHost>) -> Self {
		let interval = resolver.settings().debounce();
		Self {
			resolver,
			host,
			cache: Mutex::new(FxHashMap::default()),
			debounce: Debouncer::new(interval),
			generation: AtomicU64::new(0),
		}
	}

	/// The settings the manager's resolver was built from.
	pub fn settings(&self) -> &EngineSettings {
		self.resolver.settings()
	}

	/// Coalesces rapid rebuild requests into one update.
	///
	/// Leading-edge: a burst of calls inside the debounce interval runs
	/// the update once, with the first call's tokens.
	pub fn schedule_update(self: &Arc<Self>, tokens: Vec<LinkToken>) {
		let manager = Arc::clone(self);
		self.debounce.schedule(tokens, move |tokens| async move {
			manager.update_decorations(tokens).await;
		});
	}

	/// Resolves tokens into a decoration set.
	///
	/// Cache misses resolve both provider slots and store the widget keyed
	/// by the token value before use; tokens whose value fails URL parsing
	/// are skipped and never cached. Returns `None` when nothing resolves
	/// to a decoration.
	pub async fn compute_decorations(&self, tokens: &[LinkToken]) -> Option<DecorationSet> {
		let mut decorations = Vec::new();

		for token in tokens {
			let cached = self.cache.lock().get(&token.value).cloned();
			let widget = match cached {
				Some(widget) => widget,
				None => {
					let url = match Url::parse(&token.value) {
						Ok(url) => url,
						Err(err) => {
							debug!(value = %token.value, %err, "invalid url");
							continue;
						}
					};

					let (icon, fallback) = self.resolver.resolve_pair(&url).await;
					let widget = Arc::new(IconWidget::new(icon, fallback, display_host(&url), token.clone()));
					Arc::clone(
						self.cache
							.lock()
							.entry(token.value.clone())
							.or_insert(widget),
					)
				}
			};
			decorations.push(Decoration::widget(token.from, widget));
		}

		if decorations.is_empty() {
			None
		} else {
			Some(DecorationSet::new(decorations))
		}
	}

	/// Computes decorations and dispatches the replacement.
	///
	/// Claims a generation before resolving; if a later update claims the
	/// counter while this one is suspended on resolution, the stale result
	/// is discarded instead of overwriting the newer state. An empty
	/// result clears a non-empty store explicitly and is otherwise a
	/// no-op.
	pub(crate) async fn update_decorations(&self, tokens: Vec<LinkToken>) {
		let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
		let computed = self.compute_decorations(&tokens).await;
		if self.generation.load(Ordering::Acquire) != generation {
			debug!(generation, "discarding superseded decoration update");
			return;
		}

		match computed {
			Some(decorations) => self.host.dispatch_replace(decorations),
			None if self.host.decoration_count() > 0 => self.host.dispatch_replace(DecorationSet::none()),
			None => {}
		}
	}

	/// Tears the manager down: cancels any armed debounce, invalidates the
	/// cache wholesale, and supersedes in-flight updates.
	pub fn destroy(&self) {
		self.debounce.cancel();
		self.generation.fetch_add(1, Ordering::AcqRel);
		self.cache.lock().clear();
	}

	/// Number of cached link values.
	pub fn cache_len(&self) -> usize {
		self.cache.lock().len()
	}
}
