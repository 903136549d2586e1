//! Shared test doubles: a fake host view over plain text, mock providers,
//! and a decoration host that records every dispatched replacement.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use regex::Regex;
use tokio::sync::Semaphore;

use linkfav_primitives::{CharIdx, Range};
use linkfav_provider::{IconProvider, ProviderError, ProviderRegistry, ProviderSettings};

use crate::deco::{DecorationField, DecorationSet};
use crate::host::{DecorationHost, DocumentView, LineInfo, SyntaxToken};

/// A scriptable [`DocumentView`] over a plain string.
///
/// `markdown` runs a tiny link tokenizer so end-to-end tests can start
/// from realistic source lines; everything is ASCII so byte offsets from
/// the tokenizer regexes equal character offsets.
pub(crate) struct FakeView {
	pub text: String,
	pub tokens: Vec<SyntaxToken>,
	pub visible: Vec<Range>,
	pub selections: Vec<Range>,
	pub live_preview: bool,
}

impl FakeView {
	pub fn markdown(text: &str) -> Self {
		let tokens = tokenize_links(text);
		let len = text.chars().count();
		Self {
			text: text.to_owned(),
			tokens,
			visible: vec![Range::new(0, len)],
			selections: Vec::new(),
			live_preview: true,
		}
	}
}

/// Tags link targets the way a markdown parser would: aliased `](url)`
/// targets, `<url>` autolinks (brackets included in the node), and bare
/// `scheme://` runs, all carrying the `url` class.
fn tokenize_links(text: &str) -> Vec<SyntaxToken> {
	let aliased = Regex::new(r"\]\(([^()\s]+)\)").unwrap();
	let angle = Regex::new(r"<[A-Za-z][A-Za-z0-9+.-]*:[^>\s]*>").unwrap();
	let bare = Regex::new(r"(?:^|\s)([A-Za-z][A-Za-z0-9+.-]*://[^\s<>()\[\]]+)").unwrap();

	let mut tokens = Vec::new();
	for captures in aliased.captures_iter(text) {
		let m = captures.get(1).unwrap();
		tokens.push(SyntaxToken {
			from: m.start(),
			to: m.end(),
			classes: "url string".to_owned(),
		});
	}
	for m in angle.find_iter(text) {
		tokens.push(SyntaxToken {
			from: m.start(),
			to: m.end(),
			classes: "url".to_owned(),
		});
	}
	for captures in bare.captures_iter(text) {
		let m = captures.get(1).unwrap();
		tokens.push(SyntaxToken {
			from: m.start(),
			to: m.end(),
			classes: "url".to_owned(),
		});
	}
	tokens.sort_by_key(|t| t.from);
	tokens
}

impl DocumentView for FakeView {
	fn visible_ranges(&self) -> Vec<Range> {
		self.visible.clone()
	}

	fn tokens_in(&self, range: Range, f: &mut dyn FnMut(&SyntaxToken)) {
		for token in &self.tokens {
			if token.from < range.to && token.to > range.from {
				f(token);
			}
		}
	}

	fn slice(&self, range: Range) -> String {
		self.text.chars().skip(range.from).take(range.len()).collect()
	}

	fn line_at(&self, pos: CharIdx) -> LineInfo {
		let mut from = 0;
		for line in self.text.split('\n') {
			let len = line.chars().count();
			if pos <= from + len {
				return LineInfo {
					from,
					to: from + len,
					text: line.to_owned(),
				};
			}
			from += len + 1;
		}
		let len = self.text.chars().count();
		LineInfo {
			from: len,
			to: len,
			text: String::new(),
		}
	}

	fn selection_ranges(&self) -> Vec<Range> {
		self.selections.clone()
	}

	fn is_live_preview(&self) -> bool {
		self.live_preview
	}
}

/// Provider double that counts calls and returns a fixed locator or a
/// fixed failure.
pub(crate) struct CountingProvider {
	locator: Option<String>,
	calls: Arc<AtomicUsize>,
}

impl CountingProvider {
	pub fn returning(locator: &str) -> Self {
		Self {
			locator: Some(locator.to_owned()),
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	pub fn failing() -> Self {
		Self {
			locator: None,
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	pub fn calls(&self) -> Arc<AtomicUsize> {
		Arc::clone(&self.calls)
	}
}

#[async_trait]
impl IconProvider for CountingProvider {
	fn name(&self) -> &'static str {
		"Counting"
	}

	async fn resolve_url(&self, host: &str, _settings: &ProviderSettings) -> Result<String, ProviderError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		match &self.locator {
			Some(locator) => Ok(locator.clone()),
			None => Err(ProviderError::NoIcons(host.to_owned())),
		}
	}
}

/// Provider double that parks every call until its gate opens.
pub(crate) struct GatedProvider {
	locator: String,
	gate: Arc<Semaphore>,
}

/// Handle releasing a [`GatedProvider`]'s parked calls.
pub(crate) struct Gate(Arc<Semaphore>);

impl Gate {
	pub fn open(&self) {
		self.0.add_permits(64);
	}
}

impl GatedProvider {
	pub fn new(locator: &str) -> Self {
		Self {
			locator: locator.to_owned(),
			gate: Arc::new(Semaphore::new(0)),
		}
	}

	pub fn gate(&self) -> Gate {
		Gate(Arc::clone(&self.gate))
	}
}

#[async_trait]
impl IconProvider for GatedProvider {
	fn name(&self) -> &'static str {
		"Gated"
	}

	async fn resolve_url(&self, _host: &str, _settings: &ProviderSettings) -> Result<String, ProviderError> {
		let permit = self.gate.acquire().await.expect("gate closed");
		permit.forget();
		Ok(self.locator.clone())
	}
}

/// Builds a registry serving `provider` from `id` and from the default
/// fallback slot id, so `resolve_pair` exercises both slots against the
/// same double.
pub(crate) fn registry_with<P: IconProvider + 'static>(id: &'static str, provider: P) -> Arc<ProviderRegistry> {
	let provider: Arc<dyn IconProvider> = Arc::new(provider);
	Arc::new(
		ProviderRegistry::new()
			.with_provider(id, Arc::clone(&provider))
			.with_provider("google", provider),
	)
}

/// Decoration host that records every dispatched replacement on top of a
/// live [`DecorationField`].
#[derive(Default)]
pub(crate) struct RecordingHost {
	field: Mutex<DecorationField>,
	replaces: Mutex<Vec<DecorationSet>>,
}

impl RecordingHost {
	pub fn replaces(&self) -> Vec<DecorationSet> {
		self.replaces.lock().clone()
	}
}

impl DecorationHost for RecordingHost {
	fn decoration_count(&self) -> usize {
		self.field.lock().len()
	}

	fn dispatch_replace(&self, decorations: DecorationSet) {
		self.replaces.lock().push(decorations.clone());
		self.field.lock().replace(decorations);
	}
}
