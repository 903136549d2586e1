use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use linkfav_primitives::Range;

use crate::debounce::Debouncer;
use crate::deco::{Decoration, DecorationSet};
use crate::host::{DecorationHost, DocumentView};
use crate::scan::NOFAVICON_MARKER;

/// Hides `|nofavicon` suppression markers in live preview.
///
/// A fully independent sibling of [`crate::manager::DecorationManager`]:
/// its own store, its own debouncer, and no coupling to the icon pipeline
/// beyond sharing the debounce interval. Markers under a selection stay
/// visible so the text remains editable in place.
pub struct TextHideManager {
	host: Arc<dyn DecorationHost>,
	debounce: Debouncer<Vec<Range>>,
}

impl TextHideManager {
	/// Creates a manager dispatching into `host`.
	pub fn new(host: Arc<dyn DecorationHost>, interval: Duration) -> Self {
		Self {
			host,
			debounce: Debouncer::new(interval),
		}
	}

	/// Finds marker occurrences in the visible ranges, skipping any whose
	/// text is covered by (or covers) a selection.
	pub fn scan_markers(view: &dyn DocumentView) -> Vec<Range> {
		let selections = view.selection_ranges();
		let mut markers = Vec::new();

		for range in view.visible_ranges() {
			let text = view.slice(range);
			for (start, end) in marker_ranges(&text, NOFAVICON_MARKER) {
				let marker = Range::new(range.from + start, range.from + end);
				let in_selection = selections
					.iter()
					.any(|sel| (sel.from <= marker.from && sel.to >= marker.to) || (sel.from >= marker.from && sel.to <= marker.to));
				if !in_selection {
					markers.push(marker);
				}
			}
		}

		trace!(count = markers.len(), "scanned suppression markers");
		markers
	}

	/// Coalesces rapid rebuild requests; leading-edge like the icon side.
	pub fn schedule_update(self: &Arc<Self>, markers: Vec<Range>) {
		let manager = Arc::clone(self);
		self.debounce.schedule(markers, move |markers| async move {
			manager.update_decorations(markers);
		});
	}

	/// Replaces the store with hide decorations for `markers`.
	///
	/// Same clear-on-empty rule as the icon store: an empty result clears
	/// a non-empty store explicitly and is otherwise a no-op.
	pub(crate) fn update_decorations(&self, markers: Vec<Range>) {
		if markers.is_empty() {
			if self.host.decoration_count() > 0 {
				self.host.dispatch_replace(DecorationSet::none());
			}
			return;
		}

		let decorations = markers.into_iter().map(|m| Decoration::hide(m.from, m.to)).collect();
		self.host.dispatch_replace(DecorationSet::new(decorations));
	}

	/// Cancels any armed debounce.
	pub fn destroy(&self) {
		self.debounce.cancel();
	}
}

/// Character-offset ranges of every `marker` occurrence in `text`.
fn marker_ranges(text: &str, marker: &str) -> Vec<(usize, usize)> {
	let marker_len = marker.chars().count();
	let mut out = Vec::new();
	let mut char_idx = 0;
	let mut last_byte = 0;

	for (byte_idx, _) in text.match_indices(marker) {
		char_idx += text[last_byte..byte_idx].chars().count();
		last_byte = byte_idx;
		out.push((char_idx, char_idx + marker_len));
	}
	out
}
