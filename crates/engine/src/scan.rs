use tracing::trace;

use linkfav_primitives::Range;

use crate::host::DocumentView;
use crate::settings::{EngineSettings, IconPosition};
use crate::token::{LinkToken, find_matching_symbol};

/// Marker suppressing the icon for a single aliased link.
pub const NOFAVICON_MARKER: &str = "|nofavicon";

/// Scans the visible ranges for link tokens.
///
/// Walks the host's parse tree inside every visible range, keeping
/// URL-class nodes whose text contains a scheme separator. Bare links are
/// anchored at the token itself; aliased `[alias](url)` links are anchored
/// at the opening bracket of the alias, found by balanced-bracket scanning
/// on the line. Synchronous and I/O-free: safe to run inside a
/// document-change notification.
pub fn scan_visible(view: &dyn DocumentView, settings: &EngineSettings) -> Vec<LinkToken> {
	let mut tokens = Vec::new();

	for range in view.visible_ranges() {
		view.tokens_in(range, &mut |node| {
			if !node.has_class("url") {
				return;
			}

			let raw = view.slice(Range::new(node.from, node.to));
			let value: String = raw.chars().filter(|c| !matches!(c, '<' | '>')).collect();
			if !value.contains(':') {
				return;
			}

			// A url token directly preceded by `(` is the target half of an
			// aliased `[alias](url)` link.
			let aliased = node.from > 0 && view.slice(Range::new(node.from - 1, node.from)) == "(";

			if !aliased {
				if !settings.show_bare {
					return;
				}
				tokens.push(match settings.icon_position {
					IconPosition::Front => LinkToken::new(node.from, node.to, value),
					IconPosition::Back => LinkToken::new(node.to, node.to, value),
				});
				return;
			}

			if !settings.show_aliased {
				return;
			}

			let line = view.line_at(node.from);
			let close_limit = node.to.saturating_sub(line.from);
			let Some(open) = find_matching_symbol(&line.text, close_limit, '[', ']') else {
				trace!(from = node.from, "dropping aliased link without matching bracket");
				return;
			};

			let anchor = line.from + open;
			let full_text = view.slice(Range::new(anchor, node.to));
			if full_text.contains(NOFAVICON_MARKER) {
				return;
			}

			tokens.push(match settings.icon_position {
				IconPosition::Front => LinkToken::new(anchor, node.to, value),
				IconPosition::Back => LinkToken::new(node.to, node.to, value),
			});
		});
	}

	trace!(count = tokens.len(), "scanned visible ranges");
	tokens
}
