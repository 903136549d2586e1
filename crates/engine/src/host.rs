use linkfav_primitives::{CharIdx, Range};

use crate::deco::DecorationSet;

/// A tagged node from the host's parse tree.
///
/// `classes` is the host's whitespace-separated token-class list; the
/// scanner treats a node as a link candidate when it carries the `url`
/// class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxToken {
	/// Node start.
	pub from: CharIdx,
	/// Node end (exclusive).
	pub to: CharIdx,
	/// Whitespace-separated class list.
	pub classes: String,
}

impl SyntaxToken {
	/// Returns true if the class list contains `class`.
	pub fn has_class(&self, class: &str) -> bool {
		self.classes.split_whitespace().any(|c| c == class)
	}
}

/// One line of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineInfo {
	/// Position of the first character of the line.
	pub from: CharIdx,
	/// Position past the last character (excluding the line break).
	pub to: CharIdx,
	/// Line text without the line break.
	pub text: String,
}

/// Change notification delivered by the host on every view update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewUpdate {
	/// The document text changed.
	pub doc_changed: bool,
	/// The set of visible ranges changed.
	pub viewport_changed: bool,
	/// The view switched between live-preview and source mode.
	pub mode_changed: bool,
	/// The selection changed.
	pub selection_changed: bool,
}

/// Read access to the host's document, parse tree, and view state.
///
/// All methods are synchronous and cheap; the engine calls them from
/// inside change notifications and must never block there.
pub trait DocumentView {
	/// Currently visible character ranges, disjoint and in order.
	fn visible_ranges(&self) -> Vec<Range>;

	/// Walks parse-tree nodes intersecting `range` in traversal order.
	fn tokens_in(&self, range: Range, f: &mut dyn FnMut(&SyntaxToken));

	/// Returns the document text in `range`.
	fn slice(&self, range: Range) -> String;

	/// Returns the line containing `pos`.
	fn line_at(&self, pos: CharIdx) -> LineInfo;

	/// Current selection ranges.
	fn selection_ranges(&self) -> Vec<Range>;

	/// Returns true when the view renders in live-preview mode.
	fn is_live_preview(&self) -> bool;
}

/// The host-owned stateful decoration store, seen from the engine.
///
/// Each store holds one kind of decoration for one view; replacement is
/// atomic and the host remaps held positions through every document
/// change (see [`crate::deco::DecorationField`] for the engine-provided
/// implementation).
pub trait DecorationHost: Send + Sync {
	/// Number of decorations currently held.
	fn decoration_count(&self) -> usize;

	/// Atomically replaces the held decoration set and triggers a
	/// re-render.
	fn dispatch_replace(&self, decorations: DecorationSet);
}
