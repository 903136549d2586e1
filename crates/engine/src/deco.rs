use std::sync::Arc;

use parking_lot::Mutex;

use linkfav_primitives::{Bias, ChangeSet, CharIdx};

use crate::host::DecorationHost;
use crate::widget::IconWidget;

/// What a decoration renders as.
#[derive(Debug, Clone)]
pub enum DecorationKind {
	/// An icon widget anchored at a point.
	Icon(Arc<IconWidget>),
	/// A replaced (hidden) text range.
	HideText,
}

/// A positioned visual annotation on the live document view.
#[derive(Debug, Clone)]
pub struct Decoration {
	/// Anchor position.
	pub from: CharIdx,
	/// End position; equal to `from` for point decorations.
	pub to: CharIdx,
	/// Decoration payload.
	pub kind: DecorationKind,
}

impl Decoration {
	/// Creates a point decoration carrying an icon widget.
	pub fn widget(pos: CharIdx, widget: Arc<IconWidget>) -> Self {
		Self {
			from: pos,
			to: pos,
			kind: DecorationKind::Icon(widget),
		}
	}

	/// Creates a range decoration hiding `[from, to)`.
	pub fn hide(from: CharIdx, to: CharIdx) -> Self {
		debug_assert!(from <= to, "hide range start {from} must be <= end {to}");
		Self {
			from,
			to,
			kind: DecorationKind::HideText,
		}
	}
}

/// A position-ordered decoration collection.
///
/// Duplicate anchors are permitted; ordering is by `from` with insertion
/// order preserved among equals.
#[derive(Debug, Clone, Default)]
pub struct DecorationSet {
	items: Vec<Decoration>,
}

impl DecorationSet {
	/// The empty set.
	pub fn none() -> Self {
		Self::default()
	}

	/// Builds a set from decorations in any order.
	pub fn new(mut items: Vec<Decoration>) -> Self {
		items.sort_by_key(|deco| deco.from);
		Self { items }
	}

	/// Returns the number of decorations.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Returns true if the set holds no decorations.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Iterates decorations in position order.
	pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
		self.items.iter()
	}

	/// Re-anchors every decoration through a document change.
	///
	/// Left bias: an insertion exactly at an anchor leaves the decoration
	/// before the inserted text. Ranges whose ends cross inside a deletion
	/// collapse to empty rather than invert.
	pub fn map(&self, changes: &ChangeSet) -> Self {
		let items = self
			.items
			.iter()
			.map(|deco| {
				let from = changes.map_pos(deco.from, Bias::Left);
				let to = changes.map_pos(deco.to, Bias::Left).max(from);
				Decoration {
					from,
					to,
					kind: deco.kind.clone(),
				}
			})
			.collect();
		Self { items }
	}
}

/// The stateful decoration store backing one view.
///
/// Created empty, remapped through every document change, and replaced
/// wholesale on each accepted update; torn down by dropping the whole
/// field. Stores of unrelated decoration kinds are separate fields, never
/// interleaved.
#[derive(Debug, Default)]
pub struct DecorationField {
	set: DecorationSet,
	version: u64,
}

impl DecorationField {
	/// Creates an empty field.
	pub fn new() -> Self {
		Self::default()
	}

	/// Remaps held decorations through a document change.
	///
	/// Must run for every change before new decorations are combined in,
	/// or positions silently desync from the text they annotate.
	pub fn apply_change(&mut self, changes: &ChangeSet) {
		self.set = self.set.map(changes);
		self.version += 1;
	}

	/// Atomically replaces the held set.
	pub fn replace(&mut self, set: DecorationSet) {
		self.set = set;
		self.version += 1;
	}

	/// The current decoration set.
	pub fn decorations(&self) -> &DecorationSet {
		&self.set
	}

	/// Number of held decorations.
	pub fn len(&self) -> usize {
		self.set.len()
	}

	/// Returns true if the field holds no decorations.
	pub fn is_empty(&self) -> bool {
		self.set.is_empty()
	}

	/// Monotonic state version, bumped on every remap or replace.
	pub fn version(&self) -> u64 {
		self.version
	}
}

/// A shareable [`DecorationField`] implementing [`DecorationHost`].
///
/// For hosts (and tests) that want the engine-owned store directly rather
/// than routing replacements into their own state layer.
#[derive(Debug, Clone, Default)]
pub struct SharedDecorationField {
	inner: Arc<Mutex<DecorationField>>,
}

impl SharedDecorationField {
	/// Creates an empty shared field.
	pub fn new() -> Self {
		Self::default()
	}

	/// Remaps held decorations through a document change.
	pub fn apply_change(&self, changes: &ChangeSet) {
		self.inner.lock().apply_change(changes);
	}

	/// Clones the current decoration set out of the field.
	pub fn snapshot(&self) -> DecorationSet {
		self.inner.lock().decorations().clone()
	}

	/// Current state version.
	pub fn version(&self) -> u64 {
		self.inner.lock().version()
	}
}

impl DecorationHost for SharedDecorationField {
	fn decoration_count(&self) -> usize {
		self.inner.lock().len()
	}

	fn dispatch_replace(&self, decorations: DecorationSet) {
		self.inner.lock().replace(decorations);
	}
}
