use std::sync::atomic::{AtomicU64, Ordering};

use crate::icon::{CustomFragment, Icon};
use crate::token::LinkToken;

static NEXT_WIDGET_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique widget identity.
///
/// Two widgets are equal only when they are the same instance; replacing a
/// cache entry always produces a fresh id, so the rendering layer redraws
/// exactly when the underlying icon actually changed and never when
/// decorations are merely remapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(u64);

impl WidgetId {
	fn next() -> Self {
		Self(NEXT_WIDGET_ID.fetch_add(1, Ordering::Relaxed))
	}
}

/// A value-semantics render descriptor.
///
/// Consumed by a rendering adapter; the engine's caching and equality
/// logic never touches a concrete rendering technology.
#[derive(Debug, Clone)]
pub enum RenderNode {
	/// No visual content, but still an anchor future updates can target.
	Empty,
	/// A text glyph.
	Glyph(String),
	/// An image container; when `fallback` is set the adapter composes it
	/// behind the primary so a failed load still shows something.
	Image {
		/// Primary image locator.
		src: String,
		/// Fallback image locator, if any.
		fallback: Option<String>,
		/// Source hostname (or scheme) for styling and debugging.
		host: String,
	},
	/// A custom fragment; one handle copy per occurrence.
	Fragment(CustomFragment),
}

/// The renderable unit for one resolved link value.
///
/// Shared by reference between all tokens with the same value; the widget
/// itself is immutable, occurrence-specific state lives in whatever the
/// rendering adapter materializes from [`IconWidget::render`].
#[derive(Debug)]
pub struct IconWidget {
	id: WidgetId,
	icon: Option<Icon>,
	fallback: Option<Icon>,
	host: String,
	token: LinkToken,
}

impl IconWidget {
	/// Creates a widget for a resolved (possibly absent) icon pair.
	pub fn new(icon: Option<Icon>, fallback: Option<Icon>, host: impl Into<String>, token: LinkToken) -> Self {
		Self {
			id: WidgetId::next(),
			icon,
			fallback,
			host: host.into(),
			token,
		}
	}

	/// Returns the widget identity.
	pub fn id(&self) -> WidgetId {
		self.id
	}

	/// Returns the primary icon.
	pub fn icon(&self) -> Option<&Icon> {
		self.icon.as_ref()
	}

	/// Returns the fallback icon.
	pub fn fallback(&self) -> Option<&Icon> {
		self.fallback.as_ref()
	}

	/// Returns the originating hostname (or scheme for non-http links).
	pub fn host(&self) -> &str {
		&self.host
	}

	/// Returns the token this widget was resolved for.
	pub fn token(&self) -> &LinkToken {
		&self.token
	}

	/// Produces the render descriptor for one occurrence.
	pub fn render(&self) -> RenderNode {
		match &self.icon {
			None => RenderNode::Empty,
			Some(Icon::Fragment(fragment)) => RenderNode::Fragment(fragment.clone()),
			Some(Icon::Glyph(text)) => RenderNode::Glyph(text.clone()),
			Some(Icon::Remote(src)) => {
				let fallback = match &self.fallback {
					Some(Icon::Remote(url)) => Some(url.clone()),
					_ => None,
				};
				RenderNode::Image {
					src: src.clone(),
					fallback,
					host: self.host.clone(),
				}
			}
		}
	}

	/// User interaction on the widget never edits the document.
	pub fn ignore_event(&self) -> bool {
		true
	}
}

impl PartialEq for IconWidget {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for IconWidget {}
