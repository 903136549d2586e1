use std::any::Any;
use std::sync::Arc;

/// An opaque renderable fragment supplied by a custom icon source.
///
/// The engine never inspects the payload; it copies the handle per
/// occurrence and leaves materialization to the rendering adapter, which
/// downcasts to whatever node type the host uses.
#[derive(Clone)]
pub struct CustomFragment {
	payload: Arc<dyn Any + Send + Sync>,
}

impl CustomFragment {
	/// Wraps a host-specific payload.
	pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
		Self {
			payload: Arc::new(payload),
		}
	}

	/// Downcasts the payload to a concrete type.
	pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
		self.payload.downcast_ref()
	}
}

impl std::fmt::Debug for CustomFragment {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("CustomFragment(..)")
	}
}

/// A resolved icon payload.
///
/// Absence is modeled as `Option<Icon>`: `None` means "no decoration
/// shown" everywhere in the engine.
#[derive(Debug, Clone)]
pub enum Icon {
	/// A short literal glyph rendered as text.
	Glyph(String),
	/// A remote image locator.
	Remote(String),
	/// A pre-built fragment from a custom icon source.
	Fragment(CustomFragment),
}

impl Icon {
	/// Classifies a provider locator string.
	///
	/// Empty locators are absences; locators that are not network URLs are
	/// literal glyphs.
	pub fn from_locator(locator: String) -> Option<Self> {
		if locator.is_empty() {
			None
		} else if locator.starts_with("http") {
			Some(Self::Remote(locator))
		} else {
			Some(Self::Glyph(locator))
		}
	}
}

/// Pluggable source turning configured override shortcodes into icons.
///
/// An unavailable or failing source yields `None`, which degrades to "no
/// icon" for scheme overrides and to the literal-glyph fallback for domain
/// overrides.
pub trait CustomIconSource: Send + Sync {
	/// Resolves a shortcode to an icon.
	fn icon(&self, shortcode: &str) -> Option<Icon>;
}
