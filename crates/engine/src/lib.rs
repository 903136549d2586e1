//! Incremental link-favicon decoration engine.
//!
//! Scans visible editor content for external-link tokens, resolves each to
//! an icon (custom override, ignore suppression, or a pluggable provider
//! lookup, possibly over the network), and applies the result back onto the
//! live editing surface: debounced against edit bursts, cached per link
//! value, and remapped across concurrent document changes.
//!
//! The host editing environment (text buffer, syntax tree, decoration
//! state) stays behind the traits in [`host`]; the engine itself performs
//! no I/O on the synchronous scan path and degrades every resolution
//! failure to "no icon for this link".

/// Stateful decoration collections and position remapping.
pub mod deco;
/// Host editing environment seams.
pub mod host;
/// Resolved icon payloads and custom icon sources.
pub mod icon;
/// Decoration cache, async resolution, and debounced updates.
pub mod manager;
/// The ordered icon resolution algorithm.
pub mod resolve;
/// Link token scanning over visible ranges.
pub mod scan;
/// Engine settings.
pub mod settings;
/// Marker-hiding decorations (independent of the icon store).
pub mod text_hide;
/// Link token types and bracket matching.
pub mod token;
/// View lifecycle binding.
pub mod view;
/// Renderable icon widgets.
pub mod widget;

mod debounce;

#[cfg(test)]
mod fixtures;

pub use deco::{Decoration, DecorationField, DecorationKind, DecorationSet, SharedDecorationField};
pub use host::{DecorationHost, DocumentView, LineInfo, SyntaxToken, ViewUpdate};
pub use icon::{CustomFragment, CustomIconSource, Icon};
pub use manager::DecorationManager;
pub use resolve::{IconResolver, ProviderSlot};
pub use scan::{NOFAVICON_MARKER, scan_visible};
pub use settings::{EngineSettings, IconOverride, IconPosition, SettingsError};
pub use text_hide::TextHideManager;
pub use token::{LinkToken, find_matching_symbol};
pub use view::ViewBinding;
pub use widget::{IconWidget, RenderNode, WidgetId};
