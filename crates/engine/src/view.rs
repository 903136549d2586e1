use std::sync::Arc;

use crate::host::{DocumentView, ViewUpdate};
use crate::manager::DecorationManager;
use crate::scan::scan_visible;
use crate::text_hide::TextHideManager;

/// Wires one live editor view to its decoration pipelines.
///
/// Owns the icon manager and the marker-hiding manager for the view and
/// translates host change notifications into scans. Scanning is
/// synchronous; everything downstream of [`DecorationManager`] is
/// debounced and asynchronous.
pub struct ViewBinding {
	icons: Arc<DecorationManager>,
	text_hide: Arc<TextHideManager>,
}

impl ViewBinding {
	/// Creates a binding over both managers.
	pub fn new(icons: Arc<DecorationManager>, text_hide: Arc<TextHideManager>) -> Self {
		Self { icons, text_hide }
	}

	/// Builds decorations for a freshly opened view.
	pub fn init(&self, view: &dyn DocumentView) {
		self.build_icon_decorations(view);
		self.build_text_decorations(view);
	}

	/// Reacts to a host change notification.
	pub fn handle_update(&self, view: &dyn DocumentView, update: ViewUpdate) {
		if update.doc_changed || update.viewport_changed || update.mode_changed {
			self.build_icon_decorations(view);
		}
		if update.doc_changed || update.viewport_changed || update.selection_changed || update.mode_changed {
			self.build_text_decorations(view);
		}
	}

	/// Scans for link tokens and schedules an icon update.
	///
	/// A disabled mode schedules an empty token list so stale decorations
	/// clear through the normal update path instead of lingering.
	fn build_icon_decorations(&self, view: &dyn DocumentView) {
		let settings = self.icons.settings();
		let enabled = if view.is_live_preview() {
			settings.enable_live_preview
		} else {
			settings.enable_source
		};

		let tokens = if enabled { scan_visible(view, settings) } else { Vec::new() };
		self.icons.schedule_update(tokens);
	}

	/// Scans for suppression markers and schedules a hide update.
	///
	/// Markers are only hidden in live preview; source mode schedules an
	/// empty list to clear.
	fn build_text_decorations(&self, view: &dyn DocumentView) {
		let markers = if view.is_live_preview() {
			TextHideManager::scan_markers(view)
		} else {
			Vec::new()
		};
		self.text_hide.schedule_update(markers);
	}

	/// Tears down both pipelines when the view closes.
	pub fn destroy(&self) {
		self.icons.destroy();
		self.text_hide.destroy();
	}
}
