//! Platform abstraction traits for editor operations.
//!
//! These traits define the interface between the formatting engine and the
//! platform hosting the live document. The browser implementation lives in
//! `notebook-editor-browser`; `crate::memory` provides an in-memory one.

use crate::error::PlatformError;
use crate::geometry::{Geometry, Size};
use crate::menu::{Submenu, ToolbarButton};
use crate::selection::SelectionStore;
use crate::transform::TransformTarget;

/// The rich-text mutation primitive.
///
/// Applies a named command (`bold`, `createLink`, `ForeColor`, ...) with an
/// optional string value to the current platform selection. Assumed to be
/// synchronous and always available.
pub trait CommandTarget {
    fn apply_command(&mut self, name: &str, value: &str);
}

/// Intermediate plain-text area that pasted content is redirected into.
pub trait PasteArea {
    /// Move focus into the capture area so the next paste lands there.
    fn focus_capture_area(&mut self);

    /// Take whatever text the capture area received and empty it.
    fn take_captured_text(&mut self) -> Option<String>;
}

/// Everything an editor session needs from its platform.
pub trait EditorHost: SelectionStore + CommandTarget + Geometry + PasteArea {}

impl<T> EditorHost for T where T: SelectionStore + CommandTarget + Geometry + PasteArea {}

/// Rendering side of the shared toolbar.
///
/// The toolbar controller decides what the toolbar shows; implementations only
/// draw it.
pub trait ToolbarSurface: TransformTarget {
    /// Build the toolbar element if it does not exist yet, otherwise empty it
    /// for reuse.
    fn prepare(&mut self) -> Result<(), PlatformError>;

    /// Render one button per entry, in order, followed by the submenu panels.
    fn render_buttons(&mut self, buttons: &[ToolbarButton]) -> Result<(), PlatformError>;

    fn set_visible(&mut self, visible: bool);

    /// Toggle a class on the toolbar element itself (`active`, `jump`).
    fn set_class(&mut self, class: &str, on: bool);

    /// Toggle the highlight on the button with the given class.
    fn set_button_active(&mut self, class: &str, active: bool);

    fn clear_active_buttons(&mut self);

    /// Rendered size of the toolbar.
    fn size(&self) -> Size;

    fn show_panel(&mut self, submenu: Submenu);

    fn hide_panels(&mut self);

    fn set_link_input(&mut self, text: &str);
}
