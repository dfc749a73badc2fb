//! The floating toolbar shared by every editor on a page.
//!
//! One `ToolbarController` exists per page and is handed to each editor
//! session as a `SharedToolbar`. Whichever session showed it last owns it.
//!
//! Visibility is a three-phase machine: `Hidden`, `Visible` and
//! `PendingHide`. `hide` drops the `active` class immediately and queues the
//! real hide; the queued hide only fires if nothing re-showed the toolbar in
//! the meantime.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

use crate::format::{FormatSet, FormatTag, compute_active_formats};
use crate::geometry::{Geometry, Point, place_above};
use crate::menu::{Submenu, ToolbarButton};
use crate::platform::ToolbarSurface;
use crate::scheduler::TaskQueue;
use crate::selection::SelectionStore;
use crate::transform;

/// Identifies an editor session on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EditorId(pub u32);

/// Visibility phase of the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolbarPhase {
    #[default]
    Hidden,
    Visible,
    /// Marked inactive, actual hide queued.
    PendingHide,
}

/// What the toolbar currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolbarState {
    pub visible: bool,
    pub position: Point,
    pub active_formats: FormatSet,
    pub open_submenu: Option<Submenu>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolbarTask {
    Hide,
}

/// Toolbar shared between sessions.
pub type SharedToolbar<S, Snap> = Rc<RefCell<ToolbarController<S, Snap>>>;

/// Owns the toolbar lifecycle and keeps its button state in step with the
/// selection.
///
/// `Snap` is the host's selection snapshot type, held while a submenu is
/// open so a later choice can act on the selection the user made.
#[derive(Debug)]
pub struct ToolbarController<S, Snap> {
    surface: S,
    phase: ToolbarPhase,
    owner: Option<EditorId>,
    state: ToolbarState,
    submenu_snapshot: Option<Snap>,
    hide_debounce: Duration,
    tasks: TaskQueue<ToolbarTask>,
}

impl<S: ToolbarSurface, Snap: Clone> ToolbarController<S, Snap> {
    pub fn new(surface: S, hide_debounce: Duration) -> Self {
        Self {
            surface,
            phase: ToolbarPhase::Hidden,
            owner: None,
            state: ToolbarState::default(),
            submenu_snapshot: None,
            hide_debounce,
            tasks: TaskQueue::new(),
        }
    }

    pub fn shared(self) -> SharedToolbar<S, Snap> {
        Rc::new(RefCell::new(self))
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn phase(&self) -> ToolbarPhase {
        self.phase
    }

    /// Visible and not on its way out.
    pub fn is_active(&self) -> bool {
        self.phase == ToolbarPhase::Visible
    }

    pub fn state(&self) -> &ToolbarState {
        &self.state
    }

    /// Session that showed the toolbar last.
    pub fn owner(&self) -> Option<EditorId> {
        self.owner
    }

    pub fn is_format_active(&self, format: FormatTag) -> bool {
        self.state.active_formats.contains(format)
    }

    /// Show the toolbar for `owner`'s current selection.
    ///
    /// Rebuilds the buttons, refreshes their highlight state and places the
    /// toolbar centered above the selection. The `jump` class (no slide-in)
    /// is only set when the toolbar was not already active.
    pub fn show<H>(&mut self, owner: EditorId, host: &H, buttons: &[ToolbarButton])
    where
        H: SelectionStore + Geometry,
    {
        let first_show = !self.is_active();

        if let Err(e) = self.surface.prepare() {
            tracing::warn!(target: "notebook::toolbar", error = %e, "failed to prepare toolbar");
            return;
        }
        if let Err(e) = self.surface.render_buttons(buttons) {
            tracing::warn!(target: "notebook::toolbar", error = %e, "failed to render toolbar");
            return;
        }

        self.tasks.cancel_where(|t| *t == ToolbarTask::Hide);
        self.owner = Some(owner);
        self.state.open_submenu = None;
        self.submenu_snapshot = None;
        self.surface.set_visible(true);
        self.state.visible = true;
        self.update_state(host);

        self.surface.set_class("jump", first_show);
        self.update_position(host);
        self.surface.set_class("active", true);
        self.phase = ToolbarPhase::Visible;

        tracing::debug!(
            target: "notebook::toolbar",
            owner = owner.0,
            first_show,
            "toolbar shown"
        );
    }

    fn update_position<H: Geometry>(&mut self, host: &H) {
        let Some(bounds) = host.selection_bounds() else {
            tracing::debug!(target: "notebook::toolbar", "no selection bounds, keeping position");
            return;
        };
        let position = place_above(bounds, self.surface.size(), host.scroll_top());
        transform::translate(&mut self.surface, position.x, position.y);
        self.state.position = position;
    }

    /// Start hiding. A no-op unless the toolbar is active.
    pub fn hide(&mut self, now: Instant) {
        if self.phase != ToolbarPhase::Visible {
            return;
        }
        self.surface.set_class("active", false);
        self.phase = ToolbarPhase::PendingHide;
        self.tasks.schedule(now, self.hide_debounce, ToolbarTask::Hide);
    }

    /// Hide immediately, skipping the debounce.
    pub fn hide_now(&mut self) {
        self.tasks.clear();
        self.surface.set_class("active", false);
        self.surface.hide_panels();
        self.surface.set_visible(false);
        self.phase = ToolbarPhase::Hidden;
        self.state.visible = false;
        self.state.open_submenu = None;
        self.submenu_snapshot = None;
    }

    /// Run queued transitions that are due at `now`.
    pub fn tick(&mut self, now: Instant) {
        for task in self.tasks.pop_due(now) {
            match task {
                ToolbarTask::Hide if self.phase == ToolbarPhase::PendingHide => {
                    self.hide_now();
                    tracing::debug!(target: "notebook::toolbar", "toolbar hidden");
                }
                ToolbarTask::Hide => {}
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.next_deadline()
    }

    /// Re-derive button highlights from the selection.
    ///
    /// Must run after every command, not only on show.
    pub fn update_state<T: SelectionStore>(&mut self, host: &T) {
        self.surface.clear_active_buttons();
        let focus = host.focus_node();
        let formats = compute_active_formats(host, focus.as_ref());
        for format in formats.iter() {
            self.surface.set_button_active(format.button_class(), true);
        }
        self.state.active_formats = formats;
    }

    /// Open `submenu`, closing any other, and hold `snapshot` for the choice
    /// that follows.
    pub fn open_submenu(&mut self, submenu: Submenu, snapshot: Option<Snap>) {
        self.surface.hide_panels();
        self.surface.show_panel(submenu);
        self.state.open_submenu = Some(submenu);
        self.submenu_snapshot = snapshot;
    }

    pub fn open_submenu_kind(&self) -> Option<Submenu> {
        self.state.open_submenu
    }

    /// Snapshot held by the open submenu.
    pub fn submenu_snapshot(&self) -> Option<&Snap> {
        self.submenu_snapshot.as_ref()
    }

    /// Close every submenu, dropping any held snapshot.
    pub fn close_submenus(&mut self) {
        self.take_submenu();
    }

    /// Close the open submenu and hand back its snapshot.
    pub fn take_submenu(&mut self) -> Option<(Submenu, Option<Snap>)> {
        self.surface.hide_panels();
        let submenu = self.state.open_submenu.take()?;
        Some((submenu, self.submenu_snapshot.take()))
    }

    pub fn set_link_input(&mut self, text: &str) {
        self.surface.set_link_input(text);
    }

    /// Forget `owner`, hiding the toolbar if it owned it.
    pub fn release(&mut self, owner: EditorId) {
        if self.owner == Some(owner) {
            self.hide_now();
            self.owner = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotebookOptions;
    use crate::geometry::{Rect, Size};
    use crate::memory::{MemoryDocument, MemoryToolbar, NodeId};
    use crate::menu::build_buttons;
    use crate::selection::{Boundary, SelectionSnapshot};
    use crate::transform::{Translation, translation};
    use crate::tree::DocumentTree;

    type Controller = ToolbarController<MemoryToolbar, SelectionSnapshot<NodeId>>;

    const ED: EditorId = EditorId(1);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn controller() -> Controller {
        ToolbarController::new(MemoryToolbar::new(Size::new(200.0, 40.0)), ms(500))
    }

    /// Editor with `<p><b>bold</b> plain</p>`, the bold text selected.
    fn bold_selection() -> MemoryDocument {
        let mut doc = MemoryDocument::new();
        let editor = doc.append_element(&doc.root(), "div");
        let p = doc.append_element(&editor, "p");
        let b = doc.append_element(&p, "b");
        let text = doc.append_text(&b, "bold");
        doc.append_text(&p, " plain");
        doc.select_text(&text);
        doc.set_selection_rect(Some(Rect::new(300.0, 120.0, 100.0, 20.0)));
        doc
    }

    fn buttons() -> Vec<ToolbarButton> {
        build_buttons(&NotebookOptions::default())
    }

    #[test]
    fn test_show_renders_and_highlights() {
        let doc = bold_selection();
        let mut toolbar = controller();
        toolbar.show(ED, &doc, &buttons());

        assert!(toolbar.is_active());
        assert_eq!(toolbar.owner(), Some(ED));
        let surface = toolbar.surface();
        assert!(surface.is_visible());
        assert!(surface.has_class("active"));
        assert_eq!(surface.buttons().len(), buttons().len());
        assert!(surface.is_button_active("bold"));
        assert!(!surface.is_button_active("italic"));
        assert!(toolbar.is_format_active(FormatTag::Bold));
    }

    #[test]
    fn test_show_positions_above_selection() {
        let mut doc = bold_selection();
        doc.set_scroll_top(50.0);
        let mut toolbar = controller();
        toolbar.show(ED, &doc, &buttons());

        // center 350 - 100; 120 - 40 - 8 + 50
        assert_eq!(toolbar.state().position, Point::new(250.0, 122.0));
        assert_eq!(
            translation(toolbar.surface()),
            Translation { x: 250, y: 122 }
        );
    }

    #[test]
    fn test_jump_only_on_first_show() {
        let doc = bold_selection();
        let mut toolbar = controller();

        toolbar.show(ED, &doc, &buttons());
        assert!(toolbar.surface().has_class("jump"));

        toolbar.show(ED, &doc, &buttons());
        assert!(!toolbar.surface().has_class("jump"));
    }

    #[test]
    fn test_hide_then_show_within_debounce_stays_visible() {
        let doc = bold_selection();
        let mut toolbar = controller();
        let t0 = Instant::now();

        toolbar.show(ED, &doc, &buttons());
        toolbar.hide(t0);
        assert_eq!(toolbar.phase(), ToolbarPhase::PendingHide);
        assert!(!toolbar.surface().has_class("active"));

        toolbar.show(ED, &doc, &buttons());
        toolbar.tick(t0 + ms(600));

        assert!(toolbar.is_active());
        assert!(toolbar.surface().is_visible());
        assert_eq!(toolbar.next_deadline(), None);
    }

    #[test]
    fn test_hide_fires_after_debounce() {
        let doc = bold_selection();
        let mut toolbar = controller();
        let t0 = Instant::now();

        toolbar.show(ED, &doc, &buttons());
        toolbar.hide(t0);
        toolbar.tick(t0 + ms(499));
        assert!(toolbar.surface().is_visible());

        toolbar.tick(t0 + ms(500));
        assert_eq!(toolbar.phase(), ToolbarPhase::Hidden);
        assert!(!toolbar.surface().is_visible());
    }

    #[test]
    fn test_hide_when_inactive_is_noop() {
        let mut toolbar = controller();
        toolbar.hide(Instant::now());
        assert_eq!(toolbar.phase(), ToolbarPhase::Hidden);
        assert_eq!(toolbar.next_deadline(), None);
    }

    #[test]
    fn test_reshow_after_pending_hide_jumps() {
        let doc = bold_selection();
        let mut toolbar = controller();
        toolbar.show(ED, &doc, &buttons());
        toolbar.hide(Instant::now());
        toolbar.show(ED, &doc, &buttons());
        assert!(toolbar.surface().has_class("jump"));
    }

    #[test]
    fn test_update_state_tracks_selection() {
        let mut doc = bold_selection();
        let mut toolbar = controller();
        toolbar.show(ED, &doc, &buttons());
        assert!(toolbar.surface().is_button_active("bold"));

        // Move the selection into the plain text.
        let p = doc.parent(&doc.focus_node().unwrap()).and_then(|b| doc.parent(&b)).unwrap();
        let plain = doc.last_child(&p).unwrap();
        doc.select(Boundary::new(plain, 0), Boundary::new(plain, 3));
        toolbar.update_state(&doc);

        assert!(toolbar.surface().active_buttons().is_empty());
        assert!(toolbar.state().active_formats.is_empty());
    }

    #[test]
    fn test_submenu_holds_snapshot_once() {
        let doc = bold_selection();
        let mut toolbar = controller();
        toolbar.show(ED, &doc, &buttons());

        toolbar.open_submenu(Submenu::Font, doc.save());
        assert_eq!(toolbar.surface().open_panel(), Some(Submenu::Font));
        assert_eq!(toolbar.open_submenu_kind(), Some(Submenu::Font));

        let (submenu, snapshot) = toolbar.take_submenu().unwrap();
        assert_eq!(submenu, Submenu::Font);
        assert_eq!(snapshot, doc.save());
        assert!(toolbar.take_submenu().is_none());
        assert_eq!(toolbar.surface().open_panel(), None);
    }

    #[test]
    fn test_opening_submenu_closes_previous() {
        let doc = bold_selection();
        let mut toolbar = controller();
        toolbar.show(ED, &doc, &buttons());
        toolbar.open_submenu(Submenu::Size, None);
        toolbar.open_submenu(Submenu::Link, doc.save());
        assert_eq!(toolbar.surface().open_panel(), Some(Submenu::Link));
        assert!(toolbar.submenu_snapshot().is_some());
    }

    #[test]
    fn test_last_show_wins_and_release() {
        let doc = bold_selection();
        let mut toolbar = controller();
        let other = EditorId(2);

        toolbar.show(ED, &doc, &buttons());
        toolbar.show(other, &doc, &buttons());
        assert_eq!(toolbar.owner(), Some(other));

        toolbar.release(ED);
        assert!(toolbar.is_active());

        toolbar.release(other);
        assert_eq!(toolbar.phase(), ToolbarPhase::Hidden);
        assert_eq!(toolbar.owner(), None);
    }
}
