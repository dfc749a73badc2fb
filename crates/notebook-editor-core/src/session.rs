//! Per-container editor session.
//!
//! An `EditorSession` turns one container into an editor: it owns the
//! interaction cache, routes keyboard, mouse and paste events, keeps the
//! container from degenerating into a state without a block element, and
//! drives the shared toolbar. Deferred work is queued with explicit
//! deadlines; the platform calls `tick` once `next_deadline` has passed.

use web_time::Instant;

use crate::command::{self, LinkOutcome, PanelChoice};
use crate::config::{
    EDITOR_CLASS, EditorMode, MODE_ATTRIBUTE, NotebookOptions, PLACEHOLDER_ATTRIBUTE,
    PLACEHOLDER_CLASS,
};
use crate::error::ConfigError;
use crate::geometry::Point;
use crate::keys::{EventResult, KeyEvent, key_codes};
use crate::menu::{ButtonAction, Submenu, ToolbarButton, build_buttons, font_command};
use crate::platform::{EditorHost, ToolbarSurface};
use crate::scheduler::{TaskQueue, earliest};
use crate::selection::CursorTarget;
use crate::toolbar::{EditorId, SharedToolbar};


/// Deferred session work. Both re-read live state when they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTask {
    /// Show the toolbar if the selection is a non-empty range, hide it
    /// otherwise.
    CheckSelection,
    /// Move captured paste text into the document.
    FlushPaste,
}

/// Transient interaction state, written only by the session's handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionCache<N> {
    /// Primary modifier (Ctrl, or Cmd on macOS) held at the last keydown.
    pub ctrl: bool,
    pub shift: bool,
    pub is_drag_selecting: bool,
    /// Child of the container holding the cursor.
    pub focused_element: Option<N>,
    pub focused_element_index: usize,
    /// Last pointer position over the container, in page coordinates.
    pub pointer: Point,
}

impl<N> Default for InteractionCache<N> {
    fn default() -> Self {
        Self {
            ctrl: false,
            shift: false,
            is_drag_selecting: false,
            focused_element: None,
            focused_element_index: 0,
            pointer: Point::default(),
        }
    }
}

/// Where a page-level mouse-up landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The document itself, outside every element.
    Document,
    /// Inside an editor or the toolbar.
    Notebook,
    /// Anywhere else on the page.
    Outside,
}

pub struct EditorSession<H: EditorHost, S> {
    id: EditorId,
    host: H,
    root: H::Node,
    toolbar: SharedToolbar<S, H::Snapshot>,
    options: NotebookOptions,
    buttons: Vec<ToolbarButton>,
    cache: InteractionCache<H::Node>,
    tasks: TaskQueue<SessionTask>,
    paste_snapshot: Option<H::Snapshot>,
    is_mac: bool,
}

impl<H: EditorHost, S: ToolbarSurface> EditorSession<H, S> {
    /// Take over `root` and prepare it for editing.
    pub fn new(
        id: EditorId,
        host: H,
        root: H::Node,
        toolbar: SharedToolbar<S, H::Snapshot>,
        options: NotebookOptions,
        is_mac: bool,
    ) -> Result<Self, ConfigError> {
        options.validate()?;
        let buttons = build_buttons(&options);
        let mut session = Self {
            id,
            host,
            root,
            toolbar,
            options,
            buttons,
            cache: InteractionCache::default(),
            tasks: TaskQueue::new(),
            paste_snapshot: None,
            is_mac,
        };
        session.init();
        Ok(session)
    }

    fn init(&mut self) {
        let root = self.root.clone();
        self.host
            .set_attribute(&root, MODE_ATTRIBUTE, self.options.mode.as_str());
        self.host
            .set_attribute(&root, PLACEHOLDER_ATTRIBUTE, &self.options.placeholder);
        self.host.set_attribute(&root, "contenteditable", "true");
        self.host.add_class(&root, EDITOR_CLASS);

        if self.host.is_blank(&root) {
            self.insert_placeholder();
        } else {
            for p in self.host.descendants_with_tag(&root, "p") {
                if self.host.has_class(&p, PLACEHOLDER_CLASS) {
                    self.host.remove(&p);
                }
            }
        }
        self.preserve_element_focus();

        if self.options.auto_focus {
            let first = self.host.descendants_with_tag(&root, "p").into_iter().next();
            if let Some(first) = first.filter(|p| !self.host.children(p).is_empty()) {
                self.host.place_cursor(CursorTarget::Within {
                    node: first,
                    offset: 0,
                });
            }
        }

        tracing::debug!(
            target: "notebook::session",
            id = self.id.0,
            mode = self.options.mode.as_str(),
            "editor initialized"
        );
    }

    pub fn id(&self) -> EditorId {
        self.id
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn root(&self) -> &H::Node {
        &self.root
    }

    pub fn options(&self) -> &NotebookOptions {
        &self.options
    }

    pub fn cache(&self) -> &InteractionCache<H::Node> {
        &self.cache
    }

    pub fn toolbar(&self) -> &SharedToolbar<S, H::Snapshot> {
        &self.toolbar
    }

    pub fn is_mac(&self) -> bool {
        self.is_mac
    }

    // === Container lifecycle ===

    /// Empty the container and leave a single placeholder paragraph.
    fn insert_placeholder(&mut self) -> H::Node {
        let root = self.root.clone();
        self.host.clear_children(&root);
        let p = self.host.create_element("p");
        self.host.add_class(&p, PLACEHOLDER_CLASS);
        self.host.set_text(&p, &self.options.placeholder);
        self.host.append_child(&root, &p);
        self.cache.focused_element = Some(p.clone());
        self.cache.focused_element_index = 0;
        p
    }

    /// Reset the container to the placeholder paragraph, cursor inside it.
    pub fn normalize(&mut self) {
        let p = self.insert_placeholder();
        self.host.place_cursor(CursorTarget::Within { node: p, offset: 0 });
        tracing::debug!(target: "notebook::session", id = self.id.0, "container reset");
    }

    /// Remember which child of the container holds the cursor.
    fn preserve_element_focus(&mut self) {
        let Some(anchor) = self.host.anchor_node() else {
            return;
        };
        let Some(mut current) = self.host.parent(&anchor) else {
            return;
        };
        if current == self.root {
            current = anchor;
        }
        if self.cache.focused_element.as_ref() == Some(&current) {
            return;
        }
        self.cache.focused_element_index = self
            .host
            .children(&self.root)
            .iter()
            .position(|c| *c == current)
            .unwrap_or(0);
        self.cache.focused_element = Some(current);
    }

    // === Keyboard ===

    pub fn on_key_down(&mut self, event: &KeyEvent, now: Instant) -> EventResult {
        self.cache.ctrl = event.modifiers.primary(self.is_mac);
        self.cache.shift = event.modifiers.shift;

        if self.cache.ctrl {
            if let Some(command) = self.options.hot_key(event.key_code).map(str::to_string) {
                let mut toolbar = self.toolbar.borrow_mut();
                command::execute(&mut self.host, &mut toolbar, None, &command, None);
                return EventResult::Handled;
            }
        }

        match event.key_code {
            key_codes::ENTER => self.handle_enter(),
            key_codes::ESCAPE => {
                self.hide_toolbar(now);
                EventResult::Handled
            }
            key_codes::V if self.cache.ctrl => {
                self.begin_paste(now);
                EventResult::PassThrough
            }
            key_codes::BACKSPACE => self.handle_backspace(),
            key_codes::TAB if self.cache.shift => {
                self.host.apply_command("Outdent", "");
                EventResult::Handled
            }
            key_codes::TAB => {
                self.host.apply_command("Indent", "");
                EventResult::Handled
            }
            _ => EventResult::PassThrough,
        }
    }

    pub fn on_key_up(&mut self, event: &KeyEvent, now: Instant) -> EventResult {
        self.cache.ctrl = event.modifiers.primary(self.is_mac);
        self.cache.shift = event.modifiers.shift;
        self.preserve_element_focus();
        let mut result = EventResult::PassThrough;

        let is_arrow =
            (key_codes::ARROW_LEFT..=key_codes::ARROW_DOWN).contains(&event.key_code);
        if self.cache.shift && is_arrow {
            self.schedule_selection_check(now, self.options.timing.selection_settle);
            result = EventResult::Handled;
        }
        if self.cache.ctrl && event.key_code == key_codes::A {
            self.schedule_selection_check(now, self.options.timing.select_all_settle);
        }

        // Backspace already normalized on keydown. Resetting here breaks the
        // host's undo history across the reset.
        if event.key_code != key_codes::BACKSPACE && self.host.is_blank(&self.root) {
            self.normalize();
        }
        result
    }

    fn handle_enter(&mut self) -> EventResult {
        if self.options.mode == EditorMode::Inline {
            return EventResult::Handled;
        }
        let Some(focus) = self.host.focus_node() else {
            return EventResult::PassThrough;
        };
        if focus == self.root {
            return EventResult::PassThrough;
        }
        let enclosing = match self.host.parent(&focus) {
            Some(parent) if parent != self.root => parent,
            _ => focus,
        };
        if self.host.next_sibling(&enclosing).is_some() || self.host.kind(&enclosing).is_tag("li")
        {
            return EventResult::PassThrough;
        }

        let kind = self.host.kind(&enclosing);
        if kind.is_tag("ol") || kind.is_tag("ul") {
            if let Some(last) = self.host.last_child(&enclosing) {
                if self.host.text_content(&last).is_empty() {
                    self.host.remove(&last);
                }
            }
        }

        let p = self.host.create_element("p");
        let br = self.host.create_element("br");
        self.host.append_child(&p, &br);
        self.host.append_child(&self.root.clone(), &p);
        self.host.place_cursor(CursorTarget::Within {
            node: p.clone(),
            offset: 0,
        });
        self.cache.focused_element_index = self.host.children(&self.root).len().saturating_sub(1);
        self.cache.focused_element = Some(p);
        EventResult::Handled
    }

    fn handle_backspace(&mut self) -> EventResult {
        if self.host.is_blank(&self.root) {
            self.normalize();
            return EventResult::Handled;
        }
        EventResult::PassThrough
    }

    // === Mouse ===

    pub fn on_mouse_down(&mut self) {
        self.cache.is_drag_selecting = true;
    }

    pub fn on_mouse_up(&mut self, now: Instant) {
        self.cache.is_drag_selecting = false;
        self.schedule_selection_check(now, self.options.timing.mouse_settle);
    }

    pub fn on_mouse_move(&mut self, pointer: Point) {
        self.cache.pointer = pointer;
    }

    /// Mouse-up anywhere on the page.
    pub fn on_document_mouse_up(&mut self, target: PointerTarget, now: Instant) {
        match target {
            PointerTarget::Document if self.cache.is_drag_selecting => self.on_mouse_up(now),
            PointerTarget::Outside => self.hide_toolbar(now),
            _ => {}
        }
    }

    // === Paste ===

    /// Redirect the next paste into the capture area.
    pub fn begin_paste(&mut self, now: Instant) {
        if self.tasks.cancel_where(|t| *t == SessionTask::FlushPaste) == 0 {
            self.paste_snapshot = self.host.save();
        }
        self.host.focus_capture_area();
        self.tasks
            .schedule(now, self.options.timing.paste_capture, SessionTask::FlushPaste);
    }

    fn flush_paste(&mut self) {
        let text = self.host.take_captured_text();
        let snapshot = self.paste_snapshot.take();
        self.host.restore(snapshot.as_ref());
        match text.as_deref().and_then(paste_html) {
            Some(html) => self.host.apply_command("insertHTML", &html),
            None => tracing::debug!(target: "notebook::session", "nothing captured from paste"),
        }
    }

    // === Toolbar ===

    fn schedule_selection_check(&mut self, now: Instant, delay: std::time::Duration) {
        self.tasks.cancel_where(|t| *t == SessionTask::CheckSelection);
        self.tasks.schedule(now, delay, SessionTask::CheckSelection);
    }

    fn check_selection(&mut self, now: Instant) {
        let non_empty = self
            .host
            .save()
            .is_some_and(|s| !self.host.is_collapsed(&s));
        if non_empty {
            self.show_toolbar();
        } else {
            self.hide_toolbar(now);
        }
    }

    pub fn show_toolbar(&mut self) {
        self.toolbar
            .borrow_mut()
            .show(self.id, &self.host, &self.buttons);
    }

    pub fn hide_toolbar(&mut self, now: Instant) {
        self.toolbar.borrow_mut().hide(now);
    }

    /// Run a command string (`"bold"`, `"fontName Arial"`) against the
    /// current selection.
    pub fn execute(&mut self, command: &str) {
        let mut toolbar = self.toolbar.borrow_mut();
        command::execute(&mut self.host, &mut toolbar, None, command, None);
    }

    /// A toolbar button was pressed.
    pub fn on_toolbar_button(&mut self, class: &str) {
        let Some(button) = self.buttons.iter().find(|b| b.class == class) else {
            tracing::debug!(target: "notebook::session", class, "unknown toolbar button");
            return;
        };
        let mut toolbar = self.toolbar.borrow_mut();
        toolbar.close_submenus();
        match &button.action {
            ButtonAction::Command(name) => {
                command::execute(&mut self.host, &mut toolbar, None, name, None);
            }
            ButtonAction::Submenu(submenu) => {
                let snapshot = self.host.save();
                if *submenu == Submenu::Link {
                    let prefill = command::link_prefill(&self.host, &toolbar, snapshot.as_ref());
                    toolbar.set_link_input(&prefill);
                }
                toolbar.open_submenu(*submenu, snapshot);
            }
        }
    }

    /// An entry inside a submenu panel was chosen.
    pub fn on_panel_choice(&mut self, choice: PanelChoice) {
        let mut toolbar = self.toolbar.borrow_mut();
        let (submenu, snapshot) = match toolbar.take_submenu() {
            Some((submenu, snapshot)) => (Some(submenu), snapshot),
            None => (None, None),
        };
        let role = submenu.and_then(|s| s.color_role());

        match choice {
            PanelChoice::FontFamily(family) => {
                let cmd = font_command(&family);
                command::execute(&mut self.host, &mut toolbar, snapshot.as_ref(), &cmd, None);
            }
            PanelChoice::FontSize(px) => {
                command::apply_font_size(
                    &mut self.host,
                    &mut toolbar,
                    snapshot.as_ref(),
                    px,
                    &self.root,
                );
            }
            PanelChoice::Swatch(value) => match role {
                Some(role) => command::apply_color(
                    &mut self.host,
                    &mut toolbar,
                    snapshot.as_ref(),
                    role,
                    &value,
                ),
                None => tracing::debug!(target: "notebook::session", "swatch without color menu"),
            },
            PanelChoice::CustomColor(color) => match role {
                Some(role) => command::apply_color(
                    &mut self.host,
                    &mut toolbar,
                    snapshot.as_ref(),
                    role,
                    &role.format_custom(color),
                ),
                None => tracing::debug!(target: "notebook::session", "color without color menu"),
            },
        }
    }

    /// Enter pressed in the link input.
    pub fn on_link_submit(&mut self, input: &str) -> LinkOutcome {
        let mut toolbar = self.toolbar.borrow_mut();
        command::submit_link(&mut self.host, &mut toolbar, input)
    }

    /// The link area's close button.
    pub fn on_link_close(&mut self) {
        self.toolbar.borrow_mut().close_submenus();
    }

    // === Scheduling ===

    /// Run session and toolbar work due at `now`.
    pub fn tick(&mut self, now: Instant) {
        for task in self.tasks.pop_due(now) {
            match task {
                SessionTask::CheckSelection => self.check_selection(now),
                SessionTask::FlushPaste => self.flush_paste(),
            }
        }
        self.toolbar.borrow_mut().tick(now);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        earliest(
            self.tasks.next_deadline(),
            self.toolbar.borrow().next_deadline(),
        )
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Drop queued work and give up the toolbar if this session holds it.
    pub fn destroy(&mut self) {
        self.tasks.clear();
        self.paste_snapshot = None;
        self.toolbar.borrow_mut().release(self.id);
        tracing::debug!(target: "notebook::session", id = self.id.0, "editor destroyed");
    }
}

/// Pasted plain text as one escaped paragraph per line.
fn paste_html(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    Some(
        text.split('\n')
            .map(|line| format!("<p>{}</p>", html_escape(line.trim_end_matches('\r'))))
            .collect(),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
