//! Mounting editors on page elements.
//!
//! Every editor on a page shares one `Page`: the toolbar controllers (one per
//! toolbar selector) and the document-level listeners for page mouse-up and
//! delegated toolbar clicks. The page lives as long as any editor does.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo_events::{EventListener, EventListenerOptions};
use notebook_editor_core::command::{LinkOutcome, clean_pasted_url};
use notebook_editor_core::config::TOOLBAR_CLASS;
use notebook_editor_core::{
    ConfigError, EditorId, EditorSession, EventResult, NotebookOptions, PlatformError, Point,
    SharedToolbar, SmolStr, Submenu, ToolbarController,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent};
use web_time::Instant;

use crate::dom::{DomHost, warn_on_err};
use crate::events::{ToolbarClick, key_event, pointer_target, toolbar_click};
use crate::platform::platform;
use crate::selection::BrowserSnapshot;
use crate::timers::DeadlineTimer;
use crate::toolbar::{CUSTOM_PREVIEW_CLASS, DomToolbar, custom_color};

pub type DomSession = EditorSession<DomHost, DomToolbar>;
pub type DomSharedToolbar = SharedToolbar<DomToolbar, BrowserSnapshot>;

/// Why an editor could not be mounted.
#[derive(thiserror::Error, Debug)]
pub enum MountError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

thread_local! {
    static PAGE: RefCell<Weak<Page>> = RefCell::new(Weak::new());
}

/// State shared by every editor on the page.
struct Page {
    document: Document,
    toolbars: RefCell<Vec<(SmolStr, DomSharedToolbar)>>,
    editors: RefCell<Vec<Weak<Mounted>>>,
    next_id: Cell<u32>,
    listeners: RefCell<Vec<EventListener>>,
}

impl Page {
    fn current(document: &Document) -> Rc<Page> {
        PAGE.with(|slot| {
            let existing = slot.borrow().upgrade();
            if let Some(page) = existing {
                return page;
            }
            let page = Rc::new(Page {
                document: document.clone(),
                toolbars: RefCell::new(Vec::new()),
                editors: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
                listeners: RefCell::new(Vec::new()),
            });
            page.listen();
            *slot.borrow_mut() = Rc::downgrade(&page);
            page
        })
    }

    fn next_id(&self) -> EditorId {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        EditorId(id)
    }

    fn toolbar_for(&self, options: &NotebookOptions) -> DomSharedToolbar {
        let mut toolbars = self.toolbars.borrow_mut();
        if let Some((_, toolbar)) = toolbars
            .iter()
            .find(|(selector, _)| *selector == options.toolbar_selector)
        {
            return Rc::clone(toolbar);
        }
        let surface = DomToolbar::new(self.document.clone(), options.toolbar_selector.clone());
        let toolbar = ToolbarController::new(surface, options.timing.hide_debounce).shared();
        toolbars.push((options.toolbar_selector.clone(), Rc::clone(&toolbar)));
        toolbar
    }

    fn register(&self, editor: &Rc<Mounted>) {
        self.editors.borrow_mut().push(Rc::downgrade(editor));
    }

    fn unregister(&self, id: EditorId) {
        self.editors
            .borrow_mut()
            .retain(|w| w.upgrade().is_some_and(|m| m.id != id));
    }

    fn editors(&self) -> Vec<Rc<Mounted>> {
        self.editors.borrow().iter().filter_map(Weak::upgrade).collect()
    }

    /// The editor currently owning the toolbar `target` sits in.
    fn toolbar_owner(&self, target: &Element) -> Option<Rc<Mounted>> {
        self.editors().into_iter().find(|m| m.owns_toolbar_at(target))
    }

    fn listen(self: &Rc<Self>) {
        let on = |event_type: &'static str, handler: fn(&Page, &Event)| {
            let page = Rc::downgrade(self);
            EventListener::new_with_options(
                &self.document,
                event_type,
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    if let Some(page) = page.upgrade() {
                        handler(&page, event);
                    }
                },
            )
        };
        *self.listeners.borrow_mut() = vec![
            on("mouseup", Page::on_mouse_up),
            on("mousedown", Page::on_mouse_down),
            on("click", Page::on_click),
            on("keydown", Page::on_key_down),
            on("input", Page::on_input),
        ];
    }

    fn on_mouse_up(&self, event: &Event) {
        let target = pointer_target(event.target(), &self.document);
        let now = Instant::now();
        for editor in self.editors() {
            editor.update(|s| s.on_document_mouse_up(target, now));
        }
    }

    /// Keep the editor selection while the toolbar is clicked.
    fn on_mouse_down(&self, event: &Event) {
        let Some(target) = event_element(event) else {
            return;
        };
        if target.dyn_ref::<HtmlInputElement>().is_some() {
            return;
        }
        if target.closest(&format!(".{TOOLBAR_CLASS}")).ok().flatten().is_some() {
            event.prevent_default();
        }
    }

    fn on_click(&self, event: &Event) {
        let Some(target) = event_element(event) else {
            return;
        };
        let Some(click) = event.target().and_then(|t| toolbar_click(&t)) else {
            return;
        };
        let Some(owner) = self.toolbar_owner(&target) else {
            tracing::debug!(target: "notebook::toolbar", "click on a toolbar nobody owns");
            return;
        };
        owner.update(|s| match click {
            ToolbarClick::Button(class) => s.on_toolbar_button(&class),
            ToolbarClick::Panel(choice) => s.on_panel_choice(choice),
            ToolbarClick::LinkClose => s.on_link_close(),
        });
    }

    /// Enter in the link input submits it.
    fn on_key_down(&self, event: &Event) {
        let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if key.key() != "Enter" {
            return;
        }
        let Some(input) = link_input(event) else {
            return;
        };
        event.prevent_default();
        let Some(owner) = self.toolbar_owner(&input) else {
            return;
        };
        let value = input.value();
        if let Some(LinkOutcome::Rejected) = owner.update(|s| s.on_link_submit(&value)) {
            tracing::debug!(target: "notebook::command", "link input rejected");
        }
    }

    fn on_input(&self, event: &Event) {
        if let Some(input) = link_input(event) {
            let value = input.value();
            let cleaned = clean_pasted_url(&value);
            if cleaned.len() != value.len() {
                input.set_value(cleaned);
            }
            return;
        }
        let Some(panel) = event_element(event)
            .and_then(|el| el.closest(&format!(".{}", Submenu::Color.panel_class())).ok().flatten())
        else {
            return;
        };
        if let (Some(color), Ok(Some(preview))) = (
            custom_color(&panel),
            panel.query_selector(&format!(".{CUSTOM_PREVIEW_CLASS}")),
        ) {
            if let Some(preview) = preview.dyn_ref::<HtmlElement>() {
                warn_on_err(
                    preview.style().set_property("background-color", &color.to_css()),
                    "custom color preview",
                );
            }
        }
    }
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn link_input(event: &Event) -> Option<HtmlInputElement> {
    let input = event.target()?.dyn_into::<HtmlInputElement>().ok()?;
    let area = format!(".{TOOLBAR_CLASS} .{}", Submenu::Link.panel_class());
    input.closest(&area).ok().flatten()?;
    Some(input)
}

/// One mounted editor: its session, its wake-up timer and its listeners.
struct Mounted {
    id: EditorId,
    session: RefCell<DomSession>,
    timer: DeadlineTimer,
    listeners: RefCell<Vec<EventListener>>,
}

impl Mounted {
    /// Run `f` on the session, then re-arm the timer for whatever it queued.
    ///
    /// Returns `None` if the session is already borrowed, which only happens
    /// when a DOM call inside a handler dispatches another event synchronously.
    fn update<R>(self: &Rc<Self>, f: impl FnOnce(&mut DomSession) -> R) -> Option<R> {
        let result = {
            let Ok(mut session) = self.session.try_borrow_mut() else {
                tracing::debug!(target: "notebook::session", id = self.id.0, "session busy, dropping event");
                return None;
            };
            f(&mut session)
        };
        self.schedule();
        Some(result)
    }

    fn schedule(self: &Rc<Self>) {
        let deadline = self
            .session
            .try_borrow()
            .ok()
            .and_then(|s| s.next_deadline());
        let Some(deadline) = deadline else {
            self.timer.cancel();
            return;
        };
        let editor = Rc::downgrade(self);
        self.timer.arm(deadline, move || {
            if let Some(editor) = editor.upgrade() {
                editor.update(|s| s.tick(Instant::now()));
            }
        });
    }

    fn owns_toolbar_at(&self, target: &Element) -> bool {
        let Ok(session) = self.session.try_borrow() else {
            return false;
        };
        let toolbar = session.toolbar().borrow();
        let target: &web_sys::Node = target;
        toolbar.owner() == Some(self.id)
            && toolbar
                .surface()
                .element()
                .is_some_and(|el| el.contains(Some(target)))
    }

    fn listen(self: &Rc<Self>, element: &HtmlElement) {
        let on = |event_type: &'static str, handler: fn(&Rc<Mounted>, &Event)| {
            let editor = Rc::downgrade(self);
            EventListener::new_with_options(
                element,
                event_type,
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    if let Some(editor) = editor.upgrade() {
                        handler(&editor, event);
                    }
                },
            )
        };
        *self.listeners.borrow_mut() = vec![
            on("keydown", Mounted::on_key_down),
            on("keyup", Mounted::on_key_up),
            on("mousedown", Mounted::on_mouse_down),
            on("mouseup", Mounted::on_mouse_up),
            on("mousemove", Mounted::on_mouse_move),
            on("paste", Mounted::on_paste),
        ];
    }

    fn on_key_down(self: &Rc<Self>, event: &Event) {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let key = key_event(event);
        if let Some(EventResult::Handled) = self.update(|s| s.on_key_down(&key, Instant::now())) {
            event.prevent_default();
        }
    }

    fn on_key_up(self: &Rc<Self>, event: &Event) {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let key = key_event(event);
        if let Some(EventResult::Handled) = self.update(|s| s.on_key_up(&key, Instant::now())) {
            event.prevent_default();
        }
    }

    fn on_mouse_down(self: &Rc<Self>, _event: &Event) {
        self.update(|s| s.on_mouse_down());
    }

    fn on_mouse_up(self: &Rc<Self>, _event: &Event) {
        self.update(|s| s.on_mouse_up(Instant::now()));
    }

    fn on_mouse_move(self: &Rc<Self>, event: &Event) {
        if let Some(event) = event.dyn_ref::<MouseEvent>() {
            let pointer = Point::new(event.page_x() as f64, event.page_y() as f64);
            self.update(|s| s.on_mouse_move(pointer));
        }
    }

    /// Pastes that bypass the keyboard shortcut (context menu, edit menu).
    fn on_paste(self: &Rc<Self>, _event: &Event) {
        self.update(|s| s.begin_paste(Instant::now()));
    }

    fn teardown(&self) {
        self.listeners.borrow_mut().clear();
        self.timer.cancel();
        if let Ok(mut session) = self.session.try_borrow_mut() {
            session.destroy();
        }
    }
}

/// An editor mounted on a page element.
///
/// Dropping it (or calling `destroy`) removes its listeners, hides the toolbar
/// if this editor owned it and unregisters it from the page.
pub struct BrowserNotebook {
    editor: Rc<Mounted>,
    page: Rc<Page>,
    element: HtmlElement,
}

impl BrowserNotebook {
    /// Turn `element` into an editor.
    pub fn mount(element: &HtmlElement, options: NotebookOptions) -> Result<Self, MountError> {
        let host = DomHost::new()?;
        let page = Page::current(host.document());
        let toolbar = page.toolbar_for(&options);
        let id = page.next_id();
        let session = EditorSession::new(
            id,
            host,
            element.clone().into(),
            toolbar,
            options,
            platform().uses_cmd(),
        )?;

        let editor = Rc::new(Mounted {
            id,
            session: RefCell::new(session),
            timer: DeadlineTimer::new(),
            listeners: RefCell::new(Vec::new()),
        });
        editor.listen(element);
        page.register(&editor);
        tracing::info!(target: "notebook::session", id = id.0, "editor mounted");

        Ok(Self {
            editor,
            page,
            element: element.clone(),
        })
    }

    pub fn id(&self) -> EditorId {
        self.editor.id
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    /// Run a command string against the current selection.
    pub fn exec_command(&self, command: &str) {
        self.editor.update(|s| s.execute(command));
    }

    pub fn hide_toolbar(&self) {
        self.editor.update(|s| s.hide_toolbar(Instant::now()));
    }

    pub fn show_toolbar(&self) {
        self.editor.update(|s| s.show_toolbar());
    }

    /// Whether the toolbar is showing for this editor.
    pub fn toolbar_active(&self) -> bool {
        self.editor.session.try_borrow().is_ok_and(|s| {
            let toolbar = s.toolbar().borrow();
            toolbar.is_active() && toolbar.owner() == Some(self.editor.id)
        })
    }

    pub fn destroy(self) {
        drop(self);
    }
}

impl Drop for BrowserNotebook {
    fn drop(&mut self) {
        self.editor.teardown();
        self.page.unregister(self.editor.id);
        tracing::info!(target: "notebook::session", id = self.editor.id.0, "editor unmounted");
    }
}
