//! Browser DOM layer for the notebook editor.
//!
//! This crate implements the core's platform traits on `web_sys` and wires
//! DOM events to editor sessions. It assumes a `wasm32-unknown-unknown`
//! target environment.
//!
//! # Architecture
//!
//! - `dom`: `DomHost`, the document tree, command, geometry and paste host
//! - `selection`: Selection API handling with capability probing
//! - `toolbar`: DOM rendering of the shared toolbar
//! - `events`: key events, page mouse-up targets, toolbar click decoding
//! - `notebook`: page registry and `BrowserNotebook` mounting
//! - `platform`: Browser/OS detection for the primary modifier
//!
//! # Re-exports
//!
//! This crate re-exports `notebook-editor-core` for convenience, so consumers
//! only need to depend on `notebook-editor-browser`.

// Re-export core crate
pub use notebook_editor_core;
pub use notebook_editor_core::*;

pub mod dom;
pub mod events;
pub mod notebook;
pub mod platform;
pub mod selection;
pub mod timers;
pub mod toolbar;

pub use dom::{CAPTURE_AREA_ID, DomHost};
pub use events::{ToolbarClick, key_event, parse_key, pointer_target, toolbar_click};
pub use notebook::{BrowserNotebook, DomSession, MountError};
pub use platform::{Platform, platform};
pub use selection::{BrowserSnapshot, SelectionApi};
pub use toolbar::DomToolbar;
