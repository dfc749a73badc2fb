//! notebook-editor-core: selection-driven rich text formatting without
//! browser dependencies.
//!
//! This crate provides:
//! - `DocumentTree` / `SelectionStore` traits over the host document
//! - `EditorSession<H, S>` - per-container keyboard, mouse and paste handling
//! - `ToolbarController<S, Snap>` - the floating toolbar shared by every editor
//! - Command execution, submenus and link validation - all generic over the host
//! - `MemoryDocument` / `MemoryToolbar` - in-memory platform for tests and tooling

pub mod color;
pub mod command;
pub mod config;
pub mod error;
pub mod format;
pub mod geometry;
pub mod keys;
pub mod memory;
pub mod menu;
pub mod platform;
pub mod scheduler;
pub mod selection;
pub mod session;
pub mod toolbar;
pub mod transform;
pub mod tree;

pub use color::{ColorRole, Rgba};
pub use command::{LinkOutcome, PanelChoice, is_url};
pub use config::{EditorMode, HotKeys, NotebookOptions};
pub use error::{ConfigError, PlatformError};
pub use format::{FormatSet, FormatTag, compute_active_formats};
pub use geometry::{Geometry, Point, Rect, Size, place_above};
pub use keys::{EventResult, Key, KeyEvent, Modifiers};
pub use memory::{MemoryDocument, MemoryToolbar, NodeId};
pub use menu::{ButtonAction, Submenu, ToolbarButton, build_buttons};
pub use platform::{CommandTarget, EditorHost, PasteArea, ToolbarSurface};
pub use scheduler::{TaskQueue, TimingPolicy};
pub use selection::{Boundary, CursorTarget, SelectionSnapshot, SelectionStore, set_cursor};
pub use session::{EditorSession, InteractionCache, PointerTarget, SessionTask};
pub use smol_str::SmolStr;
pub use toolbar::{EditorId, SharedToolbar, ToolbarController, ToolbarPhase, ToolbarState};
pub use transform::TransformTarget;
pub use tree::{DocumentTree, NodeKind};
