//! Keyboard input types.
//!
//! Platform-agnostic key representation. The browser layer converts DOM
//! keyboard events into `KeyEvent`s; everything downstream works on these.

use smol_str::SmolStr;

/// Legacy key codes, as used by hot key tables.
pub mod key_codes {
    pub const BACKSPACE: u32 = 8;
    pub const TAB: u32 = 9;
    pub const ENTER: u32 = 13;
    pub const ESCAPE: u32 = 27;
    pub const SPACE: u32 = 32;
    pub const ARROW_LEFT: u32 = 37;
    pub const ARROW_UP: u32 = 38;
    pub const ARROW_RIGHT: u32 = 39;
    pub const ARROW_DOWN: u32 = 40;
    pub const DELETE: u32 = 46;
    pub const A: u32 = 65;
    pub const V: u32 = 86;
}

/// Key values the editor distinguishes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key.
    Character(SmolStr),

    /// Unknown/unidentified key.
    Unidentified,

    // === Whitespace / editing ===
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,

    // === Navigation ===
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,

    // === Modifiers ===
    Alt,
    Control,
    Meta,
    Shift,
}

impl Key {
    /// Create a character key.
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    /// Check if this is one of the four arrow keys.
    pub fn is_arrow(&self) -> bool {
        matches!(
            self,
            Self::ArrowLeft | Self::ArrowRight | Self::ArrowUp | Self::ArrowDown
        )
    }

    /// Check if this is a modifier key.
    pub fn is_modifier(&self) -> bool {
        matches!(self, Self::Alt | Self::Control | Self::Meta | Self::Shift)
    }

    /// Whether this is the given character, ignoring case.
    pub fn is_char(&self, c: char) -> bool {
        match self {
            Self::Character(s) => {
                let mut chars = s.chars();
                matches!((chars.next(), chars.next()), (Some(k), None) if k.eq_ignore_ascii_case(&c))
            }
            _ => false,
        }
    }

    /// Best-effort legacy key code for this key.
    pub fn legacy_code(&self) -> u32 {
        match self {
            Self::Backspace => key_codes::BACKSPACE,
            Self::Tab => key_codes::TAB,
            Self::Enter => key_codes::ENTER,
            Self::Escape => key_codes::ESCAPE,
            Self::Delete => key_codes::DELETE,
            Self::ArrowLeft => key_codes::ARROW_LEFT,
            Self::ArrowUp => key_codes::ARROW_UP,
            Self::ArrowRight => key_codes::ARROW_RIGHT,
            Self::ArrowDown => key_codes::ARROW_DOWN,
            Self::Home => 36,
            Self::End => 35,
            Self::Shift => 16,
            Self::Control => 17,
            Self::Alt => 18,
            Self::Meta => 91,
            Self::Character(s) => match s.chars().next() {
                Some(c) if c.is_ascii_alphanumeric() => c.to_ascii_uppercase() as u32,
                Some(' ') => key_codes::SPACE,
                _ => 0,
            },
            Self::Unidentified => 0,
        }
    }
}

/// Modifier key state for a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        ctrl: false,
        alt: false,
        shift: true,
        meta: false,
    };

    pub const META: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: true,
    };

    /// Whether the platform's primary modifier is held (Cmd on Mac, Ctrl elsewhere).
    pub fn primary(&self, is_mac: bool) -> bool {
        if is_mac { self.meta } else { self.ctrl }
    }
}

/// A key press or release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    /// Legacy numeric key code (`KeyboardEvent.which`).
    pub key_code: u32,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, key_code: u32, modifiers: Modifiers) -> Self {
        Self {
            key,
            key_code,
            modifiers,
        }
    }

    /// Build an event, deriving the key code from the key.
    pub fn from_key(key: Key, modifiers: Modifiers) -> Self {
        let key_code = key.legacy_code();
        Self {
            key,
            key_code,
            modifiers,
        }
    }

    pub fn plain(key: Key) -> Self {
        Self::from_key(key, Modifiers::NONE)
    }
}

/// What the platform should do with an event after the editor saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was handled: prevent default and stop propagation.
    Handled,
    /// Let the platform apply its default behavior.
    PassThrough,
}

impl EventResult {
    pub fn is_handled(self) -> bool {
        self == EventResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_codes() {
        assert_eq!(Key::character("b").legacy_code(), 66);
        assert_eq!(Key::character("B").legacy_code(), 66);
        assert_eq!(Key::Enter.legacy_code(), key_codes::ENTER);
        assert_eq!(Key::ArrowDown.legacy_code(), key_codes::ARROW_DOWN);
    }

    #[test]
    fn test_is_char_ignores_case() {
        assert!(Key::character("A").is_char('a'));
        assert!(!Key::character("ab").is_char('a'));
        assert!(!Key::Enter.is_char('a'));
    }

    #[test]
    fn test_primary_modifier() {
        assert!(Modifiers::CTRL.primary(false));
        assert!(!Modifiers::CTRL.primary(true));
        assert!(Modifiers::META.primary(true));
    }
}
