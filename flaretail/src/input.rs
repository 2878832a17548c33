//! Input vocabulary: keys, modifiers, pointer buttons.
//!
//! Hosts translate native input (crossterm events) into these types and
//! feed them to widgets through [`WidgetEvents`](crate::traits::WidgetEvents).
//! The key-combo *binder* (mapping combos to app callbacks) stays outside
//! the engine; only the vocabulary lives here.

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Character key
    Char(char),
    /// Function keys F1-F12
    F(u8),
    Enter,
    Escape,
    Backspace,
    Tab,
    BackTab,
    Space,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
}

/// Modifier keys state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn none(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt && !self.meta
    }

    /// Ctrl on most platforms, Cmd on macOS; the selection-toggle modifier.
    pub fn ctrl_or_meta(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A key combination (key + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Create a key combo without modifiers
    pub const fn key(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub const fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub const fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub const fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub const fn meta(mut self) -> Self {
        self.modifiers.meta = true;
        self
    }
}

/// Pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

// Conversion from crossterm types
impl From<crossterm::event::KeyCode> for Key {
    fn from(code: crossterm::event::KeyCode) -> Self {
        use crossterm::event::KeyCode;
        match code {
            KeyCode::Char(' ') => Key::Space,
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Esc => Key::Escape,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Insert => Key::Insert,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Char('\0'), // Placeholder for unsupported keys
        }
    }
}

impl From<crossterm::event::KeyModifiers> for Modifiers {
    fn from(mods: crossterm::event::KeyModifiers) -> Self {
        use crossterm::event::KeyModifiers;
        Self {
            shift: mods.contains(KeyModifiers::SHIFT),
            ctrl: mods.contains(KeyModifiers::CONTROL),
            alt: mods.contains(KeyModifiers::ALT),
            meta: mods.contains(KeyModifiers::META) || mods.contains(KeyModifiers::SUPER),
        }
    }
}

impl From<crossterm::event::KeyEvent> for KeyCombo {
    fn from(event: crossterm::event::KeyEvent) -> Self {
        Self {
            key: event.code.into(),
            modifiers: event.modifiers.into(),
        }
    }
}

impl From<crossterm::event::MouseButton> for PointerButton {
    fn from(btn: crossterm::event::MouseButton) -> Self {
        use crossterm::event::MouseButton as CtBtn;
        match btn {
            CtBtn::Left => PointerButton::Left,
            CtBtn::Right => PointerButton::Right,
            CtBtn::Middle => PointerButton::Middle,
        }
    }
}
