//! Input handling for terminal applications.
//!
//! Converts crossterm events into engine [`Event`]s. Most terminals never
//! report key releases; for those, keys pressed since the last frame are
//! released by [`InputAdapter::release_held`] so that a tap shows up as one
//! frame with the key down followed by one frame with it released.

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers as CtModifiers,
    MouseButton as CtMouseButton, MouseEvent, MouseEventKind,
};
use tessera_core::{Event, Key, KeyModifiers, MouseButton, Point};

/// A key plus the modifiers that must be held with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    /// Key code.
    pub key: Key,
    /// Required modifiers.
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Create a new key binding.
    #[must_use]
    pub const fn new(key: Key, modifiers: KeyModifiers) -> Self {
        Self { key, modifiers }
    }

    /// Create a simple key binding without modifiers.
    #[must_use]
    pub const fn simple(key: Key) -> Self {
        Self::new(key, KeyModifiers::NONE)
    }

    /// Check if this binding matches a key-down event.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        match *event {
            Event::KeyDown { key, modifiers } => {
                key == self.key && modifiers.contains(self.modifiers)
            }
            _ => false,
        }
    }
}

/// Converts crossterm events and tracks keys awaiting a release.
#[derive(Debug, Default)]
pub struct InputAdapter {
    /// Terminal reports key releases itself.
    reports_releases: bool,
    held: Vec<Key>,
}

impl InputAdapter {
    /// Adapter for a terminal that only reports presses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter for a terminal with the keyboard enhancement protocol
    /// enabled, which reports releases.
    #[must_use]
    pub fn with_release_events() -> Self {
        Self {
            reports_releases: true,
            held: Vec::new(),
        }
    }

    /// Convert a crossterm event. Focus and paste events have no engine
    /// counterpart and yield `None`.
    pub fn convert(&mut self, event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Key(key) => self.convert_key(key),
            CrosstermEvent::Mouse(mouse) => Some(convert_mouse(mouse)),
            CrosstermEvent::Resize(width, height) => Some(Event::Resize { width, height }),
            CrosstermEvent::FocusGained | CrosstermEvent::FocusLost | CrosstermEvent::Paste(_) => {
                None
            }
        }
    }

    /// Release events for keys pressed since the last call, when the
    /// terminal does not report releases itself.
    pub fn release_held(&mut self) -> Vec<Event> {
        self.held
            .drain(..)
            .map(|key| Event::KeyUp { key })
            .collect()
    }

    fn convert_key(&mut self, event: KeyEvent) -> Option<Event> {
        let mut modifiers = convert_modifiers(event.modifiers);
        let key = match event.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::F(n) => Key::F(n),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => {
                modifiers = modifiers.with(KeyModifiers::SHIFT);
                Key::Tab
            }
            KeyCode::Delete => Key::Delete,
            KeyCode::Insert => Key::Insert,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            // Unknown keys are ignored
            _ => return None,
        };

        match event.kind {
            KeyEventKind::Release => Some(Event::KeyUp { key }),
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if !self.reports_releases && !self.held.contains(&key) {
                    self.held.push(key);
                }
                Some(Event::KeyDown { key, modifiers })
            }
        }
    }
}

fn convert_modifiers(modifiers: CtModifiers) -> KeyModifiers {
    [
        (CtModifiers::SHIFT, KeyModifiers::SHIFT),
        (CtModifiers::CONTROL, KeyModifiers::CONTROL),
        (CtModifiers::ALT, KeyModifiers::ALT),
        (CtModifiers::META, KeyModifiers::META),
        (CtModifiers::SUPER, KeyModifiers::META),
    ]
    .into_iter()
    .filter(|(ct, _)| modifiers.contains(*ct))
    .fold(KeyModifiers::NONE, |acc, (_, m)| acc.with(m))
}

const fn convert_button(button: CtMouseButton) -> MouseButton {
    match button {
        CtMouseButton::Left => MouseButton::Left,
        CtMouseButton::Right => MouseButton::Right,
        CtMouseButton::Middle => MouseButton::Middle,
    }
}

fn convert_mouse(mouse: MouseEvent) -> Event {
    let position = Point::new(i32::from(mouse.column), i32::from(mouse.row));

    let scroll = |delta_x: f32, delta_y: f32| Event::Scroll {
        delta_x,
        delta_y,
        delta_z: 0.0,
    };

    match mouse.kind {
        MouseEventKind::Down(button) => Event::MouseDown {
            position,
            button: convert_button(button),
        },
        MouseEventKind::Up(button) => Event::MouseUp {
            position,
            button: convert_button(button),
        },
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Event::MouseMove { position },
        MouseEventKind::ScrollUp => scroll(0.0, -1.0),
        MouseEventKind::ScrollDown => scroll(0.0, 1.0),
        MouseEventKind::ScrollLeft => scroll(-1.0, 0.0),
        MouseEventKind::ScrollRight => scroll(1.0, 0.0),
    }
}
