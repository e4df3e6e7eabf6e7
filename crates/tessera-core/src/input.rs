//! Edge-triggered pointer and keyboard state.
//!
//! Events arriving between frames are merged into three sets per device:
//!
//! - `down`: held right now
//! - `pressing`: went down since the last frame
//! - `releasing`: went up since the last frame
//!
//! The engine calls [`InputState::reset`] after every frame, which clears
//! the two edge sets and leaves `down` alone.

use crate::event::{Event, Key, MouseButton};
use crate::geometry::Point;

/// A tiny ordered set with press/release edge tracking.
///
/// Devices have a handful of buttons at most, so a `Vec` with linear
/// membership tests beats hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EdgeSet<T> {
    down: Vec<T>,
    pressing: Vec<T>,
    releasing: Vec<T>,
}

impl<T> Default for EdgeSet<T> {
    fn default() -> Self {
        Self {
            down: Vec::new(),
            pressing: Vec::new(),
            releasing: Vec::new(),
        }
    }
}

impl<T: Copy + PartialEq> EdgeSet<T> {
    fn press(&mut self, item: T) {
        if !self.pressing.contains(&item) {
            self.pressing.push(item);
        }
        if !self.down.contains(&item) {
            self.down.push(item);
        }
    }

    fn release(&mut self, item: T) {
        if !self.releasing.contains(&item) {
            self.releasing.push(item);
        }
        self.down.retain(|d| *d != item);
        self.pressing.retain(|p| *p != item);
    }

    fn is_down(&self, item: T) -> bool {
        self.down.contains(&item)
    }

    fn is_pressing(&self, item: T) -> bool {
        self.pressing.contains(&item)
    }

    fn is_releasing(&self, item: T) -> bool {
        self.releasing.contains(&item)
    }

    fn reset(&mut self) {
        self.pressing.clear();
        self.releasing.clear();
    }
}

/// Pointer state in grid coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Mouse {
    position: Point,
    delta: Point,
    wheel: (f32, f32, f32),
    buttons: EdgeSet<MouseButton>,
}

impl Default for Mouse {
    fn default() -> Self {
        Self::new()
    }
}

impl Mouse {
    /// Pointer outside the grid with no buttons held.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Point::new(-1, -1),
            delta: Point::ORIGIN,
            wheel: (0.0, 0.0, 0.0),
            buttons: EdgeSet::default(),
        }
    }

    /// Current cell under the pointer. `(-1, -1)` before the first move.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Movement of the last [`Mouse::set_cursor`] call.
    #[must_use]
    pub const fn delta(&self) -> Point {
        self.delta
    }

    /// Wheel deltas `(x, y, z)` of the last [`Mouse::scroll`] call since the
    /// last reset. A later call replaces an earlier one.
    #[must_use]
    pub const fn wheel(&self) -> (f32, f32, f32) {
        self.wheel
    }

    /// Move the pointer, recording the delta.
    pub fn set_cursor(&mut self, position: Point) {
        self.delta = position - self.position;
        self.position = position;
    }

    /// Record a button press.
    pub fn press(&mut self, button: MouseButton) {
        self.buttons.press(button);
    }

    /// Record a button release.
    pub fn release(&mut self, button: MouseButton) {
        self.buttons.release(button);
    }

    /// Record wheel movement.
    pub fn scroll(&mut self, x: f32, y: f32, z: f32) {
        self.wheel = (x, y, z);
    }

    /// Is the button held?
    #[must_use]
    pub fn is_down(&self, button: MouseButton) -> bool {
        self.buttons.is_down(button)
    }

    /// Did the button go down since the last frame?
    #[must_use]
    pub fn is_pressing(&self, button: MouseButton) -> bool {
        self.buttons.is_pressing(button)
    }

    /// Did the button go up since the last frame?
    #[must_use]
    pub fn is_releasing(&self, button: MouseButton) -> bool {
        self.buttons.is_releasing(button)
    }

    /// Clear edges and wheel deltas.
    pub fn reset(&mut self) {
        self.buttons.reset();
        self.wheel = (0.0, 0.0, 0.0);
    }
}

/// Keyboard state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    keys: EdgeSet<Key>,
}

impl Keyboard {
    /// No keys held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Auto-repeat of a held key adds no new edge.
    pub fn press(&mut self, key: Key) {
        if !self.keys.is_down(key) {
            self.keys.press(key);
        }
    }

    /// Record a key release.
    pub fn release(&mut self, key: Key) {
        self.keys.release(key);
    }

    /// Is the key held?
    #[must_use]
    pub fn is_down(&self, key: Key) -> bool {
        self.keys.is_down(key)
    }

    /// Did the key go down since the last frame?
    #[must_use]
    pub fn is_pressing(&self, key: Key) -> bool {
        self.keys.is_pressing(key)
    }

    /// Did the key go up since the last frame?
    #[must_use]
    pub fn is_releasing(&self, key: Key) -> bool {
        self.keys.is_releasing(key)
    }

    /// Clear edges.
    pub fn reset(&mut self) {
        self.keys.reset();
    }
}

/// Both devices, fed from [`Event`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    /// Pointer state
    pub mouse: Mouse,
    /// Keyboard state
    pub keyboard: Keyboard,
}

impl InputState {
    /// Fresh state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge an event into the device state.
    ///
    /// Returns `false` only for pointer motion that stayed inside the same
    /// cell, which cannot change anything on screen.
    pub fn apply(&mut self, event: &Event) -> bool {
        log::trace!("input event: {event:?}");
        match *event {
            Event::MouseMove { position } => {
                let moved = position != self.mouse.position();
                self.mouse.set_cursor(position);
                moved
            }
            Event::MouseDown { position, button } => {
                self.mouse.press(button);
                self.mouse.set_cursor(position);
                true
            }
            Event::MouseUp { position, button } => {
                self.mouse.release(button);
                self.mouse.set_cursor(position);
                true
            }
            Event::Scroll {
                delta_x,
                delta_y,
                delta_z,
            } => {
                self.mouse.scroll(delta_x, delta_y, delta_z);
                true
            }
            Event::KeyDown { key, .. } => {
                self.keyboard.press(key);
                true
            }
            Event::KeyUp { key } => {
                self.keyboard.release(key);
                true
            }
            Event::Resize { .. } => true,
        }
    }

    /// Clear edge sets on both devices.
    pub fn reset(&mut self) {
        self.mouse.reset();
        self.keyboard.reset();
    }
}
