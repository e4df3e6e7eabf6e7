//! Keyboard and pointer focus tracking.
//!
//! A [`FocusController`] holds three independent ids (hover, focus and
//! active) plus the ordered list of focusable controls seen in the current
//! frame. Navigation walks the list collected by the previous completed
//! frame, because the current one is still being built.

use crate::event::{Key, MouseButton};
use crate::input::InputState;

/// Interaction state of one focusable control, handed to its render code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FocusableState {
    /// Qualified id of the control
    pub id: String,
    /// Pointer is over the control
    pub hover: bool,
    /// Control holds keyboard focus
    pub focus: bool,
    /// Control is being pressed
    pub active: bool,
}

/// Focus, hover and active ids with the per-frame focus registry.
#[derive(Debug, Clone, Default)]
pub struct FocusController {
    hover: Option<String>,
    focus: Option<String>,
    active: Option<String>,
    registry: Vec<String>,
    completed: Vec<String>,
}

impl FocusController {
    /// Controller with nothing focused.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id under the pointer.
    #[must_use]
    pub fn hover(&self) -> Option<&str> {
        self.hover.as_deref()
    }

    /// Id holding keyboard focus.
    #[must_use]
    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    /// Id being pressed.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Replace the hover id.
    pub fn set_hover(&mut self, id: Option<String>) {
        self.hover = id;
    }

    /// Replace the focus id.
    pub fn set_focus(&mut self, id: Option<String>) {
        self.focus = id;
    }

    /// Replace the active id.
    pub fn set_active(&mut self, id: Option<String>) {
        self.active = id;
    }

    /// Start collecting a new frame's registry.
    pub fn begin_frame(&mut self) {
        self.registry.clear();
    }

    /// Publish this frame's registry for navigation. Returns its length.
    pub fn commit(&mut self) -> usize {
        self.completed = std::mem::take(&mut self.registry);
        self.completed.len()
    }

    /// Ids registered so far this frame, in call order.
    #[must_use]
    pub fn registered(&self) -> &[String] {
        &self.registry
    }

    /// Ids of the last completed frame, in call order.
    #[must_use]
    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    /// Append a control to this frame's registry.
    ///
    /// A second registration of the same id in one frame is logged and
    /// ignored; returns whether the id was added.
    pub fn register(&mut self, id: &str) -> bool {
        if self.registry.iter().any(|r| r == id) {
            log::warn!("focusable id registered twice in one frame: {id}");
            return false;
        }
        self.registry.push(id.to_string());
        true
    }

    /// Move focus to the next control, wrapping around.
    pub fn focus_next(&mut self) {
        self.step(true);
    }

    /// Move focus to the previous control, wrapping around.
    pub fn focus_previous(&mut self) {
        self.step(false);
    }

    fn step(&mut self, forward: bool) {
        let len = self.completed.len();
        if len == 0 {
            return;
        }

        let current = self
            .focus
            .as_deref()
            .and_then(|f| self.completed.iter().position(|id| id == f));

        let index = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };

        log::debug!("focus moved to {}", self.completed[index]);
        self.focus = Some(self.completed[index].clone());
    }

    /// Run the per-frame interaction rules for one control.
    ///
    /// `over` says whether the pointer lies inside the control's region.
    /// Rules apply in order: hover, focus on press, active while held,
    /// drop focus on drag-out, drop active on release.
    pub fn evaluate(
        &mut self,
        id: &str,
        over: bool,
        input: &InputState,
        activation_key: Key,
    ) -> FocusableState {
        let primary = MouseButton::PRIMARY;
        let is = |slot: &Option<String>| slot.as_deref() == Some(id);

        if over {
            self.hover = Some(id.to_string());
        } else if is(&self.hover) {
            self.hover = None;
        }

        if over && input.mouse.is_pressing(primary) {
            self.focus = Some(id.to_string());
        }

        let held_by_pointer = over && input.mouse.is_down(primary);
        let held_by_key = is(&self.focus) && input.keyboard.is_down(activation_key);
        if held_by_pointer || held_by_key {
            self.active = Some(id.to_string());
        }

        if is(&self.focus) && !is(&self.hover) && input.mouse.is_down(primary) {
            self.focus = None;
        }

        let released =
            input.keyboard.is_releasing(activation_key) || input.mouse.is_releasing(primary);
        if is(&self.active) && released {
            self.active = None;
        }

        FocusableState {
            id: id.to_string(),
            hover: is(&self.hover),
            focus: is(&self.focus),
            active: is(&self.active),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::geometry::Point;

    fn registered(ids: &[&str]) -> FocusController {
        let mut fc = FocusController::new();
        fc.begin_frame();
        for id in ids {
            fc.register(id);
        }
        fc.commit();
        fc
    }

    // =========================================================================
    // Registry and navigation
    // =========================================================================

    #[test]
    fn test_next_advances_and_wraps() {
        let mut fc = registered(&["a", "b", "c"]);
        fc.set_focus(Some("b".into()));
        fc.focus_next();
        assert_eq!(fc.focus(), Some("c"));

        fc.begin_frame();
        for id in ["a", "b", "c"] {
            fc.register(id);
        }
        fc.commit();
        fc.focus_next();
        assert_eq!(fc.focus(), Some("a"));
    }

    #[test]
    fn test_previous_wraps_to_end() {
        let mut fc = registered(&["a", "b", "c"]);
        fc.set_focus(Some("a".into()));
        fc.focus_previous();
        assert_eq!(fc.focus(), Some("c"));
    }

    #[test]
    fn test_no_focus_selects_ends() {
        let mut fc = registered(&["a", "b", "c"]);
        fc.focus_next();
        assert_eq!(fc.focus(), Some("a"));

        fc.set_focus(Some("gone".into()));
        fc.focus_previous();
        assert_eq!(fc.focus(), Some("c"));
    }

    #[test]
    fn test_empty_registry_keeps_focus() {
        let mut fc = registered(&[]);
        fc.set_focus(Some("x".into()));
        fc.focus_next();
        assert_eq!(fc.focus(), Some("x"));
        fc.set_focus(None);
        fc.focus_previous();
        assert_eq!(fc.focus(), None);
    }

    #[test_log::test]
    fn test_duplicate_registration_ignored() {
        let mut fc = FocusController::new();
        fc.begin_frame();
        assert!(fc.register("a"));
        assert!(!fc.register("a"));
        assert_eq!(fc.registered().len(), 1);
        assert_eq!(fc.commit(), 1);
        assert_eq!(fc.completed(), ["a".to_string()]);
    }

    #[test]
    fn test_navigation_uses_completed_frame() {
        let mut fc = registered(&["a", "b"]);
        fc.begin_frame();
        fc.register("z");
        fc.focus_next();
        assert_eq!(fc.focus(), Some("a"));
    }

    // =========================================================================
    // Interaction rules
    // =========================================================================

    fn press_at(input: &mut InputState) {
        input.apply(&Event::MouseDown {
            position: Point::new(0, 0),
            button: MouseButton::Left,
        });
    }

    #[test]
    fn test_hover_follows_pointer() {
        let mut fc = FocusController::new();
        let input = InputState::new();
        let state = fc.evaluate("a", true, &input, Key::Enter);
        assert!(state.hover);
        assert_eq!(fc.hover(), Some("a"));

        let state = fc.evaluate("a", false, &input, Key::Enter);
        assert!(!state.hover);
        assert_eq!(fc.hover(), None);
    }

    #[test]
    fn test_leaving_other_control_keeps_hover() {
        let mut fc = FocusController::new();
        let input = InputState::new();
        fc.evaluate("a", true, &input, Key::Enter);
        fc.evaluate("b", false, &input, Key::Enter);
        assert_eq!(fc.hover(), Some("a"));
    }

    #[test]
    fn test_press_focuses_and_activates() {
        let mut fc = FocusController::new();
        let mut input = InputState::new();
        press_at(&mut input);
        let state = fc.evaluate("a", true, &input, Key::Enter);
        assert!(state.focus);
        assert!(state.active);
    }

    #[test]
    fn test_release_clears_active_keeps_focus() {
        let mut fc = FocusController::new();
        let mut input = InputState::new();
        press_at(&mut input);
        fc.evaluate("a", true, &input, Key::Enter);
        input.reset();

        input.apply(&Event::MouseUp {
            position: Point::new(0, 0),
            button: MouseButton::Left,
        });
        let state = fc.evaluate("a", true, &input, Key::Enter);
        assert!(state.focus);
        assert!(!state.active);
    }

    #[test]
    fn test_drag_out_drops_focus() {
        let mut fc = FocusController::new();
        let mut input = InputState::new();
        press_at(&mut input);
        fc.evaluate("a", true, &input, Key::Enter);
        input.reset();

        let state = fc.evaluate("a", false, &input, Key::Enter);
        assert!(!state.focus);
        assert!(!state.hover);
    }

    #[test]
    fn test_activation_key_while_focused() {
        let mut fc = FocusController::new();
        fc.set_focus(Some("a".into()));
        let mut input = InputState::new();
        input.keyboard.press(Key::Enter);
        let state = fc.evaluate("a", false, &input, Key::Enter);
        assert!(state.active);

        input.reset();
        input.keyboard.release(Key::Enter);
        let state = fc.evaluate("a", false, &input, Key::Enter);
        assert!(!state.active);
        assert!(state.focus);
    }

    #[test]
    fn test_activation_key_is_configurable() {
        let mut fc = FocusController::new();
        fc.set_focus(Some("a".into()));
        let mut input = InputState::new();
        input.keyboard.press(Key::Enter);
        assert!(!fc.evaluate("a", false, &input, Key::SPACE).active);
        input.keyboard.press(Key::SPACE);
        assert!(fc.evaluate("a", false, &input, Key::SPACE).active);
    }
}
