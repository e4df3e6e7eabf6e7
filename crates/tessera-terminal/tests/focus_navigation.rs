//! Focus, hover and activation across frames.

use tessera_terminal::{
    Event, Focusable, FocusableState, Group, Key, KeyModifiers, MouseButton, Point, Rect,
    RecordingRenderer, Ui, UiConfig, UiError,
};

/// Three one-row controls `a`, `b`, `c` stacked at rows 0..3.
fn controls(ui: &mut Ui) -> Result<Vec<FocusableState>, UiError> {
    ["a", "b", "c"]
        .into_iter()
        .zip(0..)
        .map(|(id, row)| {
            Focusable::new(id)
                .at(Rect::new(0, row, 10, 1))
                .draw(ui, |_, state| Ok(state.clone()))
        })
        .collect()
}

fn frame(ui: &mut Ui) -> Vec<FocusableState> {
    let mut states = Vec::new();
    ui.frame(&mut RecordingRenderer::new(), |ui| {
        states = controls(ui)?;
        Ok(())
    })
    .unwrap();
    states
}

fn tab(shift: bool) -> Event {
    Event::KeyDown {
        key: Key::Tab,
        modifiers: if shift {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::NONE
        },
    }
}

fn ui() -> Ui {
    Ui::new(UiConfig::sized(20, 5))
}

#[test]
fn test_tab_before_any_frame_does_nothing() {
    let mut ui = ui();
    assert!(ui.handle_event(&tab(false)));
    assert_eq!(ui.focus(), None);
}

#[test]
fn test_tab_walks_controls_in_order() {
    let mut ui = ui();
    frame(&mut ui);
    assert_eq!(ui.focusables(), ["a", "b", "c"]);

    let mut seen = Vec::new();
    for _ in 0..4 {
        ui.handle_event(&tab(false));
        seen.push(ui.focus().map(str::to_string));
        frame(&mut ui);
    }
    let expected = ["a", "b", "c", "a"].map(|id| Some(id.to_string()));
    assert_eq!(seen, expected);
}

#[test]
fn test_shift_tab_walks_backwards() {
    let mut ui = ui();
    frame(&mut ui);

    ui.handle_event(&tab(true));
    assert_eq!(ui.focus(), Some("c"));
    ui.handle_event(&tab(true));
    assert_eq!(ui.focus(), Some("b"));
    ui.handle_event(&tab(false));
    assert_eq!(ui.focus(), Some("c"));
}

#[test]
fn test_tab_is_not_recorded_as_key_press() {
    let mut ui = ui();
    frame(&mut ui);
    ui.handle_event(&tab(false));
    let mut pressing = true;
    ui.frame(&mut RecordingRenderer::new(), |ui| {
        pressing = ui.input().keyboard.is_pressing(Key::Tab);
        Ok(())
    })
    .unwrap();
    assert!(!pressing);
}

#[test]
fn test_focus_state_reaches_render_code() {
    let mut ui = ui();
    frame(&mut ui);
    ui.handle_event(&tab(false));
    ui.handle_event(&tab(false));
    let states = frame(&mut ui);
    let focused: Vec<_> = states.iter().map(|s| s.focus).collect();
    assert_eq!(focused, vec![false, true, false]);
}

#[test]
fn test_click_focuses_and_activates() {
    let mut ui = ui();
    frame(&mut ui);

    ui.handle_event(&Event::MouseMove {
        position: Point::new(3, 1),
    });
    let states = frame(&mut ui);
    assert!(states[1].hover);
    assert!(!states[1].focus);

    ui.handle_event(&Event::MouseDown {
        position: Point::new(3, 1),
        button: MouseButton::Left,
    });
    let states = frame(&mut ui);
    assert!(states[1].focus && states[1].active);
    assert_eq!(ui.active(), Some("b"));

    ui.handle_event(&Event::MouseUp {
        position: Point::new(3, 1),
        button: MouseButton::Left,
    });
    let states = frame(&mut ui);
    assert!(states[1].focus);
    assert!(!states[1].active);
    assert_eq!(ui.active(), None);
}

#[test]
fn test_activation_key_presses_focused_control() {
    let mut ui = ui();
    frame(&mut ui);
    ui.handle_event(&tab(false));

    ui.handle_event(&Event::KeyDown {
        key: Key::Enter,
        modifiers: KeyModifiers::NONE,
    });
    let states = frame(&mut ui);
    assert!(states[0].active);
    assert!(!states[1].active);

    ui.handle_event(&Event::KeyUp { key: Key::Enter });
    let states = frame(&mut ui);
    assert!(!states[0].active);
    assert_eq!(ui.focus(), Some("a"));
}

#[test]
fn test_custom_activation_key() {
    let mut ui = Ui::new(UiConfig::sized(20, 5).with_activation_key(Key::Char(' ')));
    frame(&mut ui);
    ui.handle_event(&tab(false));

    ui.handle_event(&Event::KeyDown {
        key: Key::Enter,
        modifiers: KeyModifiers::NONE,
    });
    assert!(!frame(&mut ui)[0].active);

    ui.handle_event(&Event::KeyDown {
        key: Key::Char(' '),
        modifiers: KeyModifiers::NONE,
    });
    assert!(frame(&mut ui)[0].active);
}

#[test]
fn test_pressing_outside_drops_focus() {
    let mut ui = ui();
    frame(&mut ui);
    ui.handle_event(&tab(false));
    assert_eq!(ui.focus(), Some("a"));

    ui.handle_event(&Event::MouseDown {
        position: Point::new(15, 4),
        button: MouseButton::Left,
    });
    frame(&mut ui);
    assert_eq!(ui.focus(), None);
}

#[test]
fn test_removed_control_leaves_navigation() {
    let mut ui = ui();
    frame(&mut ui);
    ui.frame(&mut RecordingRenderer::new(), |ui| {
        Focusable::new("only").draw(ui, |_, _| Ok(()))
    })
    .unwrap();
    assert_eq!(ui.focusables(), ["only"]);

    ui.handle_event(&tab(false));
    assert_eq!(ui.focus(), Some("only"));
}

#[test]
fn test_group_ids_qualify_controls() {
    let mut ui = ui();
    let mut ids = Vec::new();
    ui.frame(&mut RecordingRenderer::new(), |ui| {
        Group::new().id("form").draw(ui, |ui| {
            Group::new().id("row").draw(ui, |ui| {
                Focusable::new("ok").draw(ui, |_, state| {
                    ids.push(state.id.clone());
                    Ok(())
                })
            })
        })
    })
    .unwrap();
    assert_eq!(ids, ["form/row/ok"]);
    assert_eq!(ui.focusables(), ["form/row/ok"]);
}

#[test]
fn test_empty_id_is_rejected() {
    let mut ui = ui();
    let result = ui.frame(&mut RecordingRenderer::new(), |ui| {
        Focusable::new("").draw(ui, |_, _| Ok(()))
    });
    assert!(result.is_err());
    assert!(ui.focusables().is_empty());
}
