// src/gui/events.rs - Translating window input into labeling events

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window};

use crate::labeling::{InputEvent, KeyCommand, Modifiers, PointerKind};
use super::state::GuiState;

/// Poll the window and queue every pointer and key event seen this frame
pub fn handle_events(window: &Window, state: &mut GuiState) {
    let modifiers = Modifiers {
        shift: window.is_key_down(Key::LeftShift) || window.is_key_down(Key::RightShift),
        ctrl: window.is_key_down(Key::LeftCtrl) || window.is_key_down(Key::RightCtrl),
    };
    let position = window.get_mouse_pos(MouseMode::Clamp);
    let down = window.get_mouse_down(MouseButton::Left);
    queue_pointer_events(state, position, down, modifiers);

    if window.is_key_pressed(Key::Escape, KeyRepeat::No) {
        state.push_event(InputEvent::Key(KeyCommand::Exit));
    }
    if window.is_key_pressed(Key::R, KeyRepeat::No) {
        state.push_event(InputEvent::Key(KeyCommand::Reset));
    }
    // Axis nudges repeat while held
    for key in [Key::A, Key::Left] {
        if window.is_key_pressed(key, KeyRepeat::Yes) {
            state.push_event(InputEvent::Key(KeyCommand::ShiftAxisLeft));
        }
    }
    for key in [Key::D, Key::Right] {
        if window.is_key_pressed(key, KeyRepeat::Yes) {
            state.push_event(InputEvent::Key(KeyCommand::ShiftAxisRight));
        }
    }
}

/// Turn the polled mouse state into press, move and release events.
///
/// Presses and moves only count over the working panel. A release is
/// delivered only for a forwarded press, wherever the pointer is by then, so
/// a drag that leaves the panel still ends.
pub fn queue_pointer_events(
    state: &mut GuiState,
    position: Option<(f32, f32)>,
    down: bool,
    modifiers: Modifiers,
) {
    let (x, y) = match position {
        Some((x, y)) => (x as i32, y as i32),
        None => (state.mouse_x, state.mouse_y),
    };
    let (panel_w, panel_h) = state.panel_size();
    let over_panel = x >= 0 && y >= 0 && (x as usize) < panel_w && (y as usize) < panel_h;
    let moved = (x, y) != (state.mouse_x, state.mouse_y);
    let pressed = down && !state.mouse_down;
    let released = !down && state.mouse_down;

    let mut push = |kind: PointerKind| {
        state.queue.push_back(InputEvent::Pointer { kind, x, y, modifiers });
    };

    if pressed && over_panel {
        push(PointerKind::Down);
    }
    if (moved || pressed) && over_panel {
        push(PointerKind::Move);
    }
    if released && state.press_forwarded {
        push(PointerKind::Up);
    }

    if pressed {
        state.press_forwarded = over_panel;
    } else if released {
        state.press_forwarded = false;
    }
    state.mouse_x = x;
    state.mouse_y = y;
    state.mouse_down = down;
}
