// src/gui/mod.rs - Interactive labeling window

mod state;
mod render;
mod events;
mod components;

use std::time::Duration;
use minifb::{Window, WindowOptions};

use crate::config::Config;
use crate::errors::{Result, SegmentError};
use crate::labeling::LabelSession;

use self::state::GuiState;

/// Run the labeling window until the operator exits or closes it, handing
/// the session back with whatever regions were produced
pub fn run_gui(session: LabelSession, config: &Config) -> Result<LabelSession> {
    let mut state = GuiState::new(session, config);
    log::info!(
        "Opening labeling window {}x{}, mirror line at x={}",
        state.width,
        state.height,
        state.session.axis().x
    );

    let mut window = Window::new(
        &state.title(),
        state.width,
        state.height,
        WindowOptions {
            resize: false,
            scale: minifb::Scale::X1,
            ..WindowOptions::default()
        },
    )
    .map_err(|e| SegmentError::Window(format!("Failed to create window: {}", e)))?;

    window.limit_update_rate(Some(Duration::from_millis(config.frame_interval_ms)));

    let mut title = state.title();
    while window.is_open() && !state.exit_requested {
        events::handle_events(&window, &mut state);
        state.dispatch();

        if state.title() != title {
            title = state.title();
            window.set_title(&title);
        }

        render::update_buffer(&mut state);
        window
            .update_with_buffer(&state.buffer, state.width, state.height)
            .map_err(|e| SegmentError::Window(format!("Failed to update window: {}", e)))?;
    }

    log::info!("Labeling window closed");
    Ok(state.into_session())
}
