// src/gui/render.rs - Composing the window framebuffer

use super::components::{blit_rgb, draw_rect};
use super::state::{GuiState, COLOR_BACKGROUND, COLOR_SEPARATOR, PANEL_GAP};

/// Update the buffer for display: working panel on the left, preview on the right
pub fn update_buffer(state: &mut GuiState) {
    state.refresh_preview();

    for pixel in &mut state.buffer {
        *pixel = COLOR_BACKGROUND;
    }

    let (width, height) = (state.width, state.height);
    blit_rgb(&mut state.buffer, width, height, state.session.panel(), 0, 0);

    let (panel_w, _) = state.panel_size();
    draw_rect(&mut state.buffer, panel_w + PANEL_GAP / 2 - 1, 0, 2, height, width, height, COLOR_SEPARATOR);

    blit_rgb(&mut state.buffer, width, height, &state.preview, state.preview_x, 0);
}
