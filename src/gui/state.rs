// src/gui/state.rs - GUI state: the labeling session plus framebuffer and input bookkeeping

use std::collections::VecDeque;

use image::RgbImage;

use crate::config::Config;
use crate::labeling::{Flow, InputEvent, LabelSession, Phase};

pub const WINDOW_TITLE: &str = "Moth Segmentation";

/// Horizontal gap between the working panel and the preview
pub const PANEL_GAP: usize = 8;

// Colors (in 0xRRGGBB format)
pub const COLOR_BACKGROUND: u32 = 0x303030; // Dark gray
pub const COLOR_SEPARATOR: u32 = 0x505050;  // Medium gray

/// Host-side state around one labeling session
pub struct GuiState {
    pub session: LabelSession,

    // Display state
    pub buffer: Vec<u32>,
    pub width: usize,
    pub height: usize,
    pub preview_x: usize,
    pub preview: RgbImage,
    preview_dirty: bool,

    // Input state
    pub mouse_x: i32,
    pub mouse_y: i32,
    pub mouse_down: bool,
    /// The current press landed on the working panel and was forwarded
    pub press_forwarded: bool,
    pub queue: VecDeque<InputEvent>,
    pub exit_requested: bool,
    pub status_message: String,
}

impl GuiState {
    pub fn new(session: LabelSession, config: &Config) -> Self {
        let (panel_w, panel_h) = session.panel().dimensions();
        let (panel_w, panel_h) = (panel_w as usize, panel_h as usize);

        // The preview can stack up to three full-size layers
        let scale = config.preview_scale.max(0.0);
        let preview_w = ((panel_w as f32 * scale).ceil() as usize).max(1);
        let preview_h = ((panel_h as f32 * 3.0 * scale).ceil() as usize).max(1);

        let width = panel_w + PANEL_GAP + preview_w;
        let height = panel_h.max(preview_h);
        let preview = session.preview();
        let status_message = phase_hint(session.phase()).to_string();

        Self {
            session,
            buffer: vec![COLOR_BACKGROUND; width * height],
            width,
            height,
            preview_x: panel_w + PANEL_GAP,
            preview,
            preview_dirty: false,
            mouse_x: -1,
            mouse_y: -1,
            mouse_down: false,
            press_forwarded: false,
            queue: VecDeque::new(),
            exit_requested: false,
            status_message,
        }
    }

    pub fn panel_size(&self) -> (usize, usize) {
        let (w, h) = self.session.panel().dimensions();
        (w as usize, h as usize)
    }

    pub fn push_event(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    /// Feed queued events to the session in arrival order. Stops at an exit
    /// request; errors are logged and shown in the status line.
    pub fn dispatch(&mut self) {
        if self.queue.is_empty() {
            return;
        }

        while let Some(event) = self.queue.pop_front() {
            match self.session.handle(event) {
                Ok(Flow::Continue) => {
                    self.status_message = phase_hint(self.session.phase()).to_string();
                }
                Ok(Flow::Exit) => {
                    self.exit_requested = true;
                    self.queue.clear();
                    break;
                }
                Err(e) => {
                    log::error!("Split failed: {}", e);
                    self.status_message = format!("Split failed: {}", e);
                }
            }
        }
        self.preview_dirty = true;
    }

    /// Recompose the preview if events were handled since the last call
    pub fn refresh_preview(&mut self) {
        if self.preview_dirty {
            self.preview = self.session.preview();
            self.preview_dirty = false;
        }
    }

    pub fn title(&self) -> String {
        format!("{} - {}", WINDOW_TITLE, self.status_message)
    }

    pub fn into_session(self) -> LabelSession {
        self.session
    }
}

/// Short operator hint for the current labeling phase
pub fn phase_hint(phase: Phase) -> &'static str {
    match phase {
        Phase::AwaitingAxisConfirmation => "Move to size the body, click to confirm",
        Phase::AwaitingSideSelection => "Drag along a wing boundary",
        Phase::DrawingLeft => "Drawing left boundary",
        Phase::DrawingRight => "Drawing right boundary",
        Phase::Split => "Regions updated (R to reset, Esc to finish)",
    }
}
