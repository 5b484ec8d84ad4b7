// src/labeling.rs - Interactive labeling state machine driven by pointer and key events

use image::RgbImage;

use crate::config::Config;
use crate::errors::{Result, SegmentError};
use crate::image_utils::transparent_background;
use crate::regions::{RegionSet, RegionSplitter};
use crate::render::{compose_preview, draw_panel, PanelOverlay};
use crate::symmetry::{estimate_mirror_axis, MirrorAxis};
use crate::types::{LabelBlock, LabelTrack, Side, SidePair};

/// Where the operator is in the labeling protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Body width not committed yet; the pointer previews the guard lines
    AwaitingAxisConfirmation,
    AwaitingSideSelection,
    DrawingLeft,
    DrawingRight,
    /// Regions have been computed from at least one track
    Split,
}

/// Per-side drawing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideState {
    /// Never drawn since the last reset
    Idle,
    /// A drag on this side is in progress
    Drawing,
    /// Drawn at least once; `reached_guard` is set when the last drag ended
    /// on the guard line instead of a pointer release
    Committed { reached_guard: bool },
}

/// Drawing state, in-progress block and committed track of one side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideLabel {
    pub state: SideState,
    pub block: LabelBlock,
    pub track: LabelTrack,
}

impl Default for SideLabel {
    fn default() -> Self {
        Self {
            state: SideState::Idle,
            block: LabelBlock::new(),
            track: LabelTrack::new(),
        }
    }
}

impl SideLabel {
    /// Move the in-progress block into the track, dropping it when empty
    fn commit_block(&mut self) {
        let block = std::mem::take(&mut self.block);
        if !block.is_empty() {
            self.track.push(block);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// Modifier keys held during a pointer event; the engine does not act on them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Reset,
    Exit,
    ShiftAxisLeft,
    ShiftAxisRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pointer {
        kind: PointerKind,
        x: i32,
        y: i32,
        modifiers: Modifiers,
    },
    Key(KeyCommand),
}

impl InputEvent {
    pub fn down(x: i32, y: i32) -> Self {
        InputEvent::Pointer { kind: PointerKind::Down, x, y, modifiers: Modifiers::default() }
    }

    pub fn moved(x: i32, y: i32) -> Self {
        InputEvent::Pointer { kind: PointerKind::Move, x, y, modifiers: Modifiers::default() }
    }

    pub fn up(x: i32, y: i32) -> Self {
        InputEvent::Pointer { kind: PointerKind::Up, x, y, modifiers: Modifiers::default() }
    }
}

/// What the dispatch loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Segmentation session over one source image.
///
/// Owns the immutable source, the working panel redrawn after every event,
/// the mirror axis and body width, both sides' label tracks and the most
/// recent split.
pub struct LabelSession {
    source: RgbImage,
    panel: RgbImage,
    placeholder: RgbImage,
    axis: MirrorAxis,
    shift: Option<u32>,
    provisional_shift: Option<u32>,
    sides: SidePair<SideLabel>,
    regions: Option<RegionSet>,
    threshold_cutoff: u8,
    marker_radius: i32,
    preview_scale: f32,
}

impl LabelSession {
    /// Start a session, estimating the mirror axis from the image
    pub fn new(source: RgbImage, config: &Config) -> Result<Self> {
        if source.width() == 0 || source.height() == 0 {
            return Err(SegmentError::EmptyImage);
        }
        let axis = estimate_mirror_axis(&source, config.symmetry_scope, config.use_parallel);
        Ok(Self::with_axis(source, axis, config))
    }

    /// Start a session with a known mirror axis
    pub fn with_axis(source: RgbImage, axis: MirrorAxis, config: &Config) -> Self {
        let placeholder = transparent_background(source.width(), source.height());
        let mut session = Self {
            panel: source.clone(),
            source,
            placeholder,
            axis,
            shift: None,
            provisional_shift: None,
            sides: SidePair::default(),
            regions: None,
            threshold_cutoff: config.threshold_cutoff,
            marker_radius: config.marker_radius,
            preview_scale: config.preview_scale,
        };
        session.render();
        session
    }

    pub fn source(&self) -> &RgbImage {
        &self.source
    }

    pub fn panel(&self) -> &RgbImage {
        &self.panel
    }

    pub fn axis(&self) -> &MirrorAxis {
        &self.axis
    }

    pub fn shift(&self) -> Option<u32> {
        self.shift
    }

    pub fn side(&self, side: Side) -> &SideLabel {
        self.sides.get(side)
    }

    pub fn regions(&self) -> Option<&RegionSet> {
        self.regions.as_ref()
    }

    pub fn phase(&self) -> Phase {
        if self.shift.is_none() {
            Phase::AwaitingAxisConfirmation
        } else if self.sides.left.state == SideState::Drawing {
            Phase::DrawingLeft
        } else if self.sides.right.state == SideState::Drawing {
            Phase::DrawingRight
        } else if self.regions.is_some() {
            Phase::Split
        } else {
            Phase::AwaitingSideSelection
        }
    }

    /// Stacked region preview, or the placeholder when nothing is split yet
    pub fn preview(&self) -> RgbImage {
        compose_preview(self.regions.as_ref(), &self.placeholder, self.preview_scale)
    }

    /// Apply one event and redraw the working panel.
    ///
    /// A failed split is returned as an error after the panel is redrawn; the
    /// previously stored regions stay in place.
    pub fn handle(&mut self, event: InputEvent) -> Result<Flow> {
        let result = match event {
            InputEvent::Pointer { kind, x, y, .. } => match kind {
                PointerKind::Down => {
                    self.pointer_down(x as i64);
                    Ok(Flow::Continue)
                }
                PointerKind::Move => {
                    self.pointer_move(x as i64, y as i64);
                    Ok(Flow::Continue)
                }
                PointerKind::Up => {
                    self.pointer_up(x as i64);
                    self.split().map(|_| Flow::Continue)
                }
            },
            InputEvent::Key(KeyCommand::Exit) => Ok(Flow::Exit),
            InputEvent::Key(KeyCommand::Reset) => {
                self.reset();
                Ok(Flow::Continue)
            }
            InputEvent::Key(KeyCommand::ShiftAxisLeft) => {
                self.shift_axis(-1);
                Ok(Flow::Continue)
            }
            InputEvent::Key(KeyCommand::ShiftAxisRight) => {
                self.shift_axis(1);
                Ok(Flow::Continue)
            }
        };
        self.render();
        result
    }

    /// Redraw the working panel from the current state
    pub fn render(&mut self) {
        let sides = &self.sides;
        self.panel = draw_panel(
            &self.source,
            &PanelOverlay {
                axis: &self.axis,
                shift: self.shift,
                provisional_shift: self.provisional_shift,
                tracks: SidePair::new(&sides.left.track, &sides.right.track),
                blocks: SidePair::new(&sides.left.block, &sides.right.block),
                marker_radius: self.marker_radius,
            },
        );
    }

    fn pointer_down(&mut self, x: i64) {
        let Some(shift) = self.shift else {
            return;
        };
        let axis_x = self.axis.x as i64;
        let shift = shift as i64;

        let side = if x < axis_x - shift {
            Side::Left
        } else if x > axis_x + shift {
            Side::Right
        } else {
            log::warn!("Not a valid region for labeling at x={}", x);
            return;
        };

        let other = self.sides.get_mut(side.opposite());
        if other.state == SideState::Drawing {
            other.state = SideState::Committed { reached_guard: false };
        }

        let label = self.sides.get_mut(side);
        if label.state == SideState::Idle {
            // First explicit drag replaces any mirrored preview
            label.track.clear();
        }
        label.state = SideState::Drawing;

        self.sides.left.block.clear();
        self.sides.right.block.clear();
        log::debug!("Start drawing {} side", side.name());
    }

    fn pointer_move(&mut self, x: i64, y: i64) {
        let Some(shift) = self.shift else {
            self.provisional_shift = Some((self.axis.x as i64 - x).unsigned_abs() as u32);
            return;
        };
        let axis_x = self.axis.x as i64;

        for side in Side::BOTH {
            let on_side = match side {
                Side::Left => x < axis_x,
                Side::Right => x > axis_x,
            };
            if on_side && self.sides.get(side).state == SideState::Drawing {
                self.track_point(side, x, y, shift);
                if self.sides.get(side.opposite()).state == SideState::Idle {
                    self.track_point(side.opposite(), x, y, shift);
                }
            }
        }
    }

    /// Record the pointer reflected onto `side`, or finish the drag when the
    /// reflected position lands exactly on that side's guard line.
    fn track_point(&mut self, side: Side, x: i64, y: i64, shift: u32) {
        let axis_x = self.axis.x as i64;
        let width = self.source.width() as i64;
        let height = self.source.height() as i64;
        let offset = (axis_x - x).abs();
        let shift = shift as i64;

        let (px, guard_x, inside) = match side {
            Side::Left => {
                let px = axis_x - offset;
                let guard_x = axis_x - shift;
                (px, guard_x, 0 < px && px < guard_x)
            }
            Side::Right => {
                let px = axis_x + offset;
                let guard_x = axis_x + shift;
                (px, guard_x, guard_x < px && px < width)
            }
        };

        if inside {
            if (0..height).contains(&y) {
                self.sides.get_mut(side).block.push((px as u32, y as u32));
            }
        } else if px == guard_x {
            let label = self.sides.get_mut(side);
            label.commit_block();
            if label.state == SideState::Drawing {
                label.state = SideState::Committed { reached_guard: true };
            }
            log::info!("Label {} reached the guard line", side.name());
        }
    }

    fn pointer_up(&mut self, x: i64) {
        if self.shift.is_none() {
            let shift = (self.axis.x as i64 - x).unsigned_abs() as u32;
            self.shift = Some(shift);
            self.provisional_shift = None;
            log::info!("Body width committed: axis {} shift {}", self.axis.x, shift);
            return;
        }

        for side in Side::BOTH {
            if self.sides.get(side).state != SideState::Drawing {
                continue;
            }
            let label = self.sides.get_mut(side);
            label.commit_block();
            label.state = SideState::Committed { reached_guard: false };

            // Keep the mirrored preview of a side that was never drawn
            let other = self.sides.get_mut(side.opposite());
            if other.state == SideState::Idle {
                other.commit_block();
            }
        }
    }

    /// Recompute the regions from the current tracks. Does nothing before the
    /// body width is committed or while no track holds a point.
    pub fn split(&mut self) -> Result<()> {
        let Some(shift) = self.shift else {
            return Ok(());
        };
        let tracks = SidePair::new(self.sides.left.track.clone(), self.sides.right.track.clone());
        let splitter = RegionSplitter::new(&self.source, self.threshold_cutoff);
        if let Some(set) = splitter.split(self.axis.x, shift, &tracks)? {
            self.regions = Some(set);
        }
        Ok(())
    }

    /// Clear labeling state if any side was drawn, otherwise forget the body width
    pub fn reset(&mut self) {
        let any_drawn = Side::BOTH
            .iter()
            .any(|&side| self.sides.get(side).state != SideState::Idle);

        if any_drawn {
            self.sides = SidePair::default();
            self.regions = None;
            log::info!("Reset wing labels");
        } else if self.shift.is_some() {
            self.shift = None;
            log::info!("Reset body width");
        }
        self.provisional_shift = None;
    }

    /// Nudge the mirror axis by whole columns
    pub fn shift_axis(&mut self, delta: i32) {
        self.axis.translate(delta, self.source.width());
        log::debug!("Mirror line moved to x={}", self.axis.x);
    }
}
