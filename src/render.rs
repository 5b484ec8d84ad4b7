// src/render.rs - Working panel overlay and region preview composition

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut};
use imageproc::rect::Rect;

use crate::regions::{RegionMask, RegionSet};
use crate::symmetry::MirrorAxis;
use crate::types::{LabelBlock, LabelTrack, SidePair};

// Colors
pub const COLOR_AXIS: Rgb<u8> = Rgb([0, 0, 0]);            // Black
pub const COLOR_GUARD: Rgb<u8> = Rgb([0, 0, 255]);         // Blue
pub const COLOR_PROVISIONAL: Rgb<u8> = Rgb([255, 0, 0]);   // Red
pub const COLOR_MARKER: Rgb<u8> = Rgb([0, 0, 0]);          // Black

pub const LINE_THICKNESS: u32 = 2;

/// Everything drawn on top of the source image in the working panel
pub struct PanelOverlay<'a> {
    pub axis: &'a MirrorAxis,
    pub shift: Option<u32>,
    /// Guard offset following the pointer before the body width is committed
    pub provisional_shift: Option<u32>,
    pub tracks: SidePair<&'a LabelTrack>,
    pub blocks: SidePair<&'a LabelBlock>,
    pub marker_radius: i32,
}

/// Two pixel wide vertical line at column `x`; columns outside the image are skipped
pub fn draw_vertical_line(image: &mut RgbImage, x: i64, color: Rgb<u8>) {
    let height = image.height();
    if height == 0 || x < 0 || x > i32::MAX as i64 {
        return;
    }
    let left = (x as i32 - (LINE_THICKNESS as i32 / 2)).max(0);
    draw_filled_rect_mut(image, Rect::at(left, 0).of_size(LINE_THICKNESS, height), color);
}

fn draw_guard_pair(image: &mut RgbImage, axis_x: u32, shift: u32, color: Rgb<u8>) {
    draw_vertical_line(image, axis_x as i64 - shift as i64, color);
    draw_vertical_line(image, axis_x as i64 + shift as i64, color);
}

/// Fresh copy of the source with axis, guard lines and markers drawn on it
pub fn draw_panel(source: &RgbImage, overlay: &PanelOverlay) -> RgbImage {
    let mut panel = source.clone();

    draw_vertical_line(&mut panel, overlay.axis.x as i64, COLOR_AXIS);

    if let Some(shift) = overlay.shift.filter(|&s| s > 0) {
        draw_guard_pair(&mut panel, overlay.axis.x, shift, COLOR_GUARD);
    }
    if let Some(shift) = overlay.provisional_shift {
        draw_guard_pair(&mut panel, overlay.axis.x, shift, COLOR_PROVISIONAL);
    }

    let radius = overlay.marker_radius;
    for track in [overlay.tracks.left, overlay.tracks.right] {
        for &(x, y) in track.iter().flatten() {
            draw_hollow_circle_mut(&mut panel, (x as i32, y as i32), radius, COLOR_MARKER);
        }
    }
    // Points of the drag in progress
    for block in [overlay.blocks.left, overlay.blocks.right] {
        for &(x, y) in block {
            draw_filled_circle_mut(&mut panel, (x as i32, y as i32), radius, COLOR_MARKER);
        }
    }

    panel
}

/// Region pixels painted over a copy of the placeholder background
pub fn compose_layer<'a>(background: &RgbImage, regions: impl IntoIterator<Item = &'a RegionMask>) -> RgbImage {
    let mut layer = background.clone();
    for region in regions {
        region.paint_onto(&mut layer);
    }
    layer
}

/// Stack images vertically, left aligned
pub fn vstack(images: &[RgbImage]) -> RgbImage {
    let width = images.iter().map(|i| i.width()).max().unwrap_or(0);
    let height = images.iter().map(|i| i.height()).sum();
    let mut stacked = RgbImage::new(width, height);
    let mut offset = 0i64;
    for image in images {
        imageops::replace(&mut stacked, image, 0, offset);
        offset += image.height() as i64;
    }
    stacked
}

/// Preview composite: forewings, body and backwings stacked (skipping the
/// ones not computed) and scaled down, or the bare placeholder when nothing
/// has been split yet.
pub fn compose_preview(regions: Option<&RegionSet>, background: &RgbImage, scale: f32) -> RgbImage {
    let Some(set) = regions else {
        return background.clone();
    };

    let mut layers = Vec::new();
    let forewings: Vec<&RegionMask> = [&set.forewings.left, &set.forewings.right]
        .into_iter()
        .flatten()
        .collect();
    if !forewings.is_empty() {
        layers.push(compose_layer(background, forewings));
    }
    if let Some(body) = &set.body {
        layers.push(compose_layer(background, [body]));
    }
    let backwings: Vec<&RegionMask> = [&set.backwings.left, &set.backwings.right]
        .into_iter()
        .flatten()
        .collect();
    if !backwings.is_empty() {
        layers.push(compose_layer(background, backwings));
    }

    if layers.is_empty() {
        return background.clone();
    }

    let stacked = vstack(&layers);
    let width = ((stacked.width() as f32 * scale) as u32).max(1);
    let height = ((stacked.height() as f32 * scale) as u32).max(1);
    imageops::resize(&stacked, width, height, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_utils::{transparent_background, WHITE};

    fn overlay_parts() -> (MirrorAxis, SidePair<LabelTrack>, SidePair<LabelBlock>) {
        (MirrorAxis::new(20, 30), SidePair::default(), SidePair::default())
    }

    #[test]
    fn panel_shows_axis_and_guards() {
        let source = RgbImage::from_pixel(40, 30, WHITE);
        let (axis, tracks, blocks) = overlay_parts();
        let panel = draw_panel(
            &source,
            &PanelOverlay {
                axis: &axis,
                shift: Some(5),
                provisional_shift: None,
                tracks: SidePair::new(&tracks.left, &tracks.right),
                blocks: SidePair::new(&blocks.left, &blocks.right),
                marker_radius: 2,
            },
        );

        assert_eq!(panel.get_pixel(20, 10), &COLOR_AXIS);
        assert_eq!(panel.get_pixel(15, 10), &COLOR_GUARD);
        assert_eq!(panel.get_pixel(25, 10), &COLOR_GUARD);
        assert_eq!(panel.get_pixel(10, 10), &WHITE);
        // The source itself is never drawn on
        assert_eq!(source.get_pixel(20, 10), &WHITE);
    }

    #[test]
    fn panel_marks_track_points() {
        let source = RgbImage::from_pixel(40, 30, WHITE);
        let (axis, mut tracks, mut blocks) = overlay_parts();
        tracks.left.push(vec![(8, 8)]);
        blocks.right.push((30, 12));
        let panel = draw_panel(
            &source,
            &PanelOverlay {
                axis: &axis,
                shift: None,
                provisional_shift: Some(3),
                tracks: SidePair::new(&tracks.left, &tracks.right),
                blocks: SidePair::new(&blocks.left, &blocks.right),
                marker_radius: 2,
            },
        );

        assert_eq!(panel.get_pixel(10, 8), &COLOR_MARKER);
        assert_eq!(panel.get_pixel(8, 8), &WHITE);
        assert_eq!(panel.get_pixel(30, 12), &COLOR_MARKER);
        assert_eq!(panel.get_pixel(17, 0), &COLOR_PROVISIONAL);
    }

    #[test]
    fn zero_body_width_draws_only_the_axis() {
        let source = RgbImage::from_pixel(40, 30, WHITE);
        let (axis, tracks, blocks) = overlay_parts();
        let panel = draw_panel(
            &source,
            &PanelOverlay {
                axis: &axis,
                shift: Some(0),
                provisional_shift: None,
                tracks: SidePair::new(&tracks.left, &tracks.right),
                blocks: SidePair::new(&blocks.left, &blocks.right),
                marker_radius: 2,
            },
        );

        assert_eq!(panel.get_pixel(20, 10), &COLOR_AXIS);
        assert!(panel.pixels().all(|p| *p != COLOR_GUARD));
    }

    #[test]
    fn empty_preview_is_the_placeholder() {
        let bg = transparent_background(10, 6);
        assert_eq!(compose_preview(None, &bg, 0.5), bg);
    }

    #[test]
    fn preview_stacks_present_layers_at_half_size() {
        let bg = transparent_background(20, 10);
        let region = RegionMask {
            coords: vec![(1, 1)],
            colors: vec![Rgb([9, 9, 9])],
        };
        let set = RegionSet {
            width: 20,
            height: 10,
            forewings: SidePair::new(Some(region.clone()), None),
            backwings: SidePair::new(None, Some(region)),
            body: None,
        };

        let preview = compose_preview(Some(&set), &bg, 0.5);
        assert_eq!(preview.dimensions(), (10, 10));
    }

    #[test]
    fn vstack_places_images_in_order() {
        let top = RgbImage::from_pixel(3, 2, Rgb([1, 1, 1]));
        let bottom = RgbImage::from_pixel(3, 1, Rgb([2, 2, 2]));
        let stacked = vstack(&[top, bottom]);
        assert_eq!(stacked.dimensions(), (3, 3));
        assert_eq!(stacked.get_pixel(0, 1), &Rgb([1, 1, 1]));
        assert_eq!(stacked.get_pixel(2, 2), &Rgb([2, 2, 2]));
    }
}
