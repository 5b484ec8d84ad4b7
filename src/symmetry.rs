// src/symmetry.rs - Mirror line estimation for bilaterally symmetric specimens

use image::RgbImage;
use rayon::prelude::*;

/// Vertical mirror line `x = c`, spanning the full image height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorAxis {
    pub x: u32,
    pub height: u32,
}

impl MirrorAxis {
    pub fn new(x: u32, height: u32) -> Self {
        Self { x, height }
    }

    /// Line endpoints `((x, 0), (x, height))`
    pub fn endpoints(&self) -> ((u32, u32), (u32, u32)) {
        ((self.x, 0), (self.x, self.height))
    }

    /// Translate the line sideways, keeping at least one column on each side
    pub fn translate(&mut self, delta: i32, width: u32) {
        let upper = width.saturating_sub(1).max(1) as i64;
        self.x = (self.x as i64 + delta as i64).clamp(1, upper) as u32;
    }
}

/// Cosine similarity of the strip left of column `x` against the mirrored
/// strip right of it. Both strips are `min(x, width - x)` columns wide.
/// Returns a value in `[0, 1]` for 8-bit data, higher meaning more alike.
pub fn mirror_similarity(image: &RgbImage, x: u32) -> f64 {
    let (width, height) = image.dimensions();
    if x == 0 || x >= width {
        return 0.0;
    }
    let span = x.min(width - x);

    let mut dot = 0.0f64;
    let mut norm_left = 0.0f64;
    let mut norm_right = 0.0f64;

    for y in 0..height {
        for j in 0..span {
            let left = image.get_pixel(x - span + j, y);
            let right = image.get_pixel(x + span - 1 - j, y);
            for c in 0..3 {
                let a = left[c] as f64;
                let b = right[c] as f64;
                dot += a * b;
                norm_left += a * a;
                norm_right += b * b;
            }
        }
    }

    cosine_from_parts(dot, norm_left, norm_right)
}

fn cosine_from_parts(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    match (norm_a == 0.0, norm_b == 0.0) {
        // Two all-black strips mirror each other perfectly
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => dot / (norm_a * norm_b).sqrt(),
    }
}

/// Score every candidate column in `[center - scope, center + scope)`,
/// clipped to `[1, width - 1]`, in ascending x order.
fn score_candidates(image: &RgbImage, center: u32, scope: u32, parallel: bool) -> Vec<(u32, f64)> {
    let width = image.width();
    let lo = center.saturating_sub(scope).max(1);
    let hi = (center + scope).min(width.saturating_sub(1));
    let candidates: Vec<u32> = (lo..hi).collect();

    if parallel {
        candidates
            .par_iter()
            .map(|&x| (x, mirror_similarity(image, x)))
            .collect()
    } else {
        candidates
            .iter()
            .map(|&x| (x, mirror_similarity(image, x)))
            .collect()
    }
}

/// Hill-climb from the center column to the column whose left and mirrored
/// right halves are most similar.
///
/// Each sweep picks the first candidate with the highest similarity. The
/// search stops when the best candidate is the current center, or when moving
/// would not strictly raise the similarity, which bounds the number of sweeps.
pub fn estimate_mirror_axis(image: &RgbImage, scope: u32, parallel: bool) -> MirrorAxis {
    let (width, height) = image.dimensions();
    if width < 2 {
        return MirrorAxis::new(width / 2, height);
    }

    let mut line_x = (width / 2).max(1);
    let mut line_score = mirror_similarity(image, line_x);
    let mut sweeps = 0usize;

    loop {
        sweeps += 1;
        let scores = score_candidates(image, line_x, scope, parallel);

        let mut best: Option<(u32, f64)> = None;
        for &(x, score) in &scores {
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((x, score));
            }
        }

        match best {
            Some((x, score)) if x != line_x && score > line_score => {
                log::debug!("Mirror line sweep {}: {} -> {} ({:.6})", sweeps, line_x, x, score);
                line_x = x;
                line_score = score;
            }
            _ => break,
        }
    }

    let axis = MirrorAxis::new(line_x, height);
    log::info!("Generated mirror line {:?} after {} sweeps", axis.endpoints(), sweeps);
    axis
}
