// src/curve.rs - Boundary curve reconstruction from sparse clicked points

use image::{GrayImage, Luma, RgbImage};

use crate::image_utils::WHITE;
use crate::types::{LabelBlock, LabelTrack, Point};

/// Which side of the reconstructed curve gets cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearMode {
    /// Rows `[0, y)` at each curve column
    Above,
    /// Rows `[y, height)` at each curve column
    Below,
}

/// Result of carving an image along a label track
#[derive(Debug, Clone, PartialEq)]
pub struct CurveCut {
    /// Input with the cleared span painted white
    pub fixed: RgbImage,
    /// Original values of the cleared span, zero elsewhere
    pub erased: RgbImage,
    /// 255 where a pixel was cleared, 0 elsewhere
    pub erased_mask: GrayImage,
}

/// Linear interpolation over points sorted by x. At duplicate x the last
/// point with that x wins; outside the sample range the end values hold.
fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let last = xp.len() - 1;
    if x <= xp[0] {
        return if x == xp[0] { fp[xp.partition_point(|&v| v <= x) - 1] } else { fp[0] };
    }
    if x >= xp[last] {
        return fp[last];
    }
    // Rightmost sample with xp[j] <= x
    let j = xp.partition_point(|&v| v <= x) - 1;
    let slope = (fp[j + 1] - fp[j]) / (xp[j + 1] - xp[j]);
    fp[j] + slope * (x - xp[j])
}

/// One `(x, y)` per integer column between the block's extreme x values,
/// y truncated toward zero. Blocks with fewer than two points yield nothing.
pub fn interpolate_block(block: &LabelBlock) -> Vec<Point> {
    if block.len() < 2 {
        return Vec::new();
    }

    let mut sorted = block.clone();
    sorted.sort_by_key(|&(x, _)| x);

    let xp: Vec<f64> = sorted.iter().map(|&(x, _)| x as f64).collect();
    let fp: Vec<f64> = sorted.iter().map(|&(_, y)| y as f64).collect();
    let min_x = sorted[0].0;
    let max_x = sorted[sorted.len() - 1].0;

    (min_x..=max_x)
        .map(|x| (x, interp(x as f64, &xp, &fp) as u32))
        .collect()
}

/// Clear the image on one side of every block's interpolated curve, keeping
/// a copy of what was removed.
pub fn fix_track(image: &RgbImage, track: &LabelTrack, mode: ClearMode) -> CurveCut {
    let (width, height) = image.dimensions();
    let mut fixed = image.clone();
    let mut erased = RgbImage::new(width, height);
    let mut erased_mask = GrayImage::new(width, height);

    for block in track {
        for (x, y) in interpolate_block(block) {
            if x >= width {
                continue;
            }
            let y = y.min(height);
            let rows = match mode {
                ClearMode::Above => 0..y,
                ClearMode::Below => y..height,
            };
            for row in rows {
                erased.put_pixel(x, row, *image.get_pixel(x, row));
                erased_mask.put_pixel(x, row, Luma([255]));
                fixed.put_pixel(x, row, WHITE);
            }
        }
    }

    CurveCut { fixed, erased, erased_mask }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn interpolates_every_column_between_extremes() {
        let curve = interpolate_block(&vec![(10, 20), (0, 10)]);
        assert_eq!(curve.len(), 11);
        assert_eq!(curve[0], (0, 10));
        assert_eq!(curve[5], (5, 15));
        assert_eq!(curve[10], (10, 20));
    }

    #[test]
    fn interpolation_truncates_fractional_rows() {
        let curve = interpolate_block(&vec![(0, 0), (3, 2)]);
        assert_eq!(curve, vec![(0, 0), (1, 0), (2, 1), (3, 2)]);
    }

    #[test]
    fn duplicate_x_takes_the_last_sample() {
        let curve = interpolate_block(&vec![(0, 0), (2, 4), (2, 8), (4, 8)]);
        assert_eq!(curve[2], (2, 8));
        assert_eq!(curve[1], (1, 2));
    }

    #[test]
    fn short_blocks_contribute_nothing() {
        assert!(interpolate_block(&vec![]).is_empty());
        assert!(interpolate_block(&vec![(4, 4)]).is_empty());

        let image = RgbImage::from_pixel(8, 8, Rgb([30, 30, 30]));
        let cut = fix_track(&image, &vec![vec![(4, 4)]], ClearMode::Below);
        assert_eq!(cut.fixed, image);
    }

    #[test]
    fn clear_below_on_white_keeps_white_and_records_erased() {
        let image = RgbImage::from_pixel(16, 32, WHITE);
        let track = vec![vec![(0, 10), (10, 20)]];
        let cut = fix_track(&image, &track, ClearMode::Below);

        for x in 0..=10u32 {
            let y = 10 + x;
            for row in 0..32u32 {
                assert_eq!(cut.fixed.get_pixel(x, row), &WHITE);
                let expected = if row >= y { WHITE } else { Rgb([0, 0, 0]) };
                assert_eq!(cut.erased.get_pixel(x, row), &expected, "column {} row {}", x, row);
            }
        }
        for x in 11..16u32 {
            assert_eq!(cut.erased.get_pixel(x, 31), &Rgb([0, 0, 0]));
        }
    }

    #[test]
    fn clear_below_moves_original_pixels_into_erased() {
        let image = RgbImage::from_fn(16, 32, |x, y| Rgb([x as u8, y as u8, 100]));
        let cut = fix_track(&image, &vec![vec![(0, 10), (10, 20)]], ClearMode::Below);

        assert_eq!(cut.fixed.get_pixel(4, 13), &Rgb([4, 13, 100]));
        assert_eq!(cut.fixed.get_pixel(4, 14), &WHITE);
        assert_eq!(cut.erased.get_pixel(4, 14), &Rgb([4, 14, 100]));
        assert_eq!(cut.erased_mask.get_pixel(4, 14)[0], 255);
        assert_eq!(cut.erased_mask.get_pixel(4, 13)[0], 0);
        assert_eq!(cut.fixed.get_pixel(12, 30), &Rgb([12, 30, 100]));
    }

    #[test]
    fn clear_above_clears_rows_before_curve() {
        let image = RgbImage::from_pixel(6, 10, Rgb([50, 60, 70]));
        let cut = fix_track(&image, &vec![vec![(1, 4), (3, 4)]], ClearMode::Above);

        assert_eq!(cut.fixed.get_pixel(2, 3), &WHITE);
        assert_eq!(cut.fixed.get_pixel(2, 4), &Rgb([50, 60, 70]));
        assert_eq!(cut.erased.get_pixel(2, 0), &Rgb([50, 60, 70]));
        assert_eq!(cut.fixed.get_pixel(0, 0), &Rgb([50, 60, 70]));
    }
}
