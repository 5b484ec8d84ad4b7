use std::ops::Range;

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::types::Point;

/// Constants
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const CHECKER_GRAY: u8 = 125;

/// Resize an image to the specified dimensions
pub fn resize_image(
    image: &RgbImage,
    dimensions: [u32; 2],
) -> RgbImage {
    let (width, height) = (dimensions[0], dimensions[1]);
    image::imageops::resize(
        image,
        width,
        height,
        image::imageops::FilterType::Triangle,
    )
}

/// Checkerboard placeholder shown where no region has been computed yet.
/// Pixels with even `x + y` are gray, the rest black.
pub fn transparent_background(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgb([CHECKER_GRAY; 3])
        } else {
            BLACK
        }
    })
}

/// Paint every pixel in the given column range white
pub fn white_out_columns(image: &mut RgbImage, columns: Range<u32>) {
    let (width, height) = image.dimensions();
    let columns = columns.start.min(width)..columns.end.min(width);
    for y in 0..height {
        for x in columns.clone() {
            image.put_pixel(x, y, WHITE);
        }
    }
}

/// Paint every pixel in the given row range white
pub fn white_out_rows(image: &mut RgbImage, rows: Range<u32>) {
    let (width, height) = image.dimensions();
    for y in rows.start.min(height)..rows.end.min(height) {
        for x in 0..width {
            image.put_pixel(x, y, WHITE);
        }
    }
}

/// Grayscale conversion followed by an inverted binary threshold:
/// pixels brighter than `cutoff` become 0 (background), everything else 255.
pub fn binary_threshold_inv(image: &RgbImage, cutoff: u8) -> GrayImage {
    let gray = image::imageops::grayscale(image);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] > cutoff {
            Luma([0])
        } else {
            Luma([255])
        }
    })
}

/// Collect the colors at the given coordinates
pub fn gather(image: &RgbImage, coords: &[Point]) -> Vec<Rgb<u8>> {
    coords.iter().map(|&(x, y)| *image.get_pixel(x, y)).collect()
}

/// Write colors back at the given coordinates (pairs beyond the shorter list are ignored)
pub fn scatter(target: &mut RgbImage, coords: &[Point], colors: &[Rgb<u8>]) {
    for (&(x, y), &color) in coords.iter().zip(colors) {
        if x < target.width() && y < target.height() {
            target.put_pixel(x, y, color);
        }
    }
}

/// Paint one color at every coordinate
pub fn fill(target: &mut RgbImage, coords: &[Point], color: Rgb<u8>) {
    for &(x, y) in coords {
        if x < target.width() && y < target.height() {
            target.put_pixel(x, y, color);
        }
    }
}

/// One byte per pixel holding a region id, 0 meaning unassigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl MaskBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Claim the coordinates for `id`. Pixels already owned by a different id
    /// keep their owner; the number of such conflicts is returned.
    pub fn assign(&mut self, coords: &[Point], id: u8) -> usize {
        let mut conflicts = 0;
        for &(x, y) in coords {
            if let Some(i) = self.index(x, y) {
                match self.data[i] {
                    0 => self.data[i] = id,
                    owner if owner == id => {}
                    _ => conflicts += 1,
                }
            }
        }
        conflicts
    }

    pub fn count(&self, id: u8) -> usize {
        self.data.iter().filter(|&&v| v == id).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates_from_gray_corner() {
        let bg = transparent_background(5, 3);
        assert_eq!(bg.dimensions(), (5, 3));
        assert_eq!(bg.get_pixel(0, 0), &Rgb([CHECKER_GRAY; 3]));
        assert_eq!(bg.get_pixel(1, 0), &BLACK);
        assert_eq!(bg.get_pixel(0, 1), &BLACK);
        assert_eq!(bg.get_pixel(4, 2), &Rgb([CHECKER_GRAY; 3]));
    }

    #[test]
    fn white_out_is_clamped_to_image() {
        let mut image = RgbImage::from_pixel(4, 4, BLACK);
        white_out_columns(&mut image, 2..10);
        white_out_rows(&mut image, 3..9);
        assert_eq!(image.get_pixel(1, 0), &BLACK);
        assert_eq!(image.get_pixel(2, 0), &WHITE);
        assert_eq!(image.get_pixel(0, 3), &WHITE);
        assert_eq!(image.get_pixel(1, 2), &BLACK);
    }

    #[test]
    fn threshold_marks_dark_pixels_as_foreground() {
        let mut image = RgbImage::from_pixel(3, 1, WHITE);
        image.put_pixel(1, 0, Rgb([40, 40, 40]));
        image.put_pixel(2, 0, Rgb([250, 250, 250]));
        let binary = binary_threshold_inv(&image, 250);
        assert_eq!(binary.get_pixel(0, 0)[0], 0);
        assert_eq!(binary.get_pixel(1, 0)[0], 255);
        assert_eq!(binary.get_pixel(2, 0)[0], 255);
    }

    #[test]
    fn gather_then_scatter_moves_colors() {
        let source = RgbImage::from_fn(3, 3, |x, y| Rgb([x as u8, y as u8, 7]));
        let coords = vec![(0, 0), (2, 1)];
        let colors = gather(&source, &coords);
        let mut target = RgbImage::new(3, 3);
        scatter(&mut target, &coords, &colors);
        assert_eq!(target.get_pixel(2, 1), &Rgb([2, 1, 7]));
        assert_eq!(target.get_pixel(1, 1), &BLACK);
    }

    #[test]
    fn mask_buffer_reports_conflicts() {
        let mut mask = MaskBuffer::new(4, 4);
        assert_eq!(mask.assign(&[(0, 0), (1, 0)], 1), 0);
        assert_eq!(mask.assign(&[(1, 0), (2, 0)], 2), 1);
        // The contested pixel stays with its first owner
        assert_eq!(mask.count(1), 2);
        assert_eq!(mask.count(2), 1);
    }
}
