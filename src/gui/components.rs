// src/gui/components.rs - Framebuffer drawing primitives

use image::RgbImage;

/// Pack an RGB pixel as 0xRRGGBB
pub fn pack_rgb(pixel: &image::Rgb<u8>) -> u32 {
    ((pixel[0] as u32) << 16) | ((pixel[1] as u32) << 8) | pixel[2] as u32
}

/// Copy an image into the buffer with its top-left corner at `(x0, y0)`,
/// clipping whatever falls outside
pub fn blit_rgb(buffer: &mut [u32], buffer_width: usize, buffer_height: usize,
                image: &RgbImage, x0: usize, y0: usize) {
    for (x, y, pixel) in image.enumerate_pixels() {
        let px = x0 + x as usize;
        let py = y0 + y as usize;
        if px >= buffer_width || py >= buffer_height {
            continue;
        }
        buffer[py * buffer_width + px] = pack_rgb(pixel);
    }
}

/// Draw a rectangle
pub fn draw_rect(buffer: &mut [u32], x: usize, y: usize, width_px: usize, height_px: usize,
             buffer_width: usize, buffer_height: usize, color: u32) {
    for py in y..std::cmp::min(y + height_px, buffer_height) {
        for px in x..std::cmp::min(x + width_px, buffer_width) {
            let idx = py * buffer_width + px;
            if idx < buffer.len() {
                buffer[idx] = color;
            }
        }
    }
}
