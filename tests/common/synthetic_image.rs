use image::{Rgb, RgbImage};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// 200x100 white canvas with two dark wings (rows 10..90, columns 20..90 and
/// 111..181) and a darker body strip in columns 95..106.
pub fn specimen() -> RgbImage {
    RgbImage::from_fn(200, 100, |x, y| {
        let in_rows = (10..90).contains(&y);
        if in_rows && (20..90).contains(&x) {
            Rgb([70, 50, (30 + y) as u8])
        } else if in_rows && (111..181).contains(&x) {
            Rgb([72, 49, (31 + y) as u8])
        } else if in_rows && (95..106).contains(&x) {
            Rgb([20, 20, 20])
        } else {
            WHITE
        }
    })
}

/// Specimen whose columns mirror exactly around the seam at `seam`
/// (column `seam - 1 - d` equals column `seam + d`).
pub fn symmetric_specimen(width: u32, height: u32, seam: u32) -> RgbImage {
    assert!(seam > 0 && seam < width, "seam must lie inside the image");
    RgbImage::from_fn(width, height, |x, y| {
        let d = if x < seam { seam - 1 - x } else { x - seam };
        let in_rows = height / 10 <= y && y < height - height / 10;
        if in_rows && d < 5 {
            Rgb([20, 20, 20])
        } else if in_rows && (10..80).contains(&d) {
            let v = ((d * 7 + y * 3) % 90) as u8;
            Rgb([40 + v, 30 + v / 2, 60])
        } else {
            WHITE
        }
    })
}
