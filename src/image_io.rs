use std::path::{Path, PathBuf};
use image::{ImageFormat, RgbImage};

use crate::errors::{Result, SegmentError};

/// Represents an input image with its metadata
pub struct InputImage {
    pub image: RgbImage,
    pub path: PathBuf,
    pub filename: String,
}

/// Load an image from disk as 8-bit RGB
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<InputImage> {
    let path = path.as_ref();

    // Get filename without extension
    let filename = path.file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| SegmentError::InvalidPath(path.to_path_buf()))?
        .to_string();

    let img = image::open(path)?;
    let rgb_img = img.to_rgb8();

    if rgb_img.width() == 0 || rgb_img.height() == 0 {
        return Err(SegmentError::EmptyImage);
    }

    log::info!("Loaded {} ({}x{})", path.display(), rgb_img.width(), rgb_img.height());

    Ok(InputImage {
        image: rgb_img,
        path: path.to_path_buf(),
        filename,
    })
}

/// Save an RGB image as PNG
pub fn save_image<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_image("/no/such/specimen.png").is_err());
    }

    #[test]
    fn saved_png_loads_back_as_rgb() {
        let dir = std::env::temp_dir().join(format!("moth_segment_io_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("specimen.png");

        let mut image = RgbImage::from_pixel(6, 4, Rgb([10, 20, 30]));
        image.put_pixel(5, 3, Rgb([200, 100, 50]));
        save_image(&image, &path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.filename, "specimen");
        assert_eq!(loaded.image, image);

        std::fs::remove_dir_all(&dir).ok();
    }
}
