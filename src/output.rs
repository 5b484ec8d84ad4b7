// src/output.rs - Persisting region images and contour metadata

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::image_io::save_image;
use crate::regions::{RegionId, RegionMask, RegionSet};
use crate::types::Point;

/// Left/right pair of contour point lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideContours {
    pub left: Vec<[u32; 2]>,
    pub right: Vec<[u32; 2]>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentsContour {
    pub forewings: SideContours,
    pub backwings: SideContours,
    pub body: Vec<[u32; 2]>,
}

/// Contour metadata written next to the region images
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContourMeta {
    pub components_contour: ComponentsContour,
}

impl ContourMeta {
    pub fn from_regions(regions: &RegionSet) -> Self {
        let contour = |id: RegionId| -> Vec<[u32; 2]> {
            regions
                .region(id)
                .map(boundary_points)
                .unwrap_or_default()
                .into_iter()
                .map(|(x, y)| [x, y])
                .collect()
        };

        Self {
            components_contour: ComponentsContour {
                forewings: SideContours {
                    left: contour(RegionId::ForewingLeft),
                    right: contour(RegionId::ForewingRight),
                },
                backwings: SideContours {
                    left: contour(RegionId::BackwingLeft),
                    right: contour(RegionId::BackwingRight),
                },
                body: contour(RegionId::Body),
            },
        }
    }
}

/// Region pixels with at least one 4-neighbour outside the region, in raster order
pub fn boundary_points(region: &RegionMask) -> Vec<Point> {
    let members: HashSet<Point> = region.coords.iter().copied().collect();
    let inside = |x: i64, y: i64| x >= 0 && y >= 0 && members.contains(&(x as u32, y as u32));

    region
        .coords
        .iter()
        .copied()
        .filter(|&(x, y)| {
            let (x, y) = (x as i64, y as i64);
            !(inside(x - 1, y) && inside(x + 1, y) && inside(x, y - 1) && inside(x, y + 1))
        })
        .collect()
}

/// Write the contour metadata as pretty-printed JSON
pub fn write_contour_meta<P: AsRef<Path>>(meta: &ContourMeta, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(meta)?;
    fs::write(path, json)?;
    Ok(())
}

/// Save one PNG per computed region with the region's pixels on black
pub fn save_component_images<P: AsRef<Path>>(regions: &RegionSet, dir: P, stem: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for (id, region) in regions.iter() {
        let mut canvas = RgbImage::new(regions.width, regions.height);
        region.paint_onto(&mut canvas);
        let path = dir.join(format!("{}_{}.png", stem, id.suffix()));
        save_image(&canvas, &path)?;
        written.push(path);
    }
    Ok(written)
}

/// Write `<output_dir>/<stem>/<stem>.json` plus the region images, returning
/// the directory that received them
pub fn write_outputs<P: AsRef<Path>>(regions: &RegionSet, output_dir: P, stem: &str) -> Result<PathBuf> {
    let dir = output_dir.as_ref().join(stem);

    let images = save_component_images(regions, &dir, stem)?;
    let meta_path = dir.join(format!("{}.json", stem));
    write_contour_meta(&ContourMeta::from_regions(regions), &meta_path)?;

    log::info!(
        "Saved {} region images and {} to {}",
        images.len(),
        meta_path.display(),
        dir.display()
    );
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SidePair;
    use image::Rgb;

    fn square(x0: u32, y0: u32, size: u32, color: Rgb<u8>) -> RegionMask {
        let mut coords = Vec::new();
        for y in y0..y0 + size {
            for x in x0..x0 + size {
                coords.push((x, y));
            }
        }
        let colors = vec![color; coords.len()];
        RegionMask { coords, colors }
    }

    fn sample_set() -> RegionSet {
        RegionSet {
            width: 20,
            height: 12,
            forewings: SidePair::new(Some(square(1, 1, 3, Rgb([90, 80, 70]))), None),
            backwings: SidePair::new(None, Some(square(14, 6, 2, Rgb([40, 50, 60])))),
            body: Some(square(9, 2, 1, Rgb([5, 5, 5]))),
        }
    }

    #[test]
    fn boundary_drops_interior_pixels() {
        let region = square(1, 1, 3, Rgb([0, 0, 0]));
        let boundary = boundary_points(&region);
        assert_eq!(boundary.len(), 8);
        assert!(!boundary.contains(&(2, 2)));
        assert_eq!(boundary[0], (1, 1));
    }

    #[test]
    fn metadata_has_collaborator_shape() {
        let meta = ContourMeta::from_regions(&sample_set());
        let value = serde_json::to_value(&meta).unwrap();
        let contour = &value["components_contour"];

        assert_eq!(contour["forewings"]["left"].as_array().unwrap().len(), 8);
        assert!(contour["forewings"]["right"].as_array().unwrap().is_empty());
        assert!(contour["backwings"]["left"].as_array().unwrap().is_empty());
        assert_eq!(contour["backwings"]["right"].as_array().unwrap().len(), 4);
        assert_eq!(contour["body"], serde_json::json!([[9, 2]]));
    }

    #[test]
    fn writes_images_and_metadata_per_region() {
        let out = std::env::temp_dir().join(format!("moth_segment_output_{}", std::process::id()));
        let set = sample_set();

        let dir = write_outputs(&set, &out, "specimen").unwrap();
        assert_eq!(dir, out.join("specimen"));

        let meta: ContourMeta =
            serde_json::from_str(&fs::read_to_string(dir.join("specimen.json")).unwrap()).unwrap();
        assert_eq!(meta, ContourMeta::from_regions(&set));

        let fore = image::open(dir.join("specimen_fore_left.png")).unwrap().to_rgb8();
        assert_eq!(fore.dimensions(), (20, 12));
        assert_eq!(fore.get_pixel(2, 2), &Rgb([90, 80, 70]));
        assert_eq!(fore.get_pixel(10, 10), &Rgb([0, 0, 0]));

        assert!(dir.join("specimen_back_right.png").exists());
        assert!(dir.join("specimen_body.png").exists());
        assert!(!dir.join("specimen_fore_right.png").exists());

        fs::remove_dir_all(&out).ok();
    }
}
