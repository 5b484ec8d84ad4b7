// src/connected.rs - Connected component ranking and selection

use std::collections::BTreeMap;

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};

use crate::errors::{Result, SegmentError};
use crate::types::Point;

/// Geometric statistic used to rank components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentStat {
    /// Leftmost x coordinate
    Left,
    /// Topmost y coordinate
    Top,
    /// Bounding box width
    Width,
    /// Bounding box height
    Height,
    /// Pixel count
    Area,
}

/// Bounding box and area of one labelled component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentStats {
    pub label: u32,
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    pub area: u32,
}

impl ComponentStats {
    pub fn value(&self, by: ComponentStat) -> u32 {
        match by {
            ComponentStat::Left => self.left,
            ComponentStat::Top => self.top,
            ComponentStat::Width => self.width,
            ComponentStat::Height => self.height,
            ComponentStat::Area => self.area,
        }
    }
}

/// Label map of a binary image, 4-connected, zero pixels as background
pub fn label_components(threshold: &GrayImage) -> ImageBuffer<Luma<u32>, Vec<u32>> {
    connected_components(threshold, Connectivity::Four, Luma([0u8]))
}

/// Per-component statistics in ascending label order, background excluded
pub fn component_stats(labels: &ImageBuffer<Luma<u32>, Vec<u32>>) -> Vec<ComponentStats> {
    // (min_x, min_y, max_x, max_y, count)
    let mut bounds: BTreeMap<u32, (u32, u32, u32, u32, u32)> = BTreeMap::new();

    for (x, y, label) in labels.enumerate_pixels() {
        let label = label[0];
        if label == 0 {
            continue;
        }
        bounds
            .entry(label)
            .and_modify(|(min_x, min_y, max_x, max_y, count)| {
                *min_x = (*min_x).min(x);
                *min_y = (*min_y).min(y);
                *max_x = (*max_x).max(x);
                *max_y = (*max_y).max(y);
                *count += 1;
            })
            .or_insert((x, y, x, y, 1));
    }

    bounds
        .into_iter()
        .map(|(label, (min_x, min_y, max_x, max_y, count))| ComponentStats {
            label,
            left: min_x,
            top: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
            area: count,
        })
        .collect()
}

/// Coordinates of the `nth` (1-based) component when ranked descending by
/// `by`. Ties keep ascending label order. The background counts towards the
/// total, so `0 < nth < total` must hold; otherwise the call fails.
pub fn component_by(threshold: &GrayImage, nth: usize, by: ComponentStat) -> Result<Vec<Point>> {
    let labels = label_components(threshold);
    let mut stats = component_stats(&labels);
    let total = stats.len() + 1;

    if nth == 0 || nth >= total {
        return Err(SegmentError::ComponentRank { nth, total });
    }

    // Stable sort keeps label order among equal values
    stats.sort_by(|a, b| b.value(by).cmp(&a.value(by)));
    let chosen = stats[nth - 1].label;

    Ok(labels
        .enumerate_pixels()
        .filter(|(_, _, label)| label[0] == chosen)
        .map(|(x, y, _)| (x, y))
        .collect())
}

/// Largest component by area
pub fn largest_component(threshold: &GrayImage) -> Result<Vec<Point>> {
    component_by(threshold, 1, ComponentStat::Area)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Binary image with filled rectangles `(x, y, w, h)` on a zero background
    fn binary_with_rects(width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> GrayImage {
        let mut image = GrayImage::new(width, height);
        for &(rx, ry, rw, rh) in rects {
            for y in ry..ry + rh {
                for x in rx..rx + rw {
                    image.put_pixel(x, y, Luma([255]));
                }
            }
        }
        image
    }

    fn three_blobs() -> GrayImage {
        // Areas 100, 300, 200 in label order
        binary_with_rects(80, 40, &[(2, 2, 10, 10), (20, 2, 20, 15), (50, 2, 10, 20)])
    }

    #[test]
    fn ranks_by_area_descending() {
        let image = three_blobs();

        let first = component_by(&image, 1, ComponentStat::Area).unwrap();
        assert_eq!(first.len(), 300);
        assert!(first.iter().all(|&(x, _)| (20..40).contains(&x)));

        let second = component_by(&image, 2, ComponentStat::Area).unwrap();
        assert_eq!(second.len(), 200);

        let third = component_by(&image, 3, ComponentStat::Area).unwrap();
        assert_eq!(third.len(), 100);
        assert!(third.iter().all(|&(x, y)| x < 12 && y < 12));
    }

    #[test]
    fn out_of_range_ranks_are_rejected() {
        let image = three_blobs();
        assert!(matches!(
            component_by(&image, 4, ComponentStat::Area),
            Err(SegmentError::ComponentRank { nth: 4, total: 4 })
        ));
        assert!(matches!(
            component_by(&image, 0, ComponentStat::Area),
            Err(SegmentError::ComponentRank { nth: 0, .. })
        ));
    }

    #[test]
    fn empty_silhouette_is_an_error() {
        let image = GrayImage::new(10, 10);
        assert!(largest_component(&image).is_err());
    }

    #[test]
    fn ranks_by_other_statistics() {
        let image = three_blobs();
        // Rightmost blob first when ranking by left edge
        let by_left = component_by(&image, 1, ComponentStat::Left).unwrap();
        assert!(by_left.iter().all(|&(x, _)| x >= 50));

        let by_height = component_by(&image, 1, ComponentStat::Height).unwrap();
        assert_eq!(by_height.len(), 200);

        let by_width = component_by(&image, 1, ComponentStat::Width).unwrap();
        assert_eq!(by_width.len(), 300);
    }

    #[test]
    fn equal_statistics_keep_label_order() {
        let image = binary_with_rects(40, 10, &[(1, 1, 5, 5), (20, 1, 5, 5)]);
        let first = component_by(&image, 1, ComponentStat::Area).unwrap();
        assert!(first.iter().all(|&(x, _)| x < 10));
    }

    #[test]
    fn diagonal_neighbours_are_separate_components() {
        let mut image = GrayImage::new(4, 4);
        image.put_pixel(0, 0, Luma([255]));
        image.put_pixel(1, 1, Luma([255]));
        let stats = component_stats(&label_components(&image));
        assert_eq!(stats.len(), 2);
        assert!(stats.iter().all(|s| s.area == 1 && s.width == 1));
    }
}
