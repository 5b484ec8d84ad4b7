// src/regions.rs - Splitting the specimen into forewing, backwing and body regions

use image::{Rgb, RgbImage};

use crate::connected::largest_component;
use crate::curve::{fix_track, ClearMode};
use crate::errors::Result;
use crate::image_utils::{
    binary_threshold_inv, fill, gather, scatter, white_out_columns, white_out_rows, MaskBuffer,
    WHITE,
};
use crate::types::{track_has_points, track_max_y, LabelTrack, Point, Side, SidePair};

/// Anatomical region identifiers, also used as mask buffer values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RegionId {
    ForewingLeft = 1,
    ForewingRight = 2,
    BackwingLeft = 3,
    BackwingRight = 4,
    Body = 5,
}

impl RegionId {
    pub const ALL: [RegionId; 5] = [
        RegionId::ForewingLeft,
        RegionId::ForewingRight,
        RegionId::BackwingLeft,
        RegionId::BackwingRight,
        RegionId::Body,
    ];

    pub fn forewing(side: Side) -> Self {
        match side {
            Side::Left => RegionId::ForewingLeft,
            Side::Right => RegionId::ForewingRight,
        }
    }

    pub fn backwing(side: Side) -> Self {
        match side {
            Side::Left => RegionId::BackwingLeft,
            Side::Right => RegionId::BackwingRight,
        }
    }

    /// File name suffix used when the region is exported
    pub fn suffix(self) -> &'static str {
        match self {
            RegionId::ForewingLeft => "fore_left",
            RegionId::ForewingRight => "fore_right",
            RegionId::BackwingLeft => "back_left",
            RegionId::BackwingRight => "back_right",
            RegionId::Body => "body",
        }
    }
}

/// Pixel coordinates of a region plus the source colors at those pixels
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegionMask {
    pub coords: Vec<Point>,
    pub colors: Vec<Rgb<u8>>,
}

impl RegionMask {
    pub fn from_coords(image: &RgbImage, coords: Vec<Point>) -> Self {
        let colors = gather(image, &coords);
        Self { coords, colors }
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Paint the region's colors onto a copy of `background`
    pub fn paint_onto(&self, background: &mut RgbImage) {
        scatter(background, &self.coords, &self.colors);
    }
}

/// Every region produced by one split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSet {
    pub width: u32,
    pub height: u32,
    pub forewings: SidePair<Option<RegionMask>>,
    pub backwings: SidePair<Option<RegionMask>>,
    pub body: Option<RegionMask>,
}

impl RegionSet {
    pub fn region(&self, id: RegionId) -> Option<&RegionMask> {
        match id {
            RegionId::ForewingLeft => self.forewings.left.as_ref(),
            RegionId::ForewingRight => self.forewings.right.as_ref(),
            RegionId::BackwingLeft => self.backwings.left.as_ref(),
            RegionId::BackwingRight => self.backwings.right.as_ref(),
            RegionId::Body => self.body.as_ref(),
        }
    }

    /// Present regions in `RegionId::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &RegionMask)> + '_ {
        RegionId::ALL
            .into_iter()
            .filter_map(move |id| self.region(id).map(|mask| (id, mask)))
    }

    fn wings(&self) -> impl Iterator<Item = &RegionMask> + '_ {
        [
            &self.forewings.left,
            &self.forewings.right,
            &self.backwings.left,
            &self.backwings.right,
        ]
        .into_iter()
        .flatten()
    }

    /// One byte per pixel with the owning region id, plus the number of
    /// pixels claimed by more than one region
    pub fn mask_buffer(&self) -> (MaskBuffer, usize) {
        let mut mask = MaskBuffer::new(self.width, self.height);
        let conflicts = self
            .iter()
            .map(|(id, region)| mask.assign(&region.coords, id as u8))
            .sum();
        (mask, conflicts)
    }
}

/// Carves wing and body regions out of the source image from label tracks
pub struct RegionSplitter<'a> {
    source: &'a RgbImage,
    cutoff: u8,
}

impl<'a> RegionSplitter<'a> {
    pub fn new(source: &'a RgbImage, cutoff: u8) -> Self {
        Self { source, cutoff }
    }

    /// Largest dark silhouette of a candidate image
    fn extract(&self, candidate: &RgbImage) -> Result<RegionMask> {
        let threshold = binary_threshold_inv(candidate, self.cutoff);
        let coords = largest_component(&threshold)?;
        Ok(RegionMask::from_coords(candidate, coords))
    }

    /// Source copy with the half-plane beyond the side's guard line painted white
    fn side_candidate(&self, side: Side, guard_x: u32) -> RgbImage {
        let mut image = self.source.clone();
        let width = image.width();
        match side {
            Side::Left => white_out_columns(&mut image, guard_x..width),
            Side::Right => white_out_columns(&mut image, 0..guard_x),
        }
        image
    }

    /// Forewing and backwing of one side
    fn split_side(&self, side: Side, guard_x: u32, track: &LabelTrack) -> Result<Option<(RegionMask, RegionMask)>> {
        let Some(max_y) = track_max_y(track) else {
            return Ok(None);
        };
        let height = self.source.height();

        let mut forewing = self.side_candidate(side, guard_x);
        white_out_rows(&mut forewing, max_y..height);
        let cut = fix_track(&forewing, track, ClearMode::Below);

        // Pixels the curve removed from the forewing belong to the backwing
        let mut backwing = self.side_candidate(side, guard_x);
        white_out_rows(&mut backwing, 0..max_y);
        for (x, y, flag) in cut.erased_mask.enumerate_pixels() {
            if flag[0] != 0 {
                backwing.put_pixel(x, y, *self.source.get_pixel(x, y));
            }
        }

        let fore = self.extract(&cut.fixed)?;
        let back = self.extract(&backwing)?;
        log::info!(
            "Split {} side: forewing {} px, backwing {} px",
            side.name(),
            fore.len(),
            back.len()
        );
        Ok(Some((fore, back)))
    }

    /// Recompute every region. Sides whose tracks carry no points are left
    /// empty; returns `None` when neither side has points.
    pub fn split(&self, axis_x: u32, shift: u32, tracks: &SidePair<LabelTrack>) -> Result<Option<RegionSet>> {
        if !Side::BOTH.iter().any(|&side| track_has_points(tracks.get(side))) {
            return Ok(None);
        }

        let (width, height) = self.source.dimensions();
        let mut set = RegionSet {
            width,
            height,
            forewings: SidePair::default(),
            backwings: SidePair::default(),
            body: None,
        };

        for side in Side::BOTH {
            let guard_x = match side {
                Side::Left => axis_x.saturating_sub(shift),
                Side::Right => axis_x.saturating_add(shift).min(width),
            };
            if let Some((fore, back)) = self.split_side(side, guard_x, tracks.get(side))? {
                *set.forewings.get_mut(side) = Some(fore);
                *set.backwings.get_mut(side) = Some(back);
            }
        }

        let mut body = self.source.clone();
        for wing in set.wings() {
            fill(&mut body, &wing.coords, WHITE);
        }
        let body = self.extract(&body)?;
        log::info!("Split body: {} px", body.len());
        set.body = Some(body);

        Ok(Some(set))
    }
}
