// src/types.rs - Shared geometric and labeling types

/// Pixel coordinate `(x, y)`, origin top-left
pub type Point = (u32, u32);

/// Points collected during one continuous pointer drag
pub type LabelBlock = Vec<Point>;

/// All committed blocks for one side, in drag order
pub type LabelTrack = Vec<LabelBlock>;

/// Which half of the specimen, relative to the mirror axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// A value held once per side
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidePair<T> {
    pub left: T,
    pub right: T,
}

impl<T> SidePair<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Highest y over every point of a track, if it has any
pub fn track_max_y(track: &LabelTrack) -> Option<u32> {
    track.iter().flatten().map(|&(_, y)| y).max()
}

/// Whether a track holds at least one point
pub fn track_has_points(track: &LabelTrack) -> bool {
    track.iter().any(|block| !block.is_empty())
}
