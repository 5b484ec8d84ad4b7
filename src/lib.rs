// src/lib.rs - Library interface for symmetry-guided specimen segmentation

pub mod config;
pub mod connected;
pub mod curve;
pub mod errors;
pub mod gui;
pub mod image_io;
pub mod image_utils;
pub mod labeling;
pub mod output;
pub mod regions;
pub mod render;
pub mod symmetry;
pub mod types;

// Re-export commonly used types and functions
pub use errors::{SegmentError, Result};
pub use config::Config;
pub use image_io::{InputImage, load_image, save_image};

pub use labeling::{
    Flow,
    InputEvent,
    KeyCommand,
    LabelSession,
    Modifiers,
    Phase,
    PointerKind,
    SideState,
};

pub use symmetry::{estimate_mirror_axis, MirrorAxis};
pub use curve::{fix_track, interpolate_block, ClearMode, CurveCut};
pub use connected::{component_by, largest_component, ComponentStat};
pub use regions::{RegionId, RegionMask, RegionSet, RegionSplitter};
pub use output::{write_outputs, ContourMeta};
pub use types::{LabelBlock, LabelTrack, Point, Side, SidePair};
