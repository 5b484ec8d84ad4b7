use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use crate::errors::{Result, SegmentError};

/// Configuration for the segmentation tool
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub input_path: String,
    pub output_base_dir: String,

    /// Resize the source photograph before labeling (useful for large scans)
    #[serde(default)]
    pub resize_dimensions: Option<[u32; 2]>,

    /// Half-width of the column neighbourhood searched per mirror line sweep
    #[serde(default = "default_symmetry_scope")]
    pub symmetry_scope: u32,

    /// Grayscale value above which a pixel counts as background
    #[serde(default = "default_threshold_cutoff")]
    pub threshold_cutoff: u8,

    #[serde(default = "default_marker_radius")]
    pub marker_radius: i32,

    /// Scale applied to the stacked region preview
    #[serde(default = "default_preview_scale")]
    pub preview_scale: f32,

    #[serde(default = "default_parallel")]
    pub use_parallel: bool,

    /// Polling wait of the interactive loop
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

fn default_symmetry_scope() -> u32 {
    10
}

fn default_threshold_cutoff() -> u8 {
    250
}

fn default_marker_radius() -> i32 {
    2
}

fn default_preview_scale() -> f32 {
    0.5
}

fn default_parallel() -> bool {
    true
}

fn default_frame_interval_ms() -> u64 {
    16
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: "./input".to_string(),
            output_base_dir: "./output".to_string(),
            resize_dimensions: None,
            symmetry_scope: default_symmetry_scope(),
            threshold_cutoff: default_threshold_cutoff(),
            marker_radius: default_marker_radius(),
            preview_scale: default_preview_scale(),
            use_parallel: default_parallel(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SegmentError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            SegmentError::ConfigLoad { source, .. } => SegmentError::ConfigLoad {
                source,
                path: path.to_path_buf(),
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|source| SegmentError::ConfigLoad {
            source,
            path: PathBuf::from("<inline>"),
        })
    }

    /// Check the parameter ranges without touching the filesystem
    pub fn check_parameters(&self) -> Result<()> {
        if self.symmetry_scope == 0 {
            return Err(SegmentError::Config(
                "symmetry_scope must be > 0".to_string(),
            ));
        }

        if !(self.preview_scale > 0.0 && self.preview_scale <= 1.0) {
            return Err(SegmentError::Config(
                "preview_scale must be in (0.0, 1.0]".to_string(),
            ));
        }

        if self.marker_radius < 0 {
            return Err(SegmentError::Config(
                "marker_radius must be >= 0".to_string(),
            ));
        }

        if self.frame_interval_ms == 0 {
            return Err(SegmentError::Config(
                "frame_interval_ms must be > 0".to_string(),
            ));
        }

        if let Some([w, h]) = self.resize_dimensions {
            if w == 0 || h == 0 {
                return Err(SegmentError::Config(
                    "resize_dimensions must both be > 0".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Validate configuration and prepare the output directory
    pub fn validate(&self) -> Result<()> {
        let input_path = PathBuf::from(&self.input_path);
        if !input_path.is_file() {
            return Err(SegmentError::InvalidPath(input_path));
        }

        self.check_parameters()?;

        let base_dir = PathBuf::from(&self.output_base_dir);
        fs::create_dir_all(&base_dir).map_err(|e| {
            SegmentError::Io(io::Error::new(
                ErrorKind::Other,
                format!("Failed to create output directory: {}", e),
            ))
        })?;

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            SegmentError::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content)?;

        Ok(())
    }
}
