use serde::{Deserialize, Serialize};

use crate::atlas::PackerConfig;

/// PNG compression level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// Project file structure (`.atlaspack`, JSON).
///
/// All paths in the file are relative to its location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project file version (currently 1)
    pub version: u32,
    /// Input file paths or glob patterns
    pub input: Vec<String>,
    /// Output directory for page images and metadata
    pub output_dir: String,
    /// Base name for output files (atlas.png, atlas.json, etc.)
    pub name: String,
    /// Maximum page edge length in pixels
    pub max_size: u32,
    /// Round page dimensions up to powers of two
    pub power_of_two: bool,
    /// Gap reserved between packed sprites
    pub spacing: u32,
    /// Edge-replication margin around every sprite
    pub padding: u32,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
    /// Output RGB instead of RGBA (opaque pages)
    pub opaque: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        let packer = PackerConfig::default();
        Self {
            version: 1,
            input: Vec::new(),
            output_dir: ".".to_string(),
            name: "atlas".to_string(),
            max_size: packer.max_size,
            power_of_two: packer.power_of_two,
            spacing: packer.spacing,
            padding: packer.padding,
            compress: None,
            opaque: false,
        }
    }
}

impl ProjectConfig {
    /// Packing parameters described by this project
    pub fn packer_config(&self) -> PackerConfig {
        PackerConfig {
            max_size: self.max_size,
            power_of_two: self.power_of_two,
            spacing: self.spacing,
            padding: self.padding,
        }
    }
}
