use serde::{Deserialize, Serialize};

/// Packing parameters, fixed for the lifetime of a [`Packer`](super::Packer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackerConfig {
    /// Maximum page edge length in pixels
    pub max_size: u32,
    /// Round page dimensions up to powers of two
    pub power_of_two: bool,
    /// Extra gap reserved to the right of and below every sprite
    pub spacing: u32,
    /// Edge-replication margin around every sprite
    pub padding: u32,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            max_size: 8192,
            power_of_two: true,
            spacing: 1,
            padding: 1,
        }
    }
}

impl PackerConfig {
    pub fn new(max_size: u32, spacing: u32, power_of_two: bool) -> Self {
        Self {
            max_size,
            power_of_two,
            spacing,
            ..Self::default()
        }
    }

    pub fn max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn power_of_two(mut self, pot: bool) -> Self {
        self.power_of_two = pot;
        self
    }

    pub fn spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Space a sprite occupies beyond its trimmed size on each axis
    pub fn margin(&self) -> u32 {
        self.padding * 2 + self.spacing
    }
}
