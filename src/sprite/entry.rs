use serde::Serialize;

use super::BYTES_PER_PIXEL;
use crate::packing::Rect;

/// Registry record for one registered sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Caller-assigned key, not required to be unique
    pub id: u64,
    /// Offset of the trimmed pixels inside the source (pixels trimmed from the
    /// left/top edge) and the original source size
    pub frame: Rect,
    /// Trimmed size and, once packed, the position on the page
    pub packed: Rect,
    /// Page this entry was placed on
    pub page: Option<usize>,
    /// The source had no visible pixel
    pub empty: bool,
    /// Byte offset of the trimmed pixels in the packer's pixel buffer
    pub memory_offset: usize,
}

impl Entry {
    /// An empty entry for a `width x height` source
    pub fn new(id: u64, width: u32, height: u32) -> Self {
        Self {
            id,
            frame: Rect::new(0, 0, width, height),
            packed: Rect::default(),
            page: None,
            empty: true,
            memory_offset: 0,
        }
    }

    /// Returns true if transparent borders were removed
    pub fn is_trimmed(&self) -> bool {
        self.packed.width != self.frame.width || self.packed.height != self.frame.height
    }

    /// Transparent margins removed by trimming (left, top, right, bottom)
    pub fn margins(&self) -> (u32, u32, u32, u32) {
        if self.empty {
            return (0, 0, self.frame.width, self.frame.height);
        }
        let right = self.frame.width - self.packed.width - self.frame.x;
        let bottom = self.frame.height - self.packed.height - self.frame.y;
        (self.frame.x, self.frame.y, right, bottom)
    }

    /// Size in bytes of the trimmed pixel data
    pub fn byte_len(&self) -> usize {
        if self.empty {
            0
        } else {
            self.packed.width as usize * self.packed.height as usize * BYTES_PER_PIXEL
        }
    }

    /// Forget any placement from a previous pack
    pub(crate) fn unplace(&mut self) {
        self.packed.x = 0;
        self.packed.y = 0;
        self.page = None;
    }
}
