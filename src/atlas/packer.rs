use std::path::Path;

use image::RgbaImage;
use log::{debug, info, warn};

use super::{Page, PackerConfig, raster};
use crate::error::{PackerError, Result};
use crate::packing::{GrowingTree, NodeArena, Rect};
use crate::sprite::{BYTES_PER_PIXEL, Entry, PixelBuffer, copy_region, load_image, trim_region};

/// Collects sprites and packs them into atlas pages.
///
/// Sprites are trimmed as they are registered and their visible pixels kept
/// in an internal buffer. [`pack`](Packer::pack) then lays every entry out
/// from scratch and renders the pages.
#[derive(Debug, Default)]
pub struct Packer {
    config: PackerConfig,
    entries: Vec<Entry>,
    buffer: PixelBuffer,
    pages: Vec<Page>,
    dirty: bool,
}

impl Packer {
    pub fn new(config: PackerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &PackerConfig {
        &self.config
    }

    /// Register a sprite from a whole row-major RGBA8 buffer
    pub fn add(&mut self, id: u64, width: u32, height: u32, pixels: &[u8]) {
        self.add_entry(id, pixels, width, height, Rect::new(0, 0, width, height));
    }

    /// Register a whole image
    pub fn add_image(&mut self, id: u64, image: &RgbaImage) {
        let (width, height) = image.dimensions();
        self.add_entry(id, image, width, height, Rect::new(0, 0, width, height));
    }

    /// Register the `source` region of an image
    pub fn add_region(&mut self, id: u64, image: &RgbaImage, source: Rect) {
        let (width, height) = image.dimensions();
        self.add_entry(id, image, width, height, source);
    }

    /// Decode an image file and register it
    pub fn add_file(&mut self, id: u64, path: impl AsRef<Path>) -> Result<()> {
        let image = load_image(path.as_ref())?;
        self.add_image(id, &image);
        Ok(())
    }

    fn add_entry(&mut self, id: u64, pixels: &[u8], width: u32, height: u32, source: Rect) {
        self.dirty = true;

        let mut entry = Entry::new(id, source.width, source.height);

        // never read past the rows actually present in `pixels`
        let row_bytes = width as usize * BYTES_PER_PIXEL;
        let rows = if row_bytes == 0 {
            0
        } else {
            u32::try_from(pixels.len() / row_bytes).unwrap_or(u32::MAX)
        };
        let region = source.clamp_to(width, height.min(rows));
        if region != source {
            warn!(
                "Sprite {} source {:?} exceeds its {}x{} pixel data, clipped to {:?}",
                id, source, width, height, region
            );
        }

        if let Some(trimmed) = trim_region(pixels, width, region) {
            entry.empty = false;
            entry.frame.x = trimmed.x - source.x;
            entry.frame.y = trimmed.y - source.y;
            entry.packed = Rect::new(0, 0, trimmed.width, trimmed.height);
            entry.memory_offset = copy_region(pixels, width, trimmed, &mut self.buffer);
        } else {
            debug!("Sprite {} has no visible pixels", id);
        }

        self.entries.push(entry);
    }

    /// All registered entries in registration order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Pages produced by the last successful pack
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Returns true if sprites were added since the last successful pack
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Bytes of trimmed pixel data held for registered sprites
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    /// Lay out every entry and render the pages.
    ///
    /// Does nothing if no sprite was added since the last successful call.
    /// Fails with [`PackerError::SpriteTooLarge`] if a sprite and its margins
    /// cannot fit in `max_size`; no pages exist afterwards and the packer
    /// stays dirty so the call can be repeated.
    pub fn pack(&mut self) -> Result<()> {
        if !self.dirty {
            debug!("Nothing changed since the last pack");
            return Ok(());
        }

        self.pages.clear();
        for entry in &mut self.entries {
            entry.unplace();
        }

        self.check_sizes()?;

        let pages = self.layout_pages();

        info!(
            "Packed {} sprites into {} page(s)",
            self.entries.len(),
            pages.len()
        );

        self.pages = pages;
        self.dirty = false;
        Ok(())
    }

    fn check_sizes(&self) -> Result<()> {
        let margin = self.config.margin();
        let max_size = self.config.max_size;

        let too_large = self.entries.iter().filter(|e| !e.empty).find(|e| {
            e.packed.width + margin > max_size || e.packed.height + margin > max_size
        });

        match too_large {
            Some(entry) => Err(PackerError::SpriteTooLarge {
                id: entry.id,
                width: entry.packed.width + margin,
                height: entry.packed.height + margin,
                max_size,
            }),
            None => Ok(()),
        }
    }

    fn layout_pages(&mut self) -> Vec<Page> {
        let PackerConfig {
            max_size,
            power_of_two,
            padding,
            ..
        } = self.config;
        let margin = self.config.margin();

        // largest first; the sort is stable so equal areas keep registration order
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by(|&a, &b| {
            let area_a = self.entries[a].packed.area();
            let area_b = self.entries[b].packed.area();
            area_b.cmp(&area_a)
        });

        let mut arena = NodeArena::with_entry_capacity(order.len());
        let mut pages = Vec::new();
        let mut cursor = 0;

        while cursor < order.len() {
            if self.entries[order[cursor]].empty {
                cursor += 1;
                continue;
            }

            let index = pages.len();
            let from = cursor;
            let first = self.entries[order[from]].packed;
            let mut tree = GrowingTree::new(
                &mut arena,
                first.width + margin,
                first.height + margin,
                max_size,
            );

            while cursor < order.len() {
                let entry = &mut self.entries[order[cursor]];
                if entry.empty {
                    entry.page = Some(index);
                    cursor += 1;
                    continue;
                }

                let Some(slot) = tree.insert(entry.packed.width + margin, entry.packed.height + margin)
                else {
                    break;
                };

                entry.packed.x = slot.x + padding;
                entry.packed.y = slot.y + padding;
                entry.page = Some(index);
                cursor += 1;
            }

            let bounds = tree.bounds();
            let (width, height) = if power_of_two {
                (
                    next_power_of_two(bounds.width),
                    next_power_of_two(bounds.height),
                )
            } else {
                (bounds.width, bounds.height)
            };

            let page = self.render_page(index, width, height, &order[from..cursor]);
            info!(
                "Page {}: {}x{} with {} sprites ({:.1}% efficiency, {} nodes)",
                index,
                width,
                height,
                cursor - from,
                page.occupancy * 100.0,
                arena.len()
            );
            pages.push(page);
        }

        pages
    }

    fn render_page(&self, index: usize, width: u32, height: u32, members: &[usize]) -> Page {
        let mut page = Page::new(index, width, height);
        let mut covered = 0u64;

        for entry in members.iter().map(|&i| &self.entries[i]) {
            if entry.empty {
                continue;
            }

            match self.buffer.read(entry.memory_offset, entry.byte_len()) {
                Some(pixels) => {
                    raster::draw_sprite(&mut page.image, entry.packed, pixels, self.config.padding);
                    covered += entry.packed.area();
                }
                None => warn!("Sprite {} has no pixel data, left blank", entry.id),
            }
        }

        let area = u64::from(width) * u64::from(height);
        if area > 0 {
            page.occupancy = covered as f64 / area as f64;
        }

        page
    }

    /// Drop all entries, pages and buffered pixels, keeping the configuration
    pub fn clear(&mut self) {
        self.pages.clear();
        self.entries.clear();
        self.buffer.clear();
        self.dirty = false;
    }

    /// Release every allocation held by the packer
    pub fn dispose(mut self) {
        debug!(
            "Disposing packer with {} entries and {} bytes of pixels",
            self.entries.len(),
            self.buffer.len()
        );
        self.pages = Vec::new();
        self.entries = Vec::new();
        self.buffer.release();
    }
}

fn next_power_of_two(n: u32) -> u32 {
    if n == 0 {
        return 1;
    }
    let mut v = n - 1;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    v + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]))
    }

    fn unpadded() -> PackerConfig {
        PackerConfig::default()
            .padding(0)
            .spacing(0)
            .power_of_two(false)
    }

    #[test]
    fn test_next_power_of_two() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(2), 2);
        assert_eq!(next_power_of_two(3), 4);
        assert_eq!(next_power_of_two(5), 8);
        assert_eq!(next_power_of_two(100), 128);
        assert_eq!(next_power_of_two(1000), 1024);
    }

    #[test]
    fn test_single_sprite_position_accounts_for_padding() {
        let mut packer = Packer::new(PackerConfig::default().padding(2).spacing(1));
        packer.add_image(1, &solid(4, 4));
        packer.pack().unwrap();

        let entry = &packer.entries()[0];
        assert_eq!(entry.page, Some(0));
        assert_eq!((entry.packed.x, entry.packed.y), (2, 2));

        // 4 + 2 * 2 + 1 = 9, rounded up
        let page = &packer.pages()[0];
        assert_eq!((page.width, page.height), (16, 16));
    }

    #[test]
    fn test_exact_page_size_without_power_of_two() {
        let mut packer = Packer::new(unpadded());
        packer.add_image(1, &solid(10, 10));
        packer.add_image(2, &solid(10, 10));
        packer.pack().unwrap();

        let page = &packer.pages()[0];
        assert_eq!((page.width, page.height), (20, 10));
        assert!((page.occupancy - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_trims_and_records_frame() {
        let mut image = RgbaImage::new(10, 10);
        image.put_pixel(3, 4, Rgba([9, 9, 9, 255]));

        let mut packer = Packer::default();
        packer.add_image(5, &image);

        let entry = packer.entries()[0];
        assert!(!entry.empty);
        assert_eq!(entry.frame, Rect::new(3, 4, 10, 10));
        assert_eq!((entry.packed.width, entry.packed.height), (1, 1));
        assert_eq!(packer.buffer_len(), BYTES_PER_PIXEL);
        assert!(packer.is_dirty());
    }

    #[test]
    fn test_add_raw_pixels() {
        let pixels = solid(8, 8).into_raw();
        let mut packer = Packer::default();
        packer.add(1, 8, 8, &pixels);

        let entry = packer.entries()[0];
        assert_eq!(entry.frame, Rect::new(0, 0, 8, 8));
        assert_eq!(entry.packed, Rect::new(0, 0, 8, 8));
        assert_eq!(packer.buffer_len(), 8 * 8 * BYTES_PER_PIXEL);
    }

    #[test]
    fn test_add_region_offsets_frame_from_source() {
        let mut image = RgbaImage::new(16, 16);
        image.put_pixel(10, 12, Rgba([1, 1, 1, 255]));
        image.put_pixel(1, 1, Rgba([1, 1, 1, 255]));

        let mut packer = Packer::default();
        packer.add_region(1, &image, Rect::new(8, 8, 8, 8));

        let entry = packer.entries()[0];
        assert_eq!(entry.frame, Rect::new(2, 4, 8, 8));
        assert_eq!((entry.packed.width, entry.packed.height), (1, 1));
    }

    #[test]
    fn test_add_region_clips_to_image() {
        let mut packer = Packer::default();
        packer.add_region(1, &solid(4, 4), Rect::new(2, 2, 10, 10));

        let entry = packer.entries()[0];
        // frame keeps the requested source size
        assert_eq!(entry.frame, Rect::new(0, 0, 10, 10));
        assert_eq!((entry.packed.width, entry.packed.height), (2, 2));
    }

    #[test]
    fn test_short_pixel_slice_is_not_read_past() {
        let pixels = vec![255u8; 4 * 4 * BYTES_PER_PIXEL];
        let mut packer = Packer::default();
        // claims 8 rows but only 4 are present
        packer.add(1, 4, 8, &pixels);

        let entry = packer.entries()[0];
        assert_eq!((entry.packed.width, entry.packed.height), (4, 4));
    }

    #[test]
    fn test_empty_sources() {
        let mut packer = Packer::default();
        packer.add_image(1, &RgbaImage::new(12, 6));
        packer.add(2, 0, 0, &[]);

        for entry in packer.entries() {
            assert!(entry.empty);
            assert_eq!(entry.packed.width, 0);
            assert_eq!(entry.packed.height, 0);
        }
        assert_eq!(packer.entries()[0].frame, Rect::new(0, 0, 12, 6));
        assert_eq!(packer.buffer_len(), 0);

        packer.pack().unwrap();
        assert!(packer.pages().is_empty());
        assert!(packer.entries().iter().all(|e| e.page.is_none()));
    }

    #[test]
    fn test_empty_entries_ride_along_with_last_page() {
        let mut packer = Packer::new(unpadded());
        packer.add_image(1, &RgbaImage::new(4, 4));
        packer.add_image(2, &solid(4, 4));
        packer.pack().unwrap();

        assert_eq!(packer.pages().len(), 1);
        assert_eq!(packer.entries()[0].page, Some(0));
        assert_eq!(packer.entries()[1].page, Some(0));
    }

    #[test]
    fn test_pack_is_idempotent() {
        let mut packer = Packer::default();
        packer.add_image(1, &solid(5, 7));
        packer.add_image(2, &solid(9, 3));

        packer.pack().unwrap();
        assert!(!packer.is_dirty());
        let entries = packer.entries().to_vec();
        let first = packer.pages()[0].image.clone();

        packer.pack().unwrap();
        assert_eq!(packer.entries(), &entries[..]);
        assert_eq!(packer.pages()[0].image, first);
    }

    #[test]
    fn test_oversized_sprite_fails_and_stays_dirty() {
        let mut packer = Packer::new(PackerConfig::default().max_size(16));
        packer.add_image(1, &solid(4, 4));
        packer.pack().unwrap();
        assert_eq!(packer.pages().len(), 1);

        // 14 + 2 * 1 + 1 = 17 > 16
        packer.add_image(2, &solid(14, 4));
        let err = packer.pack().unwrap_err();

        assert!(matches!(
            err,
            PackerError::SpriteTooLarge {
                id: 2,
                width: 17,
                max_size: 16,
                ..
            }
        ));
        assert!(packer.pages().is_empty());
        assert!(packer.is_dirty());
        assert!(packer.entries().iter().all(|e| e.page.is_none()));
    }

    #[test]
    fn test_clear_keeps_config() {
        let config = PackerConfig::default().max_size(256).padding(3);
        let mut packer = Packer::new(config);
        packer.add_image(1, &solid(4, 4));
        packer.pack().unwrap();

        packer.clear();
        assert!(packer.entries().is_empty());
        assert!(packer.pages().is_empty());
        assert_eq!(packer.buffer_len(), 0);
        assert!(!packer.is_dirty());
        assert_eq!(*packer.config(), config);
    }

    #[test]
    fn test_add_after_pack_repacks() {
        let mut packer = Packer::new(unpadded());
        packer.add_image(1, &solid(8, 8));
        packer.pack().unwrap();
        assert_eq!(packer.pages()[0].width, 8);

        packer.add_image(2, &solid(8, 8));
        assert!(packer.is_dirty());
        packer.pack().unwrap();
        assert_eq!(packer.pages()[0].width, 16);
    }

    #[test]
    fn test_add_file() {
        let path = std::env::temp_dir().join(format!("atlaspack-add-file-{}.png", std::process::id()));
        solid(3, 5).save(&path).unwrap();

        let mut packer = Packer::default();
        packer.add_file(4, &path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let entry = packer.entries()[0];
        assert_eq!(entry.id, 4);
        assert_eq!((entry.packed.width, entry.packed.height), (3, 5));

        assert!(matches!(
            packer.add_file(5, "/no/such/sprite.png"),
            Err(PackerError::ImageLoad { .. })
        ));
        assert_eq!(packer.entries().len(), 1);
    }
}
