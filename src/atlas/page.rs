use image::RgbaImage;

/// A rasterized output page
#[derive(Debug, Clone)]
pub struct Page {
    /// Page index (for multi-page output)
    pub index: usize,
    /// Page width
    pub width: u32,
    /// Page height
    pub height: u32,
    /// Rendered page image
    pub image: RgbaImage,
    /// Share of the page covered by sprite pixels (0.0 to 1.0)
    pub occupancy: f64,
}

impl Page {
    pub fn new(index: usize, width: u32, height: u32) -> Self {
        Self {
            index,
            width,
            height,
            image: RgbaImage::new(width, height),
            occupancy: 0.0,
        }
    }
}
