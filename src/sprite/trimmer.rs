use super::{BYTES_PER_PIXEL, PixelBuffer};
use crate::packing::Rect;

/// Find the smallest rectangle inside `source` holding a pixel with alpha > 0.
///
/// `pixels` is row-major RGBA8 data `stride` pixels wide, and `source` must lie
/// inside it. The returned rectangle is in the same coordinate space as
/// `source`. Returns `None` for a zero-area or fully transparent region.
pub fn trim_region(pixels: &[u8], stride: u32, source: Rect) -> Option<Rect> {
    let stride = stride as usize;
    let visible = |x: u32, y: u32| {
        let index = (y as usize * stride + x as usize) * BYTES_PER_PIXEL + 3;
        pixels.get(index).is_some_and(|&alpha| alpha > 0)
    };

    let (x_end, y_end) = (source.right(), source.bottom());

    let top = (source.y..y_end).find(|&y| (source.x..x_end).any(|x| visible(x, y)))?;
    let left = (source.x..x_end).find(|&x| (top..y_end).any(|y| visible(x, y)))?;
    let right = (left..x_end)
        .rev()
        .find(|&x| (top..y_end).any(|y| visible(x, y)))?
        + 1;
    let bottom = (top..y_end)
        .rev()
        .find(|&y| (left..right).any(|x| visible(x, y)))?
        + 1;

    Some(Rect::new(left, top, right - left, bottom - top))
}

/// Append the pixels of `region` to `buffer` row by row, returning the offset
pub fn copy_region(pixels: &[u8], stride: u32, region: Rect, buffer: &mut PixelBuffer) -> usize {
    let stride = stride as usize;
    let row_len = region.width as usize * BYTES_PER_PIXEL;
    let offset = buffer.position();

    // whole rows can go in one write
    if region.x == 0 && region.width as usize == stride {
        let start = region.y as usize * stride * BYTES_PER_PIXEL;
        buffer.write(&pixels[start..start + row_len * region.height as usize]);
        return offset;
    }

    for y in region.y..region.bottom() {
        let start = (y as usize * stride + region.x as usize) * BYTES_PER_PIXEL;
        buffer.write(&pixels[start..start + row_len]);
    }

    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn opaque(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]))
    }

    #[test]
    fn test_trim_fully_opaque() {
        let img = opaque(8, 8);
        let trimmed = trim_region(&img, 8, Rect::new(0, 0, 8, 8));
        assert_eq!(trimmed, Some(Rect::new(0, 0, 8, 8)));
    }

    #[test]
    fn test_trim_single_pixel() {
        let mut img = RgbaImage::new(10, 10);
        img.put_pixel(3, 4, Rgba([0, 0, 0, 1]));

        let trimmed = trim_region(&img, 10, Rect::new(0, 0, 10, 10));
        assert_eq!(trimmed, Some(Rect::new(3, 4, 1, 1)));
    }

    #[test]
    fn test_trim_with_transparent_border() {
        let mut img = RgbaImage::new(10, 10);
        for y in 3..7 {
            for x in 2..6 {
                img.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }

        let trimmed = trim_region(&img, 10, Rect::new(0, 0, 10, 10));
        assert_eq!(trimmed, Some(Rect::new(2, 3, 4, 4)));
    }

    #[test]
    fn test_trim_diagonal_extents() {
        // bounding box spans pixels that share no row or column
        let mut img = RgbaImage::new(10, 10);
        img.put_pixel(7, 1, Rgba([0, 0, 0, 255]));
        img.put_pixel(2, 8, Rgba([0, 0, 0, 255]));

        let trimmed = trim_region(&img, 10, Rect::new(0, 0, 10, 10));
        assert_eq!(trimmed, Some(Rect::new(2, 1, 6, 8)));
    }

    #[test]
    fn test_trim_respects_source_rect() {
        let mut img = RgbaImage::new(16, 16);
        img.put_pixel(1, 1, Rgba([0, 0, 0, 255]));
        img.put_pixel(10, 12, Rgba([0, 0, 0, 255]));

        // the pixel at (1, 1) is outside the source and ignored
        let trimmed = trim_region(&img, 16, Rect::new(8, 8, 8, 8));
        assert_eq!(trimmed, Some(Rect::new(10, 12, 1, 1)));
    }

    #[test]
    fn test_trim_fully_transparent() {
        let img = RgbaImage::new(10, 10);
        assert_eq!(trim_region(&img, 10, Rect::new(0, 0, 10, 10)), None);
    }

    #[test]
    fn test_trim_zero_area() {
        let img = opaque(4, 4);
        assert_eq!(trim_region(&img, 4, Rect::new(1, 1, 0, 3)), None);
    }

    #[test]
    fn test_copy_region_rows() {
        let mut img = RgbaImage::new(4, 4);
        img.put_pixel(1, 1, Rgba([1, 2, 3, 4]));
        img.put_pixel(2, 2, Rgba([5, 6, 7, 8]));

        let mut buffer = PixelBuffer::new();
        let offset = copy_region(&img, 4, Rect::new(1, 1, 2, 2), &mut buffer);

        assert_eq!(offset, 0);
        assert_eq!(
            buffer.read(0, 16),
            Some(&[1, 2, 3, 4, 0, 0, 0, 0, 0, 0, 0, 0, 5, 6, 7, 8][..])
        );
    }

    #[test]
    fn test_copy_region_full_rows() {
        let img = opaque(3, 2);
        let mut buffer = PixelBuffer::new();
        buffer.write(&[9; 4]);

        let offset = copy_region(&img, 3, Rect::new(0, 0, 3, 2), &mut buffer);
        assert_eq!(offset, 4);
        assert_eq!(buffer.len(), 4 + 3 * 2 * 4);
    }
}
