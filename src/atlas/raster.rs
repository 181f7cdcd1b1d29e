use image::RgbaImage;

use crate::packing::Rect;
use crate::sprite::BYTES_PER_PIXEL;

/// Copy row-major RGBA8 `pixels` of `dst.width x dst.height` into `image`
/// at `dst`. Anything outside the image is clipped.
pub fn blit(image: &mut RgbaImage, dst: Rect, pixels: &[u8]) {
    let (image_width, image_height) = image.dimensions();
    let Rect { x, y, .. } = dst;
    if x >= image_width || y >= image_height || dst.is_empty() {
        return;
    }

    let columns = dst.width.min(image_width - x) as usize;
    let rows = dst.height.min(image_height - y) as usize;
    let src_stride = dst.width as usize * BYTES_PER_PIXEL;
    let dst_stride = image_width as usize * BYTES_PER_PIXEL;
    let row_len = columns * BYTES_PER_PIXEL;

    let target: &mut [u8] = image;
    for (row, src_row) in pixels.chunks_exact(src_stride).take(rows).enumerate() {
        let start = (y as usize + row) * dst_stride + x as usize * BYTES_PER_PIXEL;
        target[start..start + row_len].copy_from_slice(&src_row[..row_len]);
    }
}

/// Draw a sprite at `dst`, first smearing it `padding` pixels outward on
/// both axes so the padding ring repeats the sprite's edge colors.
pub fn draw_sprite(image: &mut RgbaImage, dst: Rect, pixels: &[u8], padding: u32) {
    if padding > 0 {
        let shifted = |x, y| Rect { x, y, ..dst };
        blit(image, shifted(dst.x.saturating_sub(padding), dst.y), pixels);
        blit(image, shifted(dst.x + padding, dst.y), pixels);
        blit(image, shifted(dst.x, dst.y.saturating_sub(padding)), pixels);
        blit(image, shifted(dst.x, dst.y + padding), pixels);
    }

    // centered copy last, it is the authoritative one
    blit(image, dst, pixels);
}
