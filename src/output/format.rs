use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use image::{DynamicImage, ImageFormat, RgbImage};
use log::debug;

use crate::atlas::Page;
use crate::cli::CompressionLevel;
use crate::error::PackerError;

/// Save a page image as PNG, optionally with compression
pub fn save_page_image(
    page: &Page,
    path: &Path,
    opaque: bool,
    compress: Option<CompressionLevel>,
) -> Result<()> {
    let png_data = encode_png(page, path, opaque)?;

    let output_data = if let Some(level) = compress {
        let opts = match level {
            CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
            CompressionLevel::Max => oxipng::Options::max_compression(),
        };
        let optimized = oxipng::optimize_from_memory(&png_data, &opts).map_err(|e| {
            PackerError::PngCompress {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        debug!(
            "Compressed {} from {} to {} bytes",
            path.display(),
            png_data.len(),
            optimized.len()
        );
        optimized
    } else {
        png_data
    };

    fs::write(path, output_data).map_err(|e| PackerError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

fn encode_png(page: &Page, path: &Path, opaque: bool) -> Result<Vec<u8>, PackerError> {
    let mut png_data = Cursor::new(Vec::new());
    let written = if opaque {
        let rgb: RgbImage = DynamicImage::ImageRgba8(page.image.clone()).into_rgb8();
        rgb.write_to(&mut png_data, ImageFormat::Png)
    } else {
        page.image.write_to(&mut png_data, ImageFormat::Png)
    };

    written.map_err(|e| PackerError::ImageSave {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(png_data.into_inner())
}
