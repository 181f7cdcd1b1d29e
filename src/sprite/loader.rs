use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{ImageReader, RgbaImage};
use log::{debug, info};
use rayon::prelude::*;

use crate::error::{self, PackerError};

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Image path with its base directory for computing relative names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePath {
    pub path: PathBuf,
    pub base: Option<PathBuf>,
}

/// A decoded input image ready to be registered with a packer
#[derive(Debug)]
pub struct LoadedImage {
    pub path: PathBuf,
    /// Relative path for directory inputs, file name otherwise
    pub name: String,
    pub image: RgbaImage,
}

/// Decode a single image file into RGBA8
pub fn load_image(path: &Path) -> error::Result<RgbaImage> {
    let img = ImageReader::open(path)
        .map_err(|e| PackerError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .with_guessed_format()
        .map_err(|e| PackerError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| PackerError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?
        .into_rgba8();

    debug!(
        "Decoded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );

    Ok(img)
}

/// Expand input files and directories into the list of images to load.
///
/// Directories are walked recursively; entries are sorted so the result does
/// not depend on file system iteration order.
pub fn collect_image_paths(inputs: &[impl AsRef<Path>]) -> Result<Vec<ImagePath>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(PackerError::InputNotFound(path.to_path_buf()).into());
        }

        if path.is_file() {
            if is_supported_image(path) {
                paths.push(ImagePath {
                    path: path.to_path_buf(),
                    base: None,
                });
            }
        } else if path.is_dir() {
            collect_from_directory(path, path, &mut paths)?;
        }
    }

    Ok(paths)
}

fn collect_from_directory(base: &Path, dir: &Path, paths: &mut Vec<ImagePath>) -> Result<()> {
    let mut children = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    children.sort();

    for path in children {
        if path.is_file() && is_supported_image(&path) {
            paths.push(ImagePath {
                path,
                base: Some(base.to_path_buf()),
            });
        } else if path.is_dir() {
            collect_from_directory(base, &path, paths)?;
        }
    }

    Ok(())
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Decode every image in parallel, keeping the input order
pub fn load_images(paths: &[ImagePath]) -> Result<Vec<LoadedImage>> {
    if paths.is_empty() {
        return Err(PackerError::NoImages.into());
    }

    info!("Loading {} images...", paths.len());

    let images = paths
        .par_iter()
        .map(|img_path| -> Result<LoadedImage> {
            let image = load_image(&img_path.path)?;
            Ok(LoadedImage {
                path: img_path.path.clone(),
                name: sprite_name(img_path),
                image,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(images)
}

fn sprite_name(img_path: &ImagePath) -> String {
    match &img_path.base {
        Some(base_dir) => img_path
            .path
            .strip_prefix(base_dir)
            .unwrap_or(&img_path.path)
            .to_string_lossy()
            .replace('\\', "/"),
        None => img_path
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string(),
    }
}
