use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackerError {
    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("No valid images found in input")]
    NoImages,

    #[error(
        "Sprite {id} ({width}x{height} with margins) is larger than the maximum page size ({max_size})"
    )]
    SpriteTooLarge {
        id: u64,
        width: u32,
        height: u32,
        max_size: u32,
    },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, PackerError>;
