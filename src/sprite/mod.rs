mod buffer;
mod entry;
pub mod loader;
mod trimmer;

pub use buffer::{BYTES_PER_PIXEL, PixelBuffer};
pub use entry::Entry;
pub use loader::{LoadedImage, collect_image_paths, load_image, load_images};
pub use trimmer::{copy_region, trim_region};
