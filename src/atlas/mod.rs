mod config;
mod packer;
mod page;
pub mod raster;

pub use config::PackerConfig;
pub use packer::Packer;
pub use page::Page;
