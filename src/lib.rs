pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod packing;
pub mod sprite;

pub use atlas::{Packer, PackerConfig, Page};
pub use cli::{CliArgs, Command, PackArgs};
pub use error::PackerError;
pub use packing::Rect;
pub use sprite::Entry;
