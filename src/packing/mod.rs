mod arena;
mod rect;
mod tree;

pub use arena::{Node, NodeArena, NodeId};
pub use rect::Rect;
pub use tree::GrowingTree;
