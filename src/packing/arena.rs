use super::Rect;

/// Handle to a node stored in a [`NodeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node of the placement tree.
///
/// A free leaf has `used == false` and no children. Once something is placed
/// in it, or the tree grows around it, it becomes an internal node with both
/// `right` and `down` set.
#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub used: bool,
    pub rect: Rect,
    pub right: Option<NodeId>,
    pub down: Option<NodeId>,
}

impl Node {
    fn leaf(rect: Rect) -> Self {
        Self {
            used: false,
            rect,
            right: None,
            down: None,
        }
    }
}

/// Slab of tree nodes for one packing pass
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Preallocate room for the nodes needed to place `entries` rectangles
    pub fn with_entry_capacity(entries: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(entries.saturating_mul(4)),
        }
    }

    /// Drop every node while keeping the allocation
    pub fn reset(&mut self) {
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a fresh free leaf
    pub fn alloc(&mut self, rect: Rect) -> NodeId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "node count is bounded by 4x the entry count"
        )]
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::leaf(rect));
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Find the first free leaf under `root` that can hold `width x height`.
    ///
    /// Depth-first, visiting the right subtree before the down subtree.
    pub fn find(&self, root: NodeId, width: u32, height: u32) -> Option<NodeId> {
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            let node = self.get(id);
            if node.used {
                // pushed in reverse so `right` is explored first
                stack.extend(node.down);
                stack.extend(node.right);
            } else if width <= node.rect.width && height <= node.rect.height {
                return Some(id);
            }
        }

        None
    }

    /// Occupy a free leaf with a `width x height` rectangle at its top-left.
    ///
    /// The remainder is split into a `down` leaf spanning the full width below
    /// the rectangle and a `right` leaf of the rectangle's height beside it.
    pub fn split(&mut self, id: NodeId, width: u32, height: u32) {
        let rect = self.get(id).rect;
        let down = self.alloc(Rect::new(
            rect.x,
            rect.y + height,
            rect.width,
            rect.height - height,
        ));
        let right = self.alloc(Rect::new(
            rect.x + width,
            rect.y,
            rect.width - width,
            height,
        ));

        let node = self.get_mut(id);
        node.used = true;
        node.down = Some(down);
        node.right = Some(right);
    }
}
