use super::{NodeArena, NodeId, Rect};

/// Binary-tree packer that starts at the size of its first rectangle and
/// grows right or down as rectangles stop fitting.
///
/// The tree borrows its nodes from a [`NodeArena`] so one allocation can be
/// reused for every page of a packing pass.
pub struct GrowingTree<'a> {
    arena: &'a mut NodeArena,
    root: NodeId,
    max_size: u32,
}

impl<'a> GrowingTree<'a> {
    /// Reset `arena` and seed it with a single free leaf of `width x height`
    pub fn new(arena: &'a mut NodeArena, width: u32, height: u32, max_size: u32) -> Self {
        arena.reset();
        let root = arena.alloc(Rect::new(0, 0, width, height));
        Self {
            arena,
            root,
            max_size,
        }
    }

    /// Place a `width x height` rectangle, growing the tree if needed.
    ///
    /// Returns the top-left aligned slot, or `None` when the rectangle fits
    /// neither in a free leaf nor after growing within `max_size`.
    pub fn insert(&mut self, width: u32, height: u32) -> Option<Rect> {
        let node = match self.arena.find(self.root, width, height) {
            Some(node) => node,
            None => self.grow(width, height)?,
        };

        let slot = self.arena.get(node).rect;
        self.arena.split(node, width, height);
        Some(Rect::new(slot.x, slot.y, width, height))
    }

    /// The accumulated area covered by the tree
    pub fn bounds(&self) -> Rect {
        self.arena.get(self.root).rect
    }

    fn grow(&mut self, width: u32, height: u32) -> Option<NodeId> {
        let root = self.bounds();

        let can_grow_down = width <= root.width && root.height + height < self.max_size;
        let can_grow_right = height <= root.height && root.width + width < self.max_size;
        // keep the tree roughly square
        let should_grow_right = can_grow_right && root.height >= root.width + width;
        let should_grow_down = can_grow_down && root.width >= root.height + height;

        if should_grow_right || (!should_grow_down && can_grow_right) {
            Some(self.grow_right(root, width))
        } else if can_grow_down {
            Some(self.grow_down(root, height))
        } else {
            None
        }
    }

    fn grow_right(&mut self, root: Rect, width: u32) -> NodeId {
        let next = self
            .arena
            .alloc(Rect::new(0, 0, root.width + width, root.height));
        let leaf = self
            .arena
            .alloc(Rect::new(root.width, 0, width, root.height));

        let node = self.arena.get_mut(next);
        node.used = true;
        node.down = Some(self.root);
        node.right = Some(leaf);
        self.root = next;
        leaf
    }

    fn grow_down(&mut self, root: Rect, height: u32) -> NodeId {
        let next = self
            .arena
            .alloc(Rect::new(0, 0, root.width, root.height + height));
        let leaf = self
            .arena
            .alloc(Rect::new(0, root.height, root.width, height));

        let node = self.arena.get_mut(next);
        node.used = true;
        node.down = Some(leaf);
        node.right = Some(self.root);
        self.root = next;
        leaf
    }
}
