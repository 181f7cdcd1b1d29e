/// Bytes per RGBA8 pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// Append-only storage for the trimmed pixels of every registered sprite.
///
/// Sprites address their data by the byte offset returned from [`write`].
///
/// [`write`]: PixelBuffer::write
#[derive(Debug, Default)]
pub struct PixelBuffer {
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset the next write will land at
    pub fn position(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append `bytes` and return the offset they were written at
    pub fn write(&mut self, bytes: &[u8]) -> usize {
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);
        offset
    }

    /// Borrow `len` bytes starting at `offset`
    pub fn read(&self, offset: usize, len: usize) -> Option<&[u8]> {
        self.data.get(offset..offset.checked_add(len)?)
    }

    /// Forget all stored pixels but keep the allocation for reuse
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Forget all stored pixels and free the allocation
    pub fn release(&mut self) {
        self.data = Vec::new();
    }
}
