use crate::SizeError;

/// Owned, tightly packed, row-major image with 8 bits per channel.
///
/// `data.len() == width * height * channels` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Bits per channel of every buffer.
    pub const DEPTH: u32 = 8;

    /// Allocate a zeroed buffer.
    ///
    /// # Panics
    ///
    /// If `channels` is zero.
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        assert!(channels > 0, "pixel buffer needs at least one channel");
        Self {
            width,
            height,
            channels,
            data: vec![0; width * height * channels],
        }
    }

    /// Wrap existing pixel data.
    pub fn from_vec(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, SizeError> {
        if channels == 0 {
            return Err(SizeError::NotPixelAligned);
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(SizeError::PixelCountMismatch)?;
        if data.len() != expected {
            return Err(SizeError::PixelCountMismatch);
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn depth(&self) -> u32 {
        Self::DEPTH
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes per row.
    pub fn row_bytes(&self) -> usize {
        self.width * self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn row(&self, y: usize) -> &[u8] {
        let n = self.row_bytes();
        &self.data[y * n..(y + 1) * n]
    }

    pub fn rows(&self) -> core::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.row_bytes().max(1))
    }

    pub fn rows_mut(&mut self) -> core::slice::ChunksExactMut<'_, u8> {
        let n = self.row_bytes().max(1);
        self.data.chunks_exact_mut(n)
    }
}
