//! Instrumented bitmap for checking pin/unpin balance.

use crate::bitmap::{Bitmap, BitmapError, BitmapFormat, BitmapInfo};

pub(crate) struct CountingBitmap {
    pub info: BitmapInfo,
    pub data: Vec<u8>,
    pub locks: usize,
    pub unlocks: usize,
    pub fail_info: Option<BitmapError>,
    pub fail_lock: Option<BitmapError>,
    pub null_pixels: bool,
    pub panic_on_access: bool,
    pinned: bool,
}

impl CountingBitmap {
    pub fn new(width: u32, height: u32, format: BitmapFormat) -> Self {
        let info = BitmapInfo::packed(width, height, format).unwrap();
        Self {
            info,
            data: vec![0; info.stride as usize * height as usize],
            locks: 0,
            unlocks: 0,
            fail_info: None,
            fail_lock: None,
            null_pixels: false,
            panic_on_access: false,
            pinned: false,
        }
    }

    pub fn rgba(width: u32, height: u32) -> Self {
        Self::new(width, height, BitmapFormat::Rgba8888)
    }

    pub fn balanced(&self) -> bool {
        self.locks == self.unlocks && !self.pinned
    }
}

impl Bitmap for CountingBitmap {
    fn info(&self) -> Result<BitmapInfo, BitmapError> {
        match self.fail_info {
            Some(err) => Err(err),
            None => Ok(self.info),
        }
    }

    fn lock_pixels(&mut self) -> Result<(), BitmapError> {
        if let Some(err) = self.fail_lock {
            return Err(err);
        }
        assert!(!self.pinned, "pinned twice");
        self.locks += 1;
        self.pinned = true;
        Ok(())
    }

    fn pixels(&self) -> Option<&[u8]> {
        assert!(self.pinned, "pixels read while unpinned");
        if self.panic_on_access {
            panic!("pixel access fault");
        }
        (!self.null_pixels).then_some(self.data.as_slice())
    }

    fn pixels_mut(&mut self) -> Option<&mut [u8]> {
        assert!(self.pinned, "pixels written while unpinned");
        if self.panic_on_access {
            panic!("pixel access fault");
        }
        if self.null_pixels {
            None
        } else {
            Some(self.data.as_mut_slice())
        }
    }

    fn unlock_pixels(&mut self) {
        assert!(self.pinned, "unpinned without a pin");
        self.unlocks += 1;
        self.pinned = false;
    }
}
