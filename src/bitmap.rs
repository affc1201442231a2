//! Platform bitmap handles and scoped pixel pinning.
//!
//! A [`Bitmap`] is memory owned by the managed side. Before the native side
//! may read or write it, the memory has to be pinned; afterwards it has to be
//! unpinned, exactly once, whatever happened in between. [`PixelGuard`] ties
//! that pair to a scope.

use core::fmt;

use tracing::trace;

use crate::{Error, Result};

/// Pixel layout of a platform bitmap.
///
/// Discriminants follow the platform's format enumeration so that raw
/// format codes can be converted with [`BitmapFormat::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitmapFormat {
    None,
    /// 4 bytes per pixel, R, G, B, A in memory order.
    Rgba8888,
    /// 2 bytes per pixel, native-endian `u16` with red in the high bits.
    Rgb565,
    Rgba4444,
    A8,
    RgbaF16,
    Rgba1010102,
}

impl BitmapFormat {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => BitmapFormat::Rgba8888,
            4 => BitmapFormat::Rgb565,
            7 => BitmapFormat::Rgba4444,
            8 => BitmapFormat::A8,
            9 => BitmapFormat::RgbaF16,
            10 => BitmapFormat::Rgba1010102,
            _ => BitmapFormat::None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            BitmapFormat::None => 0,
            BitmapFormat::Rgba8888 => 1,
            BitmapFormat::Rgb565 => 4,
            BitmapFormat::Rgba4444 => 7,
            BitmapFormat::A8 => 8,
            BitmapFormat::RgbaF16 => 9,
            BitmapFormat::Rgba1010102 => 10,
        }
    }

    /// Bytes per pixel, `0` for [`BitmapFormat::None`].
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            BitmapFormat::None => 0,
            BitmapFormat::A8 => 1,
            BitmapFormat::Rgb565 | BitmapFormat::Rgba4444 => 2,
            BitmapFormat::Rgba8888 | BitmapFormat::Rgba1010102 => 4,
            BitmapFormat::RgbaF16 => 8,
        }
    }

    /// Whether the importer and exporter can marshal this layout.
    pub fn is_supported(self) -> bool {
        matches!(self, BitmapFormat::Rgba8888 | BitmapFormat::Rgb565)
    }
}

/// Result code of a failed platform bitmap call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapError {
    BadParameter,
    JniException,
    AllocationFailed,
    Other(i32),
}

impl BitmapError {
    /// Map a negative platform result code. Non-negative codes are success.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            c if c >= 0 => None,
            -1 => Some(BitmapError::BadParameter),
            -2 => Some(BitmapError::JniException),
            -3 => Some(BitmapError::AllocationFailed),
            c => Some(BitmapError::Other(c)),
        }
    }
}

impl fmt::Display for BitmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitmapError::BadParameter => f.write_str("bad parameter"),
            BitmapError::JniException => f.write_str("managed exception pending"),
            BitmapError::AllocationFailed => f.write_str("allocation failed"),
            BitmapError::Other(code) => write!(f, "platform error {code}"),
        }
    }
}

impl std::error::Error for BitmapError {}

/// Dimensions and layout reported by a bitmap's format query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapInfo {
    pub width: u32,
    pub height: u32,
    /// Distance in bytes between the starts of consecutive rows.
    pub stride: u32,
    pub format: BitmapFormat,
}

impl BitmapInfo {
    /// Info for a tightly packed bitmap. Fails with
    /// [`BitmapError::BadParameter`] if a row does not fit a `u32` stride.
    pub fn packed(width: u32, height: u32, format: BitmapFormat) -> Result<Self, BitmapError> {
        let stride = width
            .checked_mul(format.bytes_per_pixel() as u32)
            .ok_or(BitmapError::BadParameter)?;
        Ok(Self {
            width,
            height,
            stride,
            format,
        })
    }
}

/// A borrowed platform bitmap.
///
/// Implementations wrap whatever the host hands across the boundary. A
/// successful [`lock_pixels`](Bitmap::lock_pixels) must be followed by
/// exactly one [`unlock_pixels`](Bitmap::unlock_pixels); use
/// [`PixelGuard`] rather than calling the pair directly.
pub trait Bitmap {
    /// Query dimensions and format.
    fn info(&self) -> Result<BitmapInfo, BitmapError>;

    /// Pin the pixel memory.
    fn lock_pixels(&mut self) -> Result<(), BitmapError>;

    /// Pinned pixel memory, or `None` if the pin produced no address.
    fn pixels(&self) -> Option<&[u8]>;

    /// Mutable view of the pinned pixel memory.
    fn pixels_mut(&mut self) -> Option<&mut [u8]>;

    /// Release the pin taken by `lock_pixels`.
    fn unlock_pixels(&mut self);
}

impl<B: Bitmap + ?Sized> Bitmap for &mut B {
    fn info(&self) -> Result<BitmapInfo, BitmapError> {
        (**self).info()
    }
    fn lock_pixels(&mut self) -> Result<(), BitmapError> {
        (**self).lock_pixels()
    }
    fn pixels(&self) -> Option<&[u8]> {
        (**self).pixels()
    }
    fn pixels_mut(&mut self) -> Option<&mut [u8]> {
        (**self).pixels_mut()
    }
    fn unlock_pixels(&mut self) {
        (**self).unlock_pixels()
    }
}

/// Pinned pixel memory of one bitmap. Unpins on drop, including during
/// panic unwinding.
pub struct PixelGuard<'a, B: Bitmap + ?Sized> {
    bitmap: &'a mut B,
}

impl<'a, B: Bitmap + ?Sized> PixelGuard<'a, B> {
    /// Pin `bitmap`.
    ///
    /// A failed pin leaves nothing to release. A pin that succeeds but
    /// yields no memory is released before [`Error::NullPixels`] is returned.
    pub fn lock(bitmap: &'a mut B) -> Result<Self> {
        bitmap.lock_pixels().map_err(Error::Lock)?;
        trace!("bitmap pixels pinned");
        let guard = Self { bitmap };
        if guard.bitmap.pixels().is_none() {
            return Err(Error::NullPixels);
        }
        Ok(guard)
    }

    pub fn pixels(&self) -> &[u8] {
        self.bitmap.pixels().unwrap_or_default()
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.bitmap.pixels_mut().unwrap_or_default()
    }
}

impl<B: Bitmap + ?Sized> Drop for PixelGuard<'_, B> {
    fn drop(&mut self) {
        self.bitmap.unlock_pixels();
        trace!("bitmap pixels unpinned");
    }
}

/// Allocates new platform bitmaps.
pub trait BitmapFactory {
    type Bitmap: Bitmap;

    fn create(
        &mut self,
        width: u32,
        height: u32,
        format: BitmapFormat,
    ) -> Result<Self::Bitmap, BitmapError>;
}

/// Heap-backed bitmap for hosts without a managed runtime, and for tests.
///
/// Pixels are only reachable through [`Bitmap`] while pinned, and a pinned
/// bitmap refuses a second pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedBitmap {
    info: BitmapInfo,
    data: Vec<u8>,
    locked: bool,
}

impl OwnedBitmap {
    /// Allocate a zeroed, tightly packed bitmap.
    pub fn new(width: u32, height: u32, format: BitmapFormat) -> Result<Self, BitmapError> {
        let info = BitmapInfo::packed(width, height, format)?;
        let len = (info.stride as usize)
            .checked_mul(height as usize)
            .ok_or(BitmapError::BadParameter)?;
        Ok(Self {
            info,
            data: vec![0; len],
            locked: false,
        })
    }

    /// Wrap existing pixel bytes with an explicit row stride.
    pub fn from_bytes(
        width: u32,
        height: u32,
        stride: u32,
        format: BitmapFormat,
        data: Vec<u8>,
    ) -> Result<Self, BitmapError> {
        let row = (width as usize)
            .checked_mul(format.bytes_per_pixel())
            .ok_or(BitmapError::BadParameter)?;
        if (stride as usize) < row {
            return Err(BitmapError::BadParameter);
        }
        if height > 0 {
            let needed = (height as usize - 1)
                .checked_mul(stride as usize)
                .and_then(|n| n.checked_add(row))
                .ok_or(BitmapError::BadParameter)?;
            if data.len() < needed {
                return Err(BitmapError::BadParameter);
            }
        }
        Ok(Self {
            info: BitmapInfo {
                width,
                height,
                stride,
                format,
            },
            data,
            locked: false,
        })
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn format(&self) -> BitmapFormat {
        self.info.format
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Raw bytes, including row padding. Available whether or not pinned.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl Bitmap for OwnedBitmap {
    fn info(&self) -> Result<BitmapInfo, BitmapError> {
        Ok(self.info)
    }

    fn lock_pixels(&mut self) -> Result<(), BitmapError> {
        if self.locked {
            return Err(BitmapError::BadParameter);
        }
        self.locked = true;
        Ok(())
    }

    fn pixels(&self) -> Option<&[u8]> {
        self.locked.then_some(self.data.as_slice())
    }

    fn pixels_mut(&mut self) -> Option<&mut [u8]> {
        if self.locked {
            Some(self.data.as_mut_slice())
        } else {
            None
        }
    }

    fn unlock_pixels(&mut self) {
        self.locked = false;
    }
}

/// [`BitmapFactory`] producing [`OwnedBitmap`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapBitmapFactory;

impl BitmapFactory for HeapBitmapFactory {
    type Bitmap = OwnedBitmap;

    fn create(
        &mut self,
        width: u32,
        height: u32,
        format: BitmapFormat,
    ) -> Result<OwnedBitmap, BitmapError> {
        if format == BitmapFormat::None {
            return Err(BitmapError::BadParameter);
        }
        OwnedBitmap::new(width, height, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CountingBitmap;

    #[test]
    fn format_codes_roundtrip() {
        for format in [
            BitmapFormat::None,
            BitmapFormat::Rgba8888,
            BitmapFormat::Rgb565,
            BitmapFormat::Rgba4444,
            BitmapFormat::A8,
            BitmapFormat::RgbaF16,
            BitmapFormat::Rgba1010102,
        ] {
            assert_eq!(BitmapFormat::from_code(format.code()), format);
        }
        assert_eq!(BitmapFormat::from_code(42), BitmapFormat::None);
    }

    #[test]
    fn error_codes() {
        assert_eq!(BitmapError::from_code(0), None);
        assert_eq!(BitmapError::from_code(-1), Some(BitmapError::BadParameter));
        assert_eq!(BitmapError::from_code(-3), Some(BitmapError::AllocationFailed));
        assert_eq!(BitmapError::from_code(-9), Some(BitmapError::Other(-9)));
    }

    #[test]
    fn guard_unpins_on_drop() {
        let mut bitmap = CountingBitmap::rgba(2, 2);
        {
            let guard = PixelGuard::lock(&mut bitmap).unwrap();
            assert_eq!(guard.pixels().len(), 16);
        }
        assert_eq!(bitmap.locks, 1);
        assert_eq!(bitmap.unlocks, 1);
    }

    #[test]
    fn guard_failed_lock_is_not_released() {
        let mut bitmap = CountingBitmap::rgba(2, 2);
        bitmap.fail_lock = Some(BitmapError::JniException);
        let err = PixelGuard::lock(&mut bitmap).err();
        assert_eq!(err, Some(Error::Lock(BitmapError::JniException)));
        assert_eq!(bitmap.unlocks, 0);
    }

    #[test]
    fn guard_null_pixels_released() {
        let mut bitmap = CountingBitmap::rgba(2, 2);
        bitmap.null_pixels = true;
        let err = PixelGuard::lock(&mut bitmap).err();
        assert_eq!(err, Some(Error::NullPixels));
        assert_eq!(bitmap.locks, 1);
        assert_eq!(bitmap.unlocks, 1);
    }

    #[test]
    fn owned_bitmap_pin_is_exclusive() {
        let mut bitmap = OwnedBitmap::new(3, 1, BitmapFormat::Rgb565).unwrap();
        assert!(bitmap.pixels().is_none());
        bitmap.lock_pixels().unwrap();
        assert_eq!(bitmap.lock_pixels(), Err(BitmapError::BadParameter));
        assert_eq!(bitmap.pixels().map(<[u8]>::len), Some(6));
        bitmap.unlock_pixels();
        assert!(!bitmap.is_locked());
    }

    #[test]
    fn packed_stride_overflow_is_rejected() {
        assert_eq!(
            BitmapInfo::packed(1 << 30, 1, BitmapFormat::Rgba8888),
            Err(BitmapError::BadParameter)
        );
        assert_eq!(
            BitmapInfo::packed(u32::MAX, 1, BitmapFormat::Rgb565),
            Err(BitmapError::BadParameter)
        );
        assert_eq!(
            BitmapInfo::packed((1 << 30) - 1, 1, BitmapFormat::Rgba8888).map(|i| i.stride),
            Ok(u32::MAX - 3)
        );
        assert_eq!(
            HeapBitmapFactory.create(1 << 30, 1, BitmapFormat::Rgba8888).err(),
            Some(BitmapError::BadParameter)
        );
    }

    #[test]
    fn owned_bitmap_rejects_short_stride() {
        let err = OwnedBitmap::from_bytes(4, 2, 8, BitmapFormat::Rgba8888, vec![0; 32]);
        assert_eq!(err, Err(BitmapError::BadParameter));
        let err = OwnedBitmap::from_bytes(2, 2, 12, BitmapFormat::Rgba8888, vec![0; 19]);
        assert_eq!(err, Err(BitmapError::BadParameter));
        assert!(OwnedBitmap::from_bytes(2, 2, 12, BitmapFormat::Rgba8888, vec![0; 20]).is_ok());
    }
}
