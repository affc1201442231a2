use core::fmt;

use crate::bitmap::{BitmapError, BitmapFormat};
use crate::stitch::StitchStatus;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// A row-level conversion was handed buffers of the wrong size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeError {
    /// Buffer length is zero or not a multiple of the bytes-per-pixel.
    NotPixelAligned,
    /// Destination holds fewer pixels than the source.
    PixelCountMismatch,
    /// Stride is smaller than a row, or the buffer ends before the last row.
    InvalidStride,
}

impl fmt::Display for SizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeError::NotPixelAligned => f.write_str("buffer length is not pixel aligned"),
            SizeError::PixelCountMismatch => {
                f.write_str("destination is smaller than the source pixel count")
            }
            SizeError::InvalidStride => f.write_str("stride does not fit the buffer"),
        }
    }
}

impl std::error::Error for SizeError {}

/// Failure of a bitmap marshalling call or a boundary operation.
///
/// Pixel memory of every bitmap touched by the failing call has already
/// been unpinned by the time one of these is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The bitmap's format query failed.
    Info(BitmapError),
    /// Only `Rgba8888` and `Rgb565` can be marshalled.
    UnsupportedFormat(BitmapFormat),
    /// Destination bitmap and pixel buffer disagree on size.
    DimensionMismatch {
        bitmap: (u32, u32),
        buffer: (usize, usize),
    },
    /// Exporter accepts 1, 3 or 4 channel buffers only.
    UnsupportedChannels(usize),
    /// Pinning the pixel memory failed.
    Lock(BitmapError),
    /// Pinning succeeded but returned no memory.
    NullPixels,
    Size(SizeError),
    /// The stitcher could not produce a panorama.
    Stitch(StitchStatus),
    /// Allocating an output bitmap failed.
    Allocation(BitmapError),
    /// More stitched results than destination slots.
    TooManyResults { produced: usize, slots: usize },
    InvalidArgument(&'static str),
    /// A panic escaped the conversion; the payload is not carried over.
    Unknown(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Info(e) => write!(f, "failed to query bitmap info: {e}"),
            Error::UnsupportedFormat(format) => {
                write!(f, "unsupported bitmap format {format:?}, expected RGBA_8888 or RGB_565")
            }
            Error::DimensionMismatch { bitmap, buffer } => write!(
                f,
                "bitmap is {}x{} but pixel buffer is {}x{}",
                bitmap.0, bitmap.1, buffer.0, buffer.1
            ),
            Error::UnsupportedChannels(n) => {
                write!(f, "unsupported channel count {n}, expected 1, 3 or 4")
            }
            Error::Lock(e) => write!(f, "failed to lock bitmap pixels: {e}"),
            Error::NullPixels => f.write_str("bitmap pixel lock returned null"),
            Error::Size(e) => write!(f, "pixel buffer size error: {e}"),
            Error::Stitch(status) => write!(f, "stitching failed: {status}"),
            Error::Allocation(e) => write!(f, "failed to allocate bitmap: {e}"),
            Error::TooManyResults { produced, slots } => write!(
                f,
                "stitcher produced {produced} images but only {slots} slots were provided"
            ),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Error::Unknown(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Info(e) | Error::Lock(e) | Error::Allocation(e) => Some(e),
            Error::Size(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SizeError> for Error {
    fn from(err: SizeError) -> Self {
        Error::Size(err)
    }
}
