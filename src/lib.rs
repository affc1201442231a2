//! # bitmap-bridge
//!
//! Move pixels between platform bitmaps and native image buffers without
//! leaking a pin.
//!
//! A platform bitmap (anything implementing [`Bitmap`]) stores RGBA_8888 or
//! RGB_565 pixels in memory owned by a managed runtime. Native image code
//! wants a tightly packed, 8-bit-per-channel [`PixelBuffer`]. This crate
//! converts between the two, premultiplying or unpremultiplying alpha on
//! request, and guarantees the pixel memory is unpinned on every exit path.
//!
//! ## Operations
//!
//! - [`bitmap_to_buffer`] / [`buffer_to_bitmap`]: the importer and exporter.
//! - [`flip`], [`blur`], [`blur_detect`], [`stitch_into`]: bitmap-in,
//!   bitmap-out operations for host entry points.
//! - [`imaging`] and [`sharpness`]: the same operations on pixel buffers.
//!
//! ## Row kernels
//!
//! The slice functions in the crate root (`premultiply_rgba`,
//! `rgb565_to_rgba`, `rgba_to_gray`, ...) convert one row of `&[u8]` at a
//! time and dispatch to AVX2 on x86-64 at runtime, falling back to scalar.
//!
//! ## Feature flags
//!
//! - **`imgref`**: whole-image `imgref` views of pixel buffers, typed with
//!   `rgb` pixels, in the `img` module. Enabled by default.
//!
//! ## Logging
//!
//! Events go through [`tracing`]. Install a subscriber to see them.

#![forbid(unsafe_code)]

mod bitmap;
mod bridge;
mod buffer;
mod bytes;
mod error;
mod marshal;
mod stitch;

pub mod imaging;
pub mod sharpness;

#[cfg(feature = "imgref")]
pub mod img;

#[cfg(test)]
mod test_support;

pub use bitmap::{
    Bitmap, BitmapError, BitmapFactory, BitmapFormat, BitmapInfo, HeapBitmapFactory, OwnedBitmap,
    PixelGuard,
};
pub use bridge::{blur, blur_detect, flip, stitch_into};
pub use buffer::PixelBuffer;
pub use bytes::*;
pub use error::{Error, Result, SizeError};
pub use imaging::FlipAxis;
pub use marshal::{bitmap_to_buffer, buffer_to_bitmap};
pub use stitch::{StitchStatus, Stitcher, stitch_bitmaps};
