//! Host-facing operations: one call per managed entry point.
//!
//! Each operation imports its sources with `unpremultiply_alpha = false`,
//! runs on the pixel buffer, and exports with `premultiply_alpha = false`.

use tracing::debug;

use crate::bitmap::Bitmap;
use crate::imaging::{self, FlipAxis};
use crate::marshal::{bitmap_to_buffer, buffer_to_bitmap};
use crate::{Result, sharpness};

pub use crate::stitch::stitch_into;

/// Write `src` flipped upside down into `dst`.
///
/// `dst` must have the same dimensions as `src`; its format may differ.
pub fn flip<S, D>(src: &mut S, dst: &mut D) -> Result<()>
where
    S: Bitmap + ?Sized,
    D: Bitmap + ?Sized,
{
    let buffer = bitmap_to_buffer(src, false)?;
    let flipped = imaging::flip(buffer, FlipAxis::Vertical)?;
    buffer_to_bitmap(&flipped, dst, false)
}

/// Write `src` Gaussian-blurred with standard deviation `sigma` into `dst`.
pub fn blur<S, D>(src: &mut S, dst: &mut D, sigma: f32) -> Result<()>
where
    S: Bitmap + ?Sized,
    D: Bitmap + ?Sized,
{
    let buffer = bitmap_to_buffer(src, false)?;
    let blurred = imaging::gaussian_blur(buffer, sigma)?;
    buffer_to_bitmap(&blurred, dst, false)
}

/// `true` when the variance of the Laplacian of `src` is below `threshold`.
///
/// A NaN threshold never classifies as blurry.
pub fn blur_detect<S: Bitmap + ?Sized>(src: &mut S, threshold: f64) -> Result<bool> {
    let buffer = bitmap_to_buffer(src, false)?;
    let variance = sharpness::laplacian_variance(&buffer)?;
    let blurry = sharpness::is_blurry(variance, threshold);
    debug!(variance, threshold, blurry, "blur detection");
    Ok(blurry)
}
