//! Panorama stitching over platform bitmaps.
//!
//! The stitching algorithm itself lives behind [`Stitcher`]; this module
//! moves bitmaps in and out of it. Every source is imported (and unpinned)
//! before the stitcher runs, and output bitmaps are only allocated once it
//! has returned successfully.

use core::fmt;

use tracing::{debug, warn};

use crate::bitmap::{Bitmap, BitmapFactory, BitmapFormat};
use crate::marshal::{bitmap_to_buffer, buffer_to_bitmap};
use crate::{Error, PixelBuffer, Result};

/// Why a stitcher gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StitchStatus {
    /// Too few images, or too little overlap between them.
    NeedMoreImages,
    /// No consistent homography between the inputs.
    HomographyEstimationFailed,
    /// Bundle adjustment of the camera parameters did not converge.
    CameraParamsAdjustFailed,
    Other(String),
}

impl fmt::Display for StitchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StitchStatus::NeedMoreImages => f.write_str("need more images"),
            StitchStatus::HomographyEstimationFailed => f.write_str("homography estimation failed"),
            StitchStatus::CameraParamsAdjustFailed => {
                f.write_str("camera parameter adjustment failed")
            }
            StitchStatus::Other(msg) => f.write_str(msg),
        }
    }
}

/// Multi-image stitching algorithm.
///
/// May return fewer (or more) images than it was given.
pub trait Stitcher {
    fn stitch(&mut self, images: &[PixelBuffer]) -> Result<Vec<PixelBuffer>, StitchStatus>;
}

impl<F> Stitcher for F
where
    F: FnMut(&[PixelBuffer]) -> Result<Vec<PixelBuffer>, StitchStatus>,
{
    fn stitch(&mut self, images: &[PixelBuffer]) -> Result<Vec<PixelBuffer>, StitchStatus> {
        self(images)
    }
}

fn run<S, T>(sources: &mut [S], stitcher: &mut T) -> Result<Vec<PixelBuffer>>
where
    S: Bitmap,
    T: Stitcher + ?Sized,
{
    if sources.is_empty() {
        return Ok(Vec::new());
    }
    let mut images = Vec::with_capacity(sources.len());
    for source in sources.iter_mut() {
        images.push(bitmap_to_buffer(source, false)?);
    }
    let results = stitcher.stitch(&images).map_err(|status| {
        warn!(%status, inputs = images.len(), "stitching failed");
        Error::Stitch(status)
    })?;
    debug!(inputs = images.len(), outputs = results.len(), "stitched");
    Ok(results)
}

/// Bitmap dimensions for a result, which must fit the host's `u32` sizes.
fn bitmap_dims(width: usize, height: usize) -> Result<(u32, u32)> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(Error::InvalidArgument("stitched image too large for a bitmap")),
    }
}

fn materialize<F: BitmapFactory>(
    results: &[PixelBuffer],
    factory: &mut F,
) -> Result<Vec<F::Bitmap>> {
    results
        .iter()
        .map(|result| {
            // Always RGBA_8888, whatever the result's channel count; the
            // exporter converts.
            let (width, height) = bitmap_dims(result.width(), result.height())?;
            let mut out = factory
                .create(width, height, BitmapFormat::Rgba8888)
                .map_err(Error::Allocation)?;
            buffer_to_bitmap(result, &mut out, false)?;
            Ok(out)
        })
        .collect()
}

/// Stitch `sources` and return one newly allocated `Rgba8888` bitmap per
/// result. No sources means no results; the stitcher is not consulted.
pub fn stitch_bitmaps<S, F, T>(
    sources: &mut [S],
    factory: &mut F,
    stitcher: &mut T,
) -> Result<Vec<F::Bitmap>>
where
    S: Bitmap,
    F: BitmapFactory,
    T: Stitcher + ?Sized,
{
    let results = run(sources, stitcher)?;
    materialize(&results, factory)
}

/// Stitch `sources` into caller-provided slots, filling from index 0.
///
/// Returns the number of slots filled. Slots past that are left as they
/// were. Nothing is written unless every result was allocated and exported.
pub fn stitch_into<S, F, T>(
    sources: &mut [S],
    slots: &mut [Option<F::Bitmap>],
    factory: &mut F,
    stitcher: &mut T,
) -> Result<usize>
where
    S: Bitmap,
    F: BitmapFactory,
    T: Stitcher + ?Sized,
{
    let results = run(sources, stitcher)?;
    if results.len() > slots.len() {
        return Err(Error::TooManyResults {
            produced: results.len(),
            slots: slots.len(),
        });
    }
    let outputs = materialize(&results, factory)?;
    let filled = outputs.len();
    for (slot, out) in slots.iter_mut().zip(outputs) {
        *slot = Some(out);
    }
    Ok(filled)
}
