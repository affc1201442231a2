//! Bitmap ⇄ [`PixelBuffer`] conversion.
//!
//! Both directions validate what they can before pinning, convert row by
//! row honouring the bitmap's stride, and release the pin on every exit.
//! A panic inside the conversion is caught here and reported as
//! [`Error::Unknown`]; the guard has already unpinned by then.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::bitmap::{Bitmap, BitmapFormat, BitmapInfo, PixelGuard};
use crate::bytes::check_strided;
use crate::{Error, PixelBuffer, Result, bytes};

const IMPORT_FAILURE: &str = "unknown failure in importer";
const EXPORT_FAILURE: &str = "unknown failure in exporter";

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "non-string panic payload"
    }
}

/// Copy a bitmap into a new 4-channel buffer.
///
/// `Rgba8888` sources are copied verbatim, or converted to straight alpha
/// when `unpremultiply_alpha` is set. `Rgb565` sources are expanded to
/// opaque RGBA.
pub fn bitmap_to_buffer<B: Bitmap + ?Sized>(
    bitmap: &mut B,
    unpremultiply_alpha: bool,
) -> Result<PixelBuffer> {
    panic::catch_unwind(AssertUnwindSafe(|| import(bitmap, unpremultiply_alpha))).unwrap_or_else(
        |payload| {
            warn!(cause = panic_message(payload.as_ref()), "{}", IMPORT_FAILURE);
            Err(Error::Unknown(IMPORT_FAILURE))
        },
    )
}

/// Write a 1, 3 or 4 channel buffer into a bitmap of the same size.
///
/// Four-channel buffers are premultiplied on the way into an `Rgba8888`
/// bitmap when `premultiply_alpha` is set. Nothing is pinned unless the
/// format, dimensions and channel count all check out.
pub fn buffer_to_bitmap<B: Bitmap + ?Sized>(
    buffer: &PixelBuffer,
    bitmap: &mut B,
    premultiply_alpha: bool,
) -> Result<()> {
    panic::catch_unwind(AssertUnwindSafe(|| export(buffer, bitmap, premultiply_alpha)))
        .unwrap_or_else(|payload| {
            warn!(cause = panic_message(payload.as_ref()), "{}", EXPORT_FAILURE);
            Err(Error::Unknown(EXPORT_FAILURE))
        })
}

fn supported_info<B: Bitmap + ?Sized>(bitmap: &B) -> Result<BitmapInfo> {
    let info = bitmap.info().map_err(Error::Info)?;
    if !info.format.is_supported() {
        return Err(Error::UnsupportedFormat(info.format));
    }
    Ok(info)
}

fn import<B: Bitmap + ?Sized>(bitmap: &mut B, unpremultiply_alpha: bool) -> Result<PixelBuffer> {
    let info = supported_info(bitmap)?;
    let guard = PixelGuard::lock(bitmap)?;

    let (width, height) = (info.width as usize, info.height as usize);
    let mut buffer = PixelBuffer::new(width, height, 4);
    if buffer.is_empty() {
        return Ok(buffer);
    }

    let bpp = info.format.bytes_per_pixel();
    let stride = info.stride as usize;
    let pixels = guard.pixels();
    check_strided(pixels.len(), width, height, stride, bpp)?;

    for (y, dst) in buffer.rows_mut().enumerate() {
        let src = &pixels[y * stride..y * stride + width * bpp];
        match info.format {
            BitmapFormat::Rgba8888 if unpremultiply_alpha => bytes::unpremultiply_rgba(src, dst)?,
            BitmapFormat::Rgba8888 => dst.copy_from_slice(src),
            _ => bytes::rgb565_to_rgba(src, dst)?,
        }
    }

    debug!(
        width,
        height,
        format = ?info.format,
        unpremultiply_alpha,
        "imported bitmap"
    );
    Ok(buffer)
}

fn export<B: Bitmap + ?Sized>(
    buffer: &PixelBuffer,
    bitmap: &mut B,
    premultiply_alpha: bool,
) -> Result<()> {
    let info = supported_info(bitmap)?;
    let (width, height) = (info.width as usize, info.height as usize);
    if width != buffer.width() || height != buffer.height() {
        return Err(Error::DimensionMismatch {
            bitmap: (info.width, info.height),
            buffer: (buffer.width(), buffer.height()),
        });
    }
    let channels = buffer.channels();
    if !matches!(channels, 1 | 3 | 4) {
        return Err(Error::UnsupportedChannels(channels));
    }

    let mut guard = PixelGuard::lock(bitmap)?;
    if buffer.is_empty() {
        return Ok(());
    }

    let bpp = info.format.bytes_per_pixel();
    let stride = info.stride as usize;
    let pixels = guard.pixels_mut();
    check_strided(pixels.len(), width, height, stride, bpp)?;

    for (y, src) in buffer.rows().enumerate() {
        let dst = &mut pixels[y * stride..y * stride + width * bpp];
        match (info.format, channels) {
            (BitmapFormat::Rgba8888, 1) => bytes::gray_to_rgba(src, dst)?,
            (BitmapFormat::Rgba8888, 3) => bytes::rgb_to_rgba(src, dst)?,
            (BitmapFormat::Rgba8888, _) if premultiply_alpha => bytes::premultiply_rgba(src, dst)?,
            (BitmapFormat::Rgba8888, _) => dst.copy_from_slice(src),
            (_, 1) => bytes::gray_to_rgb565(src, dst)?,
            (_, 3) => bytes::rgb_to_rgb565(src, dst)?,
            (_, _) => bytes::rgba_to_rgb565(src, dst)?,
        }
    }

    debug!(
        width,
        height,
        channels,
        format = ?info.format,
        premultiply_alpha,
        "exported buffer"
    );
    Ok(())
}
