// ---------------------------------------------------------------------------
// Row-level pixel conversions between bitmap layouts and buffer layouts.
//
// Architecture: row loops live in scalar.rs as #[inline(always)] kernels.
// Each kernel gets a scalar dispatch target and, on x86-64, an #[arcane]
// v3 target that compiles the same loop with AVX2 enabled. incant! picks
// the best tier at runtime.
//
// RGB565 words are native-endian u16 with red in the high five bits, the
// in-memory layout of a 16-bit platform bitmap.
// ---------------------------------------------------------------------------

use crate::SizeError;
use archmage::incant;

mod scalar;
use scalar::*;

#[cfg(target_arch = "x86_64")]
mod v3;
#[cfg(target_arch = "x86_64")]
use v3::*;


// ===========================================================================
// Validation helpers
// ===========================================================================

#[inline]
fn check_copy(
    src_len: usize,
    src_bpp: usize,
    dst_len: usize,
    dst_bpp: usize,
) -> Result<(), SizeError> {
    if src_len == 0 || !src_len.is_multiple_of(src_bpp) {
        return Err(SizeError::NotPixelAligned);
    }
    if dst_len < (src_len / src_bpp) * dst_bpp {
        return Err(SizeError::PixelCountMismatch);
    }
    Ok(())
}

/// Check that `len` bytes hold `height` rows of `width * bpp` bytes spaced
/// `stride` apart.
#[inline]
pub(crate) fn check_strided(
    len: usize,
    width: usize,
    height: usize,
    stride: usize,
    bpp: usize,
) -> Result<(), SizeError> {
    if width == 0 || height == 0 {
        return Err(SizeError::InvalidStride);
    }
    let row_bytes = width.checked_mul(bpp).ok_or(SizeError::InvalidStride)?;
    if row_bytes > stride {
        return Err(SizeError::InvalidStride);
    }
    let total = (height - 1)
        .checked_mul(stride)
        .ok_or(SizeError::InvalidStride)?
        .checked_add(row_bytes)
        .ok_or(SizeError::InvalidStride)?;
    if len < total {
        return Err(SizeError::InvalidStride);
    }
    Ok(())
}

// ===========================================================================
// Alpha
// ===========================================================================

/// Straight RGBA → premultiplied RGBA. `c' = (c·a + 128) / 255`, alpha kept.
pub fn premultiply_rgba(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 4, dst.len(), 4)?;
    incant!(premultiply_impl(src, dst), [v3, scalar]);
    Ok(())
}

/// Premultiplied RGBA → straight RGBA. `c = (c'·255 + a/2) / a`, saturated;
/// fully transparent pixels come out as zero color.
pub fn unpremultiply_rgba(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 4, dst.len(), 4)?;
    incant!(unpremultiply_impl(src, dst), [v3, scalar]);
    Ok(())
}

// ===========================================================================
// Expansions into RGBA
// ===========================================================================

/// RGB565 (2 bytes/px) → RGBA (4 bytes/px), alpha=255.
///
/// Low bits are zero-filled rather than replicated, so packing the result
/// back into RGB565 reproduces the source exactly.
pub fn rgb565_to_rgba(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 2, dst.len(), 4)?;
    incant!(rgb565_to_rgba_impl(src, dst), [v3, scalar]);
    Ok(())
}

/// Gray (1 byte/px) → RGBA (4 bytes/px). R=G=B=gray, alpha=255.
pub fn gray_to_rgba(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 1, dst.len(), 4)?;
    incant!(gray_to_rgba_impl(src, dst), [v3, scalar]);
    Ok(())
}

/// RGB (3 bytes/px) → RGBA (4 bytes/px). Keeps channel order, alpha=255.
pub fn rgb_to_rgba(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 3, dst.len(), 4)?;
    incant!(rgb_to_rgba_impl(src, dst), [v3, scalar]);
    Ok(())
}

// ===========================================================================
// Packing into RGB565
// ===========================================================================

/// RGBA (4 bytes/px) → RGB565 (2 bytes/px). Alpha is dropped.
pub fn rgba_to_rgb565(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 4, dst.len(), 2)?;
    incant!(rgba_to_rgb565_impl(src, dst), [v3, scalar]);
    Ok(())
}

/// RGB (3 bytes/px) → RGB565 (2 bytes/px).
pub fn rgb_to_rgb565(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 3, dst.len(), 2)?;
    incant!(rgb_to_rgb565_impl(src, dst), [v3, scalar]);
    Ok(())
}

/// Gray (1 byte/px) → RGB565 (2 bytes/px).
pub fn gray_to_rgb565(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 1, dst.len(), 2)?;
    incant!(gray_to_rgb565_impl(src, dst), [v3, scalar]);
    Ok(())
}

// ===========================================================================
// Luma
// ===========================================================================

/// RGBA (4 bytes/px) → Gray (1 byte/px) using BT.601 weights in 14-bit
/// fixed point. Alpha is ignored.
pub fn rgba_to_gray(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 4, dst.len(), 1)?;
    incant!(rgba_to_gray_impl(src, dst), [v3, scalar]);
    Ok(())
}

/// RGB (3 bytes/px) → Gray (1 byte/px), same weights as [`rgba_to_gray`].
pub fn rgb_to_gray(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 3, dst.len(), 1)?;
    incant!(rgb_to_gray_impl(src, dst), [v3, scalar]);
    Ok(())
}

/// BGRA (4 bytes/px) → Gray (1 byte/px). Same weights as [`rgba_to_gray`]
/// with channel 0 taken as blue and channel 2 as red.
pub fn bgra_to_gray(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 4, dst.len(), 1)?;
    incant!(bgra_to_gray_impl(src, dst), [v3, scalar]);
    Ok(())
}

/// BGR (3 bytes/px) → Gray (1 byte/px), channel order as [`bgra_to_gray`].
pub fn bgr_to_gray(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 3, dst.len(), 1)?;
    incant!(bgr_to_gray_impl(src, dst), [v3, scalar]);
    Ok(())
}
