//! Typed whole-image views of a [`PixelBuffer`] using [`imgref`] and [`rgb`].
//!
//! Conversions out of a buffer produce packed [`ImgVec`]s; conversions into
//! a buffer accept strided [`ImgRef`]s and pack them. Pixel data moves
//! through the same row kernels as bitmap marshalling.
//!
//! ```rust
//! use bitmap_bridge::{PixelBuffer, img};
//! use imgref::ImgVec;
//! use rgb::Rgb;
//!
//! let rgb = ImgVec::new(vec![Rgb::new(255u8, 0, 128); 100], 10, 10);
//! let buffer = img::from_rgb(rgb.as_ref()).unwrap();
//! let rgba = img::to_rgba(&buffer).unwrap();
//! assert_eq!(rgba.buf()[0].a, 255);
//! ```

use imgref::{ImgRef, ImgVec};
use rgb::{Gray, Rgb, Rgba};

use crate::{Error, PixelBuffer, Result, SizeError, bytes};

fn pack<P: bytemuck::Pod>(img: ImgRef<'_, P>, channels: usize) -> Result<PixelBuffer, SizeError> {
    let (w, h) = (img.width(), img.height());
    let mut data = Vec::with_capacity(w * h * channels);
    for row in img.rows() {
        data.extend_from_slice(bytemuck::cast_slice(row));
    }
    PixelBuffer::from_vec(w, h, channels, data)
}

/// Pack an RGBA image into a 4-channel buffer.
pub fn from_rgba(img: ImgRef<'_, Rgba<u8>>) -> Result<PixelBuffer, SizeError> {
    pack(img, 4)
}

/// Pack an RGB image into a 3-channel buffer.
pub fn from_rgb(img: ImgRef<'_, Rgb<u8>>) -> Result<PixelBuffer, SizeError> {
    pack(img, 3)
}

/// Pack a grayscale image into a 1-channel buffer.
pub fn from_gray(img: ImgRef<'_, Gray<u8>>) -> Result<PixelBuffer, SizeError> {
    pack(img, 1)
}

/// View a 1, 3 or 4 channel buffer as RGBA. Gray and RGB get alpha=255.
pub fn to_rgba(buffer: &PixelBuffer) -> Result<ImgVec<Rgba<u8>>> {
    let (w, h) = (buffer.width(), buffer.height());
    let mut dst = ImgVec::new(vec![Rgba::default(); w * h], w, h);
    if buffer.is_empty() {
        return Ok(dst);
    }
    for (src_row, dst_row) in buffer.rows().zip(dst.rows_mut()) {
        let dst_bytes: &mut [u8] = bytemuck::cast_slice_mut(dst_row);
        match buffer.channels() {
            1 => bytes::gray_to_rgba(src_row, dst_bytes)?,
            3 => bytes::rgb_to_rgba(src_row, dst_bytes)?,
            4 => dst_bytes.copy_from_slice(src_row),
            n => return Err(Error::UnsupportedChannels(n)),
        }
    }
    Ok(dst)
}

/// BT.601 luma of a 3 or 4 channel buffer; 1-channel buffers are copied.
pub fn to_gray(buffer: &PixelBuffer) -> Result<ImgVec<Gray<u8>>> {
    let (w, h) = (buffer.width(), buffer.height());
    let mut dst = ImgVec::new(vec![Gray::default(); w * h], w, h);
    if buffer.is_empty() {
        return Ok(dst);
    }
    for (src_row, dst_row) in buffer.rows().zip(dst.rows_mut()) {
        let dst_bytes: &mut [u8] = bytemuck::cast_slice_mut(dst_row);
        match buffer.channels() {
            1 => dst_bytes.copy_from_slice(src_row),
            3 => bytes::rgb_to_gray(src_row, dst_bytes)?,
            4 => bytes::rgba_to_gray(src_row, dst_bytes)?,
            n => return Err(Error::UnsupportedChannels(n)),
        }
    }
    Ok(dst)
}

/// Premultiply a straight-alpha image into a new packed image.
pub fn premultiply(img: ImgRef<'_, Rgba<u8>>) -> Result<ImgVec<Rgba<u8>>, SizeError> {
    convert_rgba(img, bytes::premultiply_rgba)
}

/// Undo premultiplication into a new packed image.
pub fn unpremultiply(img: ImgRef<'_, Rgba<u8>>) -> Result<ImgVec<Rgba<u8>>, SizeError> {
    convert_rgba(img, bytes::unpremultiply_rgba)
}

fn convert_rgba(
    img: ImgRef<'_, Rgba<u8>>,
    kernel: fn(&[u8], &mut [u8]) -> Result<(), SizeError>,
) -> Result<ImgVec<Rgba<u8>>, SizeError> {
    let (w, h) = (img.width(), img.height());
    let mut dst = ImgVec::new(vec![Rgba::default(); w * h], w, h);
    if w == 0 {
        return Ok(dst);
    }
    for (src_row, dst_row) in img.rows().zip(dst.rows_mut()) {
        kernel(bytemuck::cast_slice(src_row), bytemuck::cast_slice_mut(dst_row))?;
    }
    Ok(dst)
}
