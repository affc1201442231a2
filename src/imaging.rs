//! Flip and Gaussian blur, delegated to the `image` crate.

use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};

use crate::{Error, PixelBuffer, Result};

/// Axis to mirror an image across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlipAxis {
    /// Upside down: rows are reversed.
    #[default]
    Vertical,
    /// Left-right: columns are reversed.
    Horizontal,
    /// Both axes, i.e. a 180° rotation.
    Both,
}

fn to_dynamic(buffer: PixelBuffer) -> Result<DynamicImage> {
    let (w, h) = match (u32::try_from(buffer.width()), u32::try_from(buffer.height())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(Error::InvalidArgument("pixel buffer dimensions exceed u32")),
    };
    let channels = buffer.channels();
    let data = buffer.into_vec();
    let img = match channels {
        1 => GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        2 => GrayAlphaImage::from_raw(w, h, data).map(DynamicImage::ImageLumaA8),
        3 => RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
        n => return Err(Error::UnsupportedChannels(n)),
    };
    img.ok_or(Error::InvalidArgument("pixel buffer does not match its dimensions"))
}

fn from_dynamic(img: DynamicImage) -> Result<PixelBuffer> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let (channels, data) = match img {
        DynamicImage::ImageLuma8(img) => (1, img.into_raw()),
        DynamicImage::ImageLumaA8(img) => (2, img.into_raw()),
        DynamicImage::ImageRgb8(img) => (3, img.into_raw()),
        DynamicImage::ImageRgba8(img) => (4, img.into_raw()),
        other => (4, other.into_rgba8().into_raw()),
    };
    Ok(PixelBuffer::from_vec(w, h, channels, data)?)
}

/// Mirror `buffer` across `axis`. Dimensions and channels are unchanged.
pub fn flip(buffer: PixelBuffer, axis: FlipAxis) -> Result<PixelBuffer> {
    let img = to_dynamic(buffer)?;
    let flipped = match axis {
        FlipAxis::Vertical => img.flipv(),
        FlipAxis::Horizontal => img.fliph(),
        FlipAxis::Both => img.rotate180(),
    };
    from_dynamic(flipped)
}

/// Gaussian blur with standard deviation `sigma`, which must be finite and
/// positive.
pub fn gaussian_blur(buffer: PixelBuffer, sigma: f32) -> Result<PixelBuffer> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(Error::InvalidArgument("blur sigma must be finite and positive"));
    }
    let img = to_dynamic(buffer)?;
    from_dynamic(img.blur(sigma))
}
