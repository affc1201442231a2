//! Laplacian-variance sharpness score.
//!
//! The image is reduced to luma with BGR channel order (channel 0 weighted
//! as blue), matching scores produced by OpenCV's `COLOR_BGR2GRAY` on RGBA
//! bitmap data. It is then filtered with the 4-neighbour Laplacian
//! `[0 1 0; 1 -4 1; 0 1 0]` (borders mirrored without repeating the edge
//! pixel), and the population variance of the response is the score. Flat
//! images score 0; fine detail scores high. The score is a single heuristic
//! and carries no calibration: callers pick their own threshold.

use crate::{Error, PixelBuffer, Result, bytes};

/// Reduce a 1, 2, 3 or 4 channel buffer to one luma channel.
///
/// Gray+alpha keeps the gray channel. Color channels use the BT.601 weights
/// in BGR order, so channel 0 gets the blue weight.
pub fn to_gray(buffer: &PixelBuffer) -> Result<PixelBuffer> {
    let (w, h) = (buffer.width(), buffer.height());
    if buffer.channels() == 1 {
        return Ok(buffer.clone());
    }
    let mut gray = PixelBuffer::new(w, h, 1);
    if buffer.is_empty() {
        return Ok(gray);
    }
    match buffer.channels() {
        2 => {
            for (d, s) in gray.data_mut().iter_mut().zip(buffer.data().chunks_exact(2)) {
                *d = s[0];
            }
        }
        3 => bytes::bgr_to_gray(buffer.data(), gray.data_mut())?,
        4 => bytes::bgra_to_gray(buffer.data(), gray.data_mut())?,
        n => return Err(Error::UnsupportedChannels(n)),
    }
    Ok(gray)
}

/// Mirror index `i` into `0..n` without repeating the border sample
/// (`-1 → 1`, `n → n - 2`).
#[inline]
fn reflect101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as isize;
    let i = if i < 0 { -i } else { i };
    let i = if i >= n { 2 * n - 2 - i } else { i };
    i as usize
}

/// Laplacian response of a single-channel buffer, one value per pixel.
pub fn laplacian(gray: &PixelBuffer) -> Result<Vec<f64>> {
    if gray.channels() != 1 {
        return Err(Error::UnsupportedChannels(gray.channels()));
    }
    let (w, h) = (gray.width(), gray.height());
    let px = |x: isize, y: isize| -> f64 {
        gray.data()[reflect101(y, h) * w + reflect101(x, w)] as f64
    };
    let mut out = Vec::with_capacity(w * h);
    for y in 0..h as isize {
        for x in 0..w as isize {
            out.push(px(x - 1, y) + px(x + 1, y) + px(x, y - 1) + px(x, y + 1) - 4.0 * px(x, y));
        }
    }
    Ok(out)
}

/// Population mean and standard deviation. `(0, 0)` for no samples.
pub fn mean_std_dev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Variance of the Laplacian of `buffer`'s luma.
pub fn laplacian_variance(buffer: &PixelBuffer) -> Result<f64> {
    let gray = to_gray(buffer)?;
    let response = laplacian(&gray)?;
    let (_, std_dev) = mean_std_dev(&response);
    Ok(std_dev * std_dev)
}

/// `true` when `variance` falls strictly below `threshold`.
pub fn is_blurry(variance: f64, threshold: f64) -> bool {
    variance < threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard_of(w: usize, h: usize, cell: usize, color: [u8; 4]) -> PixelBuffer {
        let mut data = Vec::with_capacity(w * h * 4);
        for y in 0..h {
            for x in 0..w {
                if (x / cell + y / cell) % 2 == 0 {
                    data.extend_from_slice(&[0, 0, 0, 255]);
                } else {
                    data.extend_from_slice(&color);
                }
            }
        }
        PixelBuffer::from_vec(w, h, 4, data).unwrap()
    }

    fn checkerboard(w: usize, h: usize, cell: usize) -> PixelBuffer {
        checkerboard_of(w, h, cell, [255; 4])
    }

    #[test]
    fn reflect101_borders() {
        assert_eq!(reflect101(-1, 5), 1);
        assert_eq!(reflect101(5, 5), 3);
        assert_eq!(reflect101(2, 5), 2);
        assert_eq!(reflect101(-1, 1), 0);
        assert_eq!(reflect101(1, 1), 0);
    }

    #[test]
    fn flat_image_has_zero_variance() {
        let flat = PixelBuffer::from_vec(16, 9, 4, [37, 120, 200, 255].repeat(16 * 9)).unwrap();
        let variance = laplacian_variance(&flat).unwrap();
        assert_eq!(variance, 0.0);
        assert!(is_blurry(variance, f64::MIN_POSITIVE));
    }

    #[test]
    fn checkerboard_is_sharp() {
        let variance = laplacian_variance(&checkerboard(16, 16, 1)).unwrap();
        // Every response is ±1020 with reflect-101 borders.
        assert!((variance - 1020.0 * 1020.0).abs() < 1e-6, "variance={variance}");
        assert!(!is_blurry(variance, 10.0));
    }

    #[test]
    fn colored_checkerboards_use_bgr_weights() {
        // Channel 0 carries the blue weight (29), channel 2 the red (76).
        let red = laplacian_variance(&checkerboard_of(16, 16, 1, [255, 0, 0, 255])).unwrap();
        assert_eq!(red, (4.0f64 * 29.0).powi(2));
        let blue = laplacian_variance(&checkerboard_of(16, 16, 1, [0, 0, 255, 255])).unwrap();
        assert_eq!(blue, (4.0f64 * 76.0).powi(2));
        assert!(is_blurry(red, 50_000.0));
        assert!(!is_blurry(blue, 50_000.0));
    }

    #[test]
    fn laplacian_of_single_spike() {
        let mut data = vec![0u8; 9];
        data[4] = 10;
        let gray = PixelBuffer::from_vec(3, 3, 1, data).unwrap();
        let response = laplacian(&gray).unwrap();
        assert_eq!(response, vec![0.0, 20.0, 0.0, 20.0, -40.0, 20.0, 0.0, 20.0, 0.0]);
    }

    #[test]
    fn gray_conversion_weights() {
        let rgb = PixelBuffer::from_vec(3, 1, 3, vec![255, 0, 0, 0, 255, 0, 0, 0, 255]).unwrap();
        let gray = to_gray(&rgb).unwrap();
        assert_eq!(gray.data(), &[29, 150, 76]);
    }

    #[test]
    fn mean_std_dev_population() {
        assert_eq!(mean_std_dev(&[]), (0.0, 0.0));
        let (mean, sd) = mean_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(mean, 5.0);
        assert_eq!(sd, 2.0);
    }
}
