use archmage::prelude::*;

// ===========================================================================
// Row kernels, shared by every dispatch tier
// ===========================================================================

const R2Y: u32 = 4899;
const G2Y: u32 = 9617;
const B2Y: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

#[inline(always)]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * R2Y + g as u32 * G2Y + b as u32 * B2Y + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

#[inline(always)]
fn pack565(r: u8, g: u8, b: u8) -> [u8; 2] {
    let v = ((b as u16) >> 3) | (((g as u16) & !3) << 3) | (((r as u16) & !7) << 8);
    v.to_ne_bytes()
}

#[inline(always)]
pub(super) fn premultiply_row(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        let a = s[3] as u32;
        d[0] = ((s[0] as u32 * a + 128) / 255) as u8;
        d[1] = ((s[1] as u32 * a + 128) / 255) as u8;
        d[2] = ((s[2] as u32 * a + 128) / 255) as u8;
        d[3] = s[3];
    }
}

#[inline(always)]
pub(super) fn unpremultiply_row(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        let a = s[3] as u32;
        if a == 0 {
            d[..3].fill(0);
        } else {
            let half = a / 2;
            d[0] = ((s[0] as u32 * 255 + half) / a).min(255) as u8;
            d[1] = ((s[1] as u32 * 255 + half) / a).min(255) as u8;
            d[2] = ((s[2] as u32 * 255 + half) / a).min(255) as u8;
        }
        d[3] = s[3];
    }
}

#[inline(always)]
pub(super) fn rgb565_to_rgba_row(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(2).zip(dst.chunks_exact_mut(4)) {
        let v = u16::from_ne_bytes([s[0], s[1]]);
        d[0] = ((v >> 8) & 0xF8) as u8;
        d[1] = ((v >> 3) & 0xFC) as u8;
        d[2] = ((v << 3) & 0xF8) as u8;
        d[3] = 0xFF;
    }
}

#[inline(always)]
pub(super) fn gray_to_rgba_row(src: &[u8], dst: &mut [u8]) {
    for (&v, d) in src.iter().zip(dst.chunks_exact_mut(4)) {
        d[0] = v;
        d[1] = v;
        d[2] = v;
        d[3] = 0xFF;
    }
}

#[inline(always)]
pub(super) fn rgb_to_rgba_row(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)) {
        d[0] = s[0];
        d[1] = s[1];
        d[2] = s[2];
        d[3] = 0xFF;
    }
}

#[inline(always)]
pub(super) fn rgba_to_rgb565_row(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(2)) {
        d.copy_from_slice(&pack565(s[0], s[1], s[2]));
    }
}

#[inline(always)]
pub(super) fn rgb_to_rgb565_row(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(2)) {
        d.copy_from_slice(&pack565(s[0], s[1], s[2]));
    }
}

#[inline(always)]
pub(super) fn gray_to_rgb565_row(src: &[u8], dst: &mut [u8]) {
    for (&v, d) in src.iter().zip(dst.chunks_exact_mut(2)) {
        d.copy_from_slice(&pack565(v, v, v));
    }
}

#[inline(always)]
pub(super) fn rgba_to_gray_row(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(4).zip(dst.iter_mut()) {
        *d = luma(s[0], s[1], s[2]);
    }
}

#[inline(always)]
pub(super) fn rgb_to_gray_row(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(3).zip(dst.iter_mut()) {
        *d = luma(s[0], s[1], s[2]);
    }
}

#[inline(always)]
pub(super) fn bgra_to_gray_row(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(4).zip(dst.iter_mut()) {
        *d = luma(s[2], s[1], s[0]);
    }
}

#[inline(always)]
pub(super) fn bgr_to_gray_row(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(3).zip(dst.iter_mut()) {
        *d = luma(s[2], s[1], s[0]);
    }
}

// ===========================================================================
// Scalar dispatch targets for incant!
// ===========================================================================

pub(super) fn premultiply_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    premultiply_row(s, d);
}
pub(super) fn unpremultiply_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    unpremultiply_row(s, d);
}
pub(super) fn rgb565_to_rgba_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    rgb565_to_rgba_row(s, d);
}
pub(super) fn gray_to_rgba_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    gray_to_rgba_row(s, d);
}
pub(super) fn rgb_to_rgba_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    rgb_to_rgba_row(s, d);
}
pub(super) fn rgba_to_rgb565_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    rgba_to_rgb565_row(s, d);
}
pub(super) fn rgb_to_rgb565_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    rgb_to_rgb565_row(s, d);
}
pub(super) fn gray_to_rgb565_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    gray_to_rgb565_row(s, d);
}
pub(super) fn rgba_to_gray_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    rgba_to_gray_row(s, d);
}
pub(super) fn rgb_to_gray_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    rgb_to_gray_row(s, d);
}
pub(super) fn bgra_to_gray_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    bgra_to_gray_row(s, d);
}
pub(super) fn bgr_to_gray_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    bgr_to_gray_row(s, d);
}
