use archmage::prelude::*;

use super::scalar::*;

// ===========================================================================
// x86-64-v3 arcane wrappers
//
// Same row loops as the scalar tier, compiled with AVX2/FMA enabled so the
// per-channel arithmetic autovectorizes.
// ===========================================================================

#[arcane]
pub(super) fn premultiply_impl_v3(_t: X64V3Token, s: &[u8], d: &mut [u8]) {
    premultiply_row(s, d);
}
#[arcane]
pub(super) fn unpremultiply_impl_v3(_t: X64V3Token, s: &[u8], d: &mut [u8]) {
    unpremultiply_row(s, d);
}
#[arcane]
pub(super) fn rgb565_to_rgba_impl_v3(_t: X64V3Token, s: &[u8], d: &mut [u8]) {
    rgb565_to_rgba_row(s, d);
}
#[arcane]
pub(super) fn gray_to_rgba_impl_v3(_t: X64V3Token, s: &[u8], d: &mut [u8]) {
    gray_to_rgba_row(s, d);
}
#[arcane]
pub(super) fn rgb_to_rgba_impl_v3(_t: X64V3Token, s: &[u8], d: &mut [u8]) {
    rgb_to_rgba_row(s, d);
}
#[arcane]
pub(super) fn rgba_to_rgb565_impl_v3(_t: X64V3Token, s: &[u8], d: &mut [u8]) {
    rgba_to_rgb565_row(s, d);
}
#[arcane]
pub(super) fn rgb_to_rgb565_impl_v3(_t: X64V3Token, s: &[u8], d: &mut [u8]) {
    rgb_to_rgb565_row(s, d);
}
#[arcane]
pub(super) fn gray_to_rgb565_impl_v3(_t: X64V3Token, s: &[u8], d: &mut [u8]) {
    gray_to_rgb565_row(s, d);
}
#[arcane]
pub(super) fn rgba_to_gray_impl_v3(_t: X64V3Token, s: &[u8], d: &mut [u8]) {
    rgba_to_gray_row(s, d);
}
#[arcane]
pub(super) fn rgb_to_gray_impl_v3(_t: X64V3Token, s: &[u8], d: &mut [u8]) {
    rgb_to_gray_row(s, d);
}
#[arcane]
pub(super) fn bgra_to_gray_impl_v3(_t: X64V3Token, s: &[u8], d: &mut [u8]) {
    bgra_to_gray_row(s, d);
}
#[arcane]
pub(super) fn bgr_to_gray_impl_v3(_t: X64V3Token, s: &[u8], d: &mut [u8]) {
    bgr_to_gray_row(s, d);
}
