//! RGBA8 pixel kernels used by the CPU surface.
//!
//! Buffers are tightly packed RGBA8 rows. Unless a function says otherwise, pixels are
//! premultiplied.

use crate::foundation::{
    error::{IconError, IconResult},
    math::{mul_div255_u8, premul_u8, unpremul_u8},
};

/// A single premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over with an extra global opacity applied to `src`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Source-over of a whole buffer onto `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> IconResult<()> {
    check_pair(dst.len(), src.len(), "over_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Destination-in: keep `dst` only where `src` has alpha.
pub fn destination_in_in_place(dst: &mut [u8], src: &[u8]) -> IconResult<()> {
    check_pair(dst.len(), src.len(), "destination_in_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        for c in d.iter_mut() {
            *c = mul_div255_u8(u16::from(*c), a);
        }
    }
    Ok(())
}

/// Scale every pixel by a one-byte-per-pixel coverage mask.
pub fn apply_coverage_in_place(pixels: &mut [u8], coverage: &[u8]) -> IconResult<()> {
    if pixels.len() != coverage.len().saturating_mul(4) {
        return Err(IconError::render(
            "apply_coverage_in_place expects one coverage byte per rgba8 pixel",
        ));
    }
    for (px, &cov) in pixels.chunks_exact_mut(4).zip(coverage) {
        if cov == 255 {
            continue;
        }
        for c in px.iter_mut() {
            *c = mul_div255_u8(u16::from(*c), u16::from(cov));
        }
    }
    Ok(())
}

/// Intersect two coverage masks (multiply).
pub fn intersect_coverage_in_place(dst: &mut [u8], src: &[u8]) -> IconResult<()> {
    if dst.len() != src.len() {
        return Err(IconError::render(
            "intersect_coverage_in_place expects equal-length coverage masks",
        ));
    }
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = mul_div255_u8(u16::from(*d), u16::from(s));
    }
    Ok(())
}

/// Extract the alpha channel of a premultiplied buffer as coverage.
pub fn alpha_channel(pixels: &[u8]) -> Vec<u8> {
    pixels.chunks_exact(4).map(|px| px[3]).collect()
}

/// Convert straight RGBA8 to premultiplied, in place.
pub fn premultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        if a == 255 {
            continue;
        }
        px[0] = premul_u8(px[0], a);
        px[1] = premul_u8(px[1], a);
        px[2] = premul_u8(px[2], a);
    }
}

/// Convert premultiplied RGBA8 to straight, in place.
pub fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        if a == 255 {
            continue;
        }
        px[0] = unpremul_u8(px[0], a);
        px[1] = unpremul_u8(px[1], a);
        px[2] = unpremul_u8(px[2], a);
    }
}

/// Replace the alpha of straight RGBA8 pixels by BT.709 luminance times alpha.
///
/// Color channels are left untouched.
pub fn luminance_to_alpha_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let luma =
            0.2126 * f32::from(px[0]) + 0.7152 * f32::from(px[1]) + 0.0722 * f32::from(px[2]);
        let a = luma * f32::from(px[3]) / 255.0;
        px[3] = a.round().clamp(0.0, 255.0) as u8;
    }
}

fn check_pair(dst: usize, src: usize, what: &str) -> IconResult<()> {
    if dst != src || !dst.is_multiple_of(4) {
        return Err(IconError::render(format!(
            "{what} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
