//! Per-pixel blending math.
//!
//! Pixels are 8-bit RGBA with straight (non-premultiplied) alpha. Compositing
//! follows Porter-Duff source-over:
//! `out_a = src_a + dst_a * (1 - src_a)`,
//! `out_c = (src_c * src_a + dst_c * dst_a * (1 - src_a)) / out_a`.
//!
//! Over an opaque destination this reduces to the familiar
//! `src * src_a + dst * (1 - src_a)`.

use image::Rgba;

/// Rec.709 luma weights, as used by the CSS `grayscale()` filter.
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

/// Fully transparent black.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Composite `src` over `dst`.
#[must_use]
pub fn source_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        0 => return dst,
        255 => return src,
        _ => {}
    }

    let src_a = f32::from(src[3]) / 255.0;
    let dst_a = f32::from(dst[3]) / 255.0;
    let dst_weight = dst_a * (1.0 - src_a);
    let out_a = src_a + dst_weight;

    let mut out = TRANSPARENT;
    for ch in 0..3 {
        let c = (f32::from(src[ch]) * src_a + f32::from(dst[ch]) * dst_weight) / out_a;
        out[ch] = to_channel(c);
    }
    out[3] = to_channel(out_a * 255.0);
    out
}

/// Perceptual luminance of a pixel in `[0, 255]`.
#[must_use]
pub fn luminance(px: Rgba<u8>) -> f32 {
    LUMA_R * f32::from(px[0]) + LUMA_G * f32::from(px[1]) + LUMA_B * f32::from(px[2])
}

/// Blend a pixel toward its luminance by `amount` percent.
///
/// `0` leaves the pixel untouched, `100` yields `R = G = B`. Values above
/// 100 are treated as 100. Alpha is preserved.
#[must_use]
pub fn desaturate(px: Rgba<u8>, amount: u8) -> Rgba<u8> {
    if amount == 0 {
        return px;
    }
    let t = f32::from(amount.min(100)) / 100.0;
    let lum = luminance(px);

    let mut out = px;
    for ch in 0..3 {
        out[ch] = to_channel(lum * t + f32::from(px[ch]) * (1.0 - t));
    }
    out
}

/// Round and clamp a float channel value into `u8`.
#[must_use]
pub(crate) fn to_channel(v: f32) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        v.round().clamp(0.0, 255.0) as u8
    }
}
