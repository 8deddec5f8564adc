//! Heuristic background removal.
//!
//! Flat studio backdrops are bright and nearly achromatic. A pixel is
//! classified as background when either:
//! 1. its brightness `(r + g + b) / 3` exceeds the caller's threshold, or
//! 2. it is a light gray: brightness above 180 and a channel spread
//!    `max(|r-g|, |g-b|, |b-r|)` below 30.
//!
//! Classified pixels fade toward transparent; alpha is only ever lowered.
//! This is not segmentation: light clothing and skin fade too, and busy or
//! colorful backdrops are left alone.

use image::{Rgba, RgbaImage};

/// Brightness above which a low-spread pixel counts as light gray.
const LIGHT_GRAY_MIN_BRIGHTNESS: f32 = 180.0;
/// Channel spread below which a pixel counts as achromatic.
const LIGHT_GRAY_MAX_COLOR_DIFF: u8 = 30;

/// Mean of the three color channels, in `[0, 255]`.
#[must_use]
pub fn brightness(px: Rgba<u8>) -> f32 {
    (f32::from(px[0]) + f32::from(px[1]) + f32::from(px[2])) / 3.0
}

/// Largest pairwise difference among the color channels.
#[must_use]
pub fn color_diff(px: Rgba<u8>) -> u8 {
    let [r, g, b, _] = px.0;
    r.abs_diff(g).max(g.abs_diff(b)).max(b.abs_diff(r))
}

/// Whether a pixel looks like backdrop under `brightness_threshold`.
#[must_use]
pub fn is_background(px: Rgba<u8>, brightness_threshold: u8) -> bool {
    let lum = brightness(px);
    lum > f32::from(brightness_threshold)
        || (lum > LIGHT_GRAY_MIN_BRIGHTNESS && color_diff(px) < LIGHT_GRAY_MAX_COLOR_DIFF)
}

/// Alpha a pixel should carry after background removal.
///
/// Background pixels get `min(alpha, fade)` where
/// `fade = clamp((threshold - brightness) / threshold * 255, 0, 255)`, so
/// pixels brighter than the threshold vanish and light grays just below it
/// fade smoothly. A zero threshold makes every background pixel vanish.
/// Other pixels keep their alpha.
#[must_use]
pub fn compute_background_alpha(px: Rgba<u8>, brightness_threshold: u8) -> u8 {
    let alpha = px[3];
    if !is_background(px, brightness_threshold) {
        return alpha;
    }
    if brightness_threshold == 0 {
        return 0;
    }

    let threshold = f32::from(brightness_threshold);
    let fade = (threshold - brightness(px)) / threshold * 255.0;
    alpha.min(crate::blending::to_channel(fade))
}

/// Apply [`compute_background_alpha`] to every pixel, rewriting only alpha.
pub fn remove_background(img: &mut RgbaImage, brightness_threshold: u8) {
    let mut faded = 0usize;
    for px in img.pixels_mut() {
        let alpha = compute_background_alpha(*px, brightness_threshold);
        if alpha != px[3] {
            px[3] = alpha;
            faded += 1;
        }
    }
    log::debug!(
        "background removal (threshold {brightness_threshold}) faded {faded} of {} pixels",
        img.width() * img.height()
    );
}
