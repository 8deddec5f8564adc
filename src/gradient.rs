//! Brand gradient portrait.
//!
//! Layout of the 160x175 output, all bottom-aligned:
//!
//! ```text
//! x:  0    13          139   155  160
//!     |gradient---------|
//!          |profile window------|
//! ```
//!
//! The gradient occupies the left 139x175 area. The profile photo is
//! cover-fitted into a 142x148 window, optionally background-removed, and
//! composited over the gradient 13px from the left edge.

use crate::background;
use crate::canvas::{Canvas, Clip, Filter};
use crate::error::{Error, Result};
use crate::geometry::{self, DrawRect};
use crate::raster::{EncodedImage, RasterImage};

/// Output width.
pub const OUTPUT_WIDTH: u32 = 160;
/// Output height.
pub const OUTPUT_HEIGHT: u32 = 175;
/// Width the gradient asset is drawn at, regardless of its native size.
pub const GRADIENT_WIDTH: u32 = 139;
/// Height the gradient asset is drawn at.
pub const GRADIENT_HEIGHT: u32 = 175;
/// Width of the profile window.
pub const PROFILE_WIDTH: u32 = 142;
/// Height of the profile window.
pub const PROFILE_HEIGHT: u32 = 148;
/// Distance of the profile window from the left edge.
pub const PROFILE_INSET_X: u32 = 13;

/// Default brightness cutoff for background removal.
pub const DEFAULT_BRIGHTNESS_THRESHOLD: u8 = 200;

/// Options for [`composite_on_gradient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientOptions {
    /// Fade bright, flat backdrops out of the profile photo.
    pub remove_background: bool,
    /// Brightness above which a pixel is treated as backdrop.
    pub brightness_threshold: u8,
}

impl Default for GradientOptions {
    fn default() -> Self {
        Self {
            remove_background: true,
            brightness_threshold: DEFAULT_BRIGHTNESS_THRESHOLD,
        }
    }
}

/// Render the profile photo into the 142x148 window buffer.
///
/// # Errors
///
/// Returns [`Error::InvalidGeometry`] if `profile` has zero area.
pub fn render_profile_window(profile: &RasterImage, opts: &GradientOptions) -> Result<Canvas> {
    let fit = geometry::cover_fit_pixels(profile.dimensions(), (PROFILE_WIDTH, PROFILE_HEIGHT))?;
    log::debug!(
        "profile window: {}x{} source scaled by {:.4} at ({:.2}, {:.2})",
        profile.width(),
        profile.height(),
        fit.scale,
        fit.offset_x,
        fit.offset_y,
    );

    let mut window = Canvas::new(PROFILE_WIDTH, PROFILE_HEIGHT)?;
    window.draw_image(profile.pixels(), fit.rect(), Clip::None, Filter::None);

    if opts.remove_background {
        background::remove_background(window.pixels_mut(), opts.brightness_threshold);
    }
    Ok(window)
}

/// Composite the profile over the gradient into a 160x175 canvas.
///
/// # Errors
///
/// Returns [`Error::InvalidGeometry`] if either image has zero area and
/// [`Error::CanvasAllocation`] if a buffer cannot be allocated.
pub fn render_composite(
    gradient: &RasterImage,
    profile: &RasterImage,
    opts: &GradientOptions,
) -> Result<Canvas> {
    if gradient.is_empty() {
        return Err(Error::InvalidGeometry {
            width: f64::from(gradient.width()),
            height: f64::from(gradient.height()),
        });
    }

    let mut canvas = Canvas::new(OUTPUT_WIDTH, OUTPUT_HEIGHT)?;
    canvas.draw_image(
        gradient.pixels(),
        DrawRect::at(0, OUTPUT_HEIGHT - GRADIENT_HEIGHT, GRADIENT_WIDTH, GRADIENT_HEIGHT),
        Clip::None,
        Filter::None,
    );

    let window = render_profile_window(profile, opts)?;
    canvas.draw_canvas(&window, PROFILE_INSET_X, OUTPUT_HEIGHT - PROFILE_HEIGHT);
    Ok(canvas)
}

/// Composite the profile over the gradient and encode it as PNG.
///
/// # Errors
///
/// Same as [`render_composite`], plus [`Error::Encode`] if encoding fails.
pub fn composite_on_gradient(
    gradient: &RasterImage,
    profile: &RasterImage,
    opts: &GradientOptions,
) -> Result<EncodedImage> {
    render_composite(gradient, profile, opts)?.encode_png()
}
