//! Cover-fit placement of a source raster inside a target rectangle.
//!
//! Reproduces CSS `object-fit: cover`: the source is scaled uniformly until
//! it fills the target on both axes, then centered so the overhang is
//! cropped evenly from both sides.

use crate::error::{Error, Result};

/// Where and how large to draw a source image so that it covers a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitGeometry {
    /// Uniform scale factor applied to the source.
    pub scale: f64,
    /// Scaled source width.
    pub draw_width: f64,
    /// Scaled source height.
    pub draw_height: f64,
    /// Horizontal offset of the scaled source; never positive.
    pub offset_x: f64,
    /// Vertical offset of the scaled source; never positive.
    pub offset_y: f64,
}

impl FitGeometry {
    /// The destination rectangle described by this geometry.
    #[must_use]
    pub fn rect(&self) -> DrawRect {
        DrawRect {
            x: self.offset_x,
            y: self.offset_y,
            width: self.draw_width,
            height: self.draw_height,
        }
    }
}

/// A destination rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl DrawRect {
    /// Rectangle at an integer position with an integer size.
    #[must_use]
    pub fn at(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x: f64::from(x),
            y: f64::from(y),
            width: f64::from(width),
            height: f64::from(height),
        }
    }

    /// Whether the point lies inside, with the right and bottom edges excluded.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Compute cover-fit geometry for a `source` drawn into a `target`.
///
/// `scale = max(tw / sw, th / sh)`; the scaled image is centered, so both
/// offsets are `<= 0`.
///
/// # Errors
///
/// Returns [`Error::InvalidGeometry`] if any dimension is zero, negative or
/// non-finite.
pub fn compute_cover_fit(
    source_width: f64,
    source_height: f64,
    target_width: f64,
    target_height: f64,
) -> Result<FitGeometry> {
    ensure_valid(source_width, source_height)?;
    ensure_valid(target_width, target_height)?;

    let scale = (target_width / source_width).max(target_height / source_height);
    let draw_width = source_width * scale;
    let draw_height = source_height * scale;

    Ok(FitGeometry {
        scale,
        draw_width,
        draw_height,
        offset_x: (target_width - draw_width) / 2.0,
        offset_y: (target_height - draw_height) / 2.0,
    })
}

/// Cover-fit a `(width, height)` pixel source into a pixel target.
///
/// # Errors
///
/// Same as [`compute_cover_fit`].
pub fn cover_fit_pixels(source: (u32, u32), target: (u32, u32)) -> Result<FitGeometry> {
    compute_cover_fit(
        f64::from(source.0),
        f64::from(source.1),
        f64::from(target.0),
        f64::from(target.1),
    )
}

fn ensure_valid(width: f64, height: f64) -> Result<()> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(Error::InvalidGeometry { width, height })
    }
}
