//! Circular portrait: cover-fit into a square and clip to the inscribed disk.

use crate::canvas::{Canvas, Clip, Filter};
use crate::error::{Error, Result};
use crate::geometry;
use crate::raster::{EncodedImage, RasterImage};

/// Diameter of the round signature portrait, in pixels.
pub const DEFAULT_DIAMETER: u32 = 121;

/// Options for [`mask_to_circle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircleOptions {
    /// Side of the square output and diameter of the visible disk.
    pub diameter: u32,
    /// Desaturate the photo before drawing.
    pub grayscale: bool,
    /// Desaturation strength, 0-100. Larger values are treated as 100.
    pub grayscale_amount: u8,
}

impl Default for CircleOptions {
    fn default() -> Self {
        Self {
            diameter: DEFAULT_DIAMETER,
            grayscale: true,
            grayscale_amount: 100,
        }
    }
}

impl CircleOptions {
    fn filter(&self) -> Filter {
        if self.grayscale {
            Filter::Grayscale(self.grayscale_amount.min(100))
        } else {
            Filter::None
        }
    }
}

/// Render `source` into a `diameter`-sized square, clipped to a circle.
///
/// Pixels outside the inscribed disk stay fully transparent.
///
/// # Errors
///
/// Returns [`Error::InvalidGeometry`] if `source` has zero area or the
/// diameter is zero, and [`Error::CanvasAllocation`] if the canvas cannot be
/// allocated.
pub fn render_circle(source: &RasterImage, opts: &CircleOptions) -> Result<Canvas> {
    if opts.diameter == 0 {
        return Err(Error::InvalidGeometry {
            width: 0.0,
            height: 0.0,
        });
    }

    let fit = geometry::cover_fit_pixels(source.dimensions(), (opts.diameter, opts.diameter))?;
    log::debug!(
        "circle {d}x{d}: {}x{} source scaled by {:.4} at ({:.2}, {:.2})",
        source.width(),
        source.height(),
        fit.scale,
        fit.offset_x,
        fit.offset_y,
        d = opts.diameter,
    );

    let mut canvas = Canvas::new(opts.diameter, opts.diameter)?;
    canvas.draw_image(
        source.pixels(),
        fit.rect(),
        Clip::inscribed_circle(opts.diameter),
        opts.filter(),
    );
    Ok(canvas)
}

/// Render a circular portrait and encode it as PNG.
///
/// # Errors
///
/// Same as [`render_circle`], plus [`Error::Encode`] if encoding fails.
pub fn mask_to_circle(source: &RasterImage, opts: &CircleOptions) -> Result<EncodedImage> {
    render_circle(source, opts)?.encode_png()
}
