//! Mutable RGBA drawing surface.
//!
//! A [`Canvas`] starts fully transparent and is drawn into with
//! [`Canvas::draw_image`] (scaled, clipped, optionally desaturated) or
//! [`Canvas::draw_canvas`] (1:1 copy at an offset). Every draw composites
//! with source-over.
//!
//! A destination pixel is covered when its center `(x + 0.5, y + 0.5)`
//! falls inside the draw rectangle and the clip region. Source pixels are
//! sampled bilinearly on premultiplied color, clamped at the edges.

use image::{Rgba, RgbaImage};

use crate::blending::{self, TRANSPARENT};
use crate::error::{Error, Result};
use crate::geometry::DrawRect;
use crate::raster::EncodedImage;

/// Largest canvas the renderer will allocate (1 GiB of RGBA).
const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// Region outside of which drawing has no effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clip {
    /// The whole canvas.
    None,
    /// A disk.
    Circle {
        /// Center x in canvas coordinates.
        center_x: f64,
        /// Center y in canvas coordinates.
        center_y: f64,
        /// Radius in pixels.
        radius: f64,
    },
}

impl Clip {
    /// Disk inscribed in a `size`x`size` square.
    #[must_use]
    pub fn inscribed_circle(size: u32) -> Self {
        let half = f64::from(size) / 2.0;
        Self::Circle {
            center_x: half,
            center_y: half,
            radius: half,
        }
    }

    /// Whether the point is inside the clip region. The circle boundary is
    /// inclusive.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        match *self {
            Self::None => true,
            Self::Circle {
                center_x,
                center_y,
                radius,
            } => {
                let dx = x - center_x;
                let dy = y - center_y;
                dx * dx + dy * dy <= radius * radius
            }
        }
    }
}

/// Color transform applied to sampled source pixels before compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Draw source colors as-is.
    #[default]
    None,
    /// Desaturate by the given percentage (0-100).
    Grayscale(u8),
}

impl Filter {
    fn apply(self, px: Rgba<u8>) -> Rgba<u8> {
        match self {
            Self::None => px,
            Self::Grayscale(amount) => blending::desaturate(px, amount),
        }
    }
}

/// A fixed-size RGBA pixel buffer owned by a single render.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// Allocate a fully transparent canvas.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] for a zero-area canvas and
    /// [`Error::CanvasAllocation`] if the buffer size overflows or cannot be
    /// reserved.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidGeometry {
                width: f64::from(width),
                height: f64::from(height),
            });
        }

        let alloc_err = || Error::CanvasAllocation { width, height };
        let len = u64::from(width)
            .checked_mul(u64::from(height))
            .filter(|&n| n <= MAX_CANVAS_PIXELS)
            .and_then(|n| usize::try_from(n * 4).ok())
            .ok_or_else(alloc_err)?;

        let mut buf = Vec::new();
        buf.try_reserve_exact(len).map_err(|_| alloc_err())?;
        buf.resize(len, 0);

        let pixels = RgbaImage::from_raw(width, height, buf).ok_or_else(alloc_err)?;
        Ok(Self { pixels })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Read a single pixel. Out-of-bounds reads return transparent.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        self.pixels.get_pixel_checked(x, y).copied().unwrap_or(TRANSPARENT)
    }

    /// Overwrite a single pixel. Out-of-bounds writes are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, px: Rgba<u8>) {
        if let Some(dst) = self.pixels.get_pixel_mut_checked(x, y) {
            *dst = px;
        }
    }

    /// Read-only access to the whole buffer.
    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Mutable access to the whole buffer for bulk transforms.
    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    /// Consume into the underlying buffer.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Draw `source` scaled into `dest`, restricted to `clip`, with `filter`
    /// applied to every sampled pixel.
    ///
    /// Parts of `dest` outside the canvas are cropped. An empty source or an
    /// empty rectangle draws nothing.
    pub fn draw_image(&mut self, source: &RgbaImage, dest: DrawRect, clip: Clip, filter: Filter) {
        let (src_w, src_h) = source.dimensions();
        if src_w == 0 || src_h == 0 || !(dest.width > 0.0 && dest.height > 0.0) {
            return;
        }

        let (x_range, y_range) = (
            pixel_span(dest.x, dest.width, self.width()),
            pixel_span(dest.y, dest.height, self.height()),
        );
        let step_x = f64::from(src_w) / dest.width;
        let step_y = f64::from(src_h) / dest.height;

        for y in y_range {
            let cy = f64::from(y) + 0.5;
            let v = (cy - dest.y) * step_y - 0.5;
            for x in x_range.clone() {
                let cx = f64::from(x) + 0.5;
                if !dest.contains(cx, cy) || !clip.contains(cx, cy) {
                    continue;
                }
                let u = (cx - dest.x) * step_x - 0.5;
                let sampled = filter.apply(sample_bilinear(source, u, v));
                let dst = self.pixels.get_pixel_mut(x, y);
                *dst = blending::source_over(*dst, sampled);
            }
        }
    }

    /// Composite another canvas 1:1 with its top-left corner at `(x, y)`.
    pub fn draw_canvas(&mut self, other: &Canvas, x: u32, y: u32) {
        for (dx, dy, src) in other.pixels.enumerate_pixels() {
            let (Some(tx), Some(ty)) = (x.checked_add(dx), y.checked_add(dy)) else {
                continue;
            };
            if let Some(dst) = self.pixels.get_pixel_mut_checked(tx, ty) {
                *dst = blending::source_over(*dst, *src);
            }
        }
    }

    /// Encode the canvas as PNG, preserving transparency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the encoder fails.
    pub fn encode_png(&self) -> Result<EncodedImage> {
        EncodedImage::png(&self.pixels)
    }
}

/// Integer pixel indices whose centers may fall in `[start, start + len)`,
/// clipped to `[0, limit)`.
fn pixel_span(start: f64, len: f64, limit: u32) -> std::ops::Range<u32> {
    let clamp = |v: f64| -> u32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            v.clamp(0.0, f64::from(limit)) as u32
        }
    };
    clamp(start.floor())..clamp((start + len).ceil())
}

/// Bilinear sample at continuous source coordinates (pixel centers at
/// integer positions), interpolating premultiplied color.
fn sample_bilinear(src: &RgbaImage, u: f64, v: f64) -> Rgba<u8> {
    let max_x = src.width() - 1;
    let max_y = src.height() - 1;
    let u = u.clamp(0.0, f64::from(max_x));
    let v = v.clamp(0.0, f64::from(max_y));

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (x0, y0) = (u.floor() as u32, v.floor() as u32);
    let (x1, y1) = ((x0 + 1).min(max_x), (y0 + 1).min(max_y));
    let fx = u - f64::from(x0);
    let fy = v - f64::from(y0);

    let taps = [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x1, y0, fx * (1.0 - fy)),
        (x0, y1, (1.0 - fx) * fy),
        (x1, y1, fx * fy),
    ];

    let mut premul = [0.0f64; 3];
    let mut alpha = 0.0f64;
    for (x, y, w) in taps {
        if w == 0.0 {
            continue;
        }
        let px = src.get_pixel(x, y);
        let a = f64::from(px[3]) / 255.0 * w;
        alpha += a;
        for (acc, c) in premul.iter_mut().zip(px.0) {
            *acc += f64::from(c) * a;
        }
    }

    if alpha <= 0.0 {
        return TRANSPARENT;
    }

    let mut out = TRANSPARENT;
    for (ch, c) in premul.into_iter().enumerate() {
        out[ch] = to_u8(c / alpha);
    }
    out[3] = to_u8(alpha * 255.0);
    out
}

fn to_u8(v: f64) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        v.round().clamp(0.0, 255.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
    }

    #[test]
    fn new_canvas_is_transparent() {
        let canvas = Canvas::new(4, 3).unwrap();
        assert_eq!(canvas.width(), 4);
        assert_eq!(canvas.height(), 3);
        assert!(canvas.pixels().pixels().all(|p| *p == TRANSPARENT));
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        assert!(matches!(
            Canvas::new(0, 10),
            Err(Error::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn huge_canvas_fails_allocation_instead_of_aborting() {
        assert!(matches!(
            Canvas::new(u32::MAX, u32::MAX),
            Err(Error::CanvasAllocation { .. })
        ));
        assert!(matches!(
            Canvas::new(1 << 15, 1 << 14),
            Err(Error::CanvasAllocation { .. })
        ));
    }

    #[test]
    fn unscaled_draw_copies_pixels_exactly() {
        let src = checker(5, 4);
        let mut canvas = Canvas::new(5, 4).unwrap();
        canvas.draw_image(&src, DrawRect::at(0, 0, 5, 4), Clip::None, Filter::None);
        assert_eq!(canvas.pixels(), &src);
    }

    #[test]
    fn draw_is_confined_to_destination_rect() {
        let src = RgbaImage::from_pixel(10, 10, Rgba([9, 9, 9, 255]));
        let mut canvas = Canvas::new(20, 20).unwrap();
        canvas.draw_image(&src, DrawRect::at(5, 6, 4, 3), Clip::None, Filter::None);

        for (x, y, px) in canvas.pixels().enumerate_pixels() {
            let inside = (5..9).contains(&x) && (6..9).contains(&y);
            assert_eq!(px[3] == 255, inside, "pixel ({x},{y})");
        }
    }

    #[test]
    fn negative_offsets_are_cropped() {
        let src = RgbaImage::from_fn(4, 1, |x, _| Rgba([u8::try_from(x * 60).unwrap(), 0, 0, 255]));
        let mut canvas = Canvas::new(2, 1).unwrap();
        let dest = DrawRect {
            x: -1.0,
            y: 0.0,
            width: 4.0,
            height: 1.0,
        };
        canvas.draw_image(&src, dest, Clip::None, Filter::None);
        assert_eq!(canvas.pixel(0, 0)[0], 60);
        assert_eq!(canvas.pixel(1, 0)[0], 120);
    }

    #[test]
    fn circle_clip_leaves_corners_transparent() {
        let src = RgbaImage::from_pixel(8, 8, Rgba([200, 10, 10, 255]));
        let mut canvas = Canvas::new(8, 8).unwrap();
        canvas.draw_image(
            &src,
            DrawRect::at(0, 0, 8, 8),
            Clip::inscribed_circle(8),
            Filter::None,
        );
        assert_eq!(canvas.pixel(0, 0), TRANSPARENT);
        assert_eq!(canvas.pixel(7, 7), TRANSPARENT);
        assert_eq!(canvas.pixel(4, 4), Rgba([200, 10, 10, 255]));
        assert_eq!(canvas.pixel(0, 4), Rgba([200, 10, 10, 255]));
    }

    #[test]
    fn grayscale_filter_applies_to_drawn_pixels() {
        let src = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let mut canvas = Canvas::new(2, 2).unwrap();
        canvas.draw_image(&src, DrawRect::at(0, 0, 2, 2), Clip::None, Filter::Grayscale(100));
        let px = canvas.pixel(1, 1);
        assert_eq!(px, Rgba([54, 54, 54, 255]));
    }

    #[test]
    fn bilinear_downscale_averages_neighbours() {
        let src = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([200, 200, 200, 255])
            }
        });
        let mut canvas = Canvas::new(1, 1).unwrap();
        canvas.draw_image(&src, DrawRect::at(0, 0, 1, 1), Clip::None, Filter::None);
        assert_eq!(canvas.pixel(0, 0), Rgba([100, 100, 100, 255]));
    }

    #[test]
    fn transparent_neighbours_do_not_darken_edges() {
        let src = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([200, 100, 50, 255])
            }
        });
        let mut canvas = Canvas::new(1, 1).unwrap();
        canvas.draw_image(&src, DrawRect::at(0, 0, 1, 1), Clip::None, Filter::None);
        let px = canvas.pixel(0, 0);
        assert_eq!([px[0], px[1], px[2]], [200, 100, 50]);
        assert_eq!(px[3], 128);
    }

    #[test]
    fn draw_canvas_composites_at_offset() {
        let mut base = Canvas::new(4, 4).unwrap();
        base.draw_image(
            &RgbaImage::from_pixel(1, 1, Rgba([0, 0, 255, 255])),
            DrawRect::at(0, 0, 4, 4),
            Clip::None,
            Filter::None,
        );

        let mut top = Canvas::new(3, 3).unwrap();
        top.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        top.put_pixel(1, 1, Rgba([255, 0, 0, 0]));

        base.draw_canvas(&top, 2, 2);
        assert_eq!(base.pixel(2, 2), Rgba([255, 0, 0, 255]));
        assert_eq!(base.pixel(3, 3), Rgba([0, 0, 255, 255]));
        assert_eq!(base.pixel(1, 1), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn out_of_bounds_pixel_access_is_harmless() {
        let mut canvas = Canvas::new(2, 2).unwrap();
        canvas.put_pixel(5, 5, Rgba([1, 1, 1, 1]));
        assert_eq!(canvas.pixel(5, 5), TRANSPARENT);
    }
}
