//! Render profile photos into fixed-size email-signature portraits.
//!
//! Two layouts are supported, both built on the same cover-fit scaling
//! (CSS `object-fit: cover`: fill the target, keep the aspect ratio, crop
//! the overhang evenly):
//!
//! - **Circle**: a square PNG with the photo clipped to the inscribed disk,
//!   optionally desaturated. See [`mask_to_circle`].
//! - **Gradient**: a 160x175 PNG with the photo composited over a brand
//!   gradient, optionally with bright flat backdrops faded out. See
//!   [`composite_on_gradient`].
//!
//! Every call is a pure function of its inputs: it allocates its own canvas,
//! reads the caller's images without mutating them, and returns either a
//! complete PNG or an error.
//!
//! # Quick Start
//!
//! ```no_run
//! use signature_portrait::{CircleOptions, RasterImage, mask_to_circle};
//!
//! let photo = RasterImage::decode(&std::fs::read("photo.jpg").unwrap()).unwrap();
//! let png = mask_to_circle(&photo, &CircleOptions::default()).unwrap();
//! std::fs::write("avatar.png", png.bytes()).unwrap();
//! ```
//!
//! # Gradient layout
//!
//! ```no_run
//! use signature_portrait::{GradientOptions, SignatureEngine};
//!
//! let engine = SignatureEngine::gradient(
//!     &std::fs::read("gradient.png").unwrap(),
//!     GradientOptions { remove_background: true, brightness_threshold: 200 },
//! )
//! .unwrap();
//! let upload = std::fs::read("photo.jpg").unwrap();
//! let html_src = engine.render_bytes(&upload).unwrap().to_data_url();
//! println!("<img src=\"{html_src}\">");
//! ```

#![deny(missing_docs)]

pub mod background;
pub mod blending;
pub mod canvas;
pub mod circle;
mod engine;
pub mod error;
pub mod geometry;
pub mod gradient;
#[cfg(feature = "async")]
pub mod nonblocking;
pub mod raster;

pub use canvas::{Canvas, Clip, Filter};
pub use circle::{mask_to_circle, CircleOptions};
pub use engine::{
    default_output_path, is_supported_image, save_image, Layout, ProcessResult, SignatureEngine,
};
pub use error::{Error, Result};
pub use geometry::{compute_cover_fit, FitGeometry};
pub use gradient::{composite_on_gradient, GradientOptions};
pub use raster::{EncodedImage, RasterImage};
