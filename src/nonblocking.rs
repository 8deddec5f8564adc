//! Asynchronous entry points (feature `async`).
//!
//! Decoding and encoding run on tokio's blocking pool, giving one suspension
//! point per decode and one per encode. The pixel work in between runs to
//! completion without yielding. Dropping a returned future abandons the call;
//! no partial state is observable.

use std::sync::Arc;

use crate::canvas::Canvas;
use crate::circle::{self, CircleOptions};
use crate::error::Result;
use crate::gradient::{self, GradientOptions};
use crate::raster::{EncodedImage, RasterImage};

/// Decode image bytes off the async executor.
///
/// # Errors
///
/// Returns [`crate::Error::Decode`] for unreadable bytes and
/// [`crate::Error::Task`] if the worker fails.
pub async fn decode(bytes: Vec<u8>) -> Result<RasterImage> {
    tokio::task::spawn_blocking(move || RasterImage::decode(&bytes)).await?
}

/// Encode a finished canvas as PNG off the async executor.
///
/// # Errors
///
/// Returns [`crate::Error::Encode`] if encoding fails and
/// [`crate::Error::Task`] if the worker fails.
pub async fn encode(canvas: Canvas) -> Result<EncodedImage> {
    tokio::task::spawn_blocking(move || canvas.encode_png()).await?
}

/// Decode, render a circular portrait, and encode.
///
/// # Errors
///
/// Propagates decode, geometry, allocation and encoding failures.
pub async fn mask_to_circle(profile: Vec<u8>, opts: CircleOptions) -> Result<EncodedImage> {
    let source = decode(profile).await?;
    let canvas = circle::render_circle(&source, &opts)?;
    encode(canvas).await
}

/// Decode both images concurrently, composite, and encode.
///
/// # Errors
///
/// Propagates decode, geometry, allocation and encoding failures. If both
/// decodes fail, the first error observed is returned.
pub async fn composite_on_gradient(
    gradient: Vec<u8>,
    profile: Vec<u8>,
    opts: GradientOptions,
) -> Result<EncodedImage> {
    let (gradient, profile) = tokio::try_join!(decode(gradient), decode(profile))?;
    let canvas = gradient::render_composite(&gradient, &profile, &opts)?;
    encode(canvas).await
}

/// Composite a profile onto a gradient that was decoded once and is shared
/// between calls.
///
/// # Errors
///
/// Same as [`composite_on_gradient`].
pub async fn composite_on_shared_gradient(
    gradient: Arc<RasterImage>,
    profile: Vec<u8>,
    opts: GradientOptions,
) -> Result<EncodedImage> {
    let profile = decode(profile).await?;
    let canvas = gradient::render_composite(&gradient, &profile, &opts)?;
    encode(canvas).await
}
