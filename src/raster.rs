//! Decoded input rasters and encoded output images.

use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{Error, Result};

/// MIME type of every image this crate produces.
pub const PNG_MIME: &str = "image/png";

/// An immutable decoded bitmap: row-major RGBA, 8 bits per channel,
/// straight alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    /// Decode raw image bytes (PNG, JPEG, WebP, BMP, GIF first frame).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the format is unrecognized or the data is
    /// corrupt.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).map_err(Error::Decode)?;
        log::debug!("decoded {}x{} source image", img.width(), img.height());
        Ok(Self::from(img))
    }

    /// Decode a `data:image/...;base64,...` URL, or a bare base64 payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDataUrl`] for a malformed URL or payload and
    /// [`Error::Decode`] if the embedded bytes are not a readable image.
    pub fn from_data_url(data: &str) -> Result<Self> {
        let bytes = parse_data_url(data)?;
        Self::decode(&bytes)
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

    /// `(width, height)` in pixels.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Whether the image has zero area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Read-only access to the pixel buffer.
    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl From<RgbaImage> for RasterImage {
    fn from(pixels: RgbaImage) -> Self {
        Self { pixels }
    }
}

impl From<DynamicImage> for RasterImage {
    fn from(img: DynamicImage) -> Self {
        Self {
            pixels: img.into_rgba8(),
        }
    }
}

/// A finished image: encoded bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
    mime_type: &'static str,
}

impl EncodedImage {
    /// Encode an RGBA buffer as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the PNG encoder fails.
    pub fn png(pixels: &RgbaImage) -> Result<Self> {
        let mut bytes = Vec::new();
        pixels
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(Error::Encode)?;
        log::debug!(
            "encoded {}x{} canvas into {} bytes",
            pixels.width(),
            pixels.height(),
            bytes.len()
        );
        Ok(Self {
            bytes,
            mime_type: PNG_MIME,
        })
    }

    /// The encoded bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume into the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// MIME type of [`Self::bytes`].
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// Render as a `data:` URL suitable for an HTML `img` `src` attribute.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// Decode the bytes back into pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the bytes are not a readable image.
    pub fn decode(&self) -> Result<RasterImage> {
        RasterImage::decode(&self.bytes)
    }
}

/// Extract the binary payload of a `data:` URL or bare base64 string.
///
/// # Errors
///
/// Returns [`Error::InvalidDataUrl`] when the URL is not base64-encoded, is
/// missing its payload separator, or the payload is not valid base64.
pub fn parse_data_url(data: &str) -> Result<Vec<u8>> {
    let normalized = data.trim();

    let payload = match normalized.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| Error::InvalidDataUrl("missing ',' separator".to_string()))?;
            if !header.ends_with(";base64") {
                return Err(Error::InvalidDataUrl(format!(
                    "expected a base64 payload, got header '{header}'"
                )));
            }
            payload
        }
        None => normalized,
    };

    if payload.is_empty() {
        return Err(Error::InvalidDataUrl("empty payload".to_string()));
    }

    general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| Error::InvalidDataUrl(format!("base64 decode failed: {e}")))
}
