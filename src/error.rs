//! Error types for the signature-portrait crate.

/// Errors that can occur while decoding, rendering or encoding a portrait.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An input image could not be decoded into pixels.
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),

    /// A `data:` URL or base64 payload was malformed.
    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// A source or target rectangle had a zero, negative or non-finite side.
    #[error("invalid geometry: {width}x{height} must be finite and non-zero")]
    InvalidGeometry {
        /// Offending width.
        width: f64,
        /// Offending height.
        height: f64,
    },

    /// A pixel buffer of the requested size could not be allocated.
    #[error("cannot allocate {width}x{height} canvas")]
    CanvasAllocation {
        /// Requested canvas width in pixels.
        width: u32,
        /// Requested canvas height in pixels.
        height: u32,
    },

    /// The finished canvas could not be serialized.
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// A blocking worker task panicked or was cancelled.
    #[cfg(feature = "async")]
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    /// Whether the failure came from an unreadable input image.
    ///
    /// Callers use this to ask the user for a different upload rather than
    /// reporting an internal fault.
    #[must_use]
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::InvalidDataUrl(_))
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
