//! Reusable renderer and file/directory batch processing.

use std::path::{Path, PathBuf};

use crate::circle::{self, CircleOptions};
use crate::error::{Error, Result};
use crate::gradient::{self, GradientOptions};
use crate::raster::{EncodedImage, RasterImage};

/// Which signature portrait to produce.
#[derive(Debug, Clone)]
pub enum Layout {
    /// Round, optionally grayscale portrait.
    Circle(CircleOptions),
    /// Portrait composited over a brand gradient.
    Gradient {
        /// Decoded gradient asset.
        gradient: RasterImage,
        /// Compositing options.
        options: GradientOptions,
    },
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the processed file.
    pub path: PathBuf,
    /// Where the portrait was written, if anywhere.
    pub output: Option<PathBuf>,
    /// Whether processing succeeded.
    pub success: bool,
    /// Human-readable status message.
    pub message: String,
}

/// Renders profile photos with one fixed [`Layout`].
///
/// The gradient asset is decoded once at construction and shared by every
/// render. Renders borrow the engine immutably, so one engine can serve
/// parallel workers. To change an option, build a new engine.
#[derive(Debug, Clone)]
pub struct SignatureEngine {
    layout: Layout,
}

impl SignatureEngine {
    /// Engine producing circular portraits.
    #[must_use]
    pub fn circle(options: CircleOptions) -> Self {
        Self {
            layout: Layout::Circle(options),
        }
    }

    /// Engine compositing onto the gradient asset in `gradient_bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the gradient cannot be decoded and
    /// [`Error::InvalidGeometry`] if it has zero area.
    pub fn gradient(gradient_bytes: &[u8], options: GradientOptions) -> Result<Self> {
        let gradient = RasterImage::decode(gradient_bytes)?;
        Self::with_gradient(gradient, options)
    }

    /// Engine compositing onto an already decoded gradient.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if the gradient has zero area.
    pub fn with_gradient(gradient: RasterImage, options: GradientOptions) -> Result<Self> {
        if gradient.is_empty() {
            return Err(Error::InvalidGeometry {
                width: f64::from(gradient.width()),
                height: f64::from(gradient.height()),
            });
        }
        Ok(Self {
            layout: Layout::Gradient { gradient, options },
        })
    }

    /// The configured layout.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Output `(width, height)` of every render.
    #[must_use]
    pub fn output_size(&self) -> (u32, u32) {
        match &self.layout {
            Layout::Circle(opts) => (opts.diameter, opts.diameter),
            Layout::Gradient { .. } => (gradient::OUTPUT_WIDTH, gradient::OUTPUT_HEIGHT),
        }
    }

    /// Render a decoded profile photo.
    ///
    /// # Errors
    ///
    /// Propagates geometry, allocation and encoding failures.
    pub fn render(&self, profile: &RasterImage) -> Result<EncodedImage> {
        match &self.layout {
            Layout::Circle(opts) => circle::mask_to_circle(profile, opts),
            Layout::Gradient { gradient, options } => {
                gradient::composite_on_gradient(gradient, profile, options)
            }
        }
    }

    /// Decode and render raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for unreadable input, otherwise as
    /// [`Self::render`].
    pub fn render_bytes(&self, bytes: &[u8]) -> Result<EncodedImage> {
        self.render(&RasterImage::decode(bytes)?)
    }

    /// Render an uploaded `data:` URL into a PNG `data:` URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDataUrl`] or [`Error::Decode`] for unreadable
    /// input, otherwise as [`Self::render`].
    pub fn render_data_url(&self, data_url: &str) -> Result<String> {
        let profile = RasterImage::from_data_url(data_url)?;
        Ok(self.render(&profile)?.to_data_url())
    }

    /// Process a single image file: load, render, save.
    ///
    /// Returns a [`ProcessResult`] indicating success or failure.
    #[must_use]
    pub fn process_file(&self, input: &Path, output: &Path) -> ProcessResult {
        let mut result = ProcessResult {
            path: input.to_path_buf(),
            output: None,
            success: false,
            message: String::new(),
        };

        let encoded = match std::fs::read(input)
            .map_err(Error::from)
            .and_then(|bytes| self.render_bytes(&bytes))
        {
            Ok(encoded) => encoded,
            Err(e) => {
                log::warn!("{}: {e}", input.display());
                result.message = format!("Failed to render: {e}");
                return result;
            }
        };

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    result.message = format!("Failed to create output directory: {e}");
                    return result;
                }
            }
        }

        match save_image(&encoded, output) {
            Ok(()) => {
                let (w, h) = self.output_size();
                log::info!("{} -> {} ({w}x{h})", input.display(), output.display());
                result.success = true;
                result.output = Some(output.to_path_buf());
                result.message = format!("Rendered {w}x{h} portrait");
            }
            Err(e) => {
                result.message = format!("Failed to save: {e}");
            }
        }

        result
    }

    /// Process all supported images in a directory.
    ///
    /// Each input `photo.jpg` is written to `output_dir/photo_signature.png`.
    /// Uses parallel iteration when the `cli` feature is enabled (via rayon).
    #[must_use]
    pub fn process_directory(&self, input_dir: &Path, output_dir: &Path) -> Vec<ProcessResult> {
        let entries: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .map(|e| e.path())
                .filter(|p| is_supported_image(p))
                .collect(),
            Err(e) => {
                return vec![failure(
                    input_dir,
                    format!("Failed to read directory: {e}"),
                )];
            }
        };

        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                return vec![failure(
                    output_dir,
                    format!("Failed to create output directory: {e}"),
                )];
            }
        }

        let job = |input_path: &PathBuf| {
            let output_path = output_dir.join(output_file_name(input_path));
            self.process_file(input_path, &output_path)
        };

        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            entries.par_iter().map(job).collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            entries.iter().map(job).collect()
        }
    }
}

fn failure(path: &Path, message: String) -> ProcessResult {
    ProcessResult {
        path: path.to_path_buf(),
        output: None,
        success: false,
        message,
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp" | "gif"
        ),
        None => false,
    }
}

/// Write an encoded portrait to `path`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] unless `path` ends in `.png`, and
/// [`Error::Io`] if writing fails.
pub fn save_image(encoded: &EncodedImage, path: &Path) -> Result<()> {
    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if !is_png {
        return Err(Error::UnsupportedFormat(format!(
            "{} (portraits carry transparency and are always written as PNG)",
            path.display()
        )));
    }

    std::fs::write(path, encoded.bytes())?;
    Ok(())
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_signature.png"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(output_file_name(input))
}

fn output_file_name(input: &Path) -> String {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    format!("{stem}_signature.png")
}
