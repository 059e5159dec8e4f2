//! Downscale and re-encode uploaded photos before they are stored.
//!
//! The optimizer never fails: every problem (not an image, undecodable,
//! encoder error, timeout, result not smaller) degrades to handing back the
//! original bytes untouched.

use bytes::Bytes;
use image::{
    DynamicImage, ImageDecoder, ImageReader, ImageResult,
    codecs::{jpeg::JpegEncoder, webp::WebPEncoder},
    imageops::FilterType,
    metadata::Orientation,
};
use std::{io::Cursor, sync::Arc, time::Duration};
use tracing::{debug, error, info, instrument, warn};

/// Content type assumed when the client did not send one.
pub const FALLBACK_CONTENT_TYPE: &str = "image/jpeg";

/// The declared content type, or [`FALLBACK_CONTENT_TYPE`] when it is blank.
pub fn content_type_or_default(declared: &str) -> &str {
    let declared = declared.trim();
    if declared.is_empty() {
        FALLBACK_CONTENT_TYPE
    } else {
        declared
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerSettings {
    /// Longest edge of the output, in pixels. Smaller images are never upscaled.
    pub max_dimension: u32,
    pub jpeg_quality: u8,
    /// Budget for a single encode attempt.
    pub encode_timeout: Duration,
    /// Budget for decode, resize and all encode attempts together.
    pub overall_timeout: Duration,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            max_dimension: 1920,
            jpeg_quality: 86,
            encode_timeout: Duration::from_millis(2500),
            overall_timeout: Duration::from_millis(5000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    WebP,
}

impl OutputFormat {
    /// Attempted in order; the second only runs if the first produced nothing.
    const ATTEMPTS: [OutputFormat; 2] = [OutputFormat::Jpeg, OutputFormat::WebP];

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedImage {
    pub bytes: Bytes,
    pub content_type: String,
    /// `None` when these are the original bytes.
    pub format: Option<OutputFormat>,
}

impl OptimizedImage {
    fn original(bytes: Bytes, content_type: &str) -> Self {
        Self {
            bytes,
            content_type: content_type_or_default(content_type).to_string(),
            format: None,
        }
    }

    pub fn is_optimized(&self) -> bool {
        self.format.is_some()
    }

    /// File extension matching the re-encoded format; `None` for originals.
    pub fn extension(&self) -> Option<&'static str> {
        self.format.map(OutputFormat::extension)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImageOptimizer {
    settings: OptimizerSettings,
}

impl ImageOptimizer {
    pub fn new(settings: OptimizerSettings) -> Self {
        Self { settings }
    }

    /// Returns a smaller re-encoded image, or the input unchanged.
    #[instrument(skip(self, bytes), fields(input_bytes = bytes.len()))]
    pub async fn optimize(&self, bytes: Bytes, content_type: &str) -> OptimizedImage {
        let attempt = self.try_optimize(bytes.clone(), content_type);

        match tokio::time::timeout(self.settings.overall_timeout, attempt).await {
            Ok(Some(optimized)) => {
                info!(
                    output_bytes = optimized.bytes.len(),
                    content_type = %optimized.content_type,
                    "Image optimized"
                );
                optimized
            }
            Ok(None) => OptimizedImage::original(bytes, content_type),
            Err(_) => {
                warn!(
                    "Image optimization exceeded {:?}, keeping original",
                    self.settings.overall_timeout
                );
                OptimizedImage::original(bytes, content_type)
            }
        }
    }

    async fn try_optimize(&self, bytes: Bytes, content_type: &str) -> Option<OptimizedImage> {
        if !is_optimizable(content_type) {
            debug!("Skipping optimization for content type {:?}", content_type);
            return None;
        }

        let input = bytes.clone();
        let max_dimension = self.settings.max_dimension;
        let canvas = match tokio::task::spawn_blocking(move || {
            decode_and_resize(&input, max_dimension)
        })
        .await
        {
            Ok(Ok(canvas)) => Arc::new(canvas),
            Ok(Err(e)) => {
                debug!("Could not decode image, keeping original: {}", e);
                return None;
            }
            Err(e) => {
                error!("Image decode task failed: {}", e);
                return None;
            }
        };

        for format in OutputFormat::ATTEMPTS {
            let Some(encoded) = self.encode_with_timeout(canvas.clone(), format).await else {
                continue;
            };

            if encoded.len() >= bytes.len() {
                debug!(
                    "{:?} output ({} bytes) is not smaller than input ({} bytes), keeping original",
                    format,
                    encoded.len(),
                    bytes.len()
                );
                return None;
            }

            return Some(OptimizedImage {
                bytes: Bytes::from(encoded),
                content_type: format.content_type().to_string(),
                format: Some(format),
            });
        }

        None
    }

    async fn encode_with_timeout(
        &self,
        canvas: Arc<DynamicImage>,
        format: OutputFormat,
    ) -> Option<Vec<u8>> {
        let quality = self.settings.jpeg_quality;
        let task = tokio::task::spawn_blocking(move || encode(&canvas, format, quality));

        match tokio::time::timeout(self.settings.encode_timeout, task).await {
            Ok(Ok(Ok(encoded))) => Some(encoded),
            Ok(Ok(Err(e))) => {
                warn!("{:?} encoding failed: {}", format, e);
                None
            }
            Ok(Err(e)) => {
                error!("{:?} encode task failed: {}", format, e);
                None
            }
            Err(_) => {
                warn!(
                    "{:?} encoding exceeded {:?}",
                    format, self.settings.encode_timeout
                );
                None
            }
        }
    }
}

/// HEIC/HEIF cannot be decoded here and are stored as-is.
pub fn is_optimizable(content_type: &str) -> bool {
    let ct = content_type.trim().to_ascii_lowercase();
    ct.starts_with("image/") && !ct.contains("heic") && !ct.contains("heif")
}

/// Output size for an image whose longest edge must not exceed `max_dimension`.
pub fn target_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_dimension {
        return (width, height);
    }

    let scale = f64::from(max_dimension) / f64::from(longest);
    let scaled = |edge: u32| ((f64::from(edge) * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}

/// Decodes, applies EXIF orientation and shrinks to fit `max_dimension`.
pub fn decode_and_resize(data: &[u8], max_dimension: u32) -> ImageResult<DynamicImage> {
    let mut decoder = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);

    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);

    let (width, height) = target_dimensions(img.width(), img.height(), max_dimension);
    if (width, height) == (img.width(), img.height()) {
        return Ok(img);
    }

    debug!(
        "Resizing image from {}x{} to {}x{}",
        img.width(),
        img.height(),
        width,
        height
    );
    Ok(img.resize_exact(width, height, FilterType::Lanczos3))
}

fn encode(img: &DynamicImage, format: OutputFormat, jpeg_quality: u8) -> ImageResult<Vec<u8>> {
    let mut buffer = Vec::new();
    match format {
        // JPEG has no alpha channel.
        OutputFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8())
            .write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, jpeg_quality))?,
        OutputFormat::WebP => DynamicImage::ImageRgba8(img.to_rgba8())
            .write_with_encoder(WebPEncoder::new_lossless(&mut buffer))?,
    }
    Ok(buffer)
}
