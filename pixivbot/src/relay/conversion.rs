// ABOUTME: Decides whether fetched bytes need re-encoding and normalizes them when they do
// ABOUTME: Compliant assets pass through untouched; everything else is decoded, resized, and budget-encoded

use crate::constants::{http, limits};
use crate::error::RelayError;
use crate::relay::encoder::{BudgetEncoder, EncodedAsset, JpegRasterEncoder, RasterEncoder};
use crate::relay::scaling::fit_to_dimension;
use image::{DynamicImage, ImageFormat};

/// What the transcoder did with an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscodeOutcome {
    /// Input was already compliant and is returned byte-for-byte.
    PassThrough(Vec<u8>),
    Encoded(EncodedAsset),
}

impl TranscodeOutcome {
    pub fn bytes(&self) -> &[u8] {
        match self {
            TranscodeOutcome::PassThrough(bytes) => bytes,
            TranscodeOutcome::Encoded(asset) => &asset.bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            TranscodeOutcome::PassThrough(bytes) => bytes,
            TranscodeOutcome::Encoded(asset) => asset.bytes,
        }
    }

    /// JPEG quality used, if the input was re-encoded.
    pub fn quality(&self) -> Option<u8> {
        match self {
            TranscodeOutcome::PassThrough(_) => None,
            TranscodeOutcome::Encoded(asset) => Some(asset.quality),
        }
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self, TranscodeOutcome::PassThrough(_))
    }
}

/// Whether a declared content type is the raw raster format that always
/// gets re-encoded. Parameters and case are ignored.
pub fn is_raw_raster(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|media| {
            media
                .trim()
                .eq_ignore_ascii_case(http::RAW_RASTER_CONTENT_TYPE)
        })
}

pub struct Transcoder<E = JpegRasterEncoder> {
    encoder: BudgetEncoder<E>,
    max_dimension: u32,
}

impl Transcoder {
    pub fn new() -> Self {
        Self::with_encoder(BudgetEncoder::new())
    }
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RasterEncoder> Transcoder<E> {
    pub fn with_encoder(encoder: BudgetEncoder<E>) -> Self {
        Self {
            encoder,
            max_dimension: limits::MAX_DIMENSION,
        }
    }

    /// Zero disables the dimension cap.
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Byte ceiling for delivered assets; shared with the encoder's buffer.
    pub fn max_size(&self) -> usize {
        self.encoder.capacity()
    }

    pub fn encoder(&self) -> &BudgetEncoder<E> {
        &self.encoder
    }

    /// Raw rasters are always re-encoded. Other formats are re-encoded only
    /// when they are over the size ceiling.
    pub fn needs_transcode(&self, content_type: &str, len: usize) -> bool {
        is_raw_raster(content_type) || len > self.max_size()
    }

    pub fn transcode(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<TranscodeOutcome, RelayError> {
        if !self.needs_transcode(content_type, bytes.len()) {
            log::debug!(
                "Passing through {} bytes of {} unchanged",
                bytes.len(),
                content_type
            );
            return Ok(TranscodeOutcome::PassThrough(bytes));
        }

        if !is_raw_raster(content_type) {
            log::debug!(
                "{} asset of {} bytes is over the {} byte ceiling, re-encoding",
                content_type,
                bytes.len(),
                self.max_size()
            );
        }

        let image = self.decode(&bytes, content_type)?;
        drop(bytes);
        let image = self.normalize(image);
        self.encoder.encode(&image).map(TranscodeOutcome::Encoded)
    }

    /// Decode with an explicit PNG hint for raw rasters, sniffing otherwise.
    pub fn decode(&self, bytes: &[u8], content_type: &str) -> Result<DynamicImage, RelayError> {
        let image = if is_raw_raster(content_type) {
            image::load_from_memory_with_format(bytes, ImageFormat::Png)
        } else {
            image::load_from_memory(bytes)
        }
        .map_err(RelayError::Decode)?;

        log::debug!(
            "Decoded {}x{} {:?} image",
            image.width(),
            image.height(),
            image.color()
        );
        Ok(image)
    }

    /// Flatten to an 8-bit layout without alpha, then apply the one-shot
    /// dimension cap.
    pub fn normalize(&self, image: DynamicImage) -> DynamicImage {
        fit_to_dimension(flatten(image), self.max_dimension)
    }
}

fn flatten(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
        DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_) => DynamicImage::ImageLuma8(image.to_luma8()),
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}
