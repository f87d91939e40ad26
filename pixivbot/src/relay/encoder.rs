// ABOUTME: Size-budgeted JPEG encoding via a descending quality search
// ABOUTME: Each attempt writes into one reused scratch buffer that aborts as soon as the budget is blown

use crate::constants::{limits, quality};
use crate::error::RelayError;
use crate::relay::scratch::{is_capacity_exceeded, ScratchBuffer};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageEncoder, ImageError, ImageResult};

/// A lossy codec the quality search can drive.
///
/// Implementations must write straight into `out` and propagate its I/O
/// errors unchanged, so an overflow surfaces as `ImageError::IoError`.
pub trait RasterEncoder: Send + Sync {
    fn encode(&self, image: &DynamicImage, quality: u8, out: &mut ScratchBuffer)
        -> ImageResult<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JpegRasterEncoder;

impl RasterEncoder for JpegRasterEncoder {
    fn encode(
        &self,
        image: &DynamicImage,
        quality: u8,
        out: &mut ScratchBuffer,
    ) -> ImageResult<()> {
        let flattened;
        let image = match image {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
            other => {
                flattened = DynamicImage::ImageRgb8(other.to_rgb8());
                &flattened
            }
        };

        JpegEncoder::new_with_quality(out, quality).write_image(
            image.as_bytes(),
            image.width(),
            image.height(),
            image.color().into(),
        )
    }
}

/// Quality levels to try, highest first: 100, 90, ... down to the floor.
#[derive(Debug, Clone)]
pub struct QualitySearch {
    next: Option<u8>,
}

impl QualitySearch {
    pub fn new() -> Self {
        Self {
            next: Some(quality::INITIAL_QUALITY),
        }
    }
}

impl Default for QualitySearch {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for QualitySearch {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let current = self.next?;
        self.next = current
            .checked_sub(quality::QUALITY_STEP)
            .filter(|&q| q >= quality::MIN_QUALITY);
        Some(current)
    }
}

/// Output of a successful search. `bytes.len()` never exceeds the budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAsset {
    pub bytes: Vec<u8>,
    pub quality: u8,
}

pub struct BudgetEncoder<E = JpegRasterEncoder> {
    encoder: E,
    capacity: usize,
}

impl BudgetEncoder {
    pub fn new() -> Self {
        Self::with_encoder(JpegRasterEncoder, limits::MAX_IMG_SIZE)
    }
}

impl Default for BudgetEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RasterEncoder> BudgetEncoder<E> {
    pub fn with_encoder(encoder: E, capacity: usize) -> Self {
        Self { encoder, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Encode at the highest quality whose output fits the budget.
    ///
    /// Stops at the first fit without trying to refine further. Overflowing
    /// attempts are abandoned mid-write.
    pub fn encode(&self, image: &DynamicImage) -> Result<EncodedAsset, RelayError> {
        let mut buffer = ScratchBuffer::with_capacity(self.capacity);

        for quality in QualitySearch::new() {
            buffer.reset();
            match self.encoder.encode(image, quality, &mut buffer) {
                Ok(()) => {
                    log::debug!(
                        "Encoded {}x{} at quality {} ({} bytes)",
                        image.width(),
                        image.height(),
                        quality,
                        buffer.len()
                    );
                    return Ok(EncodedAsset {
                        bytes: buffer.as_bytes().to_vec(),
                        quality,
                    });
                }
                Err(ImageError::IoError(ref e)) if is_capacity_exceeded(e) => {
                    log::debug!(
                        "Quality {} exceeds {} byte budget, lowering",
                        quality,
                        self.capacity
                    );
                }
                Err(e) => return Err(RelayError::Encode(e)),
            }
        }

        Err(RelayError::EncodeExhausted {
            budget: self.capacity,
            floor: quality::MIN_QUALITY,
        })
    }
}
