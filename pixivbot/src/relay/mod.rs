// ABOUTME: Image relay pipeline: resolve a reference, fetch it, and make it fit the channel
// ABOUTME: Bytes flow one way through resolver, downloader, conversion, encoder, and output

/// Anything that stores a small and an original variant of an image.
pub trait ImageSource {
    fn small_image(&self) -> &str;

    fn original_image(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub small: String,
    pub original: String,
}

impl ImageReference {
    pub fn new(small: impl Into<String>, original: impl Into<String>) -> Self {
        Self {
            small: small.into(),
            original: original.into(),
        }
    }
}

impl ImageSource for ImageReference {
    fn small_image(&self) -> &str {
        &self.small
    }

    fn original_image(&self) -> &str {
        &self.original
    }
}

impl ImageSource for pixiv_sdk::Illust {
    fn small_image(&self) -> &str {
        &self.urls.regular
    }

    fn original_image(&self) -> &str {
        &self.urls.original
    }
}

pub mod conversion;
pub mod downloader;
pub mod encoder;
pub mod manager;
pub mod output;
pub mod resolver;
pub mod scaling;
pub mod scratch;

pub use conversion::{TranscodeOutcome, Transcoder};
pub use downloader::{FetchedImage, Fetcher};
pub use encoder::{BudgetEncoder, EncodedAsset, JpegRasterEncoder, QualitySearch, RasterEncoder};
pub use manager::{ImageRelay, ImageVariant, UploadKind};
pub use output::OutboundFile;
pub use resolver::DeliveryMode;
pub use scratch::{CapacityExceeded, ScratchBuffer};
