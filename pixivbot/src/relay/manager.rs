// ABOUTME: Per-request orchestration of resolve, fetch, transcode, and assemble
// ABOUTME: Configured once, then shared immutably by every concurrent relay

use crate::error::RelayError;
use crate::relay::conversion::{TranscodeOutcome, Transcoder};
use crate::relay::downloader::Fetcher;
use crate::relay::encoder::{JpegRasterEncoder, RasterEncoder};
use crate::relay::output::OutboundFile;
use crate::relay::resolver::DeliveryMode;
use crate::relay::ImageSource;
use serde::Deserialize;

/// Which stored variant of an image to relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageVariant {
    #[default]
    Small,
    Original,
}

/// How the resolved image reaches the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    /// Hand the resolved URL to the channel.
    #[default]
    Link,
    /// Fetch and transcode here, then upload the bytes.
    Download,
}

pub struct ImageRelay<E = JpegRasterEncoder> {
    mode: DeliveryMode,
    upload: UploadKind,
    variant: ImageVariant,
    fetcher: Fetcher,
    transcoder: Transcoder<E>,
}

impl ImageRelay {
    pub fn new(mode: DeliveryMode) -> Result<Self, RelayError> {
        Ok(Self {
            mode,
            upload: UploadKind::default(),
            variant: ImageVariant::default(),
            fetcher: Fetcher::new()?,
            transcoder: Transcoder::new(),
        })
    }
}

impl<E: RasterEncoder> ImageRelay<E> {
    pub fn with_upload(mut self, upload: UploadKind) -> Self {
        self.upload = upload;
        self
    }

    pub fn with_variant(mut self, variant: ImageVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_fetcher(mut self, fetcher: Fetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_transcoder<F: RasterEncoder>(self, transcoder: Transcoder<F>) -> ImageRelay<F> {
        ImageRelay {
            mode: self.mode,
            upload: self.upload,
            variant: self.variant,
            fetcher: self.fetcher,
            transcoder,
        }
    }

    pub fn mode(&self) -> &DeliveryMode {
        &self.mode
    }

    pub fn upload(&self) -> UploadKind {
        self.upload
    }

    pub fn variant(&self) -> ImageVariant {
        self.variant
    }

    pub fn transcoder(&self) -> &Transcoder<E> {
        &self.transcoder
    }

    /// The stored URL for the configured variant, before resolution.
    pub fn source_url<'a, S: ImageSource + ?Sized>(&self, source: &'a S) -> &'a str {
        match self.variant {
            ImageVariant::Small => source.small_image(),
            ImageVariant::Original => source.original_image(),
        }
    }

    pub fn resolve_url<S: ImageSource + ?Sized>(&self, source: &S) -> Result<String, RelayError> {
        self.mode.resolve(self.source_url(source))
    }

    /// Fetch a resolved URL and bring it within the channel's limits.
    pub fn fetch_and_transcode(&self, url: &str) -> Result<TranscodeOutcome, RelayError> {
        let fetched = self.fetcher.fetch(url)?;
        let outcome = self
            .transcoder
            .transcode(fetched.bytes, &fetched.content_type)?;

        match outcome.quality() {
            Some(quality) => log::info!(
                "Relayed {} re-encoded at quality {} ({} bytes)",
                url,
                quality,
                outcome.bytes().len()
            ),
            None => log::info!(
                "Relayed {} unchanged ({} bytes)",
                url,
                outcome.bytes().len()
            ),
        }
        Ok(outcome)
    }

    pub fn relay<S: ImageSource + ?Sized>(&self, source: &S) -> Result<OutboundFile, RelayError> {
        let url = self.resolve_url(source)?;
        match self.upload {
            UploadKind::Link => Ok(OutboundFile::from_url(url)),
            UploadKind::Download => self.fetch_and_transcode(&url).map(OutboundFile::from),
        }
    }
}
