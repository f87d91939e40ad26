// ABOUTME: Outbound file handles consumed by the message-delivery layer
// ABOUTME: Either a URL the channel fetches itself or in-memory bytes to upload

use crate::relay::conversion::TranscodeOutcome;
use std::io::Cursor;

#[derive(Debug)]
pub enum OutboundFile {
    /// Let the channel fetch the resolved URL itself.
    Url(String),
    /// Upload these bytes.
    Reader(Cursor<Vec<u8>>),
}

impl OutboundFile {
    pub fn from_url(url: impl Into<String>) -> Self {
        OutboundFile::Url(url.into())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        OutboundFile::Reader(Cursor::new(bytes))
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            OutboundFile::Url(url) => Some(url),
            OutboundFile::Reader(_) => None,
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            OutboundFile::Url(_) => None,
            OutboundFile::Reader(reader) => Some(reader.get_ref()),
        }
    }

    pub fn into_reader(self) -> Option<Cursor<Vec<u8>>> {
        match self {
            OutboundFile::Url(_) => None,
            OutboundFile::Reader(reader) => Some(reader),
        }
    }
}

impl From<TranscodeOutcome> for OutboundFile {
    fn from(outcome: TranscodeOutcome) -> Self {
        OutboundFile::from_bytes(outcome.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::encoder::EncodedAsset;
    use std::io::Read;

    #[test]
    fn test_reader_yields_bytes_unchanged() {
        let file = OutboundFile::from_bytes(vec![1, 2, 3]);
        assert_eq!(file.bytes(), Some(&[1u8, 2, 3][..]));
        assert_eq!(file.url(), None);

        let mut read = Vec::new();
        file.into_reader().unwrap().read_to_end(&mut read).unwrap();
        assert_eq!(read, vec![1, 2, 3]);
    }

    #[test]
    fn test_url_variant() {
        let file = OutboundFile::from_url("https://i.pixiv.re/a.png");
        assert_eq!(file.url(), Some("https://i.pixiv.re/a.png"));
        assert!(file.bytes().is_none());
        assert!(file.into_reader().is_none());
    }

    #[test]
    fn test_from_outcome() {
        let passed = OutboundFile::from(TranscodeOutcome::PassThrough(vec![9; 4]));
        assert_eq!(passed.bytes(), Some(&[9u8; 4][..]));

        let encoded = OutboundFile::from(TranscodeOutcome::Encoded(EncodedAsset {
            bytes: vec![0xFF, 0xD8],
            quality: 70,
        }));
        assert_eq!(encoded.bytes(), Some(&[0xFFu8, 0xD8][..]));
    }
}
