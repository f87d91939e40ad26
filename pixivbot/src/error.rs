// ABOUTME: Error taxonomy for the image relay pipeline
// ABOUTME: Every variant is fatal to the request that produced it; nothing partial is returned

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// Transport failure or non-success status. `source` is the underlying
    /// transport error when there is one.
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error(
        "Cannot produce a compliant asset: still over {budget} bytes at quality {floor}"
    )]
    EncodeExhausted { budget: usize, floor: u8 },

    #[error("Invalid URL '{url}': {reason}")]
    Parse { url: String, reason: String },
}

impl RelayError {
    pub fn network(message: impl Into<String>) -> Self {
        RelayError::Network {
            message: message.into(),
            source: None,
        }
    }

    pub fn transport(message: impl Into<String>, source: reqwest::Error) -> Self {
        RelayError::Network {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn parse(url: &str, reason: impl ToString) -> Self {
        RelayError::Parse {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn help_text(&self) -> Option<&'static str> {
        match self {
            RelayError::Network { .. } => Some("Check your internet connection and try again"),
            RelayError::Decode(_) => Some("The upstream file is not an image this build can read"),
            RelayError::EncodeExhausted { .. } => {
                Some("Try relaying the smaller variant instead of the original")
            }
            RelayError::Parse { .. } => Some("Check the configured proxy host"),
            RelayError::Encode(_) => None,
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::transport("HTTP transport error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RelayError::network("connection refused").to_string(),
            "Network error: connection refused"
        );
        assert_eq!(
            RelayError::EncodeExhausted {
                budget: 1024,
                floor: 10
            }
            .to_string(),
            "Cannot produce a compliant asset: still over 1024 bytes at quality 10"
        );
        assert_eq!(
            RelayError::parse("::", "relative URL without a base").to_string(),
            "Invalid URL '::': relative URL without a base"
        );
    }

    #[test]
    fn test_plain_network_error_has_no_source() {
        use std::error::Error as _;
        assert!(RelayError::network("HTTP 403").source().is_none());
    }

    #[test]
    fn test_help_text() {
        assert!(RelayError::network("x").help_text().is_some());
        assert!(RelayError::parse("x", "y").help_text().is_some());
        assert!(
            RelayError::EncodeExhausted {
                budget: 1,
                floor: 10
            }
            .help_text()
            .unwrap()
            .contains("smaller variant")
        );
    }
}
