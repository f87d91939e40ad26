// ABOUTME: Custom error types for the pixiv SDK with user-friendly messages
// ABOUTME: Separates transport failures from API-reported errors and bad input

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PixivError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("pixiv API error: {0}")]
    Api(String),

    #[error("Invalid API response format")]
    InvalidResponse,

    #[error("Invalid illustration id: {0}")]
    InvalidIllustId(String),

    #[error("Timeout: Request took too long to complete")]
    Timeout,
}

impl PixivError {
    pub fn help_text(&self) -> Option<&'static str> {
        match self {
            PixivError::Network(_) => Some("Check your internet connection and try again"),
            PixivError::Api(_) => {
                Some("The illustration may have been deleted or restricted to logged-in users")
            }
            PixivError::InvalidIllustId(_) => Some(
                "Pass a numeric id (e.g., 92065303) or an artwork URL (e.g., https://www.pixiv.net/artworks/92065303)",
            ),
            PixivError::Timeout => Some("Try again or check your network connection"),
            PixivError::InvalidResponse => None,
        }
    }
}

impl From<reqwest::Error> for PixivError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PixivError::Timeout
        } else if err.is_decode() {
            PixivError::InvalidResponse
        } else {
            PixivError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PixivError {
    fn from(_err: serde_json::Error) -> Self {
        PixivError::InvalidResponse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PixivError::Network("Connection refused".to_string()).to_string(),
            "Network error: Connection refused"
        );
        assert_eq!(
            PixivError::Api("尚无权限浏览该作品".to_string()).to_string(),
            "pixiv API error: 尚无权限浏览该作品"
        );
        assert_eq!(
            PixivError::InvalidIllustId("abc".to_string()).to_string(),
            "Invalid illustration id: abc"
        );
        assert_eq!(
            PixivError::InvalidResponse.to_string(),
            "Invalid API response format"
        );
    }

    #[test]
    fn test_help_text() {
        assert!(PixivError::Network("x".to_string()).help_text().is_some());
        assert!(
            PixivError::InvalidIllustId("x".to_string())
                .help_text()
                .unwrap()
                .contains("artworks/")
        );
        assert_eq!(PixivError::InvalidResponse.help_text(), None);
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(PixivError::from(err), PixivError::InvalidResponse));
    }
}
