// ABOUTME: Centralized constants for the pixiv SDK
// ABOUTME: Contains API endpoints, request headers, and timeouts

/// HTTP and request timeouts
pub mod timeouts {
    use std::time::Duration;

    /// Default timeout for metadata requests
    pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

/// pixiv URLs
pub mod urls {
    /// Site root, used for the API base and for building public links
    pub const PIXIV_BASE: &str = "https://www.pixiv.net";

    /// Path prefix of public artwork pages
    pub const ARTWORKS_PATH: &str = "artworks";

    /// Path prefix of public user pages
    pub const USERS_PATH: &str = "users";
}

/// Request headers sent with every metadata request
pub mod headers {
    /// Preferred languages; controls which tag translations the API returns
    pub const ACCEPT_LANGUAGE: &str = "zh-CN,zh";

    pub const USER_AGENT: &str = concat!("pixiv-sdk/", env!("CARGO_PKG_VERSION"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timeout_constants() {
        assert_eq!(timeouts::HTTP_REQUEST_TIMEOUT, Duration::from_secs(30));
    }

    #[test]
    fn test_url_constants() {
        assert!(urls::PIXIV_BASE.starts_with("https://"));
        assert!(!urls::PIXIV_BASE.ends_with('/'));
    }

    #[test]
    fn test_header_constants() {
        assert_eq!(headers::ACCEPT_LANGUAGE, "zh-CN,zh");
        assert!(headers::USER_AGENT.starts_with("pixiv-sdk/"));
    }
}
