// ABOUTME: Centralized constants for the pixiv relay
// ABOUTME: Contains delivery channel limits, the quality search schedule, and HTTP details

/// Limits imposed by the message-delivery channel
pub mod limits {
    /// Hard ceiling on the size of an uploaded photo
    pub const MAX_IMG_SIZE: usize = 10 * 1024 * 1024;

    /// Longest edge the channel displays without its own downscaling
    pub const MAX_DIMENSION: u32 = 2560;
}

/// JPEG quality search schedule
pub mod quality {
    pub const INITIAL_QUALITY: u8 = 100;

    pub const QUALITY_STEP: u8 = 10;

    /// Lowest quality attempted; below this fidelity collapses for little gain
    pub const MIN_QUALITY: u8 = 10;
}

/// HTTP details of the image host
pub mod http {
    /// The image host rejects hot-linked requests without this referer
    pub const REFERER: &str = "https://www.pixiv.net/";

    /// The one declared format that is always re-encoded
    pub const RAW_RASTER_CONTENT_TYPE: &str = "image/png";

    pub const USER_AGENT: &str = concat!("pixivbot/", env!("CARGO_PKG_VERSION"));

    /// Redirect hops followed when fetching an image
    pub const MAX_REDIRECTS: usize = 3;
}

/// Environment variables read by the binary
pub mod env {
    pub const PROXY_HOST: &str = "PIXIVBOT_PROXY_HOST";
}
