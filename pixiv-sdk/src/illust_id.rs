// ABOUTME: Parsing of user-supplied illustration references into numeric ids
// ABOUTME: Accepts bare ids as well as the artwork URL shapes pixiv hands out

use crate::error::PixivError;
use url::Url;

/// Parse an illustration id from a bare number or a pixiv artwork URL.
///
/// Accepted shapes:
/// - `92065303`
/// - `https://www.pixiv.net/artworks/92065303`
/// - `https://www.pixiv.net/en/artworks/92065303`
/// - `https://www.pixiv.net/member_illust.php?mode=medium&illust_id=92065303`
pub fn parse_illust_id(input: &str) -> Result<u64, PixivError> {
    let input = input.trim();
    let invalid = || PixivError::InvalidIllustId(input.to_string());

    if let Ok(id) = input.parse::<u64>() {
        return Ok(id);
    }

    let url = Url::parse(input).map_err(|_| invalid())?;
    let is_pixiv = url
        .host_str()
        .is_some_and(|host| host == "pixiv.net" || host.ends_with(".pixiv.net"));
    if !is_pixiv {
        return Err(invalid());
    }

    if let Some((_, id)) = url.query_pairs().find(|(key, _)| key == "illust_id") {
        return id.parse().map_err(|_| invalid());
    }

    let mut segments = url.path_segments().ok_or_else(invalid)?;
    segments
        .by_ref()
        .find(|segment| *segment == "artworks")
        .ok_or_else(invalid)?;
    segments
        .next()
        .and_then(|id| id.parse().ok())
        .ok_or_else(invalid)
}
