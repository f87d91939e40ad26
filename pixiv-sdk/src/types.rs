// ABOUTME: Typed views of the pixiv illustration API responses
// ABOUTME: Only the fields the relay and its collaborators consume are modelled

use crate::constants::urls;
use serde::Deserialize;
use std::collections::HashMap;

/// Envelope every `/ajax/` endpoint wraps its payload in.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(rename = "error")]
    pub is_error: bool,
    #[serde(default)]
    pub message: String,
    pub body: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Illust {
    pub illust_id: String,
    pub illust_title: String,
    #[serde(default)]
    pub illust_comment: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default = "default_page_count")]
    pub page_count: u32,
    #[serde(default)]
    pub urls: IllustUrls,
    #[serde(default)]
    pub tags: IllustTags,
}

fn default_page_count() -> u32 {
    1
}

/// Image URLs for the first page. Restricted works come back with every
/// field null, which deserializes to empty strings.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct IllustUrls {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub mini: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub thumb: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub small: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub regular: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub original: String,
}

impl IllustUrls {
    pub fn is_available(&self) -> bool {
        !self.regular.is_empty() && !self.original.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct IllustTags {
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tag {
    pub tag: String,
    #[serde(default)]
    pub translation: Option<HashMap<String, String>>,
}

impl Tag {
    /// English translation of the tag, when the API provides one.
    pub fn translation(&self) -> Option<&str> {
        self.translation
            .as_ref()
            .and_then(|t| t.get("en"))
            .map(String::as_str)
            .filter(|t| !t.is_empty())
    }

    pub fn search_url(&self) -> String {
        format!(
            "{}/tags/{}/{}",
            urls::PIXIV_BASE,
            self.tag,
            urls::ARTWORKS_PATH
        )
    }
}

impl Illust {
    pub fn artwork_url(&self) -> String {
        format!(
            "{}/{}/{}",
            urls::PIXIV_BASE,
            urls::ARTWORKS_PATH,
            self.illust_id
        )
    }

    pub fn author_url(&self) -> String {
        format!("{}/{}/{}", urls::PIXIV_BASE, urls::USERS_PATH, self.user_id)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
