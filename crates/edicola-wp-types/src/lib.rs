//! Response types for the WordPress REST `wp/v2/posts` listing endpoint.
//!
//! The deserialization is deliberately tolerant: WordPress installations vary
//! in which optional fields they emit, and the `_embedded` media slot can hold
//! error objects instead of attachments when a featured image is missing.
//! Unknown fields are ignored everywhere.

use serde::{Deserialize, Serialize};

/// One post as returned by the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WpPost {
    pub id: u64,
    /// Publish timestamp in the site's local time, ISO 8601 without offset.
    #[serde(default)]
    pub date: Option<String>,
    /// Absolute permalink.
    pub link: String,
    #[serde(default)]
    pub title: RenderedField,
    #[serde(default)]
    pub excerpt: RenderedField,
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<WpEmbedded>,
}

impl WpPost {
    /// The first embedded featured-media entry, when it carries a usable URL.
    pub fn featured_media(&self) -> Option<&WpFeaturedMedia> {
        self.embedded
            .as_ref()?
            .featured_media
            .first()
            .filter(|media| media.source_url.is_some())
    }
}

/// An HTML fragment pre-rendered by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderedField {
    #[serde(default)]
    pub rendered: String,
}

/// Resources embedded into the response via the `_embed` query parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WpEmbedded {
    #[serde(rename = "wp:featuredmedia", default)]
    pub featured_media: Vec<WpFeaturedMedia>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WpFeaturedMedia {
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
}
