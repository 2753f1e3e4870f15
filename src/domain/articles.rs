//! Transient render model for fetched posts.

use edicola_wp_types::WpPost;
use time::{
    OffsetDateTime, PrimitiveDateTime,
    format_description::{FormatItem, well_known::Iso8601},
    macros::format_description,
};

/// Date line format, e.g. `Jan 15, 2024`.
pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");

#[derive(Debug, Clone)]
pub struct FeaturedImage {
    pub url: String,
    pub alt: String,
}

/// One fetched post, shaped for rendering and discarded afterwards.
#[derive(Debug, Clone)]
pub struct ArticleSummary {
    pub id: u64,
    pub title_html: String,
    pub excerpt_html: String,
    pub link: String,
    pub published_at: Option<PrimitiveDateTime>,
    pub image: Option<FeaturedImage>,
}

impl ArticleSummary {
    /// Human-readable publish date, absent when the endpoint's timestamp was
    /// missing or unparseable.
    pub fn date_label(&self) -> Option<String> {
        self.published_at
            .and_then(|stamp| stamp.format(HUMAN_DATE_FORMAT).ok())
    }
}

impl From<WpPost> for ArticleSummary {
    fn from(post: WpPost) -> Self {
        let image = post.featured_media().map(|media| FeaturedImage {
            url: media.source_url.clone().unwrap_or_default(),
            alt: media.alt_text.clone().unwrap_or_default(),
        });
        let published_at = post.date.as_deref().and_then(parse_publish_date);

        Self {
            id: post.id,
            title_html: post.title.rendered,
            excerpt_html: post.excerpt.rendered,
            link: post.link,
            published_at,
            image,
        }
    }
}

/// WordPress emits `date` in the site's local time without an offset, but
/// some deployments append one. Accept both.
fn parse_publish_date(value: &str) -> Option<PrimitiveDateTime> {
    PrimitiveDateTime::parse(value, &Iso8601::DEFAULT)
        .ok()
        .or_else(|| {
            OffsetDateTime::parse(value, &Iso8601::DEFAULT)
                .ok()
                .map(|stamp| PrimitiveDateTime::new(stamp.date(), stamp.time()))
        })
}

#[cfg(test)]
mod tests {
    use edicola_wp_types::{RenderedField, WpPost};

    use super::*;

    fn post(date: Option<&str>) -> WpPost {
        WpPost {
            id: 1,
            date: date.map(str::to_string),
            link: "https://example.com/post".to_string(),
            title: RenderedField {
                rendered: "Title".to_string(),
            },
            excerpt: RenderedField {
                rendered: "<p>Excerpt</p>".to_string(),
            },
            embedded: None,
        }
    }

    #[test]
    fn formats_local_timestamp() {
        let summary = ArticleSummary::from(post(Some("2024-01-15T10:00:00")));
        assert_eq!(summary.date_label().as_deref(), Some("Jan 15, 2024"));
    }

    #[test]
    fn accepts_offset_timestamp() {
        let summary = ArticleSummary::from(post(Some("2024-03-02T08:30:00+02:00")));
        assert_eq!(summary.date_label().as_deref(), Some("Mar 2, 2024"));
    }

    #[test]
    fn unparseable_date_suppresses_label_only() {
        let summary = ArticleSummary::from(post(Some("not-a-date")));
        assert!(summary.date_label().is_none());
        assert_eq!(summary.title_html, "Title");
    }

    #[test]
    fn missing_date_suppresses_label() {
        let summary = ArticleSummary::from(post(None));
        assert!(summary.date_label().is_none());
    }
}
