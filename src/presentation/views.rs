//! View models and fragment templates for the article grid.

use std::{cell::RefCell, rc::Rc};

use askama::{Error as AskamaError, Template};
use lol_html::{RewriteStrSettings, doc_text, rewrite_str};
use thiserror::Error;

use crate::domain::{articles::ArticleSummary, blocks::BlockConfig};

/// Rendered when the endpoint returns zero posts. A successful outcome.
pub const NO_ARTICLES_FRAGMENT: &str = r#"<p class="no-articles">No articles found.</p>"#;

/// Rendered for every failure path, regardless of cause.
pub const LOAD_ERROR_FRAGMENT: &str =
    r#"<p class="articles-error">Error loading articles. Please try again later.</p>"#;

/// Visible characters kept from a stripped excerpt.
const EXCERPT_PREVIEW_CHARS: usize = 100;
const EXCERPT_ELLIPSIS: &str = "...";

#[derive(Debug, Error)]
#[error("template rendering failed: {0}")]
pub struct RenderError(#[from] AskamaError);

pub fn render_template<T: Template>(template: &T) -> Result<String, RenderError> {
    template.render().map_err(RenderError::from)
}

#[derive(Template)]
#[template(path = "article_grid.html")]
pub struct ArticleGridTemplate {
    pub view: ArticleGridView,
}

#[derive(Clone)]
pub struct ArticleGridView {
    pub spacing_class: Option<String>,
    pub date_classes: String,
    pub heading_classes: String,
    pub articles: Vec<ArticleCardView>,
}

#[derive(Clone)]
pub struct ArticleCardView {
    pub title_html: String,
    pub link: String,
    pub date_label: Option<String>,
    pub excerpt: Option<String>,
    pub image: Option<ImageView>,
}

#[derive(Clone)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
}

impl ArticleGridView {
    /// Shape fetched articles for one instance, preserving endpoint order.
    pub fn build(config: &BlockConfig, articles: Vec<ArticleSummary>) -> Self {
        let spacing_class = (config.post_spacing != "default")
            .then(|| format!("article-grid-spacing-{}", config.post_spacing));

        Self {
            spacing_class,
            date_classes: font_classes(&config.date_font_family, &config.date_font_size),
            heading_classes: font_classes(&config.heading_font_family, &config.heading_font_size),
            articles: articles
                .into_iter()
                .map(|article| ArticleCardView::build(config, article))
                .collect(),
        }
    }
}

impl ArticleCardView {
    fn build(config: &BlockConfig, article: ArticleSummary) -> Self {
        let date_label = if config.show_date {
            article.date_label()
        } else {
            None
        };
        let excerpt = if config.show_excerpt {
            excerpt_preview(&article.excerpt_html)
        } else {
            None
        };

        Self {
            title_html: article.title_html,
            link: article.link,
            date_label,
            excerpt,
            image: article.image.map(|image| ImageView {
                url: image.url,
                alt: image.alt,
            }),
        }
    }
}

/// Render the grid fragment for one instance.
pub fn render_grid(config: &BlockConfig, articles: Vec<ArticleSummary>) -> Result<String, RenderError> {
    render_template(&ArticleGridTemplate {
        view: ArticleGridView::build(config, articles),
    })
}

/// Tokens interpolate verbatim; unknown tokens produce inert class names.
pub fn font_classes(family: &str, size: &str) -> String {
    format!("has-{family}-font-family has-{size}-font-size")
}

/// Strip markup from an excerpt and cut it to a fixed preview length,
/// regardless of word boundaries, always ending in an ellipsis. A blank
/// source excerpt yields no preview at all.
///
/// The stripped text keeps the source's entity encoding (`&#8217;`,
/// `&hellip;`), so the template injects it without re-escaping; escaping it
/// again would show the entity text literally.
pub fn excerpt_preview(excerpt_html: &str) -> Option<String> {
    if excerpt_html.trim().is_empty() {
        return None;
    }

    let text = plain_text(excerpt_html)?;
    let mut preview: String = text.chars().take(EXCERPT_PREVIEW_CHARS).collect();
    preview.push_str(EXCERPT_ELLIPSIS);
    Some(preview)
}

fn plain_text(html: &str) -> Option<String> {
    let collected = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&collected);

    let outcome = rewrite_str(
        html,
        RewriteStrSettings {
            document_content_handlers: vec![doc_text!(move |chunk| {
                sink.borrow_mut().push_str(chunk.as_str());
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    );

    match outcome {
        Ok(_) => Some(collected.take()),
        Err(err) => {
            tracing::debug!(target: "edicola::views", error = %err, "excerpt markup could not be parsed");
            None
        }
    }
}
