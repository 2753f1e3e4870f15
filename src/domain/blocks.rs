//! Per-instance block configuration.
//!
//! Each article-grid block instance carries its configuration as kebab-cased
//! data attributes on the block root element. Parsing is explicit: every
//! missing or unusable value falls back to a spelled-out default instead of
//! relying on string truthiness.

/// Attribute names on the block root element.
pub const ATTR_NUMBER_OF_POSTS: &str = "data-number-of-posts";
pub const ATTR_QUERY_TYPE: &str = "data-query-type";
pub const ATTR_SELECTED_CATEGORY: &str = "data-selected-category";
pub const ATTR_SELECTED_TAG: &str = "data-selected-tag";
pub const ATTR_DATE_FONT_FAMILY: &str = "data-date-font-family";
pub const ATTR_DATE_FONT_SIZE: &str = "data-date-font-size";
pub const ATTR_HEADING_FONT_FAMILY: &str = "data-heading-font-family";
pub const ATTR_HEADING_FONT_SIZE: &str = "data-heading-font-size";
pub const ATTR_POST_SPACING: &str = "data-post-spacing";
pub const ATTR_SHOW_DATE: &str = "data-show-date";
pub const ATTR_SHOW_EXCERPT: &str = "data-show-excerpt";

pub const DEFAULT_POST_COUNT: u32 = 3;
pub const DEFAULT_DATE_FONT_FAMILY: &str = "body";
pub const DEFAULT_DATE_FONT_SIZE: &str = "small";
pub const DEFAULT_HEADING_FONT_FAMILY: &str = "heading";
pub const DEFAULT_HEADING_FONT_SIZE: &str = "subtitle";
pub const DEFAULT_POST_SPACING: &str = "default";

/// Which posts an instance fetches. The category/tag exclusivity invariant is
/// structural: a parsed filter can carry at most one taxonomy id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFilter {
    Recent,
    Category(u64),
    Tag(u64),
}

/// Parsed, defaulted configuration for one block instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockConfig {
    pub post_count: u32,
    pub query: QueryFilter,
    pub date_font_family: String,
    pub date_font_size: String,
    pub heading_font_family: String,
    pub heading_font_size: String,
    pub post_spacing: String,
    pub show_date: bool,
    pub show_excerpt: bool,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            post_count: DEFAULT_POST_COUNT,
            query: QueryFilter::Recent,
            date_font_family: DEFAULT_DATE_FONT_FAMILY.to_string(),
            date_font_size: DEFAULT_DATE_FONT_SIZE.to_string(),
            heading_font_family: DEFAULT_HEADING_FONT_FAMILY.to_string(),
            heading_font_size: DEFAULT_HEADING_FONT_SIZE.to_string(),
            post_spacing: DEFAULT_POST_SPACING.to_string(),
            show_date: true,
            show_excerpt: false,
        }
    }
}

impl BlockConfig {
    /// Build a configuration from an attribute lookup, applying defaults for
    /// every absent or unusable value.
    pub fn from_attributes(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let post_count = lookup(ATTR_NUMBER_OF_POSTS)
            .and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|count| *count >= 1)
            .unwrap_or(DEFAULT_POST_COUNT);

        let query = parse_query_filter(
            lookup(ATTR_QUERY_TYPE).as_deref(),
            parse_term_id(lookup(ATTR_SELECTED_CATEGORY)),
            parse_term_id(lookup(ATTR_SELECTED_TAG)),
        );

        // Date lines are on unless explicitly disabled; excerpts are off
        // unless explicitly enabled.
        let show_date = lookup(ATTR_SHOW_DATE).as_deref() != Some("false");
        let show_excerpt = lookup(ATTR_SHOW_EXCERPT).as_deref() == Some("true");

        Self {
            post_count,
            query,
            date_font_family: token(lookup(ATTR_DATE_FONT_FAMILY), defaults.date_font_family),
            date_font_size: token(lookup(ATTR_DATE_FONT_SIZE), defaults.date_font_size),
            heading_font_family: token(
                lookup(ATTR_HEADING_FONT_FAMILY),
                defaults.heading_font_family,
            ),
            heading_font_size: token(lookup(ATTR_HEADING_FONT_SIZE), defaults.heading_font_size),
            post_spacing: token(lookup(ATTR_POST_SPACING), defaults.post_spacing),
            show_date,
            show_excerpt,
        }
    }
}

fn token(value: Option<String>, default: String) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value,
        _ => default,
    }
}

fn parse_term_id(value: Option<String>) -> Option<u64> {
    value
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|id| *id >= 1)
}

/// A `category`/`tag` query type only takes effect when the matching term id
/// is usable; otherwise the instance degrades to an unfiltered recent query.
/// The id belonging to the other query type is ignored even when present.
fn parse_query_filter(
    query_type: Option<&str>,
    category: Option<u64>,
    tag: Option<u64>,
) -> QueryFilter {
    match query_type {
        Some("category") => category.map_or(QueryFilter::Recent, QueryFilter::Category),
        Some("tag") => tag.map_or(QueryFilter::Recent, QueryFilter::Tag),
        _ => QueryFilter::Recent,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> BlockConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        BlockConfig::from_attributes(|name| map.get(name).cloned())
    }

    #[test]
    fn absent_attributes_yield_documented_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.post_count, 3);
        assert_eq!(config.query, QueryFilter::Recent);
        assert_eq!(config.date_font_family, "body");
        assert_eq!(config.date_font_size, "small");
        assert_eq!(config.heading_font_family, "heading");
        assert_eq!(config.heading_font_size, "subtitle");
        assert_eq!(config.post_spacing, "default");
        assert!(config.show_date);
        assert!(!config.show_excerpt);
    }

    #[test]
    fn invalid_post_count_falls_back() {
        for value in ["abc", "", "0", "-2", "2.5"] {
            let config = config_from(&[(ATTR_NUMBER_OF_POSTS, value)]);
            assert_eq!(config.post_count, 3, "value {value:?}");
        }
        let config = config_from(&[(ATTR_NUMBER_OF_POSTS, "6")]);
        assert_eq!(config.post_count, 6);
    }

    #[test]
    fn category_query_ignores_tag_id() {
        let config = config_from(&[
            (ATTR_QUERY_TYPE, "category"),
            (ATTR_SELECTED_CATEGORY, "9"),
            (ATTR_SELECTED_TAG, "4"),
        ]);
        assert_eq!(config.query, QueryFilter::Category(9));
    }

    #[test]
    fn tag_query_ignores_category_id() {
        let config = config_from(&[
            (ATTR_QUERY_TYPE, "tag"),
            (ATTR_SELECTED_CATEGORY, "9"),
            (ATTR_SELECTED_TAG, "4"),
        ]);
        assert_eq!(config.query, QueryFilter::Tag(4));
    }

    #[test]
    fn category_query_without_usable_id_degrades_to_recent() {
        for pairs in [
            vec![(ATTR_QUERY_TYPE, "category")],
            vec![(ATTR_QUERY_TYPE, "category"), (ATTR_SELECTED_CATEGORY, "0")],
            vec![
                (ATTR_QUERY_TYPE, "category"),
                (ATTR_SELECTED_CATEGORY, "nope"),
            ],
        ] {
            let config = config_from(&pairs);
            assert_eq!(config.query, QueryFilter::Recent);
        }
    }

    #[test]
    fn unknown_query_type_is_recent() {
        let config = config_from(&[(ATTR_QUERY_TYPE, "popular"), (ATTR_SELECTED_TAG, "4")]);
        assert_eq!(config.query, QueryFilter::Recent);
    }

    #[test]
    fn show_flags_use_literal_coercion() {
        assert!(config_from(&[(ATTR_SHOW_DATE, "true")]).show_date);
        assert!(config_from(&[(ATTR_SHOW_DATE, "yes")]).show_date);
        assert!(!config_from(&[(ATTR_SHOW_DATE, "false")]).show_date);

        assert!(config_from(&[(ATTR_SHOW_EXCERPT, "true")]).show_excerpt);
        assert!(!config_from(&[(ATTR_SHOW_EXCERPT, "yes")]).show_excerpt);
        assert!(!config_from(&[(ATTR_SHOW_EXCERPT, "false")]).show_excerpt);
    }

    #[test]
    fn styling_tokens_pass_through_verbatim() {
        let config = config_from(&[
            (ATTR_HEADING_FONT_FAMILY, "display"),
            (ATTR_HEADING_FONT_SIZE, "x-large"),
            (ATTR_POST_SPACING, "wide"),
        ]);
        assert_eq!(config.heading_font_family, "display");
        assert_eq!(config.heading_font_size, "x-large");
        assert_eq!(config.post_spacing, "wide");
    }
}
