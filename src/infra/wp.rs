//! Client for the WordPress REST post-listing endpoint.

use edicola_wp_types::WpPost;
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

use crate::domain::blocks::{BlockConfig, QueryFilter};

const POSTS_PATH: &str = "wp-json/wp/v2/posts";

/// All failure modes collapse to the same rendered outcome; the distinction
/// here only feeds the diagnostic log.
#[derive(Debug, Error)]
pub enum WpError {
    #[error("invalid site URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned status {status}")]
    Server { status: StatusCode },
    #[error("failed to parse response body: {0}")]
    Body(String),
}

#[derive(Clone, Debug)]
pub struct WpClient {
    client: Client,
    base: Url,
}

impl WpClient {
    pub fn new(site: &str) -> Result<Self, WpError> {
        let base = Url::parse(site)?.join("/")?;
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("edicola/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Listing URL for one block instance: post count, embedded media,
    /// published posts newest-first, plus at most one taxonomy filter.
    pub fn posts_url(&self, config: &BlockConfig) -> Result<Url, WpError> {
        let mut url = self.base.join(POSTS_PATH)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("per_page", &config.post_count.to_string());
            pairs.append_key_only("_embed");
            pairs.append_pair("status", "publish");
            pairs.append_pair("orderby", "date");
            pairs.append_pair("order", "desc");
            match config.query {
                QueryFilter::Recent => {}
                QueryFilter::Category(id) => {
                    pairs.append_pair("categories", &id.to_string());
                }
                QueryFilter::Tag(id) => {
                    pairs.append_pair("tags", &id.to_string());
                }
            }
        }
        Ok(url)
    }

    /// One GET, no retry, no loader-imposed timeout. The endpoint's sort
    /// order is authoritative; the response array is returned as-is.
    pub async fn fetch_posts(&self, config: &BlockConfig) -> Result<Vec<WpPost>, WpError> {
        let url = self.posts_url(config)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(WpError::Server { status });
        }
        serde_json::from_slice(&bytes).map_err(|err| WpError::Body(err.to_string()))
    }
}
