//! Page hydration: discover article-grid block instances, fan out one fetch
//! per instance, and inject the rendered fragments.
//!
//! Instances are fully independent: each performs exactly one request, owns
//! exactly one render target, and terminates in one of three states
//! (rendered, empty, failed). A failure in one instance never blocks or
//! corrupts another; the only user-visible trace is the generic error
//! fragment inside the owning container.

use std::{cell::RefCell, rc::Rc};

use futures::future::join_all;
use lol_html::{RewriteStrSettings, element, html_content::ContentType, rewrite_str};
use tracing::warn;

use crate::{
    application::error::AppError,
    domain::{articles::ArticleSummary, blocks::BlockConfig},
    infra::wp::WpClient,
    presentation::views,
};

/// Marker class identifying a block instance's root element.
pub const BLOCK_SELECTOR: &str = ".wp-block-article-grid";
/// Render target inside a block instance, holding the loading placeholder.
const CONTAINER_SELECTOR: &str = ".wp-block-article-grid #article-grid-container";

/// Terminal state of one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentOutcome {
    Rendered,
    Empty,
    Failed,
}

#[derive(Debug, Clone)]
pub struct Fragment {
    pub html: String,
    pub outcome: FragmentOutcome,
}

#[derive(Debug)]
pub struct HydrateOutcome {
    pub html: String,
    pub instances: usize,
    pub failed: usize,
}

/// Block instances found in a page, in document order. `container_blocks`
/// maps each render-target occurrence to the index of its owning block, so a
/// malformed instance cannot shift another instance's content.
#[derive(Debug)]
pub struct PageScan {
    pub configs: Vec<BlockConfig>,
    pub container_blocks: Vec<usize>,
}

/// Collect every block instance's configuration without altering the page.
pub fn scan_page(html: &str) -> Result<PageScan, AppError> {
    let configs: Rc<RefCell<Vec<BlockConfig>>> = Rc::new(RefCell::new(Vec::new()));
    let containers: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!(BLOCK_SELECTOR, {
                    let configs = Rc::clone(&configs);
                    move |el| {
                        configs
                            .borrow_mut()
                            .push(BlockConfig::from_attributes(|name| el.get_attribute(name)));
                        Ok(())
                    }
                }),
                element!(CONTAINER_SELECTOR, {
                    let configs = Rc::clone(&configs);
                    let containers = Rc::clone(&containers);
                    move |_el| {
                        // The selector scopes containers under a block root,
                        // so the owner is always the most recent block.
                        let seen = configs.borrow().len();
                        if seen > 0 {
                            containers.borrow_mut().push(seen - 1);
                        }
                        Ok(())
                    }
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| AppError::unexpected(format!("failed to scan page: {err}")))?;

    Ok(PageScan {
        configs: configs.take(),
        container_blocks: containers.take(),
    })
}

/// Fetch and render one instance to its terminal fragment. Every failure
/// path collapses to the same generic error fragment; the cause goes to the
/// diagnostic log only.
pub async fn load_fragment(client: &WpClient, config: &BlockConfig) -> Fragment {
    match client.fetch_posts(config).await {
        Ok(posts) if posts.is_empty() => Fragment {
            html: views::NO_ARTICLES_FRAGMENT.to_string(),
            outcome: FragmentOutcome::Empty,
        },
        Ok(posts) => {
            let articles: Vec<ArticleSummary> =
                posts.into_iter().map(ArticleSummary::from).collect();
            match views::render_grid(config, articles) {
                Ok(html) => Fragment {
                    html,
                    outcome: FragmentOutcome::Rendered,
                },
                Err(err) => {
                    warn!(target: "edicola::hydrate", error = %err, "fragment rendering failed");
                    failed_fragment()
                }
            }
        }
        Err(err) => {
            warn!(target: "edicola::hydrate", error = %err, "failed to load articles");
            failed_fragment()
        }
    }
}

fn failed_fragment() -> Fragment {
    Fragment {
        html: views::LOAD_ERROR_FRAGMENT.to_string(),
        outcome: FragmentOutcome::Failed,
    }
}

/// Hydrate every block instance in a page. Pages without instances pass
/// through untouched.
pub async fn hydrate_page(client: &WpClient, html: &str) -> Result<HydrateOutcome, AppError> {
    let scan = scan_page(html)?;
    if scan.configs.is_empty() {
        return Ok(HydrateOutcome {
            html: html.to_string(),
            instances: 0,
            failed: 0,
        });
    }

    let fragments = join_all(
        scan.configs
            .iter()
            .map(|config| load_fragment(client, config)),
    )
    .await;

    let failed = fragments
        .iter()
        .filter(|fragment| fragment.outcome == FragmentOutcome::Failed)
        .count();

    for index in 0..scan.configs.len() {
        if !scan.container_blocks.contains(&index) {
            warn!(
                target: "edicola::hydrate",
                instance = index,
                "block instance has no render target container; skipping"
            );
        }
    }

    // Owner indices are monotonic, so duplicate containers inside one block
    // show up as consecutive repeats. Only the first gets the fragment; later
    // duplicates stay untouched.
    let mut previous_owner = None;
    let slots: Vec<Option<String>> = scan
        .container_blocks
        .iter()
        .map(|&owner| {
            let slot = if previous_owner == Some(owner) {
                None
            } else {
                fragments.get(owner).map(|fragment| fragment.html.clone())
            };
            previous_owner = Some(owner);
            slot
        })
        .collect();

    let html = inject_fragments(html, slots)?;

    Ok(HydrateOutcome {
        html,
        instances: scan.configs.len(),
        failed,
    })
}

/// Replace each render target's placeholder content with its fragment, in
/// document order. Only containers with an assigned slot are mutated.
fn inject_fragments(html: &str, slots: Vec<Option<String>>) -> Result<String, AppError> {
    let next = Rc::new(RefCell::new(0usize));

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!(CONTAINER_SELECTOR, {
                let next = Rc::clone(&next);
                move |el| {
                    let index = {
                        let mut n = next.borrow_mut();
                        let current = *n;
                        *n += 1;
                        current
                    };
                    if let Some(Some(fragment)) = slots.get(index) {
                        el.set_inner_content(fragment, ContentType::Html);
                    }
                    Ok(())
                }
            })],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| AppError::unexpected(format!("failed to rewrite page: {err}")))
}
