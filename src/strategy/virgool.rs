use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use crate::app::Result;
use crate::domain::SourceUrl;
use crate::fetcher::Fetcher;
use crate::strategy::ProfileStrategy;

static POST_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://virgool\.io/@[a-zA-Z0-9_]+/[a-zA-Z0-9%_\-]+").unwrap());

/// Lists the posts linked from a virgool.io profile page.
pub struct VirgoolProfileStrategy {
    fetcher: Arc<dyn Fetcher>,
}

impl VirgoolProfileStrategy {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Unique post links in order of first appearance.
    pub fn post_links(raw_html: &str) -> Vec<SourceUrl> {
        let mut seen = HashSet::new();
        POST_LINK
            .find_iter(raw_html)
            .map(|m| m.as_str())
            .filter(|link| seen.insert(*link))
            .filter_map(|link| match SourceUrl::parse(link) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(link, error = %e, "Skipping malformed post link");
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl ProfileStrategy for VirgoolProfileStrategy {
    fn name(&self) -> &'static str {
        "virgool-profile"
    }

    async fn extract_links(&self, url: &SourceUrl) -> Result<Vec<SourceUrl>> {
        let raw_html = self.fetcher.fetch(url.as_str()).await?;
        let links = Self::post_links(&raw_html);
        debug!(url = %url, posts = links.len(), "Extracted profile posts");
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_links_unique_in_order() {
        let html = r#"
            <a href="https://virgool.io/@alice/first-post-abc">1</a>
            <a href="https://virgool.io/@alice/%D8%B3%D9%84%D8%A7%D9%85-x1">2</a>
            <a href="https://virgool.io/@alice/first-post-abc">dup</a>
            <a href="https://virgool.io/@bob_2/another">3</a>
        "#;
        let links: Vec<String> = VirgoolProfileStrategy::post_links(html)
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            links,
            vec![
                "https://virgool.io/@alice/first-post-abc",
                "https://virgool.io/@alice/%D8%B3%D9%84%D8%A7%D9%85-x1",
                "https://virgool.io/@bob_2/another",
            ]
        );
    }

    #[test]
    fn test_post_links_ignores_other_urls() {
        let html = r#"
            <a href="https://virgool.io/@alice">profile</a>
            <a href="https://example.com/@alice/post">elsewhere</a>
            <a href="http://virgool.io/@alice/insecure">http</a>
        "#;
        assert!(VirgoolProfileStrategy::post_links(html).is_empty());
    }
}
