use std::sync::Arc;

use async_trait::async_trait;
use scraper::Html;
use tracing::debug;

use crate::app::Result;
use crate::domain::{ArticleDocument, Document, SourceUrl};
use crate::fetcher::Fetcher;
use crate::strategy::html::{collapse, first_attr, first_text, selector};
use crate::strategy::DocumentStrategy;

/// Elements whose text never counts as article content.
const SKIPPED_ELEMENTS: [&str; 8] = [
    "script", "style", "noscript", "nav", "header", "footer", "aside", "template",
];

/// Fallback for any web page: title, description, language and readable text.
pub struct GenericArticleStrategy {
    fetcher: Arc<dyn Fetcher>,
}

impl GenericArticleStrategy {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    pub fn parse(url: &SourceUrl, raw_html: &str) -> Result<ArticleDocument> {
        let document = Html::parse_document(raw_html);

        Ok(ArticleDocument {
            url: url.clone(),
            title: first_text(&document, "title")?,
            description: first_attr(&document, r#"meta[name="description"]"#, "content")?,
            language: first_attr(&document, "html", "lang")?,
            content: body_text(&document)?,
        })
    }
}

/// One line per text run inside `<body>`, skipping boilerplate containers.
fn body_text(document: &Html) -> Result<String> {
    let body_selector = selector("body")?;
    let Some(body) = document.select(&body_selector).next() else {
        return Ok(String::new());
    };

    let lines: Vec<String> = body
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
            });
            if hidden {
                return None;
            }
            let line = collapse([&**text]);
            (!line.is_empty()).then_some(line)
        })
        .collect();

    Ok(lines.join("\n"))
}

#[async_trait]
impl DocumentStrategy for GenericArticleStrategy {
    fn name(&self) -> &'static str {
        "generic-article"
    }

    async fn extract_one(&self, url: &SourceUrl) -> Result<Document> {
        let raw_html = self.fetcher.fetch(url.as_str()).await?;
        let article = Self::parse(url, &raw_html)?;
        debug!(url = %url, title = %article.title, "Extracted article");
        Ok(article.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html lang="en">
          <head>
            <title> A   Title </title>
            <meta name="description" content="Short summary">
            <style>body { color: red; }</style>
          </head>
          <body>
            <nav><a href="/">Home</a></nav>
            <header>Site header</header>
            <article>
              <h1>Heading</h1>
              <p>First   paragraph.</p>
              <script>var x = 1;</script>
              <p>Second <b>bold</b> paragraph.</p>
            </article>
            <footer>Copyright</footer>
          </body>
        </html>
    "#;

    fn url() -> SourceUrl {
        SourceUrl::parse("https://example.com/post").unwrap()
    }

    #[test]
    fn test_parse_metadata() {
        let article = GenericArticleStrategy::parse(&url(), PAGE).unwrap();
        assert_eq!(article.title, "A Title");
        assert_eq!(article.description, "Short summary");
        assert_eq!(article.language, "en");
        assert_eq!(article.url, url());
    }

    #[test]
    fn test_parse_content_skips_boilerplate() {
        let article = GenericArticleStrategy::parse(&url(), PAGE).unwrap();
        assert!(article.content.contains("Heading"));
        assert!(article.content.contains("First paragraph."));
        assert!(article.content.contains("bold"));
        assert!(!article.content.contains("Home"));
        assert!(!article.content.contains("Site header"));
        assert!(!article.content.contains("var x"));
        assert!(!article.content.contains("Copyright"));
    }

    #[test]
    fn test_parse_missing_fields() {
        let article = GenericArticleStrategy::parse(&url(), "<p>only text</p>").unwrap();
        assert_eq!(article.title, "");
        assert_eq!(article.description, "");
        assert_eq!(article.language, "");
        assert_eq!(article.content, "only text");
    }
}
