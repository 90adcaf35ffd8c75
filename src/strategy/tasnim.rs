use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use scraper::{ElementRef, Html};
use tracing::{debug, warn};

use crate::app::Result;
use crate::browser::{BrowserSettings, ChromeFeedPage, FeedSelectors};
use crate::domain::{Document, NewsDocument, SourceUrl};
use crate::fetcher::Fetcher;
use crate::harvest::{FeedHarvester, HarvestOptions, LinkBatchStream};
use crate::normalizer::Normalizer;
use crate::strategy::html::{collapse, element_text, first_text, selector};
use crate::strategy::{DocumentStrategy, FeedStrategy};

const NOISE_CLASSES: [&str; 2] = ["hideTag", "clearfix"];

/// News stories from tasnimnews.ir.
pub struct TasnimArticleStrategy {
    fetcher: Arc<dyn Fetcher>,
    normalizer: Normalizer,
}

impl TasnimArticleStrategy {
    pub fn new(fetcher: Arc<dyn Fetcher>, normalizer: Normalizer) -> Self {
        Self {
            fetcher,
            normalizer,
        }
    }

    pub fn parse(&self, url: &SourceUrl, raw_html: &str) -> Result<NewsDocument> {
        let document = Html::parse_document(raw_html);

        let mut title = first_text(&document, "h1.title")?;
        if title.is_empty() {
            title = "No Title".to_string();
        }

        let raw_date = first_text(&document, "ul.details li.time")?;
        let (shamsi_date, date) = self.dates(url, &raw_date);

        Ok(NewsDocument {
            url: url.clone(),
            title,
            content: story_content(&document)?,
            shamsi_date,
            date,
            keywords: keywords(&document)?,
        })
    }

    /// Canonical Solar Hijri and Gregorian renderings of the story date.
    /// Both are empty when the page carries no readable date.
    fn dates(&self, url: &SourceUrl, raw: &str) -> (String, String) {
        if raw.is_empty() {
            warn!(url = %url, "Story has no date");
            return (String::new(), String::new());
        }

        let canonical = match self.normalizer.normalize(raw, self.normalizer.now()) {
            Ok(ts) => ts,
            Err(e) => {
                warn!(url = %url, raw, error = %e, "Failed to parse story date");
                return (String::new(), String::new());
            }
        };

        match canonical.to_gregorian() {
            Ok(gregorian) => (canonical.to_string(), gregorian),
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to convert story date");
                (canonical.to_string(), String::new())
            }
        }
    }
}

/// Lead followed by the story paragraphs, separated by blank lines.
fn story_content(document: &Html) -> Result<String> {
    let lead = first_text(document, "h3.lead")?;

    let story_selector = selector("div.story")?;
    let paragraph_selector = selector("p")?;
    let paragraphs: Vec<String> = document
        .select(&story_selector)
        .flat_map(|story| {
            story
                .select(&paragraph_selector)
                .map(move |paragraph| text_without_noise(story, paragraph))
        })
        .filter(|p| !p.is_empty())
        .collect();

    Ok(format!("{}\n\n{}", lead, paragraphs.join("\n\n"))
        .trim()
        .to_string())
}

/// Paragraph text minus noise elements nested inside `story`. Wrappers
/// outside the story never count as noise.
fn text_without_noise(story: ElementRef<'_>, paragraph: ElementRef<'_>) -> String {
    let parts = paragraph.descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let noisy = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != story.id())
            .any(|ancestor| {
                ancestor.value().as_element().is_some_and(|el| {
                    el.classes().any(|class| NOISE_CLASSES.contains(&class))
                })
            });
        (!noisy).then_some(&**text)
    });
    collapse(parts)
}

fn keywords(document: &Html) -> Result<Vec<String>> {
    let keyword_selector = selector("ul.details li.service a")?;
    Ok(document
        .select(&keyword_selector)
        .map(element_text)
        .filter(|k| !k.is_empty())
        .collect())
}

#[async_trait]
impl DocumentStrategy for TasnimArticleStrategy {
    fn name(&self) -> &'static str {
        "tasnim-article"
    }

    async fn extract_one(&self, url: &SourceUrl) -> Result<Document> {
        let raw_html = self.fetcher.fetch(url.as_str()).await?;
        let news = self.parse(url, &raw_html)?;
        debug!(url = %url, title = %news.title, date = %news.shamsi_date, "Extracted news story");
        Ok(news.into())
    }

    async fn extract_many(&self, urls: &[SourceUrl]) -> Vec<(SourceUrl, Result<Document>)> {
        let results = join_all(urls.iter().map(|url| self.extract_one(url))).await;
        urls.iter().cloned().zip(results).collect()
    }
}

/// Home-page feed of tasnimnews.ir, driven through a headless browser.
pub struct TasnimFeedStrategy {
    settings: BrowserSettings,
    normalizer: Normalizer,
}

impl TasnimFeedStrategy {
    pub fn new(settings: BrowserSettings, normalizer: Normalizer) -> Self {
        Self {
            settings,
            normalizer,
        }
    }

    pub fn selectors() -> FeedSelectors {
        FeedSelectors {
            item: "article.list-item".to_string(),
            link: "h2.title a".to_string(),
            timestamp: "time".to_string(),
            load_more_id: "loadMore".to_string(),
        }
    }
}

#[async_trait]
impl FeedStrategy for TasnimFeedStrategy {
    fn name(&self) -> &'static str {
        "tasnim-feed"
    }

    async fn harvest(&self, url: &SourceUrl, options: HarvestOptions) -> Result<LinkBatchStream> {
        let page = ChromeFeedPage::launch(self.settings.clone(), Self::selectors()).await?;
        let harvester = FeedHarvester::new(
            Box::new(page),
            url.clone(),
            self.normalizer.clone(),
            options,
        );
        Ok(harvester.into_stream())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoFetch;

    #[async_trait]
    impl Fetcher for NoFetch {
        async fn fetch(&self, url: &str) -> Result<String> {
            Err(crate::app::GleanerError::Other(format!("unexpected fetch: {}", url)))
        }
    }

    fn strategy() -> TasnimArticleStrategy {
        TasnimArticleStrategy::new(Arc::new(NoFetch), Normalizer::new())
    }

    fn url() -> SourceUrl {
        SourceUrl::parse("https://www.tasnimnews.ir/fa/news/1404/11/24/1/story").unwrap()
    }

    const STORY: &str = r#"
        <html><body>
          <h1 class="title"> عنوان خبر </h1>
          <ul class="details">
            <li class="service"><a href="/s/1">سیاسی</a></li>
            <li class="service"><a href="/s/2">  مجلس </a></li>
            <li class="time">24 بهمن 1404 -
                10:30</li>
          </ul>
          <h3 class="lead">خلاصه خبر</h3>
          <div class="story">
            <p>پاراگراف اول</p>
            <p class="hideTag">تبلیغ</p>
            <div class="clearfix"><p>نویز</p></div>
            <p>پاراگراف <span class="hideTag">پنهان</span>دوم</p>
            <p>   </p>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_story() {
        let news = strategy().parse(&url(), STORY).unwrap();
        assert_eq!(news.title, "عنوان خبر");
        assert_eq!(news.keywords, vec!["سیاسی", "مجلس"]);
        assert_eq!(news.shamsi_date, "1404-11-24 10:30");
        assert_eq!(news.date, "2026-2-13 10:30");
        assert_eq!(
            news.content,
            "خلاصه خبر\n\nپاراگراف اول\n\nپاراگراف دوم"
        );
    }

    #[test]
    fn test_parse_story_without_date_or_title() {
        let news = strategy()
            .parse(&url(), r#"<div class="story"><p>متن</p></div>"#)
            .unwrap();
        assert_eq!(news.title, "No Title");
        assert_eq!(news.shamsi_date, "");
        assert_eq!(news.date, "");
        assert_eq!(news.content, "متن");
        assert!(news.keywords.is_empty());
    }

    #[test]
    fn test_parse_unreadable_date_keeps_story() {
        let html = r#"<h1 class="title">t</h1><ul class="details"><li class="time">دیروز</li></ul>"#;
        let news = strategy().parse(&url(), html).unwrap();
        assert_eq!(news.title, "t");
        assert_eq!(news.shamsi_date, "");
    }

    #[test]
    fn test_story_inside_layout_wrapper_keeps_content() {
        let html = r#"
            <div class="row clearfix">
              <div class="col hideTag">
                <div class="story">
                  <p>متن اصلی</p>
                  <div class="clearfix"><p>نویز</p></div>
                </div>
              </div>
            </div>
        "#;
        let news = strategy().parse(&url(), html).unwrap();
        assert_eq!(news.content, "متن اصلی");
    }

    #[test]
    fn test_feed_selectors() {
        let selectors = TasnimFeedStrategy::selectors();
        assert_eq!(selectors.item, "article.list-item");
        assert_eq!(selectors.load_more_id, "loadMore");
    }
}
