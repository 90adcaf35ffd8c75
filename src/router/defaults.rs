//! The routers shipped with the crate.

use std::sync::Arc;

use crate::app::Result;
use crate::browser::BrowserSettings;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::router::Router;
use crate::strategy::{
    DocumentStrategy, FeedStrategy, GenericArticleStrategy, ProfileStrategy, RepositoryStrategy,
    TasnimArticleStrategy, TasnimFeedStrategy, UnsupportedFeedStrategy,
    UnsupportedProfileStrategy, VirgoolProfileStrategy,
};

pub const GITHUB: &str = "https://github.com";
pub const TASNIM: &str = "https://tasnimnews.ir";
pub const VIRGOOL: &str = "https://virgool.io";

pub type DocumentRouter = Router<dyn DocumentStrategy>;
pub type ProfileRouter = Router<dyn ProfileStrategy>;
pub type FeedRouter = Router<dyn FeedStrategy>;

/// github.com → repository, tasnimnews.ir → news story, anything else →
/// generic article.
pub fn document_router(
    fetcher: Arc<dyn Fetcher>,
    normalizer: Normalizer,
    ignored_suffixes: Vec<String>,
) -> Result<DocumentRouter> {
    let tasnim_fetcher = fetcher.clone();

    DocumentRouter::builder()
        .register(GITHUB, move || {
            Box::new(RepositoryStrategy::new(ignored_suffixes.clone()))
        })
        .register(TASNIM, move || {
            Box::new(TasnimArticleStrategy::new(
                tasnim_fetcher.clone(),
                normalizer.clone(),
            ))
        })
        .set_default(move || Box::new(GenericArticleStrategy::new(fetcher.clone())))
        .build()
}

pub fn profile_router(fetcher: Arc<dyn Fetcher>) -> Result<ProfileRouter> {
    ProfileRouter::builder()
        .register(VIRGOOL, move || {
            Box::new(VirgoolProfileStrategy::new(fetcher.clone()))
        })
        .set_default(|| Box::new(UnsupportedProfileStrategy))
        .build()
}

pub fn feed_router(settings: BrowserSettings, normalizer: Normalizer) -> Result<FeedRouter> {
    FeedRouter::builder()
        .register(TASNIM, move || {
            Box::new(TasnimFeedStrategy::new(settings.clone(), normalizer.clone()))
        })
        .set_default(|| Box::new(UnsupportedFeedStrategy))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NoFetch;

    #[async_trait]
    impl Fetcher for NoFetch {
        async fn fetch(&self, _url: &str) -> Result<String> {
            Ok(String::new())
        }
    }

    fn fetcher() -> Arc<dyn Fetcher> {
        Arc::new(NoFetch)
    }

    #[test]
    fn test_document_router() {
        let router = document_router(fetcher(), Normalizer::new(), vec![".git".into()]).unwrap();
        assert_eq!(router.len(), 2);
        assert_eq!(router.resolve("https://github.com/rust-lang/rust").name(), "repository");
        assert_eq!(
            router.resolve("https://www.tasnimnews.ir/fa/news/1404/11/24/1/x").name(),
            "tasnim-article"
        );
        assert_eq!(router.resolve("https://example.com/post").name(), "generic-article");
        assert_eq!(router.resolve("not a url").name(), "generic-article");
    }

    #[test]
    fn test_profile_router() {
        let router = profile_router(fetcher()).unwrap();
        assert_eq!(router.resolve("https://virgool.io/@alice").name(), "virgool-profile");
        assert_eq!(router.resolve("https://medium.com/@alice").name(), "unsupported-profile");
    }

    #[test]
    fn test_feed_router() {
        let router = feed_router(BrowserSettings::default(), Normalizer::new()).unwrap();
        assert_eq!(router.resolve("https://www.tasnimnews.ir/").name(), "tasnim-feed");
        assert_eq!(router.resolve("http://tasnimnews.ir/").name(), "unsupported-feed");
    }
}
