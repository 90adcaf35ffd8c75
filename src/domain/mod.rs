pub mod document;
pub mod feed;
pub mod url;

pub use document::{
    ArticleDocument, Document, DocumentBody, NewsDocument, RepositoryDocument, ARTICLE_COLLECTION,
    NEWS_COLLECTION, REPOSITORY_COLLECTION,
};
pub use feed::FeedItem;
pub use self::url::{domain_of, SourceUrl};
