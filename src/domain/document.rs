use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::SourceUrl;

pub const ARTICLE_COLLECTION: &str = "custom_articles";
pub const NEWS_COLLECTION: &str = "news";
pub const REPOSITORY_COLLECTION: &str = "repository";

/// A generic web page reduced to its readable text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDocument {
    pub url: SourceUrl,
    pub title: String,
    pub description: String,
    pub language: String,
    pub content: String,
}

/// A news story with both its native (Solar Hijri) and Gregorian dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsDocument {
    pub url: SourceUrl,
    pub title: String,
    pub content: String,
    pub shamsi_date: String,
    pub date: String,
    pub keywords: Vec<String>,
}

/// Text content of a source-code repository, keyed by relative path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryDocument {
    pub repo_url: SourceUrl,
    pub repo_name: String,
    pub files: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentBody {
    Article(ArticleDocument),
    News(NewsDocument),
    Repository(RepositoryDocument),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub body: DocumentBody,
}

impl Document {
    pub fn new(body: DocumentBody) -> Self {
        let id = Self::generate_id(body.collection_name(), body.url().as_str());
        Self {
            id,
            created_at: Utc::now(),
            body,
        }
    }

    /// Generate a deterministic ID from collection name and source URL
    pub fn generate_id(collection: &str, url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(collection.as_bytes());
        hasher.update(url.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn collection_name(&self) -> &'static str {
        self.body.collection_name()
    }

    pub fn url(&self) -> &SourceUrl {
        self.body.url()
    }

    pub fn display_title(&self) -> &str {
        match &self.body {
            DocumentBody::Article(a) if !a.title.is_empty() => &a.title,
            DocumentBody::News(n) if !n.title.is_empty() => &n.title,
            DocumentBody::Repository(r) => &r.repo_name,
            _ => "(Untitled)",
        }
    }
}

impl DocumentBody {
    pub fn collection_name(&self) -> &'static str {
        match self {
            DocumentBody::Article(_) => ARTICLE_COLLECTION,
            DocumentBody::News(_) => NEWS_COLLECTION,
            DocumentBody::Repository(_) => REPOSITORY_COLLECTION,
        }
    }

    pub fn url(&self) -> &SourceUrl {
        match self {
            DocumentBody::Article(a) => &a.url,
            DocumentBody::News(n) => &n.url,
            DocumentBody::Repository(r) => &r.repo_url,
        }
    }
}

impl From<ArticleDocument> for Document {
    fn from(value: ArticleDocument) -> Self {
        Self::new(DocumentBody::Article(value))
    }
}

impl From<NewsDocument> for Document {
    fn from(value: NewsDocument) -> Self {
        Self::new(DocumentBody::News(value))
    }
}

impl From<RepositoryDocument> for Document {
    fn from(value: RepositoryDocument) -> Self {
        Self::new(DocumentBody::Repository(value))
    }
}
