//! # Gleaner
//!
//! Collects web content (articles, news stories, source repositories) into a
//! local document store.
//!
//! ## Architecture
//!
//! ```text
//! URL → Router → Strategy → Document → Store
//!                   ↑
//! Feed page → Harvester (link batches)
//! ```
//!
//! - [`router`]: picks an extraction strategy from a URL's domain
//! - [`strategy`]: per-site extraction (generic articles, news, repositories)
//! - [`harvest`]: walks "load more" feeds back to a date boundary
//! - [`normalizer`]: Solar Hijri timestamps into a sortable canonical form
//! - [`store`]: SQLite persistence layer
//!
//! ## Quick Start
//!
//! ```bash
//! # Store a couple of pages
//! gleaner crawl https://github.com/rust-lang/log https://example.com/post
//!
//! # Everything on a profile
//! gleaner profile https://virgool.io/@someone
//!
//! # A news feed, back to a given date
//! gleaner feed https://www.tasnimnews.ir/ --min-date "1404-11-24 00:00"
//!
//! # What was stored
//! gleaner stats
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together config, store
/// and pipeline.
pub mod app;

/// Headless Chrome feed pages (chromiumoxide).
pub mod browser;

/// Command-line interface using clap.
///
/// - `crawl <url>...` - Extract and store documents
/// - `profile <url>` - Crawl a profile's posts
/// - `feed <url>` - Harvest a paginated feed
/// - `route <url>` - Show strategy selection
/// - `date <raw>` - Normalize a timestamp
/// - `stats` - Document counts per collection
pub mod cli;

/// Configuration loaded from `~/.config/gleaner/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`SourceUrl`](domain::SourceUrl): validated absolute URL
/// - [`Document`](domain::Document): extracted content with a SHA256 ID
/// - [`FeedItem`](domain::FeedItem): raw entry read off a feed page
pub mod domain;

/// Page fetching over HTTP.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for page retrieval
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

pub mod harvest;

/// Timestamp normalization for Solar Hijri sources.
///
/// Absolute dates (`24 بهمن 1404 - 10:30`) and relative phrases
/// (`2 ساعت پیش`) both become `YYYY-MM-DD HH:MM`.
pub mod normalizer;

/// Crawl orchestration with per-domain reports.
pub mod pipeline;

pub mod router;

/// SQLite persistence layer.
///
/// - [`DocumentSink`](store::DocumentSink): Where extracted documents go
/// - [`Store`](store::Store): Read access on top of the sink
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

pub mod strategy;
