//! URL-to-strategy dispatch.
//!
//! A [`Router`] maps the domain of a URL to a constructor for the extraction
//! strategy that understands that site. Routers are assembled with a
//! [`RouterBuilder`] and are immutable afterwards:
//!
//! ```rust,ignore
//! let router: Router<dyn DocumentStrategy> = Router::builder()
//!     .register("https://github.com", || Box::new(RepositoryStrategy::default()))
//!     .set_default(move || Box::new(GenericArticleStrategy::new(fetcher.clone())))
//!     .build()?;
//!
//! let strategy = router.resolve("https://github.com/rust-lang/rust");
//! ```

pub mod defaults;

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::app::{GleanerError, Result};
use crate::domain::url::strip_www;

/// Builds a fresh strategy instance.
pub type StrategyCtor<T> = Arc<dyn Fn() -> Box<T> + Send + Sync>;

/// Matches `scheme://[www.]host[:port][/...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainPattern {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl DomainPattern {
    /// Accepts either a full URL (`https://github.com`) or a bare host
    /// (`github.com`, assumed https).
    pub fn parse(domain: &str) -> Result<Self> {
        let domain = domain.trim();
        let parsed = if domain.contains("://") {
            Url::parse(domain)
        } else {
            Url::parse(&format!("https://{}", domain))
        }
        .map_err(|e| GleanerError::Configuration(format!("invalid domain '{}': {}", domain, e)))?;

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| GleanerError::Configuration(format!("domain '{}' has no host", domain)))?;

        Ok(Self {
            scheme: parsed.scheme().to_string(),
            host: strip_www(host).to_string(),
            port: parsed.port(),
        })
    }

    pub fn matches(&self, url: &Url) -> bool {
        url.scheme() == self.scheme
            && url.port() == self.port
            && url.host_str().map(strip_www) == Some(self.host.as_str())
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

pub struct RoutingEntry<T: ?Sized> {
    pattern: DomainPattern,
    ctor: StrategyCtor<T>,
}

/// Collects routing entries before a [`Router`] is built.
pub struct RouterBuilder<T: ?Sized> {
    entries: Vec<(String, StrategyCtor<T>)>,
    default: Option<StrategyCtor<T>>,
}

impl<T: ?Sized> Default for RouterBuilder<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            default: None,
        }
    }
}

impl<T: ?Sized> RouterBuilder<T> {
    /// Registers `ctor` for `domain`. Earlier registrations take precedence.
    pub fn register<F>(mut self, domain: &str, ctor: F) -> Self
    where
        F: Fn() -> Box<T> + Send + Sync + 'static,
    {
        self.entries.push((domain.to_string(), Arc::new(ctor)));
        self
    }

    /// Sets the strategy used when no registered domain matches.
    pub fn set_default<F>(mut self, ctor: F) -> Self
    where
        F: Fn() -> Box<T> + Send + Sync + 'static,
    {
        self.default = Some(Arc::new(ctor));
        self
    }

    pub fn build(self) -> Result<Router<T>> {
        let default = self.default.ok_or_else(|| {
            GleanerError::Configuration("default strategy must be set before building".into())
        })?;

        let entries = self
            .entries
            .into_iter()
            .map(|(domain, ctor)| {
                Ok(RoutingEntry {
                    pattern: DomainPattern::parse(&domain)?,
                    ctor,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Router { entries, default })
    }
}

/// Immutable registry resolving URLs to strategy instances.
pub struct Router<T: ?Sized> {
    entries: Vec<RoutingEntry<T>>,
    default: StrategyCtor<T>,
}

impl<T: ?Sized> Router<T> {
    pub fn builder() -> RouterBuilder<T> {
        RouterBuilder::default()
    }

    /// Instantiates the strategy for `url`. Never fails: URLs that match no
    /// entry (or do not parse) get the default strategy.
    pub fn resolve(&self, url: &str) -> Box<T> {
        match self.lookup(url) {
            Some(entry) => {
                debug!(url, domain = entry.pattern.host(), "Resolved strategy");
                (entry.ctor)()
            }
            None => {
                warn!(url, "No strategy found, falling back to default");
                (self.default)()
            }
        }
    }

    /// Whether `url` would resolve to a registered (non-default) strategy.
    pub fn has_match(&self, url: &str) -> bool {
        self.lookup(url).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, url: &str) -> Option<&RoutingEntry<T>> {
        let parsed = Url::parse(url.trim()).ok()?;
        self.entries.iter().find(|e| e.pattern.matches(&parsed))
    }
}
