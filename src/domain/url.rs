use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::Result;

/// An absolute, well-formed URL naming a source page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceUrl(String);

impl SourceUrl {
    pub fn parse(raw: &str) -> Result<Self> {
        let parsed = Url::parse(raw.trim())?;
        if !parsed.has_host() {
            return Err(url::ParseError::EmptyHost.into());
        }
        Ok(Self(parsed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Host (with port, if any) of this URL.
    pub fn domain(&self) -> String {
        domain_of(&self.0)
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SourceUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SourceUrl {
    type Error = crate::app::GleanerError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<SourceUrl> for String {
    fn from(value: SourceUrl) -> Self {
        value.0
    }
}

/// Network location of `raw` (`host[:port]`), or an empty string when `raw`
/// is not a parseable URL.
pub fn domain_of(raw: &str) -> String {
    let Ok(parsed) = Url::parse(raw.trim()) else {
        return String::new();
    };
    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        _ => String::new(),
    }
}

/// Strips a single leading `www.` label.
pub fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_url() {
        let url = SourceUrl::parse("https://tasnimnews.ir/fa/news/1").unwrap();
        assert_eq!(url.as_str(), "https://tasnimnews.ir/fa/news/1");
        assert_eq!(url.domain(), "tasnimnews.ir");
    }

    #[test]
    fn test_parse_rejects_relative_url() {
        assert!(SourceUrl::parse("/fa/news/1").is_err());
        assert!(SourceUrl::parse("not a url").is_err());
    }

    #[test]
    fn test_parse_rejects_hostless_url() {
        assert!(SourceUrl::parse("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_domain_of_keeps_port_and_www() {
        assert_eq!(domain_of("http://localhost:8080/a"), "localhost:8080");
        assert_eq!(domain_of("https://www.github.com/x"), "www.github.com");
    }

    #[test]
    fn test_domain_of_malformed_is_empty() {
        assert_eq!(domain_of(""), "");
        assert_eq!(domain_of("::::"), "");
        assert_eq!(domain_of("github.com/x"), "");
    }

    #[test]
    fn test_strip_www() {
        assert_eq!(strip_www("www.virgool.io"), "virgool.io");
        assert_eq!(strip_www("virgool.io"), "virgool.io");
        assert_eq!(strip_www("wwwx.io"), "wwwx.io");
    }

    #[test]
    fn test_serde_round_trips_as_plain_string() {
        let url = SourceUrl::parse("https://github.com/rust-lang/rust").unwrap();
        let json = serde_json::to_string(&url).unwrap();
        assert_eq!(json, "\"https://github.com/rust-lang/rust\"");
        let back: SourceUrl = serde_json::from_str(&json).unwrap();
        assert_eq!(back, url);
        assert!(serde_json::from_str::<SourceUrl>("\"nope\"").is_err());
    }
}
