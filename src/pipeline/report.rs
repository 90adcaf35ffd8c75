use std::collections::BTreeMap;

use serde::Serialize;

use crate::app::GleanerError;
use crate::domain::SourceUrl;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlFailure {
    pub url: String,
    pub error: String,
}

/// Outcomes for the links of one domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainReport {
    pub success: Vec<String>,
    pub failure: Vec<CrawlFailure>,
}

/// Per-domain success and failure lists of one crawl, keyed by
/// `host[:port]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    pub domains: BTreeMap<String, DomainReport>,
}

impl CrawlReport {
    pub fn record_success(&mut self, url: &SourceUrl) {
        self.entry(url).success.push(url.to_string());
    }

    pub fn record_failure(&mut self, url: &SourceUrl, error: &GleanerError) {
        self.entry(url).failure.push(CrawlFailure {
            url: url.to_string(),
            error: error.to_string(),
        });
    }

    pub fn merge(&mut self, other: CrawlReport) {
        for (domain, report) in other.domains {
            let entry = self.domains.entry(domain).or_default();
            entry.success.extend(report.success);
            entry.failure.extend(report.failure);
        }
    }

    pub fn success_count(&self) -> usize {
        self.domains.values().map(|d| d.success.len()).sum()
    }

    pub fn failure_count(&self) -> usize {
        self.domains.values().map(|d| d.failure.len()).sum()
    }

    fn entry(&mut self, url: &SourceUrl) -> &mut DomainReport {
        self.domains.entry(url.domain()).or_default()
    }
}

/// Totals of one feed harvest.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HarvestSummary {
    pub batches: usize,
    pub links: usize,
    pub inserted: usize,
    pub report: CrawlReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> SourceUrl {
        SourceUrl::parse(raw).unwrap()
    }

    #[test]
    fn test_records_by_domain() {
        let mut report = CrawlReport::default();
        report.record_success(&url("https://a.com/1"));
        report.record_success(&url("https://www.a.com/2"));
        report.record_failure(&url("https://a.com/3"), &GleanerError::Extraction("bad".into()));

        assert_eq!(report.domains["a.com"].success, vec!["https://a.com/1"]);
        assert_eq!(report.domains["www.a.com"].success.len(), 1);
        assert_eq!(
            report.domains["a.com"].failure,
            vec![CrawlFailure {
                url: "https://a.com/3".into(),
                error: "Extraction failed: bad".into(),
            }]
        );
        assert_eq!(report.success_count(), 2);
        assert_eq!(report.failure_count(), 1);
    }

    #[test]
    fn test_merge() {
        let mut first = CrawlReport::default();
        first.record_success(&url("https://a.com/1"));
        let mut second = CrawlReport::default();
        second.record_success(&url("https://a.com/2"));
        second.record_failure(&url("https://b.com/1"), &GleanerError::Other("x".into()));

        first.merge(second);
        assert_eq!(first.domains["a.com"].success.len(), 2);
        assert_eq!(first.domains["b.com"].failure.len(), 1);
    }

    #[test]
    fn test_serializes_as_json() {
        let mut report = CrawlReport::default();
        report.record_success(&url("https://a.com/1"));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["domains"]["a.com"]["success"][0], "https://a.com/1");
    }
}
