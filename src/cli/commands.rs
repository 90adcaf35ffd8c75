use chrono::{Duration, NaiveDateTime};

use crate::app::{AppContext, GleanerError, Result};
use crate::domain::SourceUrl;
use crate::harvest::HarvestOptions;
use crate::normalizer::{CanonicalTimestamp, JalaliDate, Normalizer};
use crate::pipeline::CrawlReport;
use crate::store::Store;

pub async fn crawl(ctx: &AppContext, urls: &[String]) -> Result<()> {
    let mut links = Vec::with_capacity(urls.len());
    for raw in urls {
        match SourceUrl::parse(raw) {
            Ok(url) => links.push(url),
            Err(e) => eprintln!("Skipping {}: {}", raw, e),
        }
    }

    if links.is_empty() {
        println!("No valid links to crawl");
        return Ok(());
    }

    println!("Crawling {} links...", links.len());
    let (report, inserted) = ctx
        .pipeline
        .crawl_links_into_store(&links, ctx.store.as_ref())
        .await?;

    print_report(&report);
    println!("Stored {} new documents", inserted);
    Ok(())
}

pub async fn profile(ctx: &AppContext, url: &str) -> Result<()> {
    let url = SourceUrl::parse(url)?;
    let strategy = ctx.pipeline.profiles().resolve(url.as_str());
    println!("Crawling profile {} ({})", url, strategy.name());

    let (report, inserted) = ctx
        .pipeline
        .crawl_profile_into_store(&url, ctx.store.as_ref())
        .await?;

    print_report(&report);
    println!("Stored {} new documents", inserted);
    Ok(())
}

pub async fn feed(
    ctx: &AppContext,
    url: &str,
    min_date: Option<&str>,
    max_reveals: Option<u32>,
) -> Result<()> {
    let url = SourceUrl::parse(url)?;

    let min_date = match min_date {
        Some(raw) => CanonicalTimestamp::parse(raw)?,
        None => match &ctx.config.harvest.min_date {
            Some(configured) => configured.clone(),
            None => one_day_ago(&ctx.normalizer)?,
        },
    };
    let max_reveals = max_reveals.unwrap_or(ctx.config.harvest.max_reveals);

    println!(
        "Harvesting {} back to {} (at most {} reveals)...",
        url, min_date, max_reveals
    );

    let summary = ctx
        .pipeline
        .harvest_feed_into_store(
            &url,
            HarvestOptions::new(min_date, max_reveals),
            ctx.store.as_ref(),
        )
        .await?;

    print_report(&summary.report);
    println!(
        "Harvest complete: {} batches, {} links, {} new documents",
        summary.batches, summary.links, summary.inserted
    );
    Ok(())
}

pub fn route(ctx: &AppContext, url: &str) -> Result<()> {
    let pipeline = &ctx.pipeline;

    let rows = [
        ("document", pipeline.documents().has_match(url), pipeline.documents().resolve(url).name()),
        ("profile", pipeline.profiles().has_match(url), pipeline.profiles().resolve(url).name()),
        ("feed", pipeline.feeds().has_match(url), pipeline.feeds().resolve(url).name()),
    ];

    for (kind, matched, name) in rows {
        let marker = if matched { "" } else { " (default)" };
        println!("{:<9} {}{}", kind, name, marker);
    }
    Ok(())
}

pub fn date(ctx: &AppContext, raw: &str, reference: Option<&str>) -> Result<()> {
    let reference = match reference {
        Some(value) => NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%d %H:%M").map_err(|e| {
            GleanerError::Parse(format!("invalid reference '{}': {}", value, e))
        })?,
        None => ctx.normalizer.now(),
    };

    let canonical = ctx.normalizer.normalize(raw, reference)?;
    println!("solar hijri: {}", canonical);
    println!("gregorian:   {}", canonical.to_gregorian()?);
    Ok(())
}

pub fn stats(ctx: &AppContext) -> Result<()> {
    let counts = ctx.store.collection_counts()?;

    if counts.is_empty() {
        println!("No documents");
        return Ok(());
    }

    for (collection, count) in counts {
        println!("{:<16} {}", collection, count);
    }
    Ok(())
}

fn one_day_ago(normalizer: &Normalizer) -> Result<CanonicalTimestamp> {
    let instant = normalizer.now() - Duration::days(1);
    Ok(CanonicalTimestamp::new(
        JalaliDate::from_gregorian(instant.date())?,
        instant.time(),
    ))
}

fn print_report(report: &CrawlReport) {
    for (domain, outcome) in &report.domains {
        println!(
            "  {}: {} ok, {} failed",
            domain,
            outcome.success.len(),
            outcome.failure.len()
        );
        for failure in &outcome.failure {
            eprintln!("    {}: {}", failure.url, failure.error);
        }
    }
}
