use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gleaner::app::AppContext;
use gleaner::cli::{commands, Cli, Commands};
use gleaner::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let ctx = AppContext::new(config, cli.db, cli.workers)?;

    match cli.command {
        Commands::Crawl { urls } => {
            commands::crawl(&ctx, &urls).await?;
        }
        Commands::Profile { url } => {
            commands::profile(&ctx, &url).await?;
        }
        Commands::Feed {
            url,
            min_date,
            max_reveals,
        } => {
            commands::feed(&ctx, &url, min_date.as_deref(), max_reveals).await?;
        }
        Commands::Route { url } => {
            commands::route(&ctx, &url)?;
        }
        Commands::Date { raw, reference } => {
            commands::date(&ctx, &raw, reference.as_deref())?;
        }
        Commands::Stats => {
            commands::stats(&ctx)?;
        }
    }

    Ok(())
}
