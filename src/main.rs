//! Sumi-Catalog main entry point
//!
//! This is the command-line interface for the Sumi-Catalog product catalog
//! crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use sumi_catalog::config::{load_config_with_hash, validate, Config, FetchStrategy};
use sumi_catalog::crawler::{build_fetcher, load_catalog, CatalogLoad, CatalogSource};
use sumi_catalog::output::{
    generate_summary, print_statistics, write_all, CsvOutput, MarkdownOutput,
};
use sumi_catalog::storage::{open_store, RecordStore};
use tracing_subscriber::EnvFilter;

/// Sumi-Catalog: a resilient product catalog crawler
///
/// Sumi-Catalog crawls a JavaScript-rendered product catalog, follows its
/// pagination, extracts structured records, and resolves each product's
/// duration from its detail page. Results are cached and reused while fresh.
#[derive(Parser, Debug)]
#[command(name = "sumi-catalog")]
#[command(version = "1.0.0")]
#[command(about = "A resilient product catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Crawl even if a fresh cache exists
    #[arg(long)]
    force: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "export_summary"])]
    dry_run: bool,

    /// Show data-quality statistics from the cache and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary"])]
    stats: bool,

    /// Export markdown summary and CSV from the cache and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_summary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = load(cli.config.as_deref())?;

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_summary {
        handle_export_summary(&config, config_hash)?;
    } else {
        handle_crawl(&config, config_hash, cli.force).await?;
    }

    Ok(())
}

/// Loads the configuration file, or the validated defaults without one
fn load(path: Option<&Path>) -> anyhow::Result<(Config, Option<String>)> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        let config = Config::default();
        validate(&config).context("Default configuration is invalid")?;
        return Ok((config, None));
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok((config, Some(hash)))
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_catalog=info,warn"),
            1 => EnvFilter::new("sumi_catalog=debug,info"),
            2 => EnvFilter::new("sumi_catalog=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Catalog Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Catalog root: {}", config.crawler.catalog_root);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages_open
    );
    println!("  Fetch strategy: {:?}", config.crawler.fetch_strategy);
    match config.crawler.deadline_secs {
        Some(secs) => println!("  Deadline: {}s", secs),
        None => println!("  Deadline: none"),
    }

    println!("\nRetry:");
    println!("  Max attempts: {}", config.retry.max_attempts);
    println!(
        "  Backoff: {}ms base, {}ms cap",
        config.retry.base_delay_ms, config.retry.max_delay_ms
    );

    if let (FetchStrategy::Rendered, Some(render)) =
        (config.crawler.fetch_strategy, config.render.as_ref())
    {
        println!("\nRender Service:");
        println!("  Endpoint: {}", render.endpoint);
        println!(
            "  Settle time: {}-{}ms",
            render.settle_min_ms, render.settle_max_ms
        );
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.value);

    println!("\nCache:");
    println!("  Path: {}", config.cache.path);
    println!(
        "  Reused when more than {} records and under {} days old",
        config.cache.min_records, config.cache.max_age_days
    );

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);
    println!("  Summary: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling at {}",
        config.crawler.catalog_root
    );
}

/// Handles the --stats mode: shows data-quality statistics from the cache
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Cache: {}\n", config.cache.path);

    let snapshot = open_store(&config.cache)
        .load()
        .context("Failed to read cache")?
        .context("No cached records found; run a crawl first")?;

    print_statistics(&snapshot.records);

    Ok(())
}

/// Handles the --export-summary mode: writes markdown summary and CSV
fn handle_export_summary(config: &Config, config_hash: Option<String>) -> anyhow::Result<()> {
    println!("=== Exporting Catalog Summary ===\n");
    println!("Cache: {}", config.cache.path);
    println!("Summary: {}", config.output.summary_path);
    println!("CSV: {}", config.output.csv_path);
    println!();

    tracing::info!("Loading records from cache...");
    let snapshot = open_store(&config.cache)
        .load()
        .context("Failed to read cache")?
        .context("No cached records found; run a crawl first")?;

    let summary = generate_summary(&snapshot.records, "cache", None, config_hash);
    export(config, &snapshot.records, &summary)?;

    println!("✓ Summary exported to: {}", config.output.summary_path);
    println!("✓ Records exported to: {}", config.output.csv_path);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    config_hash: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    if force {
        tracing::info!("Forcing a fresh crawl (ignoring cache)");
    }

    let fetcher = build_fetcher(config).context("Failed to build fetcher")?;
    let store = open_store(&config.cache);

    let CatalogLoad {
        records,
        source,
        report,
    } = load_catalog(fetcher, &store, config, force).await;

    let label = match source {
        CatalogSource::Crawl => "crawl",
        CatalogSource::Cache => "cache",
        CatalogSource::Sample => "sample",
    };

    if source == CatalogSource::Crawl {
        let summary = generate_summary(&records, label, report, config_hash);
        export(config, &records, &summary)?;
    }

    println!(
        "{} {} records:",
        if source == CatalogSource::Crawl {
            "Crawled"
        } else {
            "Loaded"
        },
        records.len()
    );
    print_statistics(&records);

    Ok(())
}

fn export(
    config: &Config,
    records: &[sumi_catalog::Record],
    summary: &sumi_catalog::output::CatalogSummary,
) -> anyhow::Result<()> {
    let csv = CsvOutput::new(&config.output.csv_path);
    let markdown = MarkdownOutput::new(&config.output.summary_path);
    write_all(&[&csv, &markdown], records, summary).context("Failed to write output")?;
    Ok(())
}
