//! One-shot CLI run of the funding scrape + job search pipeline.

use std::path::Path;

use clap::Parser;
use reqwest::Client;
use tracing::{info, warn};

use fundscout::config;
use fundscout::job_search;
use fundscout::models::FundingEntry;
use fundscout::output::{self, OutputFormat};
use fundscout::parser;
use fundscout::pipeline::distinct_companies;
use fundscout::scraper;

#[derive(Parser, Debug)]
#[command(
    name = "fundscout-worker",
    about = "Scrape StrictlyVC for funded companies and find entry-level NYC jobs."
)]
struct Args {
    /// Maximum articles to scrape
    #[arg(long, default_value_t = config::DEFAULT_MAX_ARTICLES)]
    max_articles: usize,

    /// Look back N days for articles
    #[arg(long, default_value_t = config::DEFAULT_DAYS_BACK)]
    days: u32,

    /// Skip the job search step (only scrape fundings)
    #[arg(long)]
    skip_jobs: bool,

    /// Output file format
    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let data_dir = Path::new(config::DATA_DIR);

    // Step 1: discover articles from the sitemap.
    info!("=== Step 1: Fetching article URLs (last {} days) ===", args.days);
    let articles = scraper::fetch_article_urls(args.days)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    if articles.is_empty() {
        warn!("No articles found. Exiting.");
        return Ok(());
    }

    let urls: Vec<String> = articles
        .iter()
        .take(args.max_articles)
        .map(|a| a.url.clone())
        .collect();
    info!("Will scrape {} article(s)", urls.len());

    // Step 2: fetch article content.
    info!("=== Step 2: Scraping articles ===");
    let scraped = scraper::scrape_articles(&urls).await;
    if scraped.is_empty() {
        warn!("No articles could be scraped. Exiting.");
        return Ok(());
    }

    // Step 3: parse funding entries.
    info!("=== Step 3: Parsing funding entries ===");
    let mut all_entries: Vec<FundingEntry> = Vec::new();
    for article in &scraped {
        all_entries.extend(parser::parse_article(article));
    }

    let parsed_count = all_entries.iter().filter(|e| e.parsed).count();
    info!(
        "Total funding entries: {} ({} parsed, {} unparsed)",
        all_entries.len(),
        parsed_count,
        all_entries.len() - parsed_count
    );

    let fundings_path = output::save_fundings(&all_entries, data_dir, args.format)
        .map_err(|e| anyhow::anyhow!(e))?;
    println!("\nFunding entries saved to: {}", fundings_path.display());

    if all_entries.is_empty() {
        warn!("No funding entries found. Exiting.");
        return Ok(());
    }

    // Step 4: job search (optional).
    let mut jobs = Vec::new();
    if args.skip_jobs {
        info!("=== Step 4: Skipping job search (--skip-jobs) ===");
    } else {
        let companies = distinct_companies(&all_entries);
        if companies.is_empty() {
            warn!("No company names extracted; skipping job search.");
        } else {
            info!("=== Step 4: Searching jobs for {} companies ===", companies.len());
            for c in &companies {
                info!("  - {}", c);
            }
            let client = Client::builder()
                .timeout(config::ATS_REQUEST_TIMEOUT)
                .build()?;
            jobs = job_search::search_all_companies(&client, &companies).await;
        }
    }

    // Step 5: save outputs.
    info!("=== Step 5: Saving results ===");
    if !jobs.is_empty() {
        let jobs_path =
            output::save_jobs(&jobs, data_dir, args.format).map_err(|e| anyhow::anyhow!(e))?;
        println!("Job listings saved to: {}", jobs_path.display());

        let combined_path = output::save_combined(&all_entries, &jobs, data_dir, args.format)
            .map_err(|e| anyhow::anyhow!(e))?;
        println!("Combined output saved to: {}", combined_path.display());
    } else if !args.skip_jobs {
        println!("No matching jobs found.");
    }

    println!("\n--- Summary ---");
    println!("Articles scraped: {}", scraped.len());
    println!(
        "Funding entries: {} ({} parsed)",
        all_entries.len(),
        parsed_count
    );
    if !args.skip_jobs {
        println!("Job listings: {}", jobs.len());
    }

    Ok(())
}
