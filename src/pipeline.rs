//! Pipeline orchestration and the shared run-state snapshot exposed to
//! pollers.

use std::error::Error;
use std::path::Path;
use std::sync::{Arc, Mutex};

use reqwest::Client;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config;
use crate::job_search;
use crate::models::{FundingEntry, JobListing};
use crate::output::{self, CombinedRow, OutputFormat};
use crate::parser;
use crate::scraper;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Idle,
    Running,
    Done,
    Error,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct RunSummary {
    pub articles_scraped: usize,
    pub funding_entries: usize,
    pub parsed: usize,
    pub companies_searched: usize,
    pub jobs_found: usize,
}

/// Point-in-time snapshot of a pipeline run. Cloned out whole under the
/// lock; never handed out by reference.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RunState {
    pub status: RunStatus,
    pub progress: String,
    pub fundings: Vec<FundingEntry>,
    pub jobs: Vec<JobListing>,
    pub combined: Vec<CombinedRow>,
    pub summary: RunSummary,
}

impl Default for RunState {
    fn default() -> Self {
        RunState {
            status: RunStatus::Idle,
            progress: String::new(),
            fundings: Vec::new(),
            jobs: Vec::new(),
            combined: Vec::new(),
            summary: RunSummary::default(),
        }
    }
}

pub type SharedState = Arc<Mutex<RunState>>;

pub fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(RunState::default()))
}

fn set_progress(state: &SharedState, message: &str) {
    let mut s = state.lock().unwrap();
    s.progress = message.to_string();
}

fn finish(state: &SharedState, message: &str) {
    let mut s = state.lock().unwrap();
    s.status = RunStatus::Done;
    s.progress = message.to_string();
}

/// Drive the full pipeline, recording progress and the terminal state in
/// `state`. Any fault discards partial data from the visible result and
/// leaves the run in the error state.
pub async fn run_pipeline(state: SharedState, days_back: u32, max_articles: usize) {
    if let Err(e) = execute(&state, days_back, max_articles).await {
        tracing::error!("pipeline failed: {}", e);
        let mut s = state.lock().unwrap();
        *s = RunState {
            status: RunStatus::Error,
            progress: "Pipeline failed. Check logs.".to_string(),
            ..RunState::default()
        };
    }
}

async fn execute(
    state: &SharedState,
    days_back: u32,
    max_articles: usize,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let data_dir = Path::new(config::DATA_DIR);

    // Step 1: discover articles from the sitemap.
    set_progress(state, "Fetching article URLs from sitemap...");
    let articles = scraper::fetch_article_urls(days_back).await?;
    if articles.is_empty() {
        finish(state, "No articles found.");
        return Ok(());
    }

    let urls: Vec<String> = articles
        .iter()
        .take(max_articles)
        .map(|a| a.url.clone())
        .collect();

    // Step 2: fetch article content.
    set_progress(state, &format!("Scraping {} article(s)...", urls.len()));
    let scraped = scraper::scrape_articles(&urls).await;
    if scraped.is_empty() {
        finish(state, "No articles could be scraped.");
        return Ok(());
    }

    // Step 3: parse funding entries.
    set_progress(state, "Parsing funding entries...");
    let mut all_entries: Vec<FundingEntry> = Vec::new();
    for article in &scraped {
        all_entries.extend(parser::parse_article(article));
    }
    let parsed_count = all_entries.iter().filter(|e| e.parsed).count();

    output::save_fundings(&all_entries, data_dir, OutputFormat::Csv)?;

    // Step 4: per-company job search, serialized with a fixed delay.
    let companies = distinct_companies(&all_entries);
    let mut jobs: Vec<JobListing> = Vec::new();

    if !companies.is_empty() {
        let client = Client::builder()
            .timeout(config::ATS_REQUEST_TIMEOUT)
            .build()?;

        for (i, company) in companies.iter().enumerate() {
            set_progress(
                state,
                &format!(
                    "Searching jobs for {} ({}/{})...",
                    company,
                    i + 1,
                    companies.len()
                ),
            );
            jobs.extend(job_search::search_company_jobs(&client, company).await);
            if i < companies.len() - 1 {
                tokio::time::sleep(config::JOB_SEARCH_DELAY).await;
            }
        }
    }

    // Step 5: persist and publish the final snapshot.
    set_progress(state, "Saving results...");
    if !jobs.is_empty() {
        output::save_jobs(&jobs, data_dir, OutputFormat::Csv)?;
        output::save_combined(&all_entries, &jobs, data_dir, OutputFormat::Csv)?;
    }

    // The UI shows parsed entries only, without the raw paragraph text.
    let fundings_display: Vec<FundingEntry> = all_entries
        .iter()
        .filter(|e| e.parsed)
        .cloned()
        .map(|mut e| {
            e.raw_text = String::new();
            e
        })
        .collect();
    let combined = output::build_combined(&all_entries, &jobs);

    let mut s = state.lock().unwrap();
    s.status = RunStatus::Done;
    s.progress = "Complete!".to_string();
    s.summary = RunSummary {
        articles_scraped: scraped.len(),
        funding_entries: all_entries.len(),
        parsed: parsed_count,
        companies_searched: companies.len(),
        jobs_found: jobs.len(),
    };
    s.fundings = fundings_display;
    s.jobs = jobs;
    s.combined = combined;

    Ok(())
}

/// Company names from parsed entries, deduplicated preserving first-seen
/// order.
pub fn distinct_companies(entries: &[FundingEntry]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    entries
        .iter()
        .filter(|e| e.parsed && !e.company.is_empty())
        .map(|e| e.company.clone())
        .filter(|c| seen.insert(c.clone()))
        .collect()
}
