//! Date-stamped CSV/JSON writers for funding, job, and combined outputs.

use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{FundingEntry, JobListing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// One row of the jobs-joined-to-fundings view. Funding columns are empty
/// when no parsed entry matches the searched company.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CombinedRow {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_url: String,
    pub ats_platform: String,
    pub searched_company: String,
    pub amount: String,
    pub round: String,
    pub section: String,
    pub source_url: String,
}

fn date_stamp() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

fn write_rows<T: Serialize>(
    path: &Path,
    rows: &[T],
    fmt: OutputFormat,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match fmt {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_path(path)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            let file = File::create(path)?;
            serde_json::to_writer_pretty(file, rows)?;
        }
    }
    Ok(())
}

/// Save funding entries under `dir`. Returns the output path.
pub fn save_fundings(
    entries: &[FundingEntry],
    dir: &Path,
    fmt: OutputFormat,
) -> Result<PathBuf, Box<dyn Error + Send + Sync>> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("fundings_{}.{}", date_stamp(), fmt.extension()));
    write_rows(&path, entries, fmt)?;
    tracing::info!("saved {} funding entries to {}", entries.len(), path.display());
    Ok(path)
}

/// Save job listings under `dir`. Returns the output path.
pub fn save_jobs(
    jobs: &[JobListing],
    dir: &Path,
    fmt: OutputFormat,
) -> Result<PathBuf, Box<dyn Error + Send + Sync>> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("jobs_{}.{}", date_stamp(), fmt.extension()));
    write_rows(&path, jobs, fmt)?;
    tracing::info!("saved {} job listings to {}", jobs.len(), path.display());
    Ok(path)
}

/// Left-join job listings to parsed funding entries on
/// `searched_company == company`.
pub fn build_combined(entries: &[FundingEntry], jobs: &[JobListing]) -> Vec<CombinedRow> {
    jobs.iter()
        .map(|job| {
            let funding = entries
                .iter()
                .find(|e| e.parsed && e.company == job.searched_company);
            CombinedRow {
                title: job.title.clone(),
                company: job.company.clone(),
                location: job.location.clone(),
                job_url: job.job_url.clone(),
                ats_platform: job.ats_platform.clone(),
                searched_company: job.searched_company.clone(),
                amount: funding.map(|e| e.amount.clone()).unwrap_or_default(),
                round: funding.map(|e| e.round.clone()).unwrap_or_default(),
                section: funding.map(|e| e.section.clone()).unwrap_or_default(),
                source_url: funding.map(|e| e.source_url.clone()).unwrap_or_default(),
            }
        })
        .collect()
}

/// Join fundings with jobs and save the combined view under `dir`.
pub fn save_combined(
    entries: &[FundingEntry],
    jobs: &[JobListing],
    dir: &Path,
    fmt: OutputFormat,
) -> Result<PathBuf, Box<dyn Error + Send + Sync>> {
    fs::create_dir_all(dir)?;
    let combined = build_combined(entries, jobs);
    let path = dir.join(format!("combined_{}.{}", date_stamp(), fmt.extension()));
    write_rows(&path, &combined, fmt)?;
    tracing::info!("saved combined output ({} rows) to {}", combined.len(), path.display());
    Ok(path)
}
