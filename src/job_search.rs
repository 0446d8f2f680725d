//! ATS job-board search: slug generation, platform probes, and the
//! role/seniority/location filter.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;

use crate::config;
use crate::models::JobListing;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());

/// Generate candidate ATS slugs from a company display name, most literal
/// first. E.g. "Gather AI" -> ["gatherai", "gather-ai", "gather"].
pub fn generate_slugs(company_name: &str) -> Vec<String> {
    let lowered = company_name.to_lowercase();
    let cleaned = NON_ALNUM.replace_all(&lowered, "");
    let words: Vec<&str> = cleaned.split_whitespace().collect();

    let mut slugs = Vec::new();
    push_candidates(&words, &mut slugs);

    // Second pass with common legal/sector suffixes stripped, only when
    // stripping actually changed something and left words behind.
    let stripped: Vec<&str> = words
        .iter()
        .copied()
        .filter(|w| !config::SLUG_STRIP_SUFFIXES.contains(w))
        .collect();
    if !stripped.is_empty() && stripped != words {
        push_candidates(&stripped, &mut slugs);
    }

    // Dedup preserving first-seen order: literal candidates outrank
    // suffix-stripped ones.
    let mut seen = HashSet::new();
    slugs.retain(|s| seen.insert(s.clone()));
    slugs
}

fn push_candidates(words: &[&str], out: &mut Vec<String>) {
    if words.len() > 1 {
        out.push(words.concat());
        out.push(words.join("-"));
    } else if words.len() == 1 {
        out.push(words[0].to_string());
    }
}

/// Substring check against a space-padded lowercase title, so entries like
/// " ai " only match as whole-ish tokens.
fn matches_keywords(title: &str, keywords: &[&str]) -> bool {
    let padded = format!(" {} ", title.to_lowercase());
    keywords.iter().any(|kw| padded.contains(kw))
}

fn matches_location(location: &str) -> bool {
    let loc_lower = location.to_lowercase();
    config::LOCATION_KEYWORDS.iter().any(|kw| loc_lower.contains(kw))
}

/// All four predicates must hold: role, entry-level, NOT senior, location.
pub fn job_passes_filters(job: &JobListing) -> bool {
    matches_keywords(&job.title, config::ROLE_KEYWORDS)
        && matches_keywords(&job.title, config::ENTRY_LEVEL_KEYWORDS)
        && !matches_keywords(&job.title, config::SENIOR_KEYWORDS)
        && matches_location(&job.location)
}

pub fn filter_jobs(jobs: Vec<JobListing>) -> Vec<JobListing> {
    jobs.into_iter().filter(job_passes_filters).collect()
}

// Per-platform response shapes. Fields the boards sometimes omit or null
// out are Options flattened to empty strings.

#[derive(Debug, Deserialize)]
struct GreenhouseResponse {
    #[serde(default)]
    jobs: Vec<GreenhouseJob>,
}

#[derive(Debug, Deserialize)]
struct GreenhouseJob {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    location: Option<GreenhouseLocation>,
    #[serde(default)]
    absolute_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GreenhouseLocation {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LeverPosting {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    categories: Option<LeverCategories>,
    #[serde(default, rename = "hostedUrl")]
    hosted_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LeverCategories {
    #[serde(default)]
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AshbyResponse {
    #[serde(default)]
    jobs: Vec<AshbyJob>,
}

#[derive(Debug, Deserialize)]
struct AshbyJob {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default, rename = "jobUrl")]
    job_url: Option<String>,
}

async fn try_greenhouse(client: &Client, slug: &str) -> Option<Vec<JobListing>> {
    let url = config::GREENHOUSE_API.replace("{slug}", slug);
    let resp = client.get(&url).send().await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    let body: GreenhouseResponse = resp.json().await.ok()?;
    if body.jobs.is_empty() {
        return None;
    }
    Some(
        body.jobs
            .into_iter()
            .map(|j| JobListing {
                title: j.title.unwrap_or_default(),
                company: slug.to_string(),
                location: j
                    .location
                    .and_then(|l| l.name)
                    .unwrap_or_default(),
                job_url: j.absolute_url.unwrap_or_default(),
                ats_platform: "greenhouse".to_string(),
                searched_company: String::new(),
            })
            .collect(),
    )
}

async fn try_lever(client: &Client, slug: &str) -> Option<Vec<JobListing>> {
    let url = config::LEVER_API.replace("{slug}", slug);
    let resp = client.get(&url).send().await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    let postings: Vec<LeverPosting> = resp.json().await.ok()?;
    if postings.is_empty() {
        return None;
    }
    Some(
        postings
            .into_iter()
            .map(|j| JobListing {
                title: j.text.unwrap_or_default(),
                company: slug.to_string(),
                location: j
                    .categories
                    .and_then(|c| c.location)
                    .unwrap_or_default(),
                job_url: j.hosted_url.unwrap_or_default(),
                ats_platform: "lever".to_string(),
                searched_company: String::new(),
            })
            .collect(),
    )
}

async fn try_ashby(client: &Client, slug: &str) -> Option<Vec<JobListing>> {
    let url = config::ASHBY_API.replace("{slug}", slug);
    let resp = client.get(&url).send().await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    let body: AshbyResponse = resp.json().await.ok()?;
    if body.jobs.is_empty() {
        return None;
    }
    Some(
        body.jobs
            .into_iter()
            .map(|j| JobListing {
                title: j.title.unwrap_or_default(),
                company: slug.to_string(),
                location: j.location.unwrap_or_default(),
                job_url: j.job_url.unwrap_or_default(),
                ats_platform: "ashby".to_string(),
                searched_company: String::new(),
            })
            .collect(),
    )
}

const ATS_PLATFORMS: &[&str] = &["greenhouse", "lever", "ashby"];

/// Try every slug candidate against each platform in priority order until
/// one yields listings. Probes are serialized with a fixed delay to respect
/// third-party rate limits.
async fn fetch_company_jobs(client: &Client, company_name: &str) -> (Vec<JobListing>, String) {
    let slugs = generate_slugs(company_name);

    for slug in &slugs {
        for platform in ATS_PLATFORMS {
            let jobs = match *platform {
                "greenhouse" => try_greenhouse(client, slug).await,
                "lever" => try_lever(client, slug).await,
                _ => try_ashby(client, slug).await,
            };
            if let Some(jobs) = jobs {
                tracing::info!(
                    "{}: found {} jobs on {} (slug: {})",
                    company_name,
                    jobs.len(),
                    platform,
                    slug
                );
                return (jobs, platform.to_string());
            }
            tokio::time::sleep(config::ATS_PROBE_DELAY).await;
        }
    }

    tracing::info!("{}: not found on any ATS platform", company_name);
    (Vec::new(), String::new())
}

/// Search one company across the ATS platforms and keep only listings that
/// pass the keyword filters. Not-found is an empty result, never an error.
pub async fn search_company_jobs(client: &Client, company_name: &str) -> Vec<JobListing> {
    tracing::info!("searching jobs for: {}", company_name);

    let (all_jobs, platform) = fetch_company_jobs(client, company_name).await;
    if all_jobs.is_empty() {
        return Vec::new();
    }

    let total = all_jobs.len();
    let mut filtered = filter_jobs(all_jobs);

    tracing::info!(
        "{} ({}): {} total -> {} after filtering",
        company_name,
        platform,
        total,
        filtered.len()
    );

    for job in &mut filtered {
        job.searched_company = company_name.to_string();
    }
    filtered
}

/// Search every company serially with a fixed inter-company delay.
pub async fn search_all_companies(client: &Client, companies: &[String]) -> Vec<JobListing> {
    let mut all_jobs = Vec::new();

    for (i, company) in companies.iter().enumerate() {
        let jobs = search_company_jobs(client, company).await;
        all_jobs.extend(jobs);

        if i < companies.len() - 1 {
            tokio::time::sleep(config::JOB_SEARCH_DELAY).await;
        }
    }

    if all_jobs.is_empty() {
        tracing::info!("no matching jobs found for any company");
    } else {
        tracing::info!("total matching jobs across all companies: {}", all_jobs.len());
    }
    all_jobs
}
