use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One parsed (or failed-parse) funding paragraph.
///
/// `raw_text` and `parsed` are always populated; every other field defaults
/// to an empty string when a rule does not capture it, so tabular output
/// stays uniform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FundingEntry {
    pub company: String,
    pub amount: String,
    pub round: String,
    pub location: String,
    pub description: String,
    pub lead_investor: String,
    pub raw_text: String,
    pub section: String,
    pub source_url: String,
    pub parsed: bool,
}

impl FundingEntry {
    /// The all-empty negative result for a paragraph no rule matched.
    pub fn unparsed(raw_text: &str) -> Self {
        FundingEntry {
            company: String::new(),
            amount: String::new(),
            round: String::new(),
            location: String::new(),
            description: String::new(),
            lead_investor: String::new(),
            raw_text: raw_text.to_string(),
            section: String::new(),
            source_url: String::new(),
            parsed: false,
        }
    }
}

/// Transient grouping of paragraphs found under one funding heading.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleSection {
    pub section: String,
    pub paragraphs: Vec<String>,
}

/// One sitemap entry judged to be an article.
#[derive(Debug, Clone)]
pub struct ArticleRef {
    pub url: String,
    pub lastmod: Option<DateTime<Utc>>,
}

/// One fetched article: the content region's markup and plain text.
#[derive(Debug, Clone)]
pub struct ScrapedArticle {
    pub url: String,
    pub html: String,
    pub text: String,
}

/// One job-board posting. `company` is the ATS slug that resolved, not the
/// display name; `searched_company` is the display name the search started
/// from and is the join key back to [`FundingEntry::company`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_url: String,
    pub ats_platform: String,
    #[serde(default)]
    pub searched_company: String,
}
