//! Ruleset constants: headings, keyword sets, ATS endpoints, delays.

use std::time::Duration;

/// StrictlyVC newsletter sitemap.
pub const SITEMAP_URL: &str = "https://newsletter.strictlyvc.com/sitemap.xml";

/// Element id of the rendered article's content region.
pub const CONTENT_REGION_ID: &str = "content-blocks";

/// Class marker on ancestor wrappers that also bounds a section.
pub const POST_CONTENT_CLASS: &str = "post-content";

pub const DEFAULT_MAX_ARTICLES: usize = 5;
pub const DEFAULT_DAYS_BACK: u32 = 7;

/// Lookback window used by the web UI run.
pub const WEB_DAYS_BACK: u32 = 30;

/// Delay between article page fetches (rate-limit contract, not tuning).
pub const PAGE_LOAD_DELAY: Duration = Duration::from_secs(2);

/// Delay between ATS probes for successive slugs/platforms.
pub const ATS_PROBE_DELAY: Duration = Duration::from_millis(300);

/// Delay between per-company job searches.
pub const JOB_SEARCH_DELAY: Duration = Duration::from_secs(1);

pub const ATS_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const ARTICLE_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Funding section headings, matched case-insensitively as substrings.
pub const FUNDING_HEADINGS: &[&str] = &[
    "massive fundings",
    "big-but-not-crazy-big fundings",
    "smaller fundings",
];

// ATS job-board URL templates; `{slug}` is replaced by a candidate slug.
pub const GREENHOUSE_API: &str = "https://boards-api.greenhouse.io/v1/boards/{slug}/jobs";
pub const LEVER_API: &str = "https://api.lever.co/v0/postings/{slug}";
pub const ASHBY_API: &str = "https://api.ashbyhq.com/posting-api/job-board/{slug}";

/// Location keywords for filtering job locations (case-insensitive).
pub const LOCATION_KEYWORDS: &[&str] = &["new york", "nyc", "ny", "remote"];

/// Common company name suffixes to strip when generating ATS slugs.
pub const SLUG_STRIP_SUFFIXES: &[&str] = &[
    "inc", "llc", "co", "corp", "corporation", "company",
    "ai", "labs", "lab", "technologies", "technology", "tech",
    "health", "medical", "therapeutics", "bio", "biotechnologies",
    "systems", "security", "robotics", "holdings", "enterprises",
    "services", "solutions", "markets", "computing",
];

// Keyword matching convention: the title is always wrapped in single
// spaces before lookup, and entries below carry explicit spaces wherever
// a token boundary matters (" ai ", " i ", "sr "). One convention for
// all three title lists.

/// Entry-level keywords (matched against the space-padded lowercase title).
pub const ENTRY_LEVEL_KEYWORDS: &[&str] = &[
    "entry level",
    "entry-level",
    "junior",
    "associate",
    "analyst",
    "new grad",
    "new graduate",
    "jr.",
    "jr ",
    " i ", // e.g. "Software Engineer I" (standalone Roman numeral)
    " 1 ", // e.g. "Analyst 1" (standalone number)
];

/// Tech/sales role keywords (matched against the space-padded lowercase title).
pub const ROLE_KEYWORDS: &[&str] = &[
    "software",
    "engineer",
    "developer",
    "programming",
    "data",
    "machine learning",
    " ml ",
    " ai ",
    "devops",
    "cloud",
    "frontend",
    "front-end",
    "backend",
    "back-end",
    "fullstack",
    "full-stack",
    "sdr",
    "bdr",
    "account executive",
    "business development",
    "sales development",
    "sales engineer",
    "solutions",
    "product",
    "technical",
    " it ",
    "security",
    "qa",
    "quality assurance",
    "support engineer",
];

/// Senior/executive keywords that unconditionally exclude a listing.
pub const SENIOR_KEYWORDS: &[&str] = &[
    "senior",
    "sr.",
    "sr ",
    "staff",
    "principal",
    "lead",
    "manager",
    "director",
    "vp ",
    "vice president",
    "head of",
    "chief",
    "architect",
    "distinguished",
    " ii", // Roman numeral levels II+
    " iii",
    " iv",
    " v ",
    "strategist",
];

/// Output directory for CSV/JSON files.
pub const DATA_DIR: &str = "data";
