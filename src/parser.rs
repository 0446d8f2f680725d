//! Locate funding sections in article markup and parse paragraphs into
//! structured entries.

use once_cell::sync::Lazy;
use regex::Regex;
use select::document::Document;
use select::node::Node;
use select::predicate::{Name, Predicate};

use crate::config;
use crate::models::{ArticleSection, FundingEntry, ScrapedArticle};

// Patterns ordered by specificity, most specific first; the first match
// wins and later rules are never tried. The StrictlyVC template reads:
// "[Company], a [age]-year-old, [location]-based [description], has raised
// $[amount] in [round type] funding led by [investor]..."
//
// Case-insensitivity is scoped to everything after the company group, so
// the company really must start with an uppercase letter.
static FUNDING_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Pattern 1: full template with age, location, description, amount,
        // round, and optional lead investor.
        Regex::new(
            r"^(?P<company>[A-Z][^,]+),\s+(?i:a\s+.+?[,-]\s*(?P<location>[A-Za-z\s.]+?)-based\s+(?P<description>[^,]+?),\s+(?:has\s+)?raised\s+(?:a\s+)?\$(?P<amount>[\d.,]+\s*(?:billion|million)?)\s+(?:in\s+)?(?P<round>[^.]*?(?:round|funding|seed)[^.]*?)(?:\s*led\s*by\s*(?P<lead_investor>[^,.]+?))?[.,])",
        )
        .unwrap(),
        // Pattern 2: without the age clause -- "Company, a location-based
        // description, raised..."
        Regex::new(
            r"^(?P<company>[A-Z][^,]+),\s+(?i:a\s+(?P<location>[A-Za-z\s.]+?)-based\s+(?P<description>[^,]+?),\s+(?:has\s+)?raised\s+(?:a\s+)?\$(?P<amount>[\d.,]+\s*(?:billion|million)?)\s+(?:in\s+)?(?P<round>[^.]*?(?:round|funding|seed)[^.]*?)(?:\s*led\s*by\s*(?P<lead_investor>[^,.]+?))?[.,])",
        )
        .unwrap(),
        // Pattern 3: minimal fallback -- "Company ... raised $X ...
        // round/funding/seed".
        Regex::new(
            r"^(?P<company>[A-Z][^,]+),\s+(?i:.*?(?:has\s+)?raised\s+(?:a\s+)?\$(?P<amount>[\d.,]+\s*(?:billion|million)?)\s+(?:in\s+)?(?P<round>[^.]*?(?:round|funding|seed)[^.]*?)(?:\s*led\s*by\s*(?P<lead_investor>[^,.]+?))?[.,])",
        )
        .unwrap(),
    ]
});

fn heading_predicate() -> impl Predicate {
    Name("h1")
        .or(Name("h2"))
        .or(Name("h3"))
        .or(Name("h4"))
        .or(Name("strong"))
        .or(Name("b"))
        .or(Name("p"))
}

fn nested_heading_predicate() -> impl Predicate {
    Name("h1").or(Name("h2")).or(Name("h3")).or(Name("h4"))
}

/// An ancestor that bounds a section: either the content region itself or a
/// wrapper carrying the post-content class marker.
fn is_section_root(node: &Node) -> bool {
    node.attr("id") == Some(config::CONTENT_REGION_ID)
        || node
            .attr("class")
            .is_some_and(|c| c.contains(config::POST_CONTENT_CLASS))
}

/// Find funding section headings and collect the paragraphs under each.
///
/// Beehiiv wraps each heading in its own `<div>`, with the content elements
/// as siblings of that wrapper: we climb from the heading to the wrapper
/// that sits directly under the content region, then walk its following
/// siblings until the next section starts. No match yields an empty list,
/// which callers treat as "no funding content", not an error.
pub fn extract_funding_sections(html: &str) -> Vec<ArticleSection> {
    let document = Document::from(html);
    let mut sections = Vec::new();

    let mut heading_elements: Vec<(Node, &'static str)> = Vec::new();
    for el in document.find(heading_predicate()) {
        let text = el.text().trim().to_lowercase();
        if let Some(label) = config::FUNDING_HEADINGS.iter().find(|h| text.contains(*h)) {
            heading_elements.push((el, *label));
        }
    }

    for (heading_el, section_name) in heading_elements {
        // Climb to the wrapper that is a direct child of the content region.
        let mut wrapper = heading_el;
        while let Some(parent) = wrapper.parent() {
            match parent.name() {
                None | Some("body") | Some("html") => break,
                _ => {}
            }
            if is_section_root(&parent) {
                break;
            }
            wrapper = parent;
        }

        let mut paragraphs = Vec::new();
        let mut sibling = wrapper.next();
        while let Some(sib) = sibling {
            let sib_text = sib.text().trim().to_string();
            let sib_lower = sib_text.to_lowercase();

            // A nested heading element, or any funding heading label in the
            // text, marks the start of the next section.
            let inner_heading = sib.find(nested_heading_predicate()).next().is_some();
            if inner_heading || config::FUNDING_HEADINGS.iter().any(|h| sib_lower.contains(h)) {
                break;
            }

            // Texts of 20 chars or fewer are noise (captions, dividers).
            if sib_text.chars().count() > 20 {
                paragraphs.push(sib_text);
            }
            sibling = sib.next();
        }

        if !paragraphs.is_empty() {
            tracing::debug!(
                "section '{}': {} paragraphs",
                section_name,
                paragraphs.len()
            );
            sections.push(ArticleSection {
                section: section_name.to_string(),
                paragraphs,
            });
        }
    }

    sections
}

/// Run the pattern cascade over a single funding paragraph.
///
/// Always returns an entry with `raw_text` set verbatim; a paragraph no
/// rule matches comes back with `parsed = false` and every structured
/// field empty. Pure function, never fails.
pub fn parse_funding_paragraph(text: &str) -> FundingEntry {
    for pattern in FUNDING_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let group = |name: &str| {
                caps.name(name)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default()
            };
            return FundingEntry {
                company: group("company"),
                amount: group("amount"),
                round: group("round"),
                location: group("location"),
                description: group("description"),
                lead_investor: group("lead_investor"),
                raw_text: text.to_string(),
                section: String::new(),
                source_url: String::new(),
                parsed: true,
            };
        }
    }

    tracing::warn!("could not parse funding paragraph: {:.100}...", text);
    FundingEntry::unparsed(text)
}

/// Parse one scraped article into funding entries, tagging each with the
/// section heading it was found under and the source URL.
pub fn parse_article(article: &ScrapedArticle) -> Vec<FundingEntry> {
    let sections = extract_funding_sections(&article.html);
    let mut entries = Vec::new();

    for section in &sections {
        for para in &section.paragraphs {
            let mut entry = parse_funding_paragraph(para);
            entry.section = section.section.clone();
            entry.source_url = article.url.clone();
            entries.push(entry);
        }
    }

    tracing::info!(
        "article {}: {} entries ({} parsed)",
        article.url,
        entries.len(),
        entries.iter().filter(|e| e.parsed).count()
    );
    entries
}
