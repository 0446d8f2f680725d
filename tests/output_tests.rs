use std::fs;

use fundscout::models::{FundingEntry, JobListing};
use fundscout::output::{build_combined, save_fundings, save_jobs, OutputFormat};

fn entry(company: &str, amount: &str, parsed: bool) -> FundingEntry {
    FundingEntry {
        company: company.to_string(),
        amount: amount.to_string(),
        round: "seed funding".to_string(),
        location: "New York".to_string(),
        description: "startup".to_string(),
        lead_investor: "Foo Ventures".to_string(),
        raw_text: "raw".to_string(),
        section: "smaller fundings".to_string(),
        source_url: "https://newsletter.strictlyvc.com/p/example".to_string(),
        parsed,
    }
}

fn listing(title: &str, searched: &str) -> JobListing {
    JobListing {
        title: title.to_string(),
        company: "acme".to_string(),
        location: "New York, NY".to_string(),
        job_url: "https://boards.greenhouse.io/acme/jobs/1".to_string(),
        ats_platform: "greenhouse".to_string(),
        searched_company: searched.to_string(),
    }
}

#[test]
fn test_build_combined_joins_on_searched_company() {
    let entries = vec![
        entry("Acme Robotics", "12 million", true),
        entry("", "", false),
    ];
    let jobs = vec![
        listing("Junior Engineer", "Acme Robotics"),
        listing("Associate Analyst", "Unknown Co"),
    ];

    let combined = build_combined(&entries, &jobs);
    assert_eq!(combined.len(), 2);

    assert_eq!(combined[0].amount, "12 million");
    assert_eq!(combined[0].section, "smaller fundings");
    // No parsed funding for the second job: funding columns stay empty.
    assert_eq!(combined[1].amount, "");
    assert_eq!(combined[1].section, "");
}

#[test]
fn test_build_combined_ignores_unparsed_entries() {
    let mut unparsed = entry("Ghost Co", "9 million", false);
    unparsed.company = "Ghost Co".to_string();
    let combined = build_combined(&[unparsed], &[listing("Junior Engineer", "Ghost Co")]);
    assert_eq!(combined[0].amount, "");
}

#[test]
fn test_save_fundings_csv_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let entries = vec![entry("Acme Robotics", "12 million", true)];

    let path = save_fundings(&entries, dir.path(), OutputFormat::Csv).unwrap();
    assert!(path.file_name().unwrap().to_string_lossy().starts_with("fundings_"));

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.lines().next().unwrap().contains("company"));
    assert!(contents.contains("Acme Robotics"));
    assert!(contents.contains("12 million"));
}

#[test]
fn test_save_jobs_json() {
    let dir = tempfile::tempdir().unwrap();
    let jobs = vec![listing("Junior Engineer", "Acme Robotics")];

    let path = save_jobs(&jobs, dir.path(), OutputFormat::Json).unwrap();
    assert!(path.extension().unwrap() == "json");

    let contents = fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed[0]["title"], "Junior Engineer");
    assert_eq!(parsed[0]["ats_platform"], "greenhouse");
}
