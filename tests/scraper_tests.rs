use std::io::Cursor;

use chrono::{TimeZone, Utc};
use fundscout::scraper::{collect_recent_articles, extract_content_region};

const SITEMAP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://newsletter.strictlyvc.com/p/article-new</loc>
    <lastmod>2026-08-25T10:00:00+00:00</lastmod>
  </url>
  <url>
    <loc>https://newsletter.strictlyvc.com/p/article-stale</loc>
    <lastmod>2020-01-01T00:00:00+00:00</lastmod>
  </url>
  <url>
    <loc>https://newsletter.strictlyvc.com/about</loc>
    <lastmod>2026-08-25T10:00:00+00:00</lastmod>
  </url>
  <url>
    <loc>https://newsletter.strictlyvc.com/p/article-undated</loc>
  </url>
  <url>
    <loc>https://newsletter.strictlyvc.com/p/article-mid</loc>
    <lastmod>2026-08-20T08:00:00+00:00</lastmod>
  </url>
</urlset>"#;

#[test]
fn test_collect_recent_articles_filters_and_sorts() {
    let cutoff = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
    let articles = collect_recent_articles(Cursor::new(SITEMAP_XML.as_bytes()), cutoff);

    let urls: Vec<&str> = articles.iter().map(|a| a.url.as_str()).collect();
    // Stale entry is cut, non-article path is cut, newest first, the
    // undated entry sorts last.
    assert_eq!(
        urls,
        vec![
            "https://newsletter.strictlyvc.com/p/article-new",
            "https://newsletter.strictlyvc.com/p/article-mid",
            "https://newsletter.strictlyvc.com/p/article-undated",
        ]
    );
    assert!(articles[2].lastmod.is_none());
}

#[test]
fn test_collect_recent_articles_empty_sitemap() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"></urlset>"#;
    let cutoff = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
    assert!(collect_recent_articles(Cursor::new(xml.as_bytes()), cutoff).is_empty());
}

#[test]
fn test_extract_content_region() {
    let page = r#"<html><body>
<nav>site chrome</nav>
<div id="content-blocks"><p>Hello from the newsletter body.</p></div>
</body></html>"#;

    let (html, text) = extract_content_region(page).expect("content region present");
    assert!(html.contains("<p>"));
    assert!(text.contains("Hello from the newsletter body."));
}

#[test]
fn test_extract_content_region_missing() {
    let page = "<html><body><div id=\"other\">nope</div></body></html>";
    assert!(extract_content_region(page).is_none());
}
