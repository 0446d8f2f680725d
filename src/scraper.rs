//! Sitemap discovery and article content fetching.

use std::error::Error;
use std::io::{Cursor, Read};

use backoff::future::retry_notify;
use backoff::{Error as BackoffError, ExponentialBackoff};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use select::document::Document;
use select::predicate::Attr;
use sitemap::reader::{SiteMapEntity, SiteMapReader};
use sitemap::structs::LastMod;

use crate::config;
use crate::models::{ArticleRef, ScrapedArticle};

/// Fetch the newsletter sitemap and return article URLs modified within the
/// last `days_back` days, newest first.
#[tracing::instrument(fields(days = %days_back))]
pub async fn fetch_article_urls(
    days_back: u32,
) -> Result<Vec<ArticleRef>, Box<dyn Error + Send + Sync>> {
    tracing::info!("fetching sitemap from {}", config::SITEMAP_URL);

    let response = reqwest::get(config::SITEMAP_URL).await?.error_for_status()?;
    let bytes = response.bytes().await?;

    let cutoff = Utc::now() - Duration::days(days_back as i64);
    let articles = collect_recent_articles(Cursor::new(bytes), cutoff);

    tracing::info!(
        "found {} articles within the last {} days",
        articles.len(),
        days_back
    );
    Ok(articles)
}

/// Walk sitemap entities from `reader`, keeping `/p/` article URLs whose
/// last-modified time is at or after `cutoff`. Entries without a parseable
/// lastmod are kept and sort last.
pub fn collect_recent_articles<R: Read>(reader: R, cutoff: DateTime<Utc>) -> Vec<ArticleRef> {
    let mut articles: Vec<ArticleRef> = Vec::new();

    for entity in SiteMapReader::new(reader) {
        match entity {
            SiteMapEntity::Url(url_entry) => {
                let loc = match url_entry.loc.get_url() {
                    Some(url) => url.to_string(),
                    None => continue,
                };
                if !loc.contains("/p/") {
                    continue;
                }

                let lastmod = match url_entry.lastmod {
                    LastMod::DateTime(dt) => Some(dt.with_timezone(&Utc)),
                    _ => None,
                };
                if let Some(lm) = lastmod {
                    if lm < cutoff {
                        continue;
                    }
                }

                articles.push(ArticleRef { url: loc, lastmod });
            }
            SiteMapEntity::SiteMap(_) => {
                // The newsletter publishes a flat sitemap; nested indexes
                // are not followed.
            }
            SiteMapEntity::Err(error) => {
                tracing::warn!("error parsing sitemap entity: {}", error);
            }
        }
    }

    // Newest first; None lastmod sorts after every dated entry.
    articles.sort_by(|a, b| b.lastmod.cmp(&a.lastmod));
    articles
}

fn retry_notify_handler<E>(err: E, duration: std::time::Duration)
where
    E: std::fmt::Display,
{
    tracing::warn!(
        "request failed: {}. Retrying in {:.1}s...",
        err,
        duration.as_secs_f32()
    );
}

/// Fetch one article page, retrying transient failures.
#[tracing::instrument(skip(client, url), fields(url = %url))]
async fn fetch_article_html(
    client: &Client,
    url: &str,
) -> Result<String, Box<dyn Error + Send + Sync>> {
    let backoff = ExponentialBackoff::default();

    let response = retry_notify(
        backoff,
        || async {
            match client.get(url).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        Ok(resp)
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS
                        || status.is_server_error()
                    {
                        Err(BackoffError::transient(anyhow::anyhow!(
                            "server returned retryable status: {}",
                            status
                        )))
                    } else {
                        Err(BackoffError::permanent(anyhow::anyhow!(
                            "server returned non-retryable status: {}",
                            status
                        )))
                    }
                }
                Err(err) => {
                    if err.is_timeout() || err.is_connect() || err.is_request() {
                        Err(BackoffError::transient(anyhow::Error::new(err)))
                    } else {
                        Err(BackoffError::permanent(anyhow::Error::new(err)))
                    }
                }
            }
        },
        retry_notify_handler,
    )
    .await?;

    Ok(response.text().await?)
}

/// Extract the content region from a fetched page, or `None` when the page
/// does not carry one.
pub fn extract_content_region(page_html: &str) -> Option<(String, String)> {
    let document = Document::from(page_html);
    document
        .find(Attr("id", config::CONTENT_REGION_ID))
        .next()
        .map(|node| (node.inner_html(), node.text()))
}

/// Fetch each article URL and pull out its content region.
///
/// A single failed URL is skipped, not fatal: the batch may come back
/// shorter than requested. A fixed delay separates successive fetches.
pub async fn scrape_articles(urls: &[String]) -> Vec<ScrapedArticle> {
    let mut results = Vec::new();

    let client = match Client::builder()
        .timeout(config::ARTICLE_REQUEST_TIMEOUT)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("failed to build HTTP client: {}", e);
            return results;
        }
    };

    for (i, url) in urls.iter().enumerate() {
        tracing::info!("scraping article {}/{}: {}", i + 1, urls.len(), url);

        match fetch_article_html(&client, url).await {
            Ok(page_html) => match extract_content_region(&page_html) {
                Some((html, text)) => results.push(ScrapedArticle {
                    url: url.clone(),
                    html,
                    text,
                }),
                None => tracing::warn!("no content region found at {}", url),
            },
            Err(e) => tracing::warn!("failed to scrape {}: {}", url, e),
        }

        if i < urls.len() - 1 {
            tokio::time::sleep(config::PAGE_LOAD_DELAY).await;
        }
    }

    tracing::info!("successfully scraped {}/{} articles", results.len(), urls.len());
    results
}
