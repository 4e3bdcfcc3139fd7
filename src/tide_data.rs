//! # Official Current Table Fetching
//!
//! Network side of the tide pipeline. Downloads the Japan Coast Guard (JCG)
//! 5th Region current-prediction page for a strait and scrapes its first table.
//!
//! ## Data Source
//!
//! ### JCG current predictions
//! - **URL**: `https://www1.kaiho.mlit.go.jp/KAN5/tyouryuu/stream_<strait>.html`
//! - **Encoding**: Shift_JIS (used unless the response declares a charset)
//! - **Format**: HTML table, columns hour / minute / direction / speed (kt)
//! - **Validity**: today only; the page is replaced every day
//!
//! ### Processing Pipeline
//! 1. **Cache**: serve a table fetched within the TTL (30 minutes by default)
//! 2. **Fetch**: HTTP GET with a bounded timeout
//! 3. **Decode**: Shift_JIS → UTF-8
//! 4. **Scrape**: cell texts of every row of the first `<table>`
//!
//! Row validation is left to [`crate::matcher`], which skips bad rows one by
//! one instead of rejecting the page.
//!
//! ## Error Handling
//! Failures are typed by [`TideError`] inside this module and flattened to
//! `None` at the [`TideTableSource`] boundary, where the fusion engine falls
//! back to the lunar model.

use crate::cache::TtlCache;
use crate::matcher::TideTable;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default TTL for a fetched table (30 minutes).
pub const DEFAULT_TABLE_TTL: Duration = Duration::from_secs(1800);

const PAGE_ENCODING: &str = "shift_jis";

/// Errors that can occur while downloading or scraping a current table.
#[derive(Error, Debug)]
pub enum TideError {
    /// Network, timeout or protocol failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("unexpected status {0}")]
    Status(u16),

    /// Page had no table to scrape
    #[error("scrape failed")]
    Scrape,
}

/// Fetch-by-URL capability for official current tables.
///
/// Implementations must not fail past this boundary: any problem is `None`.
#[async_trait]
pub trait TideTableSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<TideTable>;
}

#[async_trait]
impl<T: TideTableSource + ?Sized> TideTableSource for Arc<T> {
    async fn fetch(&self, url: &str) -> Option<TideTable> {
        (**self).fetch(url).await
    }
}

/// HTTP client for JCG current-table pages.
pub struct JcgTideClient {
    client: Client,
    cache: TtlCache<String, TideTable>,
}

impl JcgTideClient {
    pub fn new(timeout: Duration, ttl: Duration) -> Result<Self, TideError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(JcgTideClient {
            client,
            cache: TtlCache::new(ttl),
        })
    }

    /// Fetch and scrape `url`, consulting the cache first.
    pub async fn fetch_table(&self, url: &str) -> Result<TideTable, TideError> {
        let key = url.to_string();
        if let Some(table) = self.cache.get(&key).await {
            debug!(url, "current table served from cache");
            return Ok(table);
        }

        debug!(url, "fetching current table");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TideError::Status(status.as_u16()));
        }

        let html = response.text_with_charset(PAGE_ENCODING).await?;
        let table = parse_table(&html)?;
        debug!(url, rows = table.rows.len(), "current table scraped");

        self.cache.insert(key, table.clone()).await;
        Ok(table)
    }
}

#[async_trait]
impl TideTableSource for JcgTideClient {
    async fn fetch(&self, url: &str) -> Option<TideTable> {
        match self.fetch_table(url).await {
            Ok(table) => Some(table),
            Err(error) => {
                warn!(url, %error, "current table unavailable");
                None
            }
        }
    }
}

/// Scrape the first `<table>` of a page into raw rows of trimmed cell text.
///
/// Rows without any cell (e.g. spacer `<tr/>`) are dropped; everything else is
/// kept for the matcher to judge.
pub fn parse_table(html: &str) -> Result<TideTable, TideError> {
    let doc = Html::parse_document(html);
    let table_sel = Selector::parse("table").map_err(|_| TideError::Scrape)?;
    let row_sel = Selector::parse("tr").map_err(|_| TideError::Scrape)?;
    let cell_sel = Selector::parse("td, th").map_err(|_| TideError::Scrape)?;

    let table = doc.select(&table_sel).next().ok_or(TideError::Scrape)?;

    let rows = table
        .select(&row_sel)
        .map(|row| {
            row.select(&cell_sel)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect();

    Ok(TideTable { rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <table>
            <tr><th>時</th><th>分</th><th>流向</th><th>流速(kt)</th></tr>
            <tr><td>5</td><td>40</td><td>西流</td><td>3.8</td></tr>
            <tr></tr>
            <tr><td> 9 </td><td>10</td><td>転流</td><td>-</td></tr>
            <tr><td>12</td><td>20</td><td>東流</td><td>4.4</td></tr>
          </table>
          <table><tr><td>footer</td></tr></table>
        </body></html>
    "#;

    #[test]
    fn scrapes_first_table_only() {
        let table = parse_table(PAGE).unwrap();
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[0], vec!["時", "分", "流向", "流速(kt)"]);
        assert_eq!(table.rows[1], vec!["5", "40", "西流", "3.8"]);
        assert_eq!(table.rows[2][0], "9");
    }

    #[test]
    fn page_without_table_is_scrape_error() {
        let result = parse_table("<html><body><p>メンテナンス中</p></body></html>");
        assert!(matches!(result, Err(TideError::Scrape)));
    }

    #[tokio::test]
    async fn fetch_scrapes_and_caches() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/stream_akashi.html")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(PAGE)
            .expect(1)
            .create_async()
            .await;

        let client = JcgTideClient::new(Duration::from_secs(5), DEFAULT_TABLE_TTL).unwrap();
        let url = format!("{}/stream_akashi.html", server.url());

        let first = client.fetch(&url).await.unwrap();
        let second = client.fetch(&url).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.rows[3], vec!["12", "20", "東流", "4.4"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_degrades_to_none() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/stream_naruto.html")
            .with_status(503)
            .expect(2)
            .create_async()
            .await;

        let client = JcgTideClient::new(Duration::from_secs(5), DEFAULT_TABLE_TTL).unwrap();
        let url = format!("{}/stream_naruto.html", server.url());

        assert!(matches!(
            client.fetch_table(&url).await,
            Err(TideError::Status(503))
        ));
        assert!(client.fetch(&url).await.is_none());
        mock.assert_async().await;
    }
}
