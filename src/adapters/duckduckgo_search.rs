use std::time::Duration;

use reqwest::blocking::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::domain::AppError;
use crate::ports::{SearchHit, WebSearch};

pub const DEFAULT_SEARCH_URL: &str = "https://html.duckduckgo.com/html/";
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Text search over the DuckDuckGo HTML endpoint.
#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    endpoint: Url,
    client: Client,
}

impl DuckDuckGoSearch {
    pub fn new(endpoint: Url, timeout_secs: u64) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| AppError::SearchError(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { endpoint, client })
    }

    pub fn with_default_endpoint(timeout_secs: u64) -> Result<Self, AppError> {
        let endpoint = Url::parse(DEFAULT_SEARCH_URL)
            .map_err(|e| AppError::SearchError(format!("Invalid search URL: {}", e)))?;
        Self::new(endpoint, timeout_secs)
    }
}

impl WebSearch for DuckDuckGoSearch {
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, AppError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("q", query)])
            .send()
            .map_err(|e| AppError::SearchError(format!("Search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::SearchError(format!(
                "Search endpoint returned {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .map_err(|e| AppError::SearchError(format!("Failed to read search results: {}", e)))?;
        Ok(parse_results(&body, max_results))
    }
}

/// Pull result links out of a DuckDuckGo HTML results page.
pub fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a.result__a") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|link| {
            let href = link.value().attr("href")?;
            let title = link.text().collect::<Vec<_>>().join(" ");
            let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
            Some(SearchHit { title, href: unwrap_redirect(href) })
        })
        .take(max_results)
        .collect()
}

/// Resolve `//duckduckgo.com/l/?uddg=<target>` redirects to the target URL.
fn unwrap_redirect(href: &str) -> String {
    let absolute =
        if href.starts_with("//") { format!("https:{}", href) } else { href.to_string() };
    let Ok(parsed) = Url::parse(&absolute) else {
        return href.to_string();
    };
    parsed
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, target)| target.into_owned())
        .unwrap_or(absolute)
}
