use std::time::Duration;

use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Node};

use crate::adapters::duckduckgo_search::BROWSER_USER_AGENT;
use crate::domain::AppError;
use crate::ports::{FetchedPage, PageFetcher};

/// Tags whose text never reaches the reader.
const HIDDEN_TAGS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

/// Blocking page fetcher presenting a desktop browser user agent.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| AppError::SearchError(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedPage, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::SearchError(format!("Failed to fetch {}: {}", url, e)))?;
        let status = response.status().as_u16();
        let html = response
            .text()
            .map_err(|e| AppError::SearchError(format!("Failed to read {}: {}", url, e)))?;
        Ok(FetchedPage { status, text: extract_visible_text(&html), html_len: html.len() })
    }
}

/// Visible text of an HTML page, whitespace-collapsed.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut words: Vec<String> = Vec::new();
    collect_text(document.root_element(), &mut words);
    words.join(" ")
}

fn collect_text(element: ElementRef<'_>, words: &mut Vec<String>) {
    if HIDDEN_TAGS.contains(&element.value().name()) {
        return;
    }
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                words.extend(text.split_whitespace().map(str::to_string));
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, words);
                }
            }
            _ => {}
        }
    }
}
