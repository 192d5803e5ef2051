use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::adapters::page_fetcher_http::extract_visible_text;
use crate::domain::AppError;
use crate::ports::{BrowserLauncher, FetchedPage, PageFetcher, SearchHit, WebSearch};

/// Search returning canned hits for queries containing a key.
#[derive(Default)]
pub struct FakeWebSearch {
    results: Mutex<Vec<(String, Result<Vec<SearchHit>, String>)>>,
    pub queries: Arc<Mutex<Vec<String>>>,
}

impl FakeWebSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer queries containing `needle` with `hits` (title, href).
    pub fn with_hits(self, needle: &str, hits: &[(&str, &str)]) -> Self {
        let hits = hits
            .iter()
            .map(|(title, href)| SearchHit { title: title.to_string(), href: href.to_string() })
            .collect();
        self.results.lock().unwrap().push((needle.to_string(), Ok(hits)));
        self
    }

    pub fn with_failure(self, needle: &str, message: &str) -> Self {
        self.results.lock().unwrap().push((needle.to_string(), Err(message.to_string())));
        self
    }
}

impl WebSearch for FakeWebSearch {
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, AppError> {
        self.queries.lock().unwrap().push(query.to_string());
        let results = self.results.lock().unwrap();
        match results.iter().find(|(needle, _)| query.contains(needle.as_str())) {
            Some((_, Ok(hits))) => Ok(hits.iter().take(max_results).cloned().collect()),
            Some((_, Err(message))) => Err(AppError::SearchError(message.clone())),
            None => Ok(Vec::new()),
        }
    }
}

/// Page fetcher serving pages from memory; unknown URLs fail to fetch.
#[derive(Default)]
pub struct FakePageFetcher {
    pages: Mutex<HashMap<String, FetchedPage>>,
    pub fetched: Arc<Mutex<Vec<String>>>,
}

impl FakePageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`, reduced the same way the HTTP fetcher does.
    pub fn with_page(self, url: &str, status: u16, html: &str) -> Self {
        let page = FetchedPage { status, text: extract_visible_text(html), html_len: html.len() };
        self.pages.lock().unwrap().insert(url.to_string(), page);
        self
    }
}

impl PageFetcher for FakePageFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedPage, AppError> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::SearchError(format!("fake: no page for {}", url)))
    }
}

/// Browser that records URLs instead of opening them.
#[derive(Default)]
pub struct RecordingBrowser {
    pub opened: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { opened: Arc::default(), fail: true }
    }
}

impl BrowserLauncher for RecordingBrowser {
    fn open(&self, url: &str) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::BrowserError {
                url: url.to_string(),
                details: "fake: no browser".to_string(),
            });
        }
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}
