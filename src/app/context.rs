use crate::domain::{Document, SystemConfig};
use crate::ports::{BrowserLauncher, PageFetcher, WebSearch};

/// Application context holding configuration, loaded documents, and outbound ports.
pub struct AppContext {
    config: SystemConfig,
    documents: Vec<Document>,
    search: Box<dyn WebSearch>,
    fetcher: Box<dyn PageFetcher>,
    browser: Box<dyn BrowserLauncher>,
}

impl AppContext {
    /// Create a new application context.
    pub fn new(
        config: SystemConfig,
        documents: Vec<Document>,
        search: Box<dyn WebSearch>,
        fetcher: Box<dyn PageFetcher>,
        browser: Box<dyn BrowserLauncher>,
    ) -> Self {
        Self { config, documents, search, fetcher, browser }
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Documents loaded at startup, sorted by file name.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn search(&self) -> &dyn WebSearch {
        self.search.as_ref()
    }

    pub fn fetcher(&self) -> &dyn PageFetcher {
        self.fetcher.as_ref()
    }

    pub fn browser(&self) -> &dyn BrowserLauncher {
        self.browser.as_ref()
    }
}
