use crate::domain::AppError;

/// A fetched web page, reduced to what posting checks need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    /// Reader-visible text, whitespace-collapsed.
    pub text: String,
    /// Length of the raw HTML in bytes.
    pub html_len: usize,
}

/// Port for fetching web pages.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<FetchedPage, AppError>;
}
