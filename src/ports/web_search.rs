use crate::domain::AppError;

/// A single organic search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub href: String,
}

/// Port for text web searches.
pub trait WebSearch: Send + Sync {
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, AppError>;
}
