use crate::domain::{AppError, Document};

/// Port for reading the user's professional documents.
pub trait DocumentStore: Send + Sync {
    /// Load every supported, non-empty document.
    fn load_documents(&self) -> Result<Vec<Document>, AppError>;
}
