use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::{AppError, Document, DocumentConfig, DocumentKind};
use crate::ports::DocumentStore;

/// Reads professional documents from a flat data directory.
#[derive(Debug, Clone)]
pub struct FilesystemDocumentStore {
    root: PathBuf,
    config: DocumentConfig,
}

impl FilesystemDocumentStore {
    pub fn new(root: PathBuf, config: DocumentConfig) -> Self {
        Self { root, config }
    }

    fn candidate_files(&self) -> Vec<PathBuf> {
        match fs::read_dir(&self.root) {
            Ok(entries) => {
                candidate_paths(entries.map(|entry| entry.map(|e| e.path())), &self.config)
            }
            Err(err) => {
                warn!(path = %self.root.display(), "failed to list data directory: {}", err);
                Vec::new()
            }
        }
    }

    fn load_file(&self, path: &Path) -> Result<Option<Document>, AppError> {
        let size = fs::metadata(path)?.len();
        if size > self.config.max_file_size_bytes() {
            warn!(
                path = %path.display(),
                size,
                limit_mb = self.config.max_file_size_mb,
                "skipping document larger than the size limit"
            );
            return Ok(None);
        }

        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string();
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        let kind = DocumentKind::from_extension(extension);
        let bytes = fs::read(path)?;

        let content = match kind {
            DocumentKind::Pdf => extract_pdf_text(&bytes).map_err(|reason| {
                AppError::Io(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{}: {}", name, reason),
                ))
            })?,
            DocumentKind::Text => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => {
                    warn!(path = %path.display(), "skipping document that is not valid UTF-8");
                    return Ok(None);
                }
            },
        };

        if content.trim().is_empty() {
            debug!(path = %path.display(), "skipping empty document");
            return Ok(None);
        }

        Ok(Some(Document::new(name, kind, content)))
    }
}

impl DocumentStore for FilesystemDocumentStore {
    fn load_documents(&self) -> Result<Vec<Document>, AppError> {
        if !self.root.is_dir() {
            warn!(path = %self.root.display(), "data directory does not exist");
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();
        for path in self.candidate_files() {
            match self.load_file(&path) {
                Ok(Some(document)) => {
                    debug!(name = %document.name, chars = document.char_count(), "loaded document");
                    documents.push(document);
                }
                Ok(None) => {}
                Err(err) => warn!(path = %path.display(), "failed to load document: {}", err),
            }
        }
        Ok(documents)
    }
}

/// Supported regular files among `entries`, sorted by path. Unreadable entries are skipped.
fn candidate_paths<I>(entries: I, config: &DocumentConfig) -> Vec<PathBuf>
where
    I: IntoIterator<Item = io::Result<PathBuf>>,
{
    let mut files = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                warn!("skipping unreadable directory entry: {}", err);
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        if extension.is_empty() || !config.supports_extension(extension) {
            debug!(path = %path.display(), "skipping unsupported file");
            continue;
        }
        files.push(path);
    }
    files.sort();
    files
}

/// Extract text from every page of a PDF, one page per line block.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, String> {
    let pdf = lopdf::Document::load_mem(bytes).map_err(|e| e.to_string())?;
    let mut pages = Vec::new();
    for page_number in pdf.get_pages().keys() {
        match pdf.extract_text(&[*page_number]) {
            Ok(text) => pages.push(text),
            Err(err) => debug!(page = page_number, "failed to extract PDF page text: {}", err),
        }
    }
    Ok(pages.join("\n"))
}
