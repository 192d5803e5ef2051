//! Professional documents and keyword retrieval over them.

use std::fmt;

/// Query words that ask about the whole profile rather than a specific topic.
const GENERAL_QUERY_TERMS: [&str; 8] =
    ["resume", "cv", "background", "profile", "about", "tell", "summary", "experience"];

/// Words marking a chunk as carrying core career information.
const KEY_CHUNK_TERMS: [&str; 5] = ["engineer", "software", "experience", "skills", "education"];

const GENERAL_KEY_SCORE: usize = 5;
const GENERAL_BASE_SCORE: usize = 1;
const MAX_HITS_PER_DOCUMENT: usize = 8;

/// File format a document was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Pdf,
}

impl DocumentKind {
    /// Infer the kind from a file extension; anything that is not PDF is read as text.
    pub fn from_extension(extension: &str) -> Self {
        if extension.trim_start_matches('.').eq_ignore_ascii_case("pdf") {
            DocumentKind::Pdf
        } else {
            DocumentKind::Text
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Text => f.write_str("text"),
            DocumentKind::Pdf => f.write_str("pdf"),
        }
    }
}

/// A loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name including extension, e.g. `resume.pdf`.
    pub name: String,
    /// File name without extension, used as the citation tag.
    pub stem: String,
    pub kind: DocumentKind,
    pub content: String,
}

impl Document {
    pub fn new(name: impl Into<String>, kind: DocumentKind, content: impl Into<String>) -> Self {
        let name = name.into();
        let stem = match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => name.clone(),
        };
        Self { name, stem, kind, content: content.into() }
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// A scored chunk of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextHit {
    pub content: String,
    pub source: String,
    pub score: usize,
    pub chunk_id: usize,
}

/// Concatenate documents into a single context block with per-file headers.
pub fn assemble_context(documents: &[Document]) -> String {
    let mut context = String::new();
    for doc in documents {
        if doc.content.trim().is_empty() {
            continue;
        }
        context.push_str(&format!("\n\n=== {} ===\n{}\n", doc.name.to_uppercase(), doc.content));
    }
    context
}

/// Split text into overlapping character windows.
///
/// Text no longer than `chunk_size` is returned whole. Windows advance by
/// `chunk_size - overlap`, never by less than one character.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= chunk_size || chunk_size == 0 {
        return vec![text.to_string()];
    }

    let step = chunk_size.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        start += step;
    }
    chunks
}

/// Score the chunks of one document against a query.
pub fn search_chunks(
    query: &str,
    text: &str,
    source: &str,
    chunk_size: usize,
    overlap: usize,
) -> Vec<ContextHit> {
    let query_lower = query.to_lowercase();
    let query_terms: Vec<&str> = query_lower.split_whitespace().collect();
    let is_general = GENERAL_QUERY_TERMS.iter().any(|term| query_lower.contains(term));

    let mut hits: Vec<ContextHit> = chunk_text(text, chunk_size, overlap)
        .into_iter()
        .enumerate()
        .filter_map(|(chunk_id, chunk)| {
            let chunk_lower = chunk.to_lowercase();
            let score = if is_general {
                if KEY_CHUNK_TERMS.iter().any(|key| chunk_lower.contains(key)) {
                    GENERAL_KEY_SCORE
                } else {
                    GENERAL_BASE_SCORE
                }
            } else {
                query_terms.iter().filter(|term| chunk_lower.contains(*term)).count()
            };

            (score > 0).then(|| ContextHit {
                content: chunk.trim().to_string(),
                source: source.to_string(),
                score,
                chunk_id,
            })
        })
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(MAX_HITS_PER_DOCUMENT);
    hits
}

/// Retrieve the best-matching chunks across all documents, formatted with source tags.
pub fn retrieve_context(
    query: &str,
    documents: &[Document],
    chunk_size: usize,
    overlap: usize,
    max_results: usize,
) -> String {
    let mut hits: Vec<ContextHit> = documents
        .iter()
        .flat_map(|doc| search_chunks(query, &doc.content, &doc.stem, chunk_size, overlap))
        .collect();

    if hits.is_empty() {
        return format!("No relevant information found for query: {}", query);
    }

    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.iter()
        .take(max_results)
        .map(|hit| format!("[{}] {}", hit.source, hit.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
