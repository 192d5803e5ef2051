//! ATS job link heuristics and posting validation rules.

const GREENHOUSE: &str = "boards.greenhouse.io";
const LEVER: &str = "jobs.lever.co";
const FALLBACK_JOB_TITLE: &str = "Software Engineer";
const UNKNOWN_COMPANY: &str = "unknown";

/// Phrases that appear on real postings but not on listing pages.
const PRIMARY_INDICATORS: [&str; 5] =
    ["equal opp", "equal emp", "benefits", "apply now", "apply for this job"];

/// Minimum raw page length for a posting to count as substantial.
const MIN_POSTING_HTML_LEN: usize = 500;

/// Whether a search result URL on `domain` looks like an individual posting.
pub fn is_job_link(url: &str, domain: &str) -> bool {
    if domain.contains(GREENHOUSE) {
        url.contains("/jobs/")
    } else if domain.contains(LEVER) {
        url.matches('/').count() >= 4
    } else {
        false
    }
}

/// Strip query string and fragment from a URL.
pub fn clean_url(url: &str) -> &str {
    let without_query = url.split('?').next().unwrap_or(url);
    without_query.split('#').next().unwrap_or(without_query)
}

/// Company slug from an ATS URL, e.g. `https://jobs.lever.co/acme/123` → `acme`.
pub fn extract_company_name(url: &str, domain: &str) -> String {
    if !(domain.contains(GREENHOUSE) || domain.contains(LEVER)) {
        return UNKNOWN_COMPANY.to_string();
    }
    url.split('/')
        .nth(3)
        .filter(|segment| !segment.is_empty())
        .unwrap_or(UNKNOWN_COMPANY)
        .to_string()
}

/// Job title from a search result title with company and board suffixes removed.
pub fn extract_job_title(title_text: &str, company: &str) -> String {
    if title_text.trim().is_empty() {
        return FALLBACK_JOB_TITLE.to_string();
    }

    let title = title_text
        .replace(&format!(" - {}", company), "")
        .replace(&format!(" at {}", company), "")
        .replace(" - Jobs at ", " - ")
        .replace(" - Greenhouse", "")
        .replace(" - Lever", "");
    let title = title.split(" - ").next().unwrap_or(&title).trim();

    if title.chars().count() < 5 {
        return FALLBACK_JOB_TITLE.to_string();
    }
    title.to_string()
}

/// Outcome of checking whether a fetched page is a real job posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingVerdict {
    pub valid: bool,
    pub reason: String,
}

impl PostingVerdict {
    pub fn valid(reason: impl Into<String>) -> Self {
        Self { valid: true, reason: reason.into() }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self { valid: false, reason: reason.into() }
    }
}

/// Judge a posting from its extracted text and raw HTML length.
pub fn assess_posting(extracted_text: &str, raw_len: usize) -> PostingVerdict {
    if extracted_text.trim().is_empty() {
        return PostingVerdict::invalid("Failed to extract content");
    }

    let lower = extracted_text.to_lowercase();
    let found: Vec<&str> =
        PRIMARY_INDICATORS.iter().copied().filter(|indicator| lower.contains(indicator)).collect();

    if !found.is_empty() && raw_len > MIN_POSTING_HTML_LEN {
        PostingVerdict::valid(format!("Valid job posting: {:?}", found))
    } else {
        PostingVerdict::invalid(format!("No primary indicators found: {:?}", found))
    }
}
