//! ATS job search: browser tabs, URL preview, and validated scraping.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info, warn};

use crate::app::AppContext;
use crate::domain::job_posting::{
    assess_posting, clean_url, extract_company_name, extract_job_title, is_job_link,
};
use crate::domain::{
    AppError, JobSearchConfig, PostingVerdict, QueryParts, SearchBackend, compile_query,
};
use crate::ports::PageFetcher;

pub const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search?q=";
const BROWSER_FILTERS: &str = r#"intext:"apply" intext:"employment""#;
pub const NO_TABS_OPENED: &str =
    "Failed to open any ATS search tabs. Please check your default browser settings.";

/// Inputs shared by every job search mode.
#[derive(Debug, Clone, Default)]
pub struct JobSearchOptions {
    pub title: String,
    pub expression: Option<String>,
    pub backend: Option<SearchBackend>,
    pub limit: Option<usize>,
    pub one_per_company: bool,
}

/// One browser search URL per ATS domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchUrl {
    pub domain: String,
    pub url: String,
}

#[derive(Debug)]
struct PreparedSearch {
    expression: String,
    backend: SearchBackend,
    compiled: String,
    limit: usize,
}

fn prepare(
    config: &JobSearchConfig,
    options: &JobSearchOptions,
) -> Result<PreparedSearch, AppError> {
    let expression = options.expression.as_deref().unwrap_or_default().trim().to_string();
    let parts = QueryParts::parse(&expression)?;
    let backend = options.backend.unwrap_or(config.default_backend);
    let compiled = compile_query(&options.title, &parts, backend);
    let limit = options.limit.unwrap_or(config.default_limit);
    if limit == 0 {
        return Err(AppError::config_error("Job search limit must be at least 1"));
    }

    info!(title = %options.title, %backend, limit, %parts, "prepared job search");
    Ok(PreparedSearch { expression, backend, compiled, limit })
}

fn browser_urls(config: &JobSearchConfig, search: &PreparedSearch) -> Vec<SearchUrl> {
    config
        .domains
        .iter()
        .take(search.limit)
        .map(|domain| {
            let query = format!("site:{} {} {}", domain, search.compiled, BROWSER_FILTERS);
            let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
            SearchUrl { domain: domain.clone(), url: format!("{}{}", GOOGLE_SEARCH_URL, encoded) }
        })
        .collect()
}

/// Build the Google `site:` search URLs without opening them.
pub fn preview(ctx: &AppContext, options: &JobSearchOptions) -> Result<String, AppError> {
    let config = &ctx.config().job_search;
    let search = prepare(config, options)?;

    let mut lines = vec![format!("Search query: {}", search.compiled)];
    for entry in browser_urls(config, &search) {
        lines.push(format!("{}: {}", entry.domain, entry.url));
    }
    Ok(lines.join("\n"))
}

/// Open one Google `site:` search tab per ATS domain.
pub fn open_in_browser(ctx: &AppContext, options: &JobSearchOptions) -> Result<String, AppError> {
    let config = &ctx.config().job_search;
    let search = prepare(config, options)?;

    let mut opened = Vec::new();
    for entry in browser_urls(config, &search) {
        match ctx.browser().open(&entry.url) {
            Ok(()) => {
                info!(domain = %entry.domain, "opened ATS search tab");
                opened.push(entry.domain);
            }
            Err(err) => warn!(domain = %entry.domain, "failed to open search tab: {}", err),
        }
    }

    if opened.is_empty() {
        return Ok(NO_TABS_OPENED.to_string());
    }

    let mut summary = format!("Opened {} ATS job search tabs in your browser:\n", opened.len());
    summary.push_str(&format!("Platforms: {}\n\n", opened.join(", ")));
    summary.push_str(&format!("Search query: {}\n", search.compiled));
    if !search.expression.is_empty() {
        summary.push_str(&format!("Expression used: {}", search.expression));
    }
    Ok(summary)
}

/// Search each ATS domain, keep validated postings, and list them.
pub fn scrape(ctx: &AppContext, options: &JobSearchOptions) -> Result<String, AppError> {
    let config = &ctx.config().job_search;
    let search = prepare(config, options)?;

    let mut found: BTreeSet<String> = BTreeSet::new();
    let mut companies: HashSet<String> = HashSet::new();

    'domains: for domain in &config.domains {
        if found.len() >= search.limit {
            info!(limit = search.limit, "limit reached, stopping search");
            break;
        }

        let query = format!("site:{} {}", domain, search.compiled);
        info!(%domain, %query, "searching ATS domain");

        let hits = match ctx.search().search(&query, config.max_results_per_domain) {
            Ok(hits) => hits,
            Err(err) => {
                warn!(%domain, "search failed, continuing with next domain: {}", err);
                continue;
            }
        };

        for hit in hits {
            if !hit.href.contains(domain.as_str()) || !is_job_link(&hit.href, domain) {
                debug!(href = %hit.href, "not a job link");
                continue;
            }

            let url = clean_url(&hit.href);
            let company = extract_company_name(url, domain);
            if options.one_per_company && companies.contains(&company) {
                debug!(%company, "already have a posting for company");
                continue;
            }

            let job_title = extract_job_title(&hit.title, &company);
            let verdict = validate_posting(ctx.fetcher(), url);
            if !verdict.valid {
                warn!(%url, reason = %verdict.reason, "job validation failed");
                continue;
            }

            info!(%company, %job_title, "added valid job");
            found.insert(format!("{} - {}: {}", company, job_title, url));
            companies.insert(company);

            if found.len() >= search.limit {
                break 'domains;
            }
        }
    }

    info!(count = found.len(), "search complete");

    if found.is_empty() {
        return Ok(format!(
            "No job postings found for '{}' with expression '{}' using {} backend",
            options.title, search.expression, search.backend
        ));
    }

    let mut lines = vec![format!("Found {} job postings for '{}':", found.len(), options.title)];
    lines.extend(found);
    Ok(lines.join("\n"))
}

/// Fetch a posting and judge whether it is a live job page.
///
/// Fetch failures count as valid so a flaky board never hides results.
pub fn validate_posting(fetcher: &dyn PageFetcher, url: &str) -> PostingVerdict {
    match fetcher.fetch(url) {
        Err(err) => {
            warn!(%url, "could not fetch posting, assuming valid: {}", err);
            PostingVerdict::valid(format!("Validation error: {}", err))
        }
        Ok(page) if page.status != 200 => PostingVerdict::invalid(format!("HTTP {}", page.status)),
        Ok(page) => assess_posting(&page.text, page.html_len),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        FakePageFetcher, FakeWebSearch, RecordingBrowser, sample_documents, test_config,
    };

    fn posting_html(body: &str) -> String {
        format!("<html><body><h1>Role</h1><p>{}</p><p>{}</p></body></html>", body, "x".repeat(600))
    }

    fn options(title: &str, expression: &str) -> JobSearchOptions {
        JobSearchOptions {
            title: title.to_string(),
            expression: Some(expression.to_string()),
            ..JobSearchOptions::default()
        }
    }

    fn context(
        search: FakeWebSearch,
        fetcher: FakePageFetcher,
        browser: RecordingBrowser,
    ) -> AppContext {
        AppContext::new(
            test_config(),
            sample_documents(),
            Box::new(search),
            Box::new(fetcher),
            Box::new(browser),
        )
    }

    #[test]
    fn preview_lists_encoded_google_urls_per_domain() {
        let ctx = context(FakeWebSearch::new(), FakePageFetcher::new(), RecordingBrowser::new());
        let out = preview(&ctx, &options("Software Engineer", "remote")).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Search query: \"Software Engineer\" remote");
        assert_eq!(
            lines[1],
            "boards.greenhouse.io: https://www.google.com/search?q=site%3Aboards.greenhouse.io+%22Software+Engineer%22+remote+intext%3A%22apply%22+intext%3A%22employment%22"
        );
        assert!(lines[2].starts_with("jobs.lever.co: https://www.google.com/search?q=site%3Ajobs.lever.co+"));
    }

    #[test]
    fn browser_mode_opens_tabs_and_summarises() {
        let browser = RecordingBrowser::new();
        let opened = browser.opened.clone();
        let ctx = context(FakeWebSearch::new(), FakePageFetcher::new(), browser);

        let out = open_in_browser(&ctx, &options("Robotics Engineer", "remote && -intern")).unwrap();

        assert_eq!(opened.lock().unwrap().len(), 2);
        assert_eq!(
            out,
            "Opened 2 ATS job search tabs in your browser:\n\
             Platforms: boards.greenhouse.io, jobs.lever.co\n\n\
             Search query: \"Robotics Engineer\" remote -intern\n\
             Expression used: remote && -intern"
        );
    }

    #[test]
    fn zero_limit_is_rejected_before_searching() {
        let browser = RecordingBrowser::new();
        let opened = browser.opened.clone();
        let search = FakeWebSearch::new();
        let queries = search.queries.clone();
        let ctx = context(search, FakePageFetcher::new(), browser);
        let opts = JobSearchOptions { limit: Some(0), ..options("Engineer", "") };

        for result in [open_in_browser(&ctx, &opts), scrape(&ctx, &opts), preview(&ctx, &opts)] {
            let err = result.unwrap_err();
            assert_eq!(err.to_string(), "Job search limit must be at least 1");
        }
        assert!(opened.lock().unwrap().is_empty());
        assert!(queries.lock().unwrap().is_empty());
    }

    #[test]
    fn browser_mode_limit_caps_domains() {
        let browser = RecordingBrowser::new();
        let opened = browser.opened.clone();
        let ctx = context(FakeWebSearch::new(), FakePageFetcher::new(), browser);

        let opts = JobSearchOptions { limit: Some(1), ..options("Engineer", "") };
        let out = open_in_browser(&ctx, &opts).unwrap();

        assert_eq!(opened.lock().unwrap().len(), 1);
        assert!(out.starts_with("Opened 1 ATS job search tabs"));
        assert!(out.ends_with("Search query: \"Engineer\"\n"));
    }

    #[test]
    fn browser_mode_reports_when_nothing_opened() {
        let ctx = context(FakeWebSearch::new(), FakePageFetcher::new(), RecordingBrowser::failing());
        let out = open_in_browser(&ctx, &options("Engineer", "")).unwrap();
        assert_eq!(out, NO_TABS_OPENED);
    }

    #[test]
    fn invalid_expression_is_an_error() {
        let ctx = context(FakeWebSearch::new(), FakePageFetcher::new(), RecordingBrowser::new());
        let err = preview(&ctx, &options("Engineer", "(robotics || iot")).unwrap_err();
        assert!(matches!(err, AppError::InvalidExpression { .. }));
    }

    #[test]
    fn scrape_collects_validated_postings_sorted() {
        let search = FakeWebSearch::new()
            .with_hits(
                "site:boards.greenhouse.io",
                &[
                    ("Robotics Engineer at zeta", "https://boards.greenhouse.io/zeta/jobs/1?gh_src=x"),
                    ("Careers at acme", "https://boards.greenhouse.io/acme"),
                    ("Controls Engineer at beta", "https://boards.greenhouse.io/beta/jobs/2"),
                ],
            )
            .with_hits(
                "site:jobs.lever.co",
                &[("Perception Engineer - alpha", "https://jobs.lever.co/alpha/abc-123")],
            );
        let fetcher = FakePageFetcher::new()
            .with_page("https://boards.greenhouse.io/zeta/jobs/1", 200, &posting_html("Apply now"))
            .with_page("https://boards.greenhouse.io/beta/jobs/2", 404, "")
            .with_page("https://jobs.lever.co/alpha/abc-123", 200, &posting_html("Great benefits"));
        let queries = search.queries.clone();
        let ctx = context(search, fetcher, RecordingBrowser::new());

        let out = scrape(&ctx, &options("Robotics Engineer", "")).unwrap();

        assert_eq!(
            out,
            "Found 2 job postings for 'Robotics Engineer':\n\
             alpha - Perception Engineer: https://jobs.lever.co/alpha/abc-123\n\
             zeta - Robotics Engineer: https://boards.greenhouse.io/zeta/jobs/1"
        );
        assert_eq!(
            queries.lock().unwrap().as_slice(),
            [
                "site:boards.greenhouse.io \"Robotics Engineer\"",
                "site:jobs.lever.co \"Robotics Engineer\""
            ]
        );
    }

    #[test]
    fn scrape_stops_at_limit() {
        let search = FakeWebSearch::new().with_hits(
            "site:boards.greenhouse.io",
            &[
                ("Engineer One at a", "https://boards.greenhouse.io/a/jobs/1"),
                ("Engineer Two at b", "https://boards.greenhouse.io/b/jobs/2"),
            ],
        );
        let queries = search.queries.clone();
        let ctx = context(search, FakePageFetcher::new(), RecordingBrowser::new());

        let opts = JobSearchOptions { limit: Some(1), ..options("Engineer", "") };
        let out = scrape(&ctx, &opts).unwrap();

        assert!(out.starts_with("Found 1 job postings for 'Engineer':"));
        assert_eq!(queries.lock().unwrap().len(), 1);
    }

    #[test]
    fn scrape_one_per_company_skips_repeat_companies() {
        let search = FakeWebSearch::new().with_hits(
            "site:boards.greenhouse.io",
            &[
                ("Engineer One at acme", "https://boards.greenhouse.io/acme/jobs/1"),
                ("Engineer Two at acme", "https://boards.greenhouse.io/acme/jobs/2"),
            ],
        );
        let ctx = context(search, FakePageFetcher::new(), RecordingBrowser::new());

        let opts = JobSearchOptions { one_per_company: true, ..options("Engineer", "") };
        let out = scrape(&ctx, &opts).unwrap();
        assert!(out.starts_with("Found 1 job postings"));

        let search = FakeWebSearch::new().with_hits(
            "site:boards.greenhouse.io",
            &[
                ("Engineer One at acme", "https://boards.greenhouse.io/acme/jobs/1"),
                ("Engineer Two at acme", "https://boards.greenhouse.io/acme/jobs/2"),
            ],
        );
        let ctx = context(search, FakePageFetcher::new(), RecordingBrowser::new());
        let out = scrape(&ctx, &options("Engineer", "")).unwrap();
        assert!(out.starts_with("Found 2 job postings"));
    }

    #[test]
    fn scrape_skips_failed_domains_and_reports_empty() {
        let search = FakeWebSearch::new()
            .with_failure("site:boards.greenhouse.io", "rate limited")
            .with_failure("site:jobs.lever.co", "rate limited");
        let ctx = context(search, FakePageFetcher::new(), RecordingBrowser::new());

        let opts = JobSearchOptions { backend: Some(SearchBackend::Bing), ..options("Engineer", "remote") };
        let out = scrape(&ctx, &opts).unwrap();
        assert_eq!(
            out,
            "No job postings found for 'Engineer' with expression 'remote' using bing backend"
        );
    }

    #[test]
    fn unreachable_posting_counts_as_valid() {
        let verdict = validate_posting(&FakePageFetcher::new(), "https://jobs.lever.co/a/1");
        assert!(verdict.valid);
    }

    #[test]
    fn listing_page_without_indicators_is_invalid() {
        let fetcher =
            FakePageFetcher::new().with_page("https://jobs.lever.co/a/1", 200, &posting_html("Open roles"));
        assert!(!validate_posting(&fetcher, "https://jobs.lever.co/a/1").valid);
    }
}
