//! Function tools the hosted model may call during a conversation.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{info, warn};

use crate::app::AppContext;
use crate::app::commands::job_search::{self, JobSearchOptions};
use crate::domain::{AppError, SearchBackend, ToolCall, retrieve_context};
use crate::ports::ToolDefinition;

pub const RETRIEVE_CONTEXT: &str = "retrieve_context";
pub const BROWSER_SEARCH_JOBS: &str = "browser_search_jobs";
pub const SEARCH_JOBS: &str = "search_jobs";

pub const ALL_TOOLS: [&str; 3] = [RETRIEVE_CONTEXT, BROWSER_SEARCH_JOBS, SEARCH_JOBS];

#[derive(Debug, Deserialize)]
struct RetrieveContextArgs {
    query: String,
}

#[derive(Debug, Deserialize)]
struct JobSearchArgs {
    title: String,
    #[serde(default)]
    expression: Option<String>,
    #[serde(default)]
    backend: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

impl JobSearchArgs {
    fn into_options(self) -> Result<JobSearchOptions, AppError> {
        let backend = match self.backend.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => Some(name.parse::<SearchBackend>()?),
        };
        Ok(JobSearchOptions {
            title: self.title,
            expression: self.expression,
            backend,
            limit: self.limit,
            one_per_company: false,
        })
    }
}

/// Definitions for the named tools. Unknown names are a configuration error.
pub fn definitions(enabled: &[String]) -> Result<Vec<ToolDefinition>, AppError> {
    enabled
        .iter()
        .map(|name| {
            definition(name.trim()).ok_or_else(|| {
                AppError::config_error(format!(
                    "Unknown tool '{}' in agent.tools; available: {}",
                    name,
                    ALL_TOOLS.join(", ")
                ))
            })
        })
        .collect()
}

fn definition(name: &str) -> Option<ToolDefinition> {
    match name {
        RETRIEVE_CONTEXT => Some(ToolDefinition {
            name: RETRIEVE_CONTEXT.to_string(),
            description: "Search the user's professional documents (resume, LinkedIn, summary) \
                          and return the most relevant passages."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to look for, e.g. 'robotics experience'."
                    }
                },
                "required": ["query"]
            }),
        }),
        BROWSER_SEARCH_JOBS => Some(ToolDefinition {
            name: BROWSER_SEARCH_JOBS.to_string(),
            description: "Open ATS job searches (Greenhouse, Lever) in the user's default \
                          browser. Returns which platforms were opened."
                .to_string(),
            parameters: job_search_schema(),
        }),
        SEARCH_JOBS => Some(ToolDefinition {
            name: SEARCH_JOBS.to_string(),
            description: "Search ATS job boards and return validated postings as \
                          'Company - Job Title: URL' lines."
                .to_string(),
            parameters: job_search_schema(),
        }),
        _ => None,
    }
}

fn job_search_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "title": {
                "type": "string",
                "description": "Standardized, concise job title (3-5 words), e.g. 'Senior Software Engineer'."
            },
            "expression": {
                "type": "string",
                "description": "Boolean filter that does not repeat the title. && = AND, || = OR, \
                                leading - = NOT, parentheses group. Example: \
                                '(robotics || iot) && -simulation && remote'."
            },
            "backend": {
                "type": "string",
                "enum": ["google", "bing", "yahoo"],
                "description": "Query syntax to compile for. Defaults to google."
            },
            "limit": {
                "type": "integer",
                "minimum": 1,
                "description": "Only set when the user asks for a specific number of results."
            }
        },
        "required": ["title"]
    })
}

/// Run a tool call and return its text result. Failures become error text.
pub fn execute(ctx: &AppContext, call: &ToolCall) -> String {
    info!(tool = %call.name, arguments = %call.arguments, "executing tool");
    match dispatch(ctx, call) {
        Ok(output) => output,
        Err(err) => {
            warn!(tool = %call.name, "tool failed: {}", err);
            format!("Error: {}", err)
        }
    }
}

fn dispatch(ctx: &AppContext, call: &ToolCall) -> Result<String, AppError> {
    match call.name.as_str() {
        RETRIEVE_CONTEXT => {
            let args: RetrieveContextArgs = parse_args(call)?;
            let docs = &ctx.config().documents;
            Ok(retrieve_context(
                &args.query,
                ctx.documents(),
                docs.chunk_size,
                docs.chunk_overlap,
                docs.max_results,
            ))
        }
        BROWSER_SEARCH_JOBS => {
            let args: JobSearchArgs = parse_args(call)?;
            job_search::open_in_browser(ctx, &args.into_options()?)
        }
        SEARCH_JOBS => {
            let args: JobSearchArgs = parse_args(call)?;
            job_search::scrape(ctx, &args.into_options()?)
        }
        other => Err(AppError::ToolError {
            name: other.to_string(),
            reason: "unknown tool".to_string(),
        }),
    }
}

fn parse_args<T: DeserializeOwned>(call: &ToolCall) -> Result<T, AppError> {
    let raw = if call.arguments.trim().is_empty() { "{}" } else { call.arguments.as_str() };
    serde_json::from_str(raw).map_err(|e| AppError::ToolError {
        name: call.name.clone(),
        reason: format!("invalid arguments: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        FakePageFetcher, FakeWebSearch, RecordingBrowser, fake_context, sample_documents,
        test_config,
    };

    fn call(name: &str, arguments: &str) -> ToolCall {
        ToolCall { id: "call_1".into(), name: name.into(), arguments: arguments.into() }
    }

    #[test]
    fn definitions_follow_enabled_order() {
        let enabled = vec![SEARCH_JOBS.to_string(), RETRIEVE_CONTEXT.to_string()];
        let defs = definitions(&enabled).unwrap();
        let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec![SEARCH_JOBS, RETRIEVE_CONTEXT]);
        assert_eq!(defs[1].parameters["required"], json!(["query"]));
    }

    #[test]
    fn unknown_configured_tool_is_rejected() {
        let err = definitions(&["web_browse".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Unknown tool 'web_browse'"));
    }

    #[test]
    fn retrieve_context_searches_documents() {
        let out = execute(&fake_context(), &call(RETRIEVE_CONTEXT, r#"{"query":"robotics"}"#));
        assert_eq!(out, "[resume] Senior software engineer with robotics experience at Acme.");
    }

    #[test]
    fn browser_search_opens_tabs() {
        let browser = RecordingBrowser::new();
        let opened = browser.opened.clone();
        let ctx = AppContext::new(
            test_config(),
            sample_documents(),
            Box::new(FakeWebSearch::new()),
            Box::new(FakePageFetcher::new()),
            Box::new(browser),
        );

        let out = execute(
            &ctx,
            &call(BROWSER_SEARCH_JOBS, r#"{"title":"Robotics Engineer","backend":"Bing","limit":1}"#),
        );
        assert!(out.starts_with("Opened 1 ATS job search tabs"), "{}", out);
        assert!(out.contains("Search query: \"Robotics Engineer\""));
        assert_eq!(opened.lock().unwrap().len(), 1);
    }

    #[test]
    fn malformed_arguments_become_error_text() {
        let out = execute(&fake_context(), &call(SEARCH_JOBS, r#"{"expression":"remote"}"#));
        assert!(out.starts_with("Error: Tool 'search_jobs' failed: invalid arguments"), "{}", out);
    }

    #[test]
    fn bad_backend_becomes_error_text() {
        let out = execute(&fake_context(), &call(SEARCH_JOBS, r#"{"title":"x","backend":"ask"}"#));
        assert!(out.contains("Unknown search backend 'ask'"), "{}", out);
    }

    #[test]
    fn unknown_tool_becomes_error_text() {
        let out = execute(&fake_context(), &call("launch_rockets", "{}"));
        assert_eq!(out, "Error: Tool 'launch_rockets' failed: unknown tool");
    }
}
