//! Browser chat interface served with axum.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::app::agent::CoachAgent;
use crate::domain::{AppError, HistoryEntry, SystemConfig};

const INDEX_TEMPLATE: &str = include_str!("index.html");

/// State shared across handlers.
#[derive(Clone)]
pub struct WebState {
    agent: Arc<CoachAgent>,
    page: Arc<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct InterfaceInfo {
    pub title: String,
    pub description: String,
    pub examples: Vec<String>,
}

/// Render the chat page for the configured interface.
pub fn render_index(config: &SystemConfig) -> Result<String, AppError> {
    let mut env = Environment::new();
    env.add_template("index.html", INDEX_TEMPLATE).map_err(|e| AppError::Template {
        template: "index.html".to_string(),
        reason: e.to_string(),
    })?;
    let template = env.get_template("index.html").map_err(|e| AppError::Template {
        template: "index.html".to_string(),
        reason: e.to_string(),
    })?;

    let interface = &config.interface;
    template
        .render(context! {
            title => interface.title,
            description => config.full_description(),
            examples => interface.examples,
            chatbot_height => interface.chatbot_height,
        })
        .map_err(|e| AppError::Template { template: "index.html".to_string(), reason: e.to_string() })
}

/// Create the web router.
pub fn router(agent: Arc<CoachAgent>) -> Result<Router, AppError> {
    let page = render_index(agent.context().config())?;
    let state = WebState { agent, page: Arc::new(page) };

    Ok(Router::new()
        .route("/", get(index))
        .route("/api/chat", post(chat))
        .route("/api/interface", get(interface_info))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http()))
}

/// Bind `host:port` and serve until Ctrl-C.
pub async fn serve(agent: Arc<CoachAgent>, host: &str, port: u16) -> Result<(), AppError> {
    let app = router(agent)?;
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(address = %listener.local_addr()?, "chat interface listening");
    println!("Career coach running at http://{}:{}", host, port);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", err);
    }
    info!("shutting down");
}

async fn index(State(state): State<WebState>) -> Html<String> {
    Html(state.page.as_str().to_string())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn interface_info(State(state): State<WebState>) -> Json<InterfaceInfo> {
    let config = state.agent.context().config();
    Json(InterfaceInfo {
        title: config.interface.title.clone(),
        description: config.full_description(),
        examples: config.interface.examples.clone(),
    })
}

async fn chat(State(state): State<WebState>, Json(body): Json<ChatBody>) -> Response {
    let message = body.message.trim().to_string();
    if message.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Message must not be empty" })))
            .into_response();
    }

    let agent = Arc::clone(&state.agent);
    let history = body.history;
    match tokio::task::spawn_blocking(move || agent.chat_reply(&history, &message)).await {
        Ok(reply) => Json(ChatReply { reply }).into_response(),
        Err(err) => {
            error!("chat worker failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Chat worker failed" })))
                .into_response()
        }
    }
}
