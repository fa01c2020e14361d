use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agent::AgentKind;
use crate::error::ApiError;

use super::AppState;

// ============================================================================
// Agent Endpoints (vestigial proxy to the opaque agent capability)
// ============================================================================

fn default_agent_type() -> String {
    "chat".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default = "default_agent_type")]
    pub agent_type: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub agent_type: String,
    pub capabilities: Vec<String>,
    pub metadata: serde_json::Map<String, Value>,
    pub error: Option<String>,
}

fn default_max_results() -> u32 {
    5
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub summary: String,
    pub search_results: Option<Value>,
    pub sources_count: u64,
    pub error: Option<String>,
}

/// How many tool runs backed the summary, as reported by the agent.
fn sources_count(metadata: &serde_json::Map<String, Value>) -> u64 {
    metadata
        .get("tool_run_count")
        .or_else(|| metadata.get("tools_used"))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

pub async fn chat(
    state: web::Data<AppState>,
    body: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let kind: AgentKind = body.agent_type.parse()?;

    let agent = state.agents.get_or_create(kind).await;
    let reply = agent.execute(&body.message, false).await;
    state.metrics.record_agent_request(kind.as_str(), reply.success);

    Ok(HttpResponse::Ok().json(ChatResponse {
        success: reply.success,
        response: reply.content,
        agent_type: kind.as_str().to_string(),
        capabilities: agent.capabilities(),
        metadata: reply.metadata,
        error: reply.error,
    }))
}

pub async fn search(
    state: web::Data<AppState>,
    body: web::Json<SearchRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let agent = state.agents.get_or_create(AgentKind::Search).await;

    let prompt = format!(
        "Search for information about: {}. \
         Provide a comprehensive summary with key findings, \
         drawing on at most {} sources.",
        body.query, body.max_results
    );
    let reply = agent.execute(&prompt, true).await;
    state
        .metrics
        .record_agent_request(AgentKind::Search.as_str(), reply.success);

    let response = if reply.success {
        SearchResponse {
            success: true,
            query: body.query,
            summary: reply.content,
            sources_count: sources_count(&reply.metadata),
            search_results: Some(Value::Object(reply.metadata)),
            error: None,
        }
    } else {
        SearchResponse {
            success: false,
            query: body.query,
            summary: String::new(),
            search_results: None,
            sources_count: 0,
            error: reply.error,
        }
    };

    Ok(HttpResponse::Ok().json(response))
}

pub async fn capabilities(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let search_agent = state.agents.get_or_create(AgentKind::Search).await;
    let chat_agent = state.agents.get_or_create(AgentKind::Chat).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "capabilities": {
            "search_agent": search_agent.capabilities(),
            "chat_agent": chat_agent.capabilities(),
        }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_count_prefers_tool_run_count() {
        let mut metadata = serde_json::Map::new();
        metadata.insert("tools_used".to_string(), Value::from(2u64));
        assert_eq!(sources_count(&metadata), 2);

        metadata.insert("tool_run_count".to_string(), Value::from(7u64));
        assert_eq!(sources_count(&metadata), 7);

        assert_eq!(sources_count(&serde_json::Map::new()), 0);
    }
}
