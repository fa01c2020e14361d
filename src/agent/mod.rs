use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::ApiError;

// ============================================================================
// Agent Capability
// ============================================================================
//
// The chat/search endpoints proxy to an opaque agent backend. The backend
// itself lives outside this service; everything here is the seam: the
// `Agent` trait, the reply shape, and an owned registry with get-or-create
// semantics (one agent instance per kind, created under the registry lock
// so concurrent first requests cannot race two instances into existence).
// ============================================================================

#[derive(Debug, Clone)]
pub struct AgentReply {
    pub success: bool,
    pub content: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub error: Option<String>,
}

impl AgentReply {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            content: String::new(),
            metadata: serde_json::Map::new(),
            error: Some(message.into()),
        }
    }
}

#[async_trait]
pub trait Agent: Send + Sync {
    async fn execute(&self, prompt: &str, use_tools: bool) -> AgentReply;

    fn capabilities(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Chat,
    Search,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Chat => "chat",
            AgentKind::Search => "search",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(AgentKind::Chat),
            "search" => Ok(AgentKind::Search),
            other => Err(ApiError::UnknownAgent(other.to_string())),
        }
    }
}

pub type AgentFactory = Box<dyn Fn(AgentKind) -> Arc<dyn Agent> + Send + Sync>;

/// Process-owned agent registry, passed to request handlers. Replaces a
/// shared mutable map with mutex-guarded get-or-create.
pub struct AgentRegistry {
    factory: AgentFactory,
    agents: Mutex<HashMap<AgentKind, Arc<dyn Agent>>>,
}

impl AgentRegistry {
    pub fn new(factory: AgentFactory) -> Self {
        Self {
            factory,
            agents: Mutex::new(HashMap::new()),
        }
    }

    /// One agent per kind for the life of the process; the first request
    /// creates it, later requests reuse it.
    pub async fn get_or_create(&self, kind: AgentKind) -> Arc<dyn Agent> {
        let mut agents = self.agents.lock().await;
        agents
            .entry(kind)
            .or_insert_with(|| (self.factory)(kind))
            .clone()
    }
}

/// Stand-in agent used when no backend is wired up: reports failure instead
/// of pretending to answer.
pub struct UnconfiguredAgent {
    kind: AgentKind,
}

impl UnconfiguredAgent {
    pub fn new(kind: AgentKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl Agent for UnconfiguredAgent {
    async fn execute(&self, _prompt: &str, _use_tools: bool) -> AgentReply {
        AgentReply::failure(format!(
            "no agent backend configured for '{}'",
            self.kind
        ))
    }

    fn capabilities(&self) -> Vec<String> {
        Vec::new()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
