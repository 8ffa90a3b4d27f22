//! Explanation gateway
//!
//! Stateless proxy turning an elevation/rainfall pair into a natural-language
//! flood-risk explanation. One chat-completion call per request: no retries,
//! no caching, no timeout beyond the HTTP client default.

use async_trait::async_trait;
use axum::http::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::GatewayError;

pub const DEFAULT_CHAT_URL: &str = "https://api.together.xyz/v1/chat/completions";
pub const DEFAULT_CHAT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";

pub const SYSTEM_PROMPT: &str = "You are a hydrology expert.";
pub const NO_EXPLANATION: &str = "No explanation generated.";

/// Body accepted by `/explain-flood-risk`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ExplainRequest {
    pub elevation: f64,
    pub rainfall: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessageContent>,
}

#[derive(Debug, Deserialize)]
struct ChatMessageContent {
    content: Option<String>,
}

/// Upstream chat-completion endpoint.
///
/// Returns the decoded JSON body; transport and decode failures are
/// [`GatewayError::Upstream`].
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<serde_json::Value, GatewayError>;
}

/// OpenAI-compatible chat-completion endpoint over HTTP
pub struct HttpChatClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpChatClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ChatCompletion for HttpChatClient {
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<serde_json::Value, GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(e.to_string()))?;

        // Error bodies are still decoded; they carry no choices and yield the fallback text
        if !response.status().is_success() {
            warn!("Chat completion returned status: {}", response.status());
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Upstream(e.to_string()))
    }
}

/// Two-message hydrology prompt for a reading
pub fn build_messages(elevation: f64, rainfall: f64) -> Vec<ChatMessage> {
    let prompt = format!(
        "You are a hydrology expert. Analyze the following:\n\n\
         Elevation: {} meters\n\
         Rainfall: {} mm\n\n\
         Using step-by-step reasoning, assess the flood risk in this area.\n",
        elevation, rainfall
    );

    vec![
        ChatMessage::new("system", SYSTEM_PROMPT),
        ChatMessage::new("user", prompt),
    ]
}

/// First completion's text, or the fallback when absent, empty or malformed
pub fn extract_explanation(body: serde_json::Value) -> String {
    serde_json::from_value::<ChatCompletionResponse>(body)
        .ok()
        .and_then(|r| r.choices.into_iter().next())
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_EXPLANATION.to_string())
}

pub struct ExplanationGateway {
    api_key: Option<String>,
    model: String,
    backend: Arc<dyn ChatCompletion>,
}

impl ExplanationGateway {
    pub fn new(api_key: Option<String>, model: impl Into<String>, backend: Arc<dyn ChatCompletion>) -> Self {
        Self {
            api_key,
            model: model.into(),
            backend,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask the upstream model to explain the flood risk for one reading
    pub async fn request_explanation(&self, elevation: f64, rainfall: f64) -> Result<String, GatewayError> {
        let api_key = self.api_key.as_deref().ok_or(GatewayError::Configuration)?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: build_messages(elevation, rainfall),
        };

        debug!(elevation, rainfall, model = %self.model, "requesting explanation");
        let body = self.backend.complete(api_key, &request).await.map_err(|e| {
            warn!("Explanation request failed: {}", e);
            e
        })?;

        let explanation = extract_explanation(body);
        info!("Explanation received ({} chars)", explanation.chars().count());
        Ok(explanation)
    }

    /// Boundary entry point: method check, credential check, body decode, then one upstream call
    pub async fn handle(&self, method: &Method, body: &[u8]) -> Result<String, GatewayError> {
        if *method != Method::POST {
            return Err(GatewayError::MethodNotAllowed);
        }
        if !self.has_credential() {
            return Err(GatewayError::Configuration);
        }

        let request: ExplainRequest =
            serde_json::from_slice(body).map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;

        self.request_explanation(request.elevation, request.rainfall).await
    }
}
