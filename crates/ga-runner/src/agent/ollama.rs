//! Ollama review backend.
//!
//! Talks to a local or remote Ollama server over its HTTP API. Both the
//! `/api/generate` (schema-constrained) and `/api/chat` endpoints are
//! supported; the backend is chosen once per invocation.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use ga_core::{ReviewAgent, ReviewContext, ReviewError, ReviewResult};

use super::parse::parse_review_response;
use super::prompt::{build_review_prompt, system_prompt};
use super::AgentFactory;

pub const DEFAULT_HOST: &str = "http://localhost:11434";

const TAGS_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Generate,
    Chat,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generate => f.write_str("generate"),
            Self::Chat => f.write_str("chat"),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generate" => Ok(Self::Generate),
            "chat" => Ok(Self::Chat),
            other => Err(format!("unknown backend '{other}' (expected generate or chat)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub host: String,
    pub backend: Backend,
    pub temperature: f64,
    pub max_tokens: u32,
    pub num_ctx: u32,
    pub request_timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            backend: Backend::Generate,
            temperature: 0.2,
            max_tokens: 4096,
            num_ctx: 16_384,
            request_timeout: Duration::from_secs(300),
        }
    }
}

#[derive(Serialize)]
struct Options {
    temperature: f64,
    num_ctx: u32,
    num_predict: u32,
    repeat_penalty: f64,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    format: serde_json::Value,
    think: bool,
    options: Options,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    format: serde_json::Value,
    options: Options,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}

/// Thin HTTP client over the Ollama API, shared by every model's agent.
pub struct OllamaClient {
    http: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self, ReviewError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ReviewError::Backend(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/{endpoint}", self.config.host.trim_end_matches('/'))
    }

    fn options(&self) -> Options {
        Options {
            temperature: self.config.temperature,
            num_ctx: self.config.num_ctx,
            num_predict: self.config.max_tokens,
            repeat_penalty: 1.1,
        }
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<reqwest::Response, ReviewError> {
        let resp = self
            .http
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Network failure with Ollama: {e}");
                ReviewError::Backend(format!("Error connecting to Ollama: {e}"))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ReviewError::Backend(format!(
                "Ollama returned {status}: {body}"
            )));
        }
        Ok(resp)
    }

    pub async fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, ReviewError> {
        let request = GenerateRequest {
            model,
            prompt,
            system,
            stream: false,
            format: ReviewResult::json_schema(),
            think: false,
            options: self.options(),
        };
        let resp: GenerateResponse = self
            .post("generate", &request)
            .await?
            .json()
            .await
            .map_err(|e| ReviewError::MalformedResponse(format!("invalid response from Ollama: {e}")))?;
        Ok(resp.response)
    }

    pub async fn chat(&self, model: &str, prompt: &str, system: &str) -> Result<String, ReviewError> {
        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            stream: false,
            format: ReviewResult::json_schema(),
            options: self.options(),
        };
        let resp: ChatResponse = self
            .post("chat", &request)
            .await?
            .json()
            .await
            .map_err(|e| ReviewError::MalformedResponse(format!("invalid response from Ollama: {e}")))?;
        Ok(resp.message.content)
    }

    pub async fn is_available(&self) -> bool {
        match self.http.get(self.url("tags")).timeout(TAGS_TIMEOUT).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    pub async fn list_models(&self) -> Result<Vec<String>, ReviewError> {
        let resp = self
            .http
            .get(self.url("tags"))
            .timeout(TAGS_TIMEOUT)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ReviewError::Backend(format!("Error connecting to Ollama: {e}")))?;
        let tags: TagsResponse = resp
            .json()
            .await
            .map_err(|e| ReviewError::MalformedResponse(e.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

/// [`ReviewAgent`] backed by one Ollama model.
pub struct OllamaReviewAgent {
    client: Arc<OllamaClient>,
    model: String,
}

impl OllamaReviewAgent {
    pub fn new(client: Arc<OllamaClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl ReviewAgent for OllamaReviewAgent {
    fn model(&self) -> &str {
        &self.model
    }

    async fn review(&self, context: &ReviewContext, user_note: &str) -> Result<ReviewResult, ReviewError> {
        debug!(model = %self.model, "Reviewing {} files...", context.files_changed().len());
        let prompt = build_review_prompt(context, user_note);
        let system = system_prompt();

        let raw = match self.client.config().backend {
            Backend::Generate => self.client.generate(&self.model, &prompt, &system).await?,
            Backend::Chat => self.client.chat(&self.model, &prompt, &system).await?,
        };
        debug!(model = %self.model, bytes = raw.len(), "Parsing LLM response...");

        let mut review = parse_review_response(&raw)?;
        review.files_reviewed = context.files_changed().len();
        review.languages_detected = context.languages();
        Ok(review)
    }
}

/// Hands out one [`OllamaReviewAgent`] per model, all sharing one client.
pub struct OllamaAgentFactory {
    client: Arc<OllamaClient>,
}

impl OllamaAgentFactory {
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

impl AgentFactory for OllamaAgentFactory {
    fn build(&self, model: &str) -> Result<Arc<dyn ReviewAgent>, ReviewError> {
        if model.trim().is_empty() {
            return Err(ReviewError::Backend("empty model name".to_string()));
        }
        Ok(Arc::new(OllamaReviewAgent::new(self.client.clone(), model)))
    }
}
