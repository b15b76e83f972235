//! # Natural-Language Request Parsing
//!
//! Turns free text like "Onboard Sarah Johnson, Senior Software Engineer..."
//! into an [`OnboardingRequest`] by asking a chat-completion model for strict
//! JSON.
//!
//! The model is trusted to fill gaps with reasonable assumptions; locally we
//! only strip code fences and require well-formed JSON.
//!
//! The completion backend is an explicit dependency ([`CompletionClient`]) so
//! tests and alternative providers can stand in for the hosted API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::LlmConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::OnboardingRequest;

/// Instruction prompt sent with every parse request.
pub const SYSTEM_PROMPT: &str = r#"You are an expert at parsing natural language employee onboarding requests.
Extract employee information and convert it to a structured JSON format.

Expected JSON structure:
{
    "firstName": "string",
    "lastName": "string",
    "email": "string",
    "department": "string",
    "position": "string",
    "startDate": "YYYY-MM-DD",
    "manager": "string (optional)",
    "managerEmail": "string (optional)",
    "companyName": "string (optional)",
    "assets": [
        {
            "category": "string (laptop, monitor, phone, etc.)",
            "specifications": "string (optional)"
        }
    ]
}

If information is missing, make reasonable assumptions based on the role/department.
Always return valid JSON only, no additional text."#;

/// Why a natural-language request could not be turned into a record.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("natural-language parsing unavailable: no completion client configured")]
    Unavailable,

    #[error("completion request failed: {0}")]
    Completion(#[source] ClientError),

    #[error("model output is not a valid onboarding request: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("model output is an empty record")]
    EmptyRecord,
}

/// One chat-completion call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A chat-completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync + std::fmt::Debug {
    /// Return the text of the first choice.
    async fn complete(&self, request: &CompletionRequest) -> ClientResult<String>;
}

/// Groq's OpenAI-compatible chat-completions API.
#[derive(Debug, Clone)]
pub struct GroqCompletionClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
}

impl GroqCompletionClient {
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> ClientResult<Self> {
        let base_url: String = base_url.into();
        Ok(Self {
            http: Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl CompletionClient for GroqCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> ClientResult<String> {
        let body = ChatCompletionBody {
            model: &request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::api_error(status.as_u16(), text));
        }
        debug!(
            "Completion raw response: {}",
            text.chars().take(1000).collect::<String>()
        );

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ClientError::invalid_response("choices[0].message.content", "missing"))
    }
}

/// Remove Markdown code-fence markers the model may wrap its JSON in.
///
/// A leading ```` ```json ```` fence removes every ```` ```json ```` and
/// ```` ``` ```` marker; a bare leading ```` ``` ```` removes every
/// ```` ``` ````. Anything else is only trimmed.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with("```json") {
        trimmed
            .replace("```json", "")
            .replace("```", "")
            .trim()
            .to_string()
    } else if trimmed.starts_with("```") {
        trimmed.replace("```", "").trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parses free-text onboarding requests through a completion backend.
#[derive(Debug, Clone)]
pub struct RequestParser {
    client: Option<Arc<dyn CompletionClient>>,
    llm: LlmConfig,
}

impl RequestParser {
    pub fn new(client: Option<Arc<dyn CompletionClient>>, llm: LlmConfig) -> Self {
        Self { client, llm }
    }

    /// Build a parser backed by Groq when the API key is set, or an
    /// unavailable parser otherwise.
    pub fn from_config(llm: &LlmConfig) -> ClientResult<Self> {
        let client: Option<Arc<dyn CompletionClient>> = match llm.api_key() {
            Some(key) => {
                let groq = GroqCompletionClient::new(&llm.base_url, key)?;
                Some(Arc::new(groq) as Arc<dyn CompletionClient>)
            }
            None => {
                warn!(
                    env = %llm.api_key_env,
                    "API key not set. NLP features will be limited."
                );
                None
            }
        };
        Ok(Self::new(client, llm.clone()))
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    fn completion_request(&self, text: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.llm.model.clone(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: text.to_string(),
            temperature: self.llm.temperature,
            max_tokens: self.llm.max_tokens,
        }
    }

    /// Parse one natural-language request.
    pub async fn parse(&self, text: &str) -> Result<OnboardingRequest, ParseError> {
        let Some(client) = &self.client else {
            error!("Completion client not initialized. Cannot parse natural language.");
            return Err(ParseError::Unavailable);
        };

        info!("Parsing natural language request");
        let answer = client
            .complete(&self.completion_request(text))
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to parse natural language request");
                ParseError::Completion(e)
            })?;

        let json = strip_code_fence(&answer);
        let request: OnboardingRequest = serde_json::from_str(&json).map_err(|e| {
            error!(error = %e, "Model output is not valid JSON");
            ParseError::InvalidJson(e)
        })?;
        if request.is_empty() {
            error!("Model output is an empty record");
            return Err(ParseError::EmptyRecord);
        }
        Ok(request)
    }
}
