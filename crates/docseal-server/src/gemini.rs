//! Gemini chat assistant passthrough

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::GeminiConfig;
use crate::error::UpstreamError;

/// Fixed instructions sent ahead of every user prompt
pub const SYSTEM_PROMPT: &str = "You are an expert assistant for a digital document \
signing and verification service. An administrator signs a document and a user later \
verifies that signature; verification succeeds if the signature is valid and fails \
otherwise. Help with questions about digital signatures, hashing, key pairs, \
verification methods, relevant libraries and troubleshooting. When asked for code, \
give secure and efficient snippets; when asked about concepts, explain them simply. \
Keep the response to 3 lines. Do not ask questions, give accurate answers.";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Chat completion backend
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn ask(&self, system_prompt: &str, user_prompt: &str) -> Result<String, UpstreamError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// Google Generative Language API client
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl Assistant for GeminiClient {
    async fn ask(&self, system_prompt: &str, user_prompt: &str) -> Result<String, UpstreamError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: format!("{} {}", system_prompt, user_prompt),
                }],
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(UpstreamError::MissingField("candidates"))
    }
}
