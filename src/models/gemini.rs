use anyhow::{Context as _, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::ChatSession;
use super::types::{SessionConfig, TurnRole};
use crate::utils::SafeSpaceError;

/// Chat session against the Gemini `generateContent` REST API.
///
/// The REST API is stateless, so the session carries the turn history and
/// replays it on every call.
pub struct GeminiSession {
    client: Client,
    endpoint: String,
    api_key: String,
    config: SessionConfig,
    history: Vec<Content>,
}

impl GeminiSession {
    /// Create a new session. No request is made until the first send.
    pub fn new(endpoint: &str, api_key: String, config: SessionConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("safespace/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            config,
            history: Vec::new(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.config.model
        )
    }

    fn build_request<'a>(&'a self, turn: &'a Content) -> GenerateContentRequest<'a> {
        let mut contents: Vec<&Content> = self.history.iter().collect();
        contents.push(turn);

        GenerateContentRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: self.config.system_prompt.clone(),
                }],
            },
            contents,
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                top_k: self.config.top_k,
            },
        }
    }

    /// Number of turns the session is carrying
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

#[async_trait]
impl ChatSession for GeminiSession {
    async fn send(&mut self, text: &str) -> Result<Option<String>> {
        let turn = Content::new(TurnRole::User, text);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_request(&turn))
            .send()
            .await
            .map_err(SafeSpaceError::from)
            .with_context(|| format!("Failed to reach {}", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SafeSpaceError::ApiError {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to decode generateContent response")?;
        // A turn without reply text is not replayable; the API rejects empty parts
        let Some(reply) = parsed.reply_text() else {
            return Ok(None);
        };

        self.history.push(turn);
        self.history.push(Content::new(TurnRole::Model, &reply));

        Ok(Some(reply))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Wire structures for the generateContent API

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: SystemInstruction,
    contents: Vec<&'a Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    role: TurnRole,
    parts: Vec<Part>,
}

impl Content {
    fn new(role: TurnRole, text: &str) -> Self {
        Self {
            role,
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any
    fn reply_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
