//! HTTP client for the Gemini `generateContent` endpoint.

use async_trait::async_trait;
use founderval_core::{AnalysisResult, IdeaSubmission, validate_analysis};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::prompt::{SYSTEM_PROMPT, build_user_prompt};
use crate::schema::response_schema;
use crate::{AnalysisError, IdeaAnalyzer};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    /// Scheme and host, e.g. `https://generativelanguage.googleapis.com`.
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

// ── Wire types ──

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
    temperature: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u64>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if it has any.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

// ── Client ──

/// Gemini-backed [`IdeaAnalyzer`].
///
/// One request per analysis. No retry and no explicit timeout: the
/// transport's defaults apply. A blank API key is reported by
/// [`analyze`](IdeaAnalyzer::analyze) as [`AnalysisError::MissingApiKey`]
/// before any request is made.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(mut config: GeminiConfig) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }
}

#[async_trait]
impl IdeaAnalyzer for GeminiClient {
    async fn analyze(&self, submission: &IdeaSubmission) -> Result<AnalysisResult, AnalysisError> {
        if self.config.api_key.trim().is_empty() {
            return Err(AnalysisError::MissingApiKey);
        }
        let user_prompt = build_user_prompt(submission);
        let request = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_PROMPT,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: &user_prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
                temperature: self.config.temperature,
            },
        };

        let url = self.endpoint();
        info!(model = %self.config.model, title = %submission.title, "requesting analysis");
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalysisError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let response: GenerateResponse = resp.json().await?;
        let text = response.text().ok_or(AnalysisError::EmptyResponse)?;
        let analysis = parse_analysis(&text)?;
        let tokens = response
            .usage_metadata
            .and_then(|u| u.total_token_count)
            .unwrap_or(0);
        info!(tokens, verdict = %analysis.investment_verdict, "analysis received");
        Ok(analysis)
    }
}

/// Parse model output into an analysis and report contract departures.
///
/// Only JSON shape is enforced here. Out-of-range scores or a projection
/// with the wrong number of years are logged and passed through.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, AnalysisError> {
    let analysis: AnalysisResult = serde_json::from_str(text.trim()).inspect_err(|e| {
        let preview: String = text.chars().take(200).collect();
        warn!(error = %e, raw = %preview, "model returned unparseable analysis");
    })?;
    for violation in validate_analysis(&analysis) {
        warn!(%violation, "analysis departs from response schema");
    }
    Ok(analysis)
}
