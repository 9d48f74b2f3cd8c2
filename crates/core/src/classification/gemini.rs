//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use jam3ya_shared::config::ClassifierConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::ClassifierError;
use super::prompt::{build_prompt, parse_category_response};
use super::{CategoryClassifier, ProductListing};

/// Longest error body kept in [`ClassifierError::Api`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: String },
    Inline { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

fn request_body<'a>(listing: &'a ProductListing, candidates: &[String]) -> GenerateRequest<'a> {
    let mut parts = vec![Part::Text {
        text: build_prompt(listing, candidates),
    }];
    if !listing.image.is_empty() {
        parts.push(Part::Inline {
            inline_data: InlineData {
                mime_type: &listing.mime_type,
                data: STANDARD.encode(&listing.image),
            },
        });
    }
    GenerateRequest {
        contents: vec![Content { parts }],
    }
}

/// Classifier backed by the Gemini REST API.
#[derive(Clone)]
pub struct GeminiClassifier {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClassifier {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` without an API key, or `Http` if the client cannot be built.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ClassifierError::NotConfigured)?
            .to_string();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl CategoryClassifier for GeminiClassifier {
    #[instrument(skip_all, fields(title = %listing.title, model = %self.model))]
    async fn classify(
        &self,
        listing: &ProductListing,
        candidates: &[String],
    ) -> Result<String, ClassifierError> {
        if candidates.is_empty() {
            return Err(ClassifierError::NoCandidates);
        }

        let res = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(listing, candidates))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let mut body = res.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let response: GenerateResponse = res.json().await?;
        let text = response
            .text()
            .ok_or_else(|| ClassifierError::MalformedResponse("empty answer".into()))?;
        debug!(answer = %text.trim(), "classifier answered");

        parse_category_response(&text, candidates)
    }
}
