//! Gemini-backed risk provider.
//!
//! Sends one `generateContent` request per lookup, asking the model to act
//! as a contact security analyst and answer with JSON matching the
//! `EnrichmentData` shape. The response is best-effort structured data from
//! a black box, so everything is normalized at this boundary before it is
//! handed to callers.

use super::EnrichmentConfig;
use crate::core::RiskProvider;
use crate::models::{ContactType, EnrichmentData, EnrichmentDetails, SecurityStatus};
use crate::utils::{Result, TrackerError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, info};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: EnrichmentConfig,
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

/// Lenient mirror of `EnrichmentData` for parsing model output. Every field
/// the model might mangle is optional or widened here; the echoed contact
/// and type are ignored outright since the query's values always win.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnrichment {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    risk_score: Option<f64>,
    #[serde(default)]
    details: RawDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetails {
    #[serde(default)]
    carrier: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    profile_name: Option<String>,
    #[serde(default)]
    domain_info: Option<String>,
    #[serde(default)]
    is_spam_likely: Option<bool>,
    #[serde(default)]
    last_flagged: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

impl GeminiClient {
    pub fn new(config: EnrichmentConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(TrackerError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(TrackerError::HttpError)?;

        Ok(Self {
            config,
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    fn system_instruction(&self, contact_type: ContactType) -> String {
        format!(
            "You are an intelligent contact security analyst simulating a hybrid \
             database of Twilio Lookup and Clearbit Enrichment APIs.\n\
             Given a {contact_type}, determine if it's likely to be unauthorized, \
             a known spammer, or a legitimate business/personal contact.\n\
             Return a structured JSON object.\n\n\
             If it's a phone number: simulate carrier lookup and risk score.\n\
             If it's an email: simulate profile enrichment and domain reliability.\n\n\
             Include a \"summary\" that explains why the contact is flagged or safe.\n\
             Respond with valid JSON only. No markdown, no explanatory text outside \
             the JSON."
        )
    }

    fn response_schema(&self) -> serde_json::Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "contact": { "type": "STRING" },
                "type": { "type": "STRING" },
                "status": { "type": "STRING", "description": "One of: SAFE, FLAGGED, UNKNOWN" },
                "riskScore": { "type": "NUMBER", "description": "Score from 0 to 100" },
                "details": {
                    "type": "OBJECT",
                    "properties": {
                        "carrier": { "type": "STRING" },
                        "location": { "type": "STRING" },
                        "profileName": { "type": "STRING" },
                        "domainInfo": { "type": "STRING" },
                        "isSpamLikely": { "type": "BOOLEAN" },
                        "lastFlagged": { "type": "STRING" },
                        "summary": { "type": "STRING" }
                    },
                    "required": ["isSpamLikely", "summary"]
                }
            },
            "required": ["contact", "type", "status", "riskScore", "details"]
        })
    }

    async fn send_request(&self, contact: &str, contact_type: ContactType) -> Result<String> {
        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: format!("Analyze the following {contact_type}: {contact}"),
                }],
            }],
            system_instruction: Some(GeminiContent {
                parts: vec![GeminiPart {
                    text: self.system_instruction(contact_type),
                }],
            }),
            generation_config: Some(GeminiGenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
                response_mime_type: "application/json".to_string(),
                response_schema: self.response_schema(),
            }),
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.config.model, self.config.api_key
        );

        debug!(
            "Sending lookup request to {}",
            url.replace(&self.config.api_key, "***")
        );

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(TrackerError::HttpError)?;

        let status = response.status();
        let response_text = response.text().await.map_err(TrackerError::HttpError)?;

        debug!("Enrichment API response status: {}", status);

        if !status.is_success() {
            error!("Enrichment API error: {} - {}", status, response_text);
            return Err(TrackerError::ApiError(format!(
                "HTTP {}: {}",
                status, response_text
            )));
        }

        let gemini_response: GeminiResponse =
            serde_json::from_str(&response_text).map_err(TrackerError::JsonError)?;

        if let Some(usage) = &gemini_response.usage_metadata {
            debug!(
                "Token usage - prompt: {:?}, response: {:?}, total: {:?}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        let candidate = gemini_response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| TrackerError::InvalidResponse("No candidates in response".to_string()))?;

        let part = candidate
            .content
            .parts
            .into_iter()
            .next()
            .ok_or_else(|| TrackerError::InvalidResponse("No parts in candidate".to_string()))?;

        Ok(part.text)
    }

    /// Parse the model's text into normalized enrichment data.
    fn parse_response(
        &self,
        raw: &str,
        contact: &str,
        contact_type: ContactType,
    ) -> Result<EnrichmentData> {
        let json_str = extract_json(raw)?;

        let parsed: RawEnrichment = serde_json::from_str(json_str).map_err(|e| {
            TrackerError::InvalidResponse(format!(
                "Unparseable model output: {} (content: {})",
                e,
                truncate_for_log(json_str, 200)
            ))
        })?;

        Ok(normalize(parsed, contact, contact_type))
    }
}

/// Strip markdown fences and prose wrapping, leaving the outermost JSON
/// object.
fn extract_json(raw: &str) -> Result<&str> {
    let trimmed = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&trimmed[start..=end]),
        _ => Err(TrackerError::InvalidResponse(format!(
            "No JSON object in model output: {}",
            truncate_for_log(trimmed, 200)
        ))),
    }
}

/// Truncate error-message content without splitting a UTF-8 character.
fn truncate_for_log(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Normalize whatever the model returned into a well-formed result. The
/// query's contact string and detected type always win over the echoes in
/// the response.
fn normalize(raw: RawEnrichment, contact: &str, contact_type: ContactType) -> EnrichmentData {
    let status = match raw.status.as_deref().map(str::to_ascii_uppercase) {
        Some(s) if s == "SAFE" => SecurityStatus::Safe,
        Some(s) if s == "FLAGGED" => SecurityStatus::Flagged,
        _ => SecurityStatus::Unknown,
    };

    let risk_score = raw
        .risk_score
        .map(|s| s.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0);

    EnrichmentData {
        contact: contact.to_string(),
        contact_type,
        status,
        risk_score,
        details: EnrichmentDetails {
            carrier: raw.details.carrier,
            location: raw.details.location,
            profile_name: raw.details.profile_name,
            domain_info: raw.details.domain_info,
            is_spam_likely: raw.details.is_spam_likely.unwrap_or(risk_score >= 60),
            last_flagged: raw.details.last_flagged,
            summary: raw
                .details
                .summary
                .unwrap_or_else(|| "No summary provided.".to_string()),
        },
    }
}

#[async_trait]
impl RiskProvider for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini-enrichment"
    }

    async fn lookup(&self, contact: &str, contact_type: ContactType) -> Result<EnrichmentData> {
        info!("Looking up {} as {}", contact, contact_type);

        let raw = self.send_request(contact, contact_type).await?;
        let data = self.parse_response(&raw, contact, contact_type)?;

        info!(
            "Lookup complete: {} scored {}/100",
            contact, data.risk_score
        );

        Ok(data)
    }
}
