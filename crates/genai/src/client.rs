//! REST client for the Gemini `generateContent` endpoint.
//!
//! Without an API key every call answers with canned data, so the studio
//! works fully offline.

use serde::{Deserialize, Serialize};
use vidu_core::asset::AssetType;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const ANALYSIS_MODEL: &str = "gemini-3-flash-preview";
pub const PROMPT_MODEL: &str = "gemini-3-pro-preview";
const PROMPT_THINKING_BUDGET: u32 = 1024;

/// An asset found in a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedAsset {
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub description: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GenAiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generative API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected model output: {0}")]
    Parse(String),
}

/// Assets returned when no API key is configured.
pub fn canned_assets() -> Vec<ExtractedAsset> {
    vec![
        ExtractedAsset {
            name: "赛博朋克城市".to_string(),
            asset_type: AssetType::Scene,
            description: "霓虹闪烁的雨夜街道".to_string(),
        },
        ExtractedAsset {
            name: "侦探罗伊".to_string(),
            asset_type: AssetType::Character,
            description: "身穿风衣的硬汉派侦探".to_string(),
        },
        ExtractedAsset {
            name: "激光手枪".to_string(),
            asset_type: AssetType::Prop,
            description: "旧型号的军用激光手枪".to_string(),
        },
    ]
}

/// Image prompt used when no API key is configured.
pub fn canned_image_prompt(description: &str) -> String {
    format!("High fidelity render of {description}, 8k, cinematic lighting")
}

// -- response shape --

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Concatenated text of the first candidate, if any.
fn response_text(body: serde_json::Value) -> Result<Option<String>, GenAiError> {
    let parsed: GenerateResponse =
        serde_json::from_value(body).map_err(|e| GenAiError::Parse(e.to_string()))?;
    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    Ok((!text.is_empty()).then_some(text))
}

fn parse_assets(text: &str) -> Result<Vec<ExtractedAsset>, GenAiError> {
    serde_json::from_str(text).map_err(|e| GenAiError::Parse(e.to_string()))
}

/// Client for script analysis and image-prompt suggestion.
#[derive(Clone)]
pub struct GenAiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl GenAiClient {
    /// `api_key: None` puts the client in offline mode.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn is_offline(&self) -> bool {
        self.api_key.is_none()
    }

    /// Extract characters, scenes, and props from a script.
    pub async fn analyze_script(&self, script: &str) -> Result<Vec<ExtractedAsset>, GenAiError> {
        let Some(key) = &self.api_key else {
            tracing::warn!("No generative API key configured, returning canned assets");
            return Ok(canned_assets());
        };
        let body = serde_json::json!({
            "contents": [{
                "parts": [{
                    "text": format!(
                        "分析以下剧本并提取关键资产（角色 Character、场景 Scene、道具 Prop）。请用中文返回 JSON。\n\n剧本: {script}"
                    )
                }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "name": { "type": "STRING" },
                            "type": { "type": "STRING", "enum": ["CHARACTER", "SCENE", "PROP", "WORLD"] },
                            "description": { "type": "STRING" }
                        }
                    }
                }
            }
        });
        let response = self.generate(ANALYSIS_MODEL, key, &body).await?;
        match response_text(response)? {
            Some(text) => parse_assets(&text),
            None => Ok(Vec::new()),
        }
    }

    /// Suggest an English image prompt for a description. Never fails:
    /// API errors fall back to the description itself.
    pub async fn generate_image_prompt(&self, description: &str) -> String {
        let Some(key) = &self.api_key else {
            return canned_image_prompt(description);
        };
        let body = serde_json::json!({
            "contents": [{
                "parts": [{
                    "text": format!("为以下描述创建详细的图像生成提示词（英文 Prompt）: {description}")
                }]
            }],
            "generationConfig": {
                "thinkingConfig": { "thinkingBudget": PROMPT_THINKING_BUDGET }
            }
        });
        let result = match self.generate(PROMPT_MODEL, key, &body).await {
            Ok(response) => response_text(response),
            Err(e) => Err(e),
        };
        match result {
            Ok(text) => text.unwrap_or_default(),
            Err(e) => {
                tracing::error!(error = %e, "Image prompt generation failed");
                description.to_string()
            }
        }
    }

    // ---- private helpers ----

    async fn generate(
        &self,
        model: &str,
        key: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, GenAiError> {
        let response = self
            .client
            .post(format!("{}/v1beta/models/{model}:generateContent", self.base_url))
            .header("x-goog-api-key", key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenAiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_analysis_returns_canned_assets() {
        let client = GenAiClient::new(None);
        assert!(client.is_offline());
        let assets = client.analyze_script("任何剧本").await.unwrap();
        assert_eq!(assets.len(), 3);
        assert_eq!(assets[1].name, "侦探罗伊");
        assert_eq!(assets[1].asset_type, AssetType::Character);
    }

    #[tokio::test]
    async fn offline_prompt_uses_template() {
        let client = GenAiClient::new(Some("   ".into()));
        let prompt = client.generate_image_prompt("a red door").await;
        assert_eq!(prompt, "High fidelity render of a red door, 8k, cinematic lighting");
    }

    #[tokio::test]
    async fn unreachable_api_falls_back_to_description() {
        let client = GenAiClient::new(Some("key".into())).with_base_url("http://127.0.0.1:1");
        let prompt = client.generate_image_prompt("a red door").await;
        assert_eq!(prompt, "a red door");
    }

    #[test]
    fn first_candidate_text_is_joined() {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "[{\"name\":\"城\"," }, { "text": "\"type\":\"SCENE\",\"description\":\"d\"}]" }] } }]
        });
        let text = response_text(body).unwrap().unwrap();
        let assets = parse_assets(&text).unwrap();
        assert_eq!(assets[0].asset_type, AssetType::Scene);
    }

    #[test]
    fn empty_candidates_yield_no_text() {
        assert!(response_text(serde_json::json!({})).unwrap().is_none());
    }

    #[test]
    fn malformed_assets_are_parse_errors() {
        assert!(matches!(parse_assets("not json"), Err(GenAiError::Parse(_))));
    }
}
