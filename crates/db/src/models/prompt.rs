//! Prompt configurations, prompt types, and configuration templates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vidu_core::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provider {
    Gemini,
    Openai,
    Anthropic,
}

/// A named prompt configuration bound to a model.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigItem {
    pub id: String,
    pub name: String,
    /// Filter code matching a template slot, e.g. `script_analysis`.
    pub code: String,
    pub type_label: String,
    pub provider: Provider,
    pub model: String,
    pub thinking: bool,
}

/// DTO for creating a prompt configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConfigItem {
    pub name: String,
    pub code: String,
    pub type_label: String,
    pub provider: Provider,
    pub model: String,
    #[serde(default)]
    pub thinking: bool,
}

/// DTO for updating a prompt configuration. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateConfigItem {
    pub name: Option<String>,
    pub code: Option<String>,
    pub type_label: Option<String>,
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub thinking: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptType {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub description: String,
    pub sort: i32,
    pub enabled: bool,
}

/// Model and prompt configuration of one template slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSetting {
    pub model: String,
    pub prompt_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Keyed by template slot (`script`, `indexProps`, ...).
    pub settings: BTreeMap<String, TemplateSetting>,
}

/// DTO for changing one slot of the current template.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTemplateSetting {
    pub model: Option<String>,
    pub prompt_id: Option<String>,
}
