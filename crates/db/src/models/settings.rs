//! Global agent settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vidu_core::settings::{ConfigKey, DEFAULT_MODEL, DEFAULT_PROMPT};

/// Model, prompt, and on/off switch of one agent step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSetting {
    pub model: String,
    pub prompt: String,
    pub enabled: bool,
}

impl Default for AgentSetting {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            enabled: true,
        }
    }
}

/// Settings for every [`ConfigKey`].
pub type AgentSettings = BTreeMap<ConfigKey, AgentSetting>;

pub fn default_agent_settings() -> AgentSettings {
    ConfigKey::ALL
        .iter()
        .map(|key| (*key, AgentSetting::default()))
        .collect()
}
