use serde::{Deserialize, Serialize};
use vidu_core::chat::{ChatRole, DEFAULT_CHAT_MODEL, DEFAULT_SYSTEM_PROMPT};
use vidu_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: DbId,
    pub role: ChatRole,
    pub text: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSettings {
    pub model: String,
    /// Whether earlier turns are sent as context.
    pub context: bool,
    pub system_prompt: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_CHAT_MODEL.to_string(),
            context: true,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// DTO for updating chatbot settings. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateChatSettings {
    pub model: Option<String>,
    pub context: Option<bool>,
    pub system_prompt: Option<String>,
}
