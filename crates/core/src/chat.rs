//! Back-office chatbot: roles, canned texts, and default settings.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

pub const GREETING: &str = "你好！我是 AI 助手，有什么可以帮你的吗？";
pub const MOCK_REPLY: &str = "这是一个模拟回复。AI 正在思考...";

pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

pub fn validate_message(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation("Message must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_message_rejected() {
        assert!(validate_message(" \n").is_err());
        assert!(validate_message("hi").is_ok());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChatRole::Model).unwrap(), "\"model\"");
    }
}
