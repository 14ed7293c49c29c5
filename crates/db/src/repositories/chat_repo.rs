//! Repository for the back-office chatbot.

use chrono::Utc;
use vidu_core::chat::ChatRole;

use crate::models::chat::{ChatMessage, ChatSettings, UpdateChatSettings};
use crate::{DbError, Store};

pub struct ChatRepo;

impl ChatRepo {
    pub async fn messages(store: &Store) -> Result<Vec<ChatMessage>, DbError> {
        Ok(store.read().await.chat_messages.clone())
    }

    pub async fn append(store: &Store, role: ChatRole, text: &str) -> Result<ChatMessage, DbError> {
        let message = ChatMessage {
            id: store.next_id(),
            role,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        store.write().await.chat_messages.push(message.clone());
        Ok(message)
    }

    pub async fn settings(store: &Store) -> Result<ChatSettings, DbError> {
        Ok(store.read().await.chat_settings.clone())
    }

    pub async fn update_settings(
        store: &Store,
        input: &UpdateChatSettings,
    ) -> Result<ChatSettings, DbError> {
        let mut t = store.write().await;
        let settings = &mut t.chat_settings;
        if let Some(model) = &input.model {
            settings.model = model.clone();
        }
        if let Some(context) = input.context {
            settings.context = context;
        }
        if let Some(system_prompt) = &input.system_prompt {
            settings.system_prompt = system_prompt.clone();
        }
        Ok(settings.clone())
    }
}
