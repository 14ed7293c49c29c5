//! Mock chatbot reply.

use vidu_core::chat::{validate_message, ChatRole, MOCK_REPLY};
use vidu_core::generation::{GenerationKey, CHAT_REPLY_MS};
use vidu_db::models::chat::ChatMessage;
use vidu_db::repositories::ChatRepo;
use vidu_events::event_types;

use crate::engine::{GenerationEngine, Launch};
use crate::error::PipelineError;

impl GenerationEngine {
    /// Append the user's message and schedule the model reply. One reply
    /// is pending at a time.
    pub async fn send_chat(&self, text: &str) -> Result<Launch<ChatMessage>, PipelineError> {
        validate_message(text)?;
        let ticket = self.registry.begin(GenerationKey::ChatReply).await?;
        let message = ChatRepo::append(&self.store, ChatRole::User, text.trim()).await?;
        self.emit_started(ticket.key());

        let engine = self.clone();
        let delay = self.delay(CHAT_REPLY_MS);
        tokio::spawn(async move {
            let Some(_completion) = engine.wait(&ticket, delay).await else {
                return;
            };
            match ChatRepo::append(&engine.store, ChatRole::Model, MOCK_REPLY).await {
                Ok(reply) => engine.emit(
                    event_types::CHAT_REPLIED,
                    ticket.key(),
                    serde_json::json!({ "message_id": reply.id }),
                ),
                Err(e) => tracing::error!(error = %e, "Failed to store chat reply"),
            }
        });
        Ok(Launch::Started(message))
    }
}

#[cfg(test)]
mod tests {
    use vidu_core::error::CoreError;

    use super::*;
    use crate::outcome::FixedOutcome;
    use crate::test_support::{engine_with, settle};

    #[tokio::test(start_paused = true)]
    async fn reply_follows_user_message() {
        let (engine, store) = engine_with(FixedOutcome::success()).await;
        engine.send_chat("你好").await.unwrap();
        let messages = ChatRepo::messages(&store).await.unwrap();
        assert_eq!(messages.last().unwrap().role, ChatRole::User);

        settle(CHAT_REPLY_MS).await;
        let messages = ChatRepo::messages(&store).await.unwrap();
        let last = messages.last().unwrap();
        assert_eq!(last.role, ChatRole::Model);
        assert_eq!(last.text, "这是一个模拟回复。AI 正在思考...");
    }

    #[tokio::test]
    async fn blank_message_rejected() {
        let (engine, store) = engine_with(FixedOutcome::success()).await;
        let before = ChatRepo::messages(&store).await.unwrap().len();
        assert!(matches!(
            engine.send_chat("   ").await,
            Err(PipelineError::Core(CoreError::Validation(_)))
        ));
        assert_eq!(ChatRepo::messages(&store).await.unwrap().len(), before);
    }
}
