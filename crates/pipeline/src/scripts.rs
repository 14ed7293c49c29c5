//! Mock commentary-to-script conversion.

use chrono::Utc;
use vidu_core::generation::{GenerationKey, SCRIPT_CONVERSION_MS};
use vidu_core::project::converted_script;
use vidu_db::models::project::ScriptConversion;
use vidu_db::repositories::ScriptConversionRepo;
use vidu_events::event_types;

use crate::engine::{GenerationEngine, Launch};
use crate::error::PipelineError;

impl GenerationEngine {
    /// Convert a commentary draft into a full script. The returned record is
    /// already `GENERATING`; it turns `COMPLETED` with the converted text once
    /// the mock delay elapses.
    pub async fn convert_script(
        &self,
        content: &str,
    ) -> Result<Launch<ScriptConversion>, PipelineError> {
        if content.trim().is_empty() {
            return Ok(Launch::Skipped("脚本内容为空"));
        }
        let conversion = ScriptConversionRepo::create(&self.store, content).await?;
        let key = GenerationKey::ScriptConversion(conversion.id);
        let ticket = self.registry.begin(key).await?;
        self.emit_started(key);

        let engine = self.clone();
        let conversion_id = conversion.id;
        let delay = self.delay(SCRIPT_CONVERSION_MS);
        tokio::spawn(async move {
            let Some(_completion) = engine.wait(&ticket, delay).await else {
                return;
            };
            let generated_at = Utc::now().format("%Y/%m/%d %H:%M:%S").to_string();
            match ScriptConversionRepo::complete(
                &engine.store,
                conversion_id,
                converted_script(&generated_at),
            )
            .await
            {
                Ok(_) => engine.emit(
                    event_types::GENERATION_COMPLETED,
                    ticket.key(),
                    serde_json::json!({}),
                ),
                Err(e) => tracing::error!(error = %e, "Failed to store converted script"),
            }
        });

        Ok(Launch::Started(conversion))
    }
}
