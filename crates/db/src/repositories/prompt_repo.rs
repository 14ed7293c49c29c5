//! Repositories for prompt configurations, prompt types, and templates.

use vidu_core::catalog::CUSTOM_TEMPLATE_DESCRIPTION;
use vidu_core::error::CoreError;
use vidu_core::types::DbId;

use crate::models::prompt::{
    ConfigItem, CreateConfigItem, PromptType, TemplateConfig, UpdateConfigItem,
    UpdateTemplateSetting,
};
use crate::{DbError, Store, Tables};

// ---------------------------------------------------------------------------
// Prompt configurations
// ---------------------------------------------------------------------------

pub struct PromptConfigRepo;

impl PromptConfigRepo {
    /// All configurations, optionally restricted to one filter code.
    pub async fn list(store: &Store, code: Option<&str>) -> Result<Vec<ConfigItem>, DbError> {
        Ok(store
            .read()
            .await
            .prompt_configs
            .iter()
            .filter(|c| code.map_or(true, |code| c.code == code))
            .cloned()
            .collect())
    }

    pub async fn find_by_id(store: &Store, id: &str) -> Result<Option<ConfigItem>, DbError> {
        Ok(store
            .read()
            .await
            .prompt_configs
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    pub async fn create(store: &Store, input: &CreateConfigItem) -> Result<ConfigItem, DbError> {
        let item = ConfigItem {
            id: format!("conf_{}", store.next_id()),
            name: input.name.clone(),
            code: input.code.clone(),
            type_label: input.type_label.clone(),
            provider: input.provider,
            model: input.model.clone(),
            thinking: input.thinking,
        };
        store.write().await.prompt_configs.push(item.clone());
        Ok(item)
    }

    pub async fn update(
        store: &Store,
        id: &str,
        input: &UpdateConfigItem,
    ) -> Result<Option<ConfigItem>, DbError> {
        let mut t = store.write().await;
        let Some(item) = t.prompt_configs.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            item.name = name.clone();
        }
        if let Some(code) = &input.code {
            item.code = code.clone();
        }
        if let Some(type_label) = &input.type_label {
            item.type_label = type_label.clone();
        }
        if let Some(provider) = input.provider {
            item.provider = provider;
        }
        if let Some(model) = &input.model {
            item.model = model.clone();
        }
        if let Some(thinking) = input.thinking {
            item.thinking = thinking;
        }
        Ok(Some(item.clone()))
    }

    pub async fn delete(store: &Store, id: &str) -> Result<bool, DbError> {
        let mut t = store.write().await;
        let before = t.prompt_configs.len();
        t.prompt_configs.retain(|c| c.id != id);
        Ok(t.prompt_configs.len() < before)
    }
}

// ---------------------------------------------------------------------------
// Prompt types
// ---------------------------------------------------------------------------

pub struct PromptTypeRepo;

impl PromptTypeRepo {
    pub async fn list(store: &Store) -> Result<Vec<PromptType>, DbError> {
        Ok(store.read().await.prompt_types.clone())
    }

    /// Flip the enabled flag.
    pub async fn toggle(store: &Store, id: DbId) -> Result<Option<PromptType>, DbError> {
        let mut t = store.write().await;
        let Some(prompt_type) = t.prompt_types.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        prompt_type.enabled = !prompt_type.enabled;
        Ok(Some(prompt_type.clone()))
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

fn current_template(t: &Tables) -> Result<&TemplateConfig, DbError> {
    t.templates
        .iter()
        .find(|tpl| tpl.id == t.current_template_id)
        .or_else(|| t.templates.first())
        .ok_or_else(|| CoreError::Internal("template list is empty".to_string()).into())
}

/// Provides operations for configuration templates. Exactly one template is
/// current at any time and the list is never empty.
pub struct TemplateRepo;

impl TemplateRepo {
    pub async fn list(store: &Store) -> Result<Vec<TemplateConfig>, DbError> {
        Ok(store.read().await.templates.clone())
    }

    pub async fn current(store: &Store) -> Result<TemplateConfig, DbError> {
        let t = store.read().await;
        current_template(&t).cloned()
    }

    /// Make a template current. Returns `None` for an unknown id.
    pub async fn select(store: &Store, id: &str) -> Result<Option<TemplateConfig>, DbError> {
        let mut t = store.write().await;
        let Some(template) = t.templates.iter().find(|tpl| tpl.id == id).cloned() else {
            return Ok(None);
        };
        t.current_template_id = template.id.clone();
        Ok(Some(template))
    }

    /// Copy the current template's settings into a new custom template,
    /// which becomes current.
    pub async fn create(store: &Store, name: &str) -> Result<TemplateConfig, DbError> {
        let id = format!("tpl_{}", store.next_id());
        let mut t = store.write().await;
        let settings = current_template(&t)?.settings.clone();
        let template = TemplateConfig {
            id: id.clone(),
            name: name.to_string(),
            description: CUSTOM_TEMPLATE_DESCRIPTION.to_string(),
            settings,
        };
        t.templates.push(template.clone());
        t.current_template_id = id;
        Ok(template)
    }

    /// Change one slot of the current template.
    pub async fn update_setting(
        store: &Store,
        key: &str,
        input: &UpdateTemplateSetting,
    ) -> Result<Option<TemplateConfig>, DbError> {
        let mut t = store.write().await;
        let current_id = current_template(&t)?.id.clone();
        let Some(template) = t.templates.iter_mut().find(|tpl| tpl.id == current_id) else {
            return Ok(None);
        };
        let Some(setting) = template.settings.get_mut(key) else {
            return Ok(None);
        };
        if let Some(model) = &input.model {
            setting.model = model.clone();
        }
        if let Some(prompt_id) = &input.prompt_id {
            setting.prompt_id = prompt_id.clone();
        }
        Ok(Some(template.clone()))
    }

    /// Delete a template. The last remaining template cannot be deleted;
    /// deleting the current one makes the first remaining template current.
    pub async fn delete(store: &Store, id: &str) -> Result<bool, DbError> {
        let mut t = store.write().await;
        if !t.templates.iter().any(|tpl| tpl.id == id) {
            return Ok(false);
        }
        if t.templates.len() <= 1 {
            return Err(CoreError::Conflict("至少保留一个模板".to_string()).into());
        }
        t.templates.retain(|tpl| tpl.id != id);
        if t.current_template_id == id {
            let fallback = t.templates.first().map(|tpl| tpl.id.clone());
            if let Some(first) = fallback {
                t.current_template_id = first;
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::prompt::Provider;
    use crate::{create_store, seed_defaults, DbPool};
    use assert_matches::assert_matches;

    async fn seeded() -> DbPool {
        let store = create_store();
        seed_defaults(&store, "hash").await.unwrap();
        store
    }

    #[tokio::test]
    async fn list_filters_by_code() {
        let store = seeded().await;
        let all = PromptConfigRepo::list(&store, None).await.unwrap();
        let scripts = PromptConfigRepo::list(&store, Some("script_analysis")).await.unwrap();
        assert_eq!(all.len(), 18);
        assert_eq!(scripts.len(), 2);
    }

    #[tokio::test]
    async fn config_create_update_delete() {
        let store = seeded().await;
        let input = CreateConfigItem {
            name: "新配置".into(),
            code: "storyboard_gen".into(),
            type_label: "通用".into(),
            provider: Provider::Openai,
            model: "gemini-2.5-flash".into(),
            thinking: false,
        };
        let item = PromptConfigRepo::create(&store, &input).await.unwrap();
        assert!(item.id.starts_with("conf_"));
        let update = UpdateConfigItem { thinking: Some(true), ..Default::default() };
        let updated = PromptConfigRepo::update(&store, &item.id, &update).await.unwrap().unwrap();
        assert!(updated.thinking);
        assert!(PromptConfigRepo::delete(&store, &item.id).await.unwrap());
        assert!(!PromptConfigRepo::delete(&store, &item.id).await.unwrap());
    }

    #[tokio::test]
    async fn prompt_type_toggle_flips() {
        let store = seeded().await;
        let id = PromptTypeRepo::list(&store).await.unwrap()[0].id;
        let toggled = PromptTypeRepo::toggle(&store, id).await.unwrap().unwrap();
        assert!(!toggled.enabled);
    }

    #[tokio::test]
    async fn new_template_copies_current_and_becomes_current() {
        let store = seeded().await;
        TemplateRepo::select(&store, "tpl_real").await.unwrap().unwrap();
        let real = TemplateRepo::current(&store).await.unwrap();
        let custom = TemplateRepo::create(&store, "我的模板").await.unwrap();
        assert_eq!(custom.settings, real.settings);
        assert_eq!(custom.description, "自定义模板");
        assert_eq!(TemplateRepo::current(&store).await.unwrap().id, custom.id);

        // Editing the copy leaves the source untouched.
        let input = UpdateTemplateSetting { model: Some("gemini-flash-lite-latest".into()), prompt_id: None };
        TemplateRepo::update_setting(&store, "script", &input).await.unwrap().unwrap();
        let templates = TemplateRepo::list(&store).await.unwrap();
        let source = templates.iter().find(|t| t.id == "tpl_real").unwrap();
        assert_eq!(source.settings["script"].model, "gemini-3-pro-preview");
    }

    #[tokio::test]
    async fn deleting_current_falls_back_and_last_is_kept() {
        let store = seeded().await;
        assert!(TemplateRepo::delete(&store, "tpl_2d").await.unwrap());
        assert_eq!(TemplateRepo::current(&store).await.unwrap().id, "tpl_real");
        assert!(TemplateRepo::delete(&store, "tpl_real").await.unwrap());
        let last = TemplateRepo::delete(&store, "tpl_3d").await;
        assert_matches!(last, Err(DbError::Core(CoreError::Conflict(_))));
        assert_eq!(TemplateRepo::list(&store).await.unwrap().len(), 1);
    }
}
