//! Handlers for the global agent settings.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use vidu_core::settings::{validate_model, validate_prompt, ConfigKey, StylePreset, MODEL_OPTIONS};
use vidu_db::models::settings::AgentSettings;
use vidu_db::repositories::AgentSettingsRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAssetManage;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct KeyOptions {
    pub key: ConfigKey,
    pub label: &'static str,
    pub prompt_options: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct SettingsOptions {
    pub models: &'static [&'static str],
    pub keys: Vec<KeyOptions>,
}

#[derive(Debug, Deserialize)]
pub struct PresetRequest {
    pub preset: StylePreset,
}

/// GET /api/v1/settings
pub async fn get(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
) -> AppResult<Json<AgentSettings>> {
    Ok(Json(AgentSettingsRepo::get(&state.pool).await?))
}

/// PUT /api/v1/settings
///
/// Keys left out of the body keep their stored values. Nothing is saved
/// unless every submitted entry is valid.
pub async fn save(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Json(input): Json<AgentSettings>,
) -> AppResult<Json<AgentSettings>> {
    for (key, setting) in &input {
        validate_model(&setting.model)?;
        validate_prompt(*key, &setting.prompt)?;
    }
    Ok(Json(AgentSettingsRepo::save(&state.pool, input).await?))
}

/// GET /api/v1/settings/options
pub async fn options(RequireAssetManage(_user): RequireAssetManage) -> Json<SettingsOptions> {
    let keys = ConfigKey::ALL
        .iter()
        .map(|key| KeyOptions {
            key: *key,
            label: key.label(),
            prompt_options: key.prompt_options(),
        })
        .collect();
    Json(SettingsOptions {
        models: MODEL_OPTIONS,
        keys,
    })
}

/// POST /api/v1/settings/preset
///
/// Switch every key's prompt to the preset's pick; models and switches are
/// kept.
pub async fn apply_preset(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Json(input): Json<PresetRequest>,
) -> AppResult<Json<AgentSettings>> {
    let mut settings = AgentSettingsRepo::get(&state.pool).await?;
    for (key, setting) in settings.iter_mut() {
        setting.prompt = input.preset.prompt_for(*key).to_string();
    }
    tracing::info!(preset = input.preset.label(), "Applied style preset");
    Ok(Json(AgentSettingsRepo::save(&state.pool, settings).await?))
}
