//! Initial studio contents.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use vidu_core::catalog::{
    DEFAULT_TEMPLATE_ID, SEED_EPISODES, SEED_PROJECTS, SEED_PROMPT_CONFIGS, SEED_PROMPT_TYPES,
    SEED_ROLES, SEED_TEMPLATES, SEED_USERS,
};
use vidu_core::chat::{ChatRole, GREETING};
use vidu_core::permissions::PERMISSIONS;
use vidu_core::types::Timestamp;
use vidu_core::users::UserStatus;

use crate::models::chat::ChatMessage;
use crate::models::episode::Episode;
use crate::models::project::Project;
use crate::models::prompt::{ConfigItem, PromptType, Provider, TemplateConfig, TemplateSetting};
use crate::models::settings::default_agent_settings;
use crate::models::user::{Role, UserAccount};
use crate::{DbError, Store};

fn date(s: &str) -> Timestamp {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
        .unwrap_or_else(Utc::now)
}

fn date_time(s: &str) -> Option<Timestamp> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .ok()
        .map(|dt| Utc.from_utc_datetime(&dt))
}

/// Populate an empty store with the demo studio.
///
/// `admin_password_hash` becomes the password of the seeded `admin`
/// account. Calling this on an already seeded store does nothing.
pub async fn seed_defaults(store: &Store, admin_password_hash: &str) -> Result<(), DbError> {
    let mut t = store.write().await;
    if !t.users.is_empty() {
        return Ok(());
    }

    // Listed newest first.
    t.projects = SEED_PROJECTS
        .iter()
        .map(|p| Project {
            id: store.next_id(),
            name: p.name.to_string(),
            script_type: p.script_type,
            script_content: p.script_content.to_string(),
            created_at: date(p.created_at),
            last_modified: date(p.last_modified),
        })
        .collect();

    t.episodes = SEED_EPISODES
        .iter()
        .map(|name| Episode {
            id: store.next_id(),
            name: name.to_string(),
            script_content: String::new(),
            shots: Vec::new(),
        })
        .collect();

    t.agent_settings = default_agent_settings();

    t.roles = SEED_ROLES
        .iter()
        .map(|r| Role {
            id: r.id.to_string(),
            name: r.name.to_string(),
            permissions: match r.permissions {
                Some(perms) => perms.iter().map(|p| p.to_string()).collect(),
                None => PERMISSIONS.iter().map(|p| p.id.to_string()).collect(),
            },
        })
        .collect();

    t.users = SEED_USERS
        .iter()
        .map(|u| UserAccount {
            id: store.next_id(),
            username: u.username.to_string(),
            email: u.email.to_string(),
            role_id: u.role_id.to_string(),
            permissions: Vec::new(),
            status: if u.active {
                UserStatus::Active
            } else {
                UserStatus::Inactive
            },
            last_login: date_time(u.last_login),
            password_hash: u.has_password.then(|| admin_password_hash.to_string()),
        })
        .collect();

    t.prompt_configs = SEED_PROMPT_CONFIGS
        .iter()
        .map(|c| ConfigItem {
            id: c.id.to_string(),
            name: c.name.to_string(),
            code: c.code.to_string(),
            type_label: c.type_label.to_string(),
            provider: Provider::Gemini,
            model: c.model.to_string(),
            thinking: c.thinking,
        })
        .collect();

    t.prompt_types = SEED_PROMPT_TYPES
        .iter()
        .map(|p| PromptType {
            id: store.next_id(),
            name: p.name.to_string(),
            code: p.code.to_string(),
            description: p.description.to_string(),
            sort: 1,
            enabled: true,
        })
        .collect();

    t.templates = SEED_TEMPLATES
        .iter()
        .map(|tpl| TemplateConfig {
            id: tpl.id.to_string(),
            name: tpl.name.to_string(),
            description: tpl.description.to_string(),
            settings: tpl
                .settings
                .iter()
                .map(|(key, model, prompt_id)| {
                    (
                        key.to_string(),
                        TemplateSetting {
                            model: model.to_string(),
                            prompt_id: prompt_id.to_string(),
                        },
                    )
                })
                .collect::<BTreeMap<_, _>>(),
        })
        .collect();
    t.current_template_id = DEFAULT_TEMPLATE_ID.to_string();

    t.chat_messages = vec![ChatMessage {
        id: store.next_id(),
        role: ChatRole::Model,
        text: GREETING.to_string(),
        created_at: Utc::now(),
    }];

    tracing::info!(
        projects = t.projects.len(),
        users = t.users.len(),
        templates = t.templates.len(),
        "Store seeded"
    );
    Ok(())
}
