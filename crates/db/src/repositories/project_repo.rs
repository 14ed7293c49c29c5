//! Repository for projects and script conversions.

use chrono::Utc;
use vidu_core::error::CoreError;
use vidu_core::project::ScriptType;
use vidu_core::status::GenerationStatus;
use vidu_core::types::DbId;

use crate::models::project::{CreateProject, Project, ScriptConversion, UpdateProject};
use crate::{DbError, Store};

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project at the head of the list.
    pub async fn create(store: &Store, input: &CreateProject) -> Result<Project, DbError> {
        let now = Utc::now();
        let project = Project {
            id: store.next_id(),
            name: input.name.clone(),
            script_type: input.script_type,
            script_content: input.script_content.clone(),
            created_at: now,
            last_modified: now,
        };
        store.write().await.projects.insert(0, project.clone());
        Ok(project)
    }

    pub async fn find_by_id(store: &Store, id: DbId) -> Result<Option<Project>, DbError> {
        Ok(store.read().await.projects.iter().find(|p| p.id == id).cloned())
    }

    /// List all projects, newest first.
    pub async fn list(store: &Store) -> Result<Vec<Project>, DbError> {
        Ok(store.read().await.projects.clone())
    }

    /// Apply the non-`None` fields of `input` and bump `last_modified`.
    pub async fn update(
        store: &Store,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, DbError> {
        let mut t = store.write().await;
        let Some(project) = t.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            project.name = name.clone();
        }
        if let Some(script_type) = input.script_type {
            project.script_type = script_type;
        }
        if let Some(content) = &input.script_content {
            project.script_content = content.clone();
        }
        project.last_modified = Utc::now();
        Ok(Some(project.clone()))
    }

    /// Delete a project. Clears it as the current project if it was.
    /// Returns `true` if a project was removed.
    pub async fn delete(store: &Store, id: DbId) -> Result<bool, DbError> {
        let mut t = store.write().await;
        let before = t.projects.len();
        t.projects.retain(|p| p.id != id);
        let removed = t.projects.len() < before;
        if removed && t.workspace.current_project_id == Some(id) {
            t.workspace.current_project_id = None;
        }
        Ok(removed)
    }
}

/// Provides operations for mock script conversions.
pub struct ScriptConversionRepo;

impl ScriptConversionRepo {
    /// Record a new conversion, already marked generating.
    pub async fn create(store: &Store, source_content: &str) -> Result<ScriptConversion, DbError> {
        let conversion = ScriptConversion {
            id: store.next_id(),
            source_content: source_content.to_string(),
            status: GenerationStatus::Generating,
            result: None,
            project_id: None,
            created_at: Utc::now(),
        };
        store.write().await.conversions.push(conversion.clone());
        Ok(conversion)
    }

    pub async fn find_by_id(store: &Store, id: DbId) -> Result<Option<ScriptConversion>, DbError> {
        Ok(store.read().await.conversions.iter().find(|c| c.id == id).cloned())
    }

    pub async fn set_status(
        store: &Store,
        id: DbId,
        status: GenerationStatus,
    ) -> Result<Option<ScriptConversion>, DbError> {
        let mut t = store.write().await;
        let Some(conversion) = t.conversions.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        conversion.status = status;
        Ok(Some(conversion.clone()))
    }

    /// Store the converted script and mark the conversion completed.
    pub async fn complete(
        store: &Store,
        id: DbId,
        result: String,
    ) -> Result<Option<ScriptConversion>, DbError> {
        let mut t = store.write().await;
        let Some(conversion) = t.conversions.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        conversion.status = GenerationStatus::Completed;
        conversion.result = Some(result);
        Ok(Some(conversion.clone()))
    }

    /// Create the project from a completed conversion and link the two.
    ///
    /// The completion check, the insert and the link happen under one write
    /// lock, so a conversion yields at most one project however many
    /// requests race for it.
    pub async fn create_project(store: &Store, id: DbId, name: &str) -> Result<Project, DbError> {
        let mut t = store.write().await;
        let conversion = t
            .conversions
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CoreError::NotFound {
                entity: "script_conversion",
                id,
            })?;
        if conversion.project_id.is_some() {
            return Err(CoreError::Conflict(format!(
                "A project was already created from conversion {id}"
            ))
            .into());
        }
        let script = match (conversion.status, &conversion.result) {
            (GenerationStatus::Completed, Some(script)) => script.clone(),
            _ => {
                return Err(CoreError::Validation(format!(
                    "Conversion {id} has not completed yet"
                ))
                .into())
            }
        };

        let now = Utc::now();
        let project = Project {
            id: store.next_id(),
            name: name.to_string(),
            script_type: ScriptType::Commentary,
            script_content: script,
            created_at: now,
            last_modified: now,
        };
        conversion.project_id = Some(project.id);
        t.projects.insert(0, project.clone());
        Ok(project)
    }
}
