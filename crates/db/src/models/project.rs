//! Project entity, script conversions, and DTOs.

use serde::{Deserialize, Serialize};
use vidu_core::project::ScriptType;
use vidu_core::status::GenerationStatus;
use vidu_core::types::{DbId, Timestamp};

/// A studio project.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub script_type: ScriptType,
    pub script_content: String,
    pub created_at: Timestamp,
    pub last_modified: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub script_type: ScriptType,
    pub script_content: String,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub script_type: Option<ScriptType>,
    pub script_content: Option<String>,
}

/// A mock commentary-to-script conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptConversion {
    pub id: DbId,
    pub source_content: String,
    pub status: GenerationStatus,
    /// Present once the conversion completed.
    pub result: Option<String>,
    /// Set when a project was created from this conversion.
    pub project_id: Option<DbId>,
    pub created_at: Timestamp,
}
