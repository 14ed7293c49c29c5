//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&Store` as the first argument.

pub mod asset_repo;
pub mod chat_repo;
pub mod episode_repo;
pub mod master_library_repo;
pub mod project_repo;
pub mod prompt_repo;
pub mod role_repo;
pub mod session_repo;
pub mod settings_repo;
pub mod timeline_repo;
pub mod user_repo;
pub mod workspace_repo;
pub mod worldview_repo;

pub use asset_repo::AssetRepo;
pub use chat_repo::ChatRepo;
pub use episode_repo::{EpisodeRepo, GenerationErrorRepo};
pub use master_library_repo::MasterLibraryRepo;
pub use project_repo::{ProjectRepo, ScriptConversionRepo};
pub use prompt_repo::{PromptConfigRepo, PromptTypeRepo, TemplateRepo};
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use settings_repo::{AgentSettingsRepo, VideoSettingsRepo};
pub use timeline_repo::TimelineRepo;
pub use user_repo::UserRepo;
pub use workspace_repo::WorkspaceRepo;
pub use worldview_repo::WorldviewRepo;
