pub mod asset;
pub mod chat;
pub mod episode;
pub mod master_library;
pub mod project;
pub mod prompt;
pub mod session;
pub mod settings;
pub mod timeline;
pub mod user;
pub mod workspace;
