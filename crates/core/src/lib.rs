pub mod asset;
pub mod catalog;
pub mod chat;
pub mod diff;
pub mod error;
pub mod generation;
pub mod navigation;
pub mod permissions;
pub mod project;
pub mod settings;
pub mod status;
pub mod storyboard;
pub mod style;
pub mod timeline;
pub mod types;
pub mod users;
