//! Request handlers, one module per resource. Routing lives in
//! [`crate::routes`].

pub mod admin;
pub mod asset;
pub mod auth;
pub mod editor;
pub mod generation;
pub mod master_library;
pub mod project;
pub mod settings;
pub mod video;
pub mod workspace;
pub mod worldview;
