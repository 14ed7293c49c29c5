//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer
//!   token backed by a live session.
//! - [`rbac`] -- One extractor per permission (`RequireAssetManage`,
//!   `RequireVideoGen`, ...), each rejecting users without it.

pub mod auth;
pub mod rbac;
