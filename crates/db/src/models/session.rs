//! Login session model.

use vidu_core::types::{DbId, Timestamp};

/// A session opened by a login and closed by logout, deactivation, or
/// token expiry.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: DbId,
    /// Expiry of the access token that carries this session.
    pub expires_at: Timestamp,
}

impl Session {
    pub fn is_live(&self, now: Timestamp) -> bool {
        self.expires_at > now
    }
}
