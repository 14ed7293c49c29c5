//! Shared query parameter types for API handlers.

use serde::Deserialize;
use vidu_core::error::CoreError;

/// `?confirm=true` on destructive endpoints.
///
/// The studio asks before deleting anything; the API mirrors that by
/// refusing destructive calls that do not carry the confirmation flag.
#[derive(Debug, Deserialize, Default)]
pub struct ConfirmParams {
    #[serde(default)]
    pub confirm: bool,
}

impl ConfirmParams {
    pub fn require(&self) -> Result<(), CoreError> {
        if !self.confirm {
            return Err(CoreError::Validation(
                "This action cannot be undone; repeat it with confirm=true".to_string(),
            ));
        }
        Ok(())
    }
}

/// `?q=` search term.
#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}
