//! Repository for roles and their permissions.

use vidu_core::permissions::{toggle_permission, NEW_ROLE_PERMISSIONS};
use vidu_core::users::custom_role_id;

use crate::models::user::Role;
use crate::{DbError, Store};

pub struct RoleRepo;

impl RoleRepo {
    pub async fn list(store: &Store) -> Result<Vec<Role>, DbError> {
        Ok(store.read().await.roles.clone())
    }

    pub async fn find_by_id(store: &Store, id: &str) -> Result<Option<Role>, DbError> {
        Ok(store.read().await.roles.iter().find(|r| r.id == id).cloned())
    }

    /// Create a custom role with the minimal permission set.
    pub async fn create(store: &Store, name: &str) -> Result<Role, DbError> {
        let role = Role {
            id: custom_role_id(store.next_id()),
            name: name.to_string(),
            permissions: NEW_ROLE_PERMISSIONS.iter().map(|p| p.to_string()).collect(),
        };
        store.write().await.roles.push(role.clone());
        Ok(role)
    }

    /// Grant the permission if absent, revoke it otherwise.
    pub async fn toggle_permission(
        store: &Store,
        id: &str,
        permission: &str,
    ) -> Result<Option<Role>, DbError> {
        let mut t = store.write().await;
        let Some(role) = t.roles.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        toggle_permission(&mut role.permissions, permission);
        Ok(Some(role.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_store;
    use vidu_core::permissions::{SYS_VIEW, VIDEO_GEN};

    #[tokio::test]
    async fn new_role_starts_with_view_only() {
        let store = create_store();
        let role = RoleRepo::create(&store, "审核员").await.unwrap();
        assert!(role.id.starts_with("ROLE_"));
        assert_eq!(role.permissions, vec![SYS_VIEW.to_string()]);
    }

    #[tokio::test]
    async fn toggle_grants_then_revokes() {
        let store = create_store();
        let role = RoleRepo::create(&store, "r").await.unwrap();
        let granted = RoleRepo::toggle_permission(&store, &role.id, VIDEO_GEN)
            .await
            .unwrap()
            .unwrap();
        assert!(granted.permissions.iter().any(|p| p == VIDEO_GEN));
        let revoked = RoleRepo::toggle_permission(&store, &role.id, VIDEO_GEN)
            .await
            .unwrap()
            .unwrap();
        assert!(!revoked.permissions.iter().any(|p| p == VIDEO_GEN));
        assert!(RoleRepo::toggle_permission(&store, "NOPE", VIDEO_GEN)
            .await
            .unwrap()
            .is_none());
    }
}
