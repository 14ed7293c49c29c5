//! Repository for back-office accounts.

use chrono::Utc;
use vidu_core::types::DbId;
use vidu_core::users::UserStatus;

use crate::models::user::{CreateUser, UpdateUser, UserAccount};
use crate::{DbError, Store, Tables};

const USERNAME_CONSTRAINT: &str = "users_username_key";

fn username_taken(t: &Tables, username: &str, except: Option<DbId>) -> bool {
    t.users
        .iter()
        .any(|u| Some(u.id) != except && u.username.eq_ignore_ascii_case(username))
}

/// Provides CRUD operations for accounts.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new active account. Usernames are unique, ignoring case.
    pub async fn create(store: &Store, input: &CreateUser) -> Result<UserAccount, DbError> {
        let mut t = store.write().await;
        if username_taken(&t, &input.username, None) {
            return Err(DbError::UniqueViolation { constraint: USERNAME_CONSTRAINT });
        }
        let user = UserAccount {
            id: store.next_id(),
            username: input.username.clone(),
            email: input.email.clone(),
            role_id: input.role_id.clone(),
            permissions: Vec::new(),
            status: UserStatus::Active,
            last_login: None,
            password_hash: input.password_hash.clone(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    pub async fn find_by_id(store: &Store, id: DbId) -> Result<Option<UserAccount>, DbError> {
        Ok(store.read().await.users.iter().find(|u| u.id == id).cloned())
    }

    /// Case-insensitive username lookup.
    pub async fn find_by_username(
        store: &Store,
        username: &str,
    ) -> Result<Option<UserAccount>, DbError> {
        Ok(store
            .read()
            .await
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    pub async fn list(store: &Store) -> Result<Vec<UserAccount>, DbError> {
        Ok(store.read().await.users.clone())
    }

    pub async fn update(
        store: &Store,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<UserAccount>, DbError> {
        let mut t = store.write().await;
        if let Some(username) = &input.username {
            if username_taken(&t, username, Some(id)) {
                return Err(DbError::UniqueViolation { constraint: USERNAME_CONSTRAINT });
            }
        }
        let Some(user) = t.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(username) = &input.username {
            user.username = username.clone();
        }
        if let Some(email) = &input.email {
            user.email = email.clone();
        }
        if let Some(role_id) = &input.role_id {
            user.role_id = role_id.clone();
        }
        Ok(Some(user.clone()))
    }

    /// Delete an account and drop its sessions.
    pub async fn delete(store: &Store, id: DbId) -> Result<bool, DbError> {
        let mut t = store.write().await;
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        let removed = t.users.len() < before;
        if removed {
            t.sessions.retain(|_, session| session.user_id != id);
        }
        Ok(removed)
    }

    /// Deactivating an account also drops its sessions.
    pub async fn set_status(
        store: &Store,
        id: DbId,
        status: UserStatus,
    ) -> Result<Option<UserAccount>, DbError> {
        let mut t = store.write().await;
        let Some(user) = t.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.status = status;
        let user = user.clone();
        if status == UserStatus::Inactive {
            t.sessions.retain(|_, session| session.user_id != id);
        }
        Ok(Some(user))
    }

    /// Replace the extra permissions of an account.
    pub async fn set_permissions(
        store: &Store,
        id: DbId,
        permissions: Vec<String>,
    ) -> Result<Option<UserAccount>, DbError> {
        let mut t = store.write().await;
        let Some(user) = t.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.permissions = permissions;
        Ok(Some(user.clone()))
    }

    pub async fn record_login(store: &Store, id: DbId) -> Result<(), DbError> {
        let mut t = store.write().await;
        if let Some(user) = t.users.iter_mut().find(|u| u.id == id) {
            user.last_login = Some(Utc::now());
        }
        Ok(())
    }
}
