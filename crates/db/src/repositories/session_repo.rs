//! Repository for login sessions, keyed by access-token id.

use chrono::Utc;
use vidu_core::types::{DbId, Timestamp};

use crate::models::session::Session;
use crate::{DbError, Store};

/// Provides operations for login sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Register a session for `user_id` under the token id `jti`.
    ///
    /// Sessions whose token has already expired are dropped here, so the
    /// table only holds sessions that could still authenticate.
    pub async fn create(
        store: &Store,
        jti: &str,
        user_id: DbId,
        expires_at: Timestamp,
    ) -> Result<(), DbError> {
        let now = Utc::now();
        let mut t = store.write().await;
        t.sessions.retain(|_, session| session.is_live(now));
        t.sessions.insert(jti.to_string(), Session { user_id, expires_at });
        Ok(())
    }

    /// Whether `jti` is an unexpired session of `user_id`.
    pub async fn is_active(store: &Store, jti: &str, user_id: DbId) -> Result<bool, DbError> {
        let now = Utc::now();
        Ok(store
            .read()
            .await
            .sessions
            .get(jti)
            .is_some_and(|s| s.user_id == user_id && s.is_live(now)))
    }

    /// Revoke a single session. Returns `true` if it was active.
    pub async fn revoke(store: &Store, jti: &str) -> Result<bool, DbError> {
        Ok(store.write().await.sessions.remove(jti).is_some())
    }

    /// Revoke every session of a user. Returns the count of revoked sessions.
    pub async fn revoke_all_for_user(store: &Store, user_id: DbId) -> Result<usize, DbError> {
        let mut t = store.write().await;
        let before = t.sessions.len();
        t.sessions.retain(|_, session| session.user_id != user_id);
        Ok(before - t.sessions.len())
    }

    /// Drop every expired session. Returns the count removed.
    pub async fn purge_expired(store: &Store) -> Result<usize, DbError> {
        let now = Utc::now();
        let mut t = store.write().await;
        let before = t.sessions.len();
        t.sessions.retain(|_, session| session.is_live(now));
        Ok(before - t.sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::create_store;

    fn in_an_hour() -> Timestamp {
        Utc::now() + Duration::hours(1)
    }

    #[tokio::test]
    async fn revoked_session_is_inactive() {
        let store = create_store();
        SessionRepo::create(&store, "a", 1, in_an_hour()).await.unwrap();
        SessionRepo::create(&store, "b", 1, in_an_hour()).await.unwrap();
        SessionRepo::create(&store, "c", 2, in_an_hour()).await.unwrap();
        assert!(SessionRepo::is_active(&store, "a", 1).await.unwrap());
        assert!(!SessionRepo::is_active(&store, "a", 2).await.unwrap());
        assert!(SessionRepo::revoke(&store, "a").await.unwrap());
        assert!(!SessionRepo::is_active(&store, "a", 1).await.unwrap());
        assert_eq!(SessionRepo::revoke_all_for_user(&store, 1).await.unwrap(), 1);
        assert!(SessionRepo::is_active(&store, "c", 2).await.unwrap());
    }

    #[tokio::test]
    async fn expired_sessions_are_inactive_and_dropped_on_login() {
        let store = create_store();
        let past = Utc::now() - Duration::minutes(1);
        SessionRepo::create(&store, "old", 1, past).await.unwrap();
        assert!(!SessionRepo::is_active(&store, "old", 1).await.unwrap());
        assert_eq!(store.read().await.sessions.len(), 1);

        SessionRepo::create(&store, "new", 1, in_an_hour()).await.unwrap();
        let t = store.read().await;
        assert!(!t.sessions.contains_key("old"));
        assert!(t.sessions.contains_key("new"));
    }

    #[tokio::test]
    async fn purge_removes_only_expired_sessions() {
        let store = create_store();
        SessionRepo::create(&store, "live", 1, in_an_hour()).await.unwrap();
        store.write().await.sessions.insert(
            "stale".into(),
            Session {
                user_id: 2,
                expires_at: Utc::now() - Duration::seconds(1),
            },
        );
        assert_eq!(SessionRepo::purge_expired(&store).await.unwrap(), 1);
        assert!(SessionRepo::is_active(&store, "live", 1).await.unwrap());
    }
}
