//! Tracks which generations are in flight.
//!
//! Every start hands out a [`Ticket`]. A completion may only be applied by
//! the ticket that is still registered for its key, so a cancelled or
//! superseded run can never overwrite newer state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use vidu_core::error::CoreError;
use vidu_core::generation::GenerationKey;

/// Proof of one registered generation.
#[derive(Debug)]
pub struct Ticket {
    key: GenerationKey,
    id: u64,
    token: CancellationToken,
}

impl Ticket {
    pub fn key(&self) -> GenerationKey {
        self.key
    }

    /// Monotonically increasing across the registry.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Resolves once the generation is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

#[derive(Debug)]
struct Entry {
    ticket: u64,
    token: CancellationToken,
    /// Batch that scheduled this record, if any.
    parent: Option<GenerationKey>,
}

/// Exclusive right to apply one generation's result. Deregisters the key
/// and unlocks the registry on drop.
///
/// The registry stays locked while this is held, so the holder must not
/// call back into the registry.
pub struct Completion<'a> {
    entries: MutexGuard<'a, HashMap<GenerationKey, Entry>>,
    key: GenerationKey,
}

impl Drop for Completion<'_> {
    fn drop(&mut self) {
        self.entries.remove(&self.key);
    }
}

#[derive(Debug, Default)]
pub struct InFlightRegistry {
    entries: Mutex<HashMap<GenerationKey, Entry>>,
    next_ticket: AtomicU64,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(
        &self,
        entries: &mut HashMap<GenerationKey, Entry>,
        key: GenerationKey,
        token: CancellationToken,
        parent: Option<GenerationKey>,
    ) -> Ticket {
        let id = self.next_ticket.fetch_add(1, Ordering::Relaxed) + 1;
        entries.insert(
            key,
            Entry {
                ticket: id,
                token: token.clone(),
                parent,
            },
        );
        Ticket { key, id, token }
    }

    /// Register a single generation. Fails with a conflict if `key` is
    /// already in flight.
    pub async fn begin(&self, key: GenerationKey) -> Result<Ticket, CoreError> {
        let mut entries = self.entries.lock().await;
        if entries.contains_key(&key) {
            return Err(CoreError::Conflict(format!("{key} is already generating")));
        }
        Ok(self.issue(&mut entries, key, CancellationToken::new(), None))
    }

    /// Register a batch and one ticket per record not already in flight.
    /// Fails with a conflict if the batch itself is in flight. Record
    /// tickets are returned in input order, skipping busy records.
    pub async fn begin_batch(
        &self,
        batch: GenerationKey,
        records: &[GenerationKey],
    ) -> Result<(Ticket, Vec<Ticket>), CoreError> {
        let mut entries = self.entries.lock().await;
        if entries.contains_key(&batch) {
            return Err(CoreError::Conflict(format!("{batch} is already running")));
        }
        let batch_ticket = self.issue(&mut entries, batch, CancellationToken::new(), None);
        let mut tickets = Vec::with_capacity(records.len());
        for key in records {
            if entries.contains_key(key) {
                continue;
            }
            let token = batch_ticket.token.child_token();
            tickets.push(self.issue(&mut entries, *key, token, Some(batch)));
        }
        Ok((batch_ticket, tickets))
    }

    /// Take the right to apply a finished generation's result. Returns
    /// `None` when the ticket is no longer the registered one (cancelled or
    /// superseded), in which case the result must be discarded.
    ///
    /// The returned [`Completion`] keeps the registry locked and the key
    /// registered until it is dropped: no cancel or new start can slip in
    /// between the ownership check and the result write.
    pub async fn complete(&self, ticket: &Ticket) -> Option<Completion<'_>> {
        let entries = self.entries.lock().await;
        match entries.get(&ticket.key) {
            Some(entry) if entry.ticket == ticket.id => Some(Completion {
                entries,
                key: ticket.key,
            }),
            _ => None,
        }
    }

    /// Deregister a finished generation that has no result to write.
    /// Returns `false` when the ticket was cancelled or superseded.
    pub async fn finish(&self, ticket: &Ticket) -> bool {
        self.complete(ticket).await.is_some()
    }

    /// Cancel `key` and every record scheduled by it. Returns the keys that
    /// were cancelled.
    pub async fn cancel(&self, key: GenerationKey) -> Vec<GenerationKey> {
        let mut entries = self.entries.lock().await;
        let mut keys: Vec<GenerationKey> = entries
            .iter()
            .filter(|(_, entry)| entry.parent == Some(key))
            .map(|(k, _)| *k)
            .collect();
        if entries.contains_key(&key) {
            keys.push(key);
        }
        for k in &keys {
            if let Some(entry) = entries.remove(k) {
                entry.token.cancel();
            }
        }
        keys
    }

    /// Cancel everything in flight.
    pub async fn cancel_all(&self) -> Vec<GenerationKey> {
        let mut entries = self.entries.lock().await;
        entries
            .drain()
            .map(|(key, entry)| {
                entry.token.cancel();
                key
            })
            .collect()
    }

    pub async fn contains(&self, key: GenerationKey) -> bool {
        self.entries.lock().await.contains_key(&key)
    }

    pub async fn keys(&self) -> Vec<GenerationKey> {
        self.entries.lock().await.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn second_start_conflicts() {
        let registry = InFlightRegistry::new();
        let _ticket = registry.begin(GenerationKey::Shot(1)).await.unwrap();
        assert_matches!(
            registry.begin(GenerationKey::Shot(1)).await,
            Err(CoreError::Conflict(_))
        );
        assert!(registry.begin(GenerationKey::Shot(2)).await.is_ok());
    }

    #[tokio::test]
    async fn stale_ticket_cannot_finish() {
        let registry = InFlightRegistry::new();
        let old = registry.begin(GenerationKey::Shot(1)).await.unwrap();
        registry.cancel(GenerationKey::Shot(1)).await;
        let new = registry.begin(GenerationKey::Shot(1)).await.unwrap();
        assert!(new.id() > old.id());
        assert!(!registry.finish(&old).await);
        assert!(registry.finish(&new).await);
        assert!(!registry.contains(GenerationKey::Shot(1)).await);
    }

    #[tokio::test]
    async fn batch_skips_busy_records() {
        let registry = InFlightRegistry::new();
        let _busy = registry.begin(GenerationKey::Shot(2)).await.unwrap();
        let records = [GenerationKey::Shot(1), GenerationKey::Shot(2), GenerationKey::Shot(3)];
        let (_batch, tickets) = registry
            .begin_batch(GenerationKey::EpisodeBatch(9), &records)
            .await
            .unwrap();
        let keys: Vec<_> = tickets.iter().map(Ticket::key).collect();
        assert_eq!(keys, vec![GenerationKey::Shot(1), GenerationKey::Shot(3)]);

        let again = registry.begin_batch(GenerationKey::EpisodeBatch(9), &records).await;
        assert_matches!(again, Err(CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn cancelling_batch_cancels_its_records() {
        let registry = InFlightRegistry::new();
        let _other = registry.begin(GenerationKey::Shot(7)).await.unwrap();
        let (_batch, tickets) = registry
            .begin_batch(GenerationKey::EpisodeBatch(1), &[GenerationKey::Shot(1)])
            .await
            .unwrap();
        let mut cancelled = registry.cancel(GenerationKey::EpisodeBatch(1)).await;
        cancelled.sort_by_key(|k| k.to_string());
        assert_eq!(
            cancelled,
            vec![GenerationKey::EpisodeBatch(1), GenerationKey::Shot(1)]
        );
        tickets[0].cancelled().await;
        assert_eq!(registry.keys().await, vec![GenerationKey::Shot(7)]);
    }

    #[tokio::test]
    async fn cancel_all_empties_registry() {
        let registry = InFlightRegistry::new();
        let ticket = registry.begin(GenerationKey::ChatReply).await.unwrap();
        registry.begin(GenerationKey::ExtractAssets).await.unwrap();
        assert_eq!(registry.cancel_all().await.len(), 2);
        ticket.cancelled().await;
        assert!(registry.keys().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn key_stays_owned_until_result_is_written() {
        use std::time::Duration;
        use tokio::time::timeout;

        let registry = InFlightRegistry::new();
        let ticket = registry.begin(GenerationKey::Shot(1)).await.unwrap();
        let completion = registry.complete(&ticket).await.expect("ticket is current");

        // Neither a restart nor a cancel can run while the result is written.
        let restart = timeout(Duration::from_millis(10), registry.begin(GenerationKey::Shot(1)));
        assert!(restart.await.is_err());
        let cancel = timeout(Duration::from_millis(10), registry.cancel(GenerationKey::Shot(1)));
        assert!(cancel.await.is_err());

        drop(completion);
        assert!(!registry.contains(GenerationKey::Shot(1)).await);
        assert!(registry.complete(&ticket).await.is_none());
        assert!(registry.begin(GenerationKey::Shot(1)).await.is_ok());
    }
}
