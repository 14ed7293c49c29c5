//! Reconciliation between local asset states and the master library.
//!
//! Every (asset, state) pair is a local candidate identified by
//! `"{asset_id}-{state_id}"`. Master-library items carry the same uid, so a
//! keyed merge of both sides yields one comparison row per uid.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Where a uid exists.
///
/// - `Synced`     -- present locally and in the master library.
/// - `LocalOnly`  -- present only among the local candidates.
/// - `MasterOnly` -- present only in the master library (an orphan).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    Synced,
    LocalOnly,
    MasterOnly,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Synced => "SYNCED",
            Self::LocalOnly => "LOCAL_ONLY",
            Self::MasterOnly => "MASTER_ONLY",
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    #[default]
    UnsyncedFirst,
    SyncedFirst,
}

impl SortOrder {
    /// Higher weight sorts first.
    pub fn weight(&self, status: SyncStatus) -> u8 {
        match (self, status) {
            (Self::UnsyncedFirst, SyncStatus::Synced) => 0,
            (Self::UnsyncedFirst, _) => 2,
            (Self::SyncedFirst, SyncStatus::Synced) => 2,
            (Self::SyncedFirst, _) => 0,
        }
    }
}

/// Master-library uid of a state.
pub fn item_uid(asset_id: DbId, state_id: DbId) -> String {
    format!("{asset_id}-{state_id}")
}

/// Master-library display name of a state.
pub fn item_name(asset_name: &str, state_name: &str) -> String {
    format!("{asset_name} - {state_name}")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow<L, M> {
    pub uid: String,
    pub status: SyncStatus,
    pub local: Option<L>,
    pub master: Option<M>,
}

/// Merge local candidates and master items by uid.
///
/// Rows follow local order, then master-only items in library order; the
/// sort is stable within a weight.
pub fn compare<L, M>(
    locals: Vec<(String, L)>,
    masters: Vec<(String, M)>,
    order: SortOrder,
) -> Vec<ComparisonRow<L, M>> {
    let mut rows: Vec<ComparisonRow<L, M>> = locals
        .into_iter()
        .map(|(uid, local)| ComparisonRow {
            uid,
            status: SyncStatus::LocalOnly,
            local: Some(local),
            master: None,
        })
        .collect();

    for (uid, master) in masters {
        match rows.iter_mut().find(|r| r.uid == uid) {
            Some(row) => {
                row.master = Some(master);
                row.status = SyncStatus::Synced;
            }
            None => rows.push(ComparisonRow {
                uid,
                status: SyncStatus::MasterOnly,
                local: None,
                master: Some(master),
            }),
        }
    }

    rows.sort_by_key(|r| std::cmp::Reverse(order.weight(r.status)));
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub local_total: usize,
    pub master_total: usize,
    pub pending_sync: usize,
    pub orphans: usize,
}

pub fn diff_stats<L, M>(rows: &[ComparisonRow<L, M>], master_total: usize) -> DiffStats {
    let count = |s: SyncStatus| rows.iter().filter(|r| r.status == s).count();
    let local_only = count(SyncStatus::LocalOnly);
    let synced = count(SyncStatus::Synced);
    DiffStats {
        local_total: local_only + synced,
        master_total,
        pending_sync: local_only,
        orphans: count(SyncStatus::MasterOnly),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locals(uids: &[&str]) -> Vec<(String, ())> {
        uids.iter().map(|u| (u.to_string(), ())).collect()
    }

    #[test]
    fn status_display_matches_as_str() {
        assert_eq!(SyncStatus::LocalOnly.to_string(), "LOCAL_ONLY");
        assert_eq!(
            serde_json::to_string(&SyncStatus::MasterOnly).unwrap(),
            "\"MASTER_ONLY\""
        );
    }

    #[test]
    fn merge_classifies_rows() {
        let rows = compare(locals(&["1-2", "1-3"]), locals(&["1-2", "9-9"]), SortOrder::SyncedFirst);
        let statuses: Vec<_> = rows.iter().map(|r| (r.uid.as_str(), r.status)).collect();
        assert_eq!(
            statuses,
            vec![
                ("1-2", SyncStatus::Synced),
                ("1-3", SyncStatus::LocalOnly),
                ("9-9", SyncStatus::MasterOnly),
            ]
        );
    }

    #[test]
    fn unsynced_first_is_stable() {
        let rows = compare(
            locals(&["a", "b", "c"]),
            locals(&["b", "z"]),
            SortOrder::UnsyncedFirst,
        );
        let uids: Vec<_> = rows.iter().map(|r| r.uid.as_str()).collect();
        assert_eq!(uids, vec!["a", "c", "z", "b"]);
    }

    #[test]
    fn stats_count_pending_and_orphans() {
        let rows = compare(locals(&["a", "b"]), locals(&["b", "z"]), SortOrder::default());
        let stats = diff_stats(&rows, 2);
        assert_eq!(
            stats,
            DiffStats { local_total: 2, master_total: 2, pending_sync: 1, orphans: 1 }
        );
    }

    #[test]
    fn uid_and_name_formats() {
        assert_eq!(item_uid(4, 17), "4-17");
        assert_eq!(item_name("Kael", "常规状态"), "Kael - 常规状态");
    }
}
