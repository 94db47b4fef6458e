//! Which skills have a detail record.
//!
//! With [`AvailabilityPolicy::Probe`] every known id is checked with one HEAD
//! request, all issued at once and joined. The resulting id set is memoized in
//! memory and persisted through a [`StorageBackend`] with a fixed lifetime, so
//! a page reload inside the window issues no requests at all.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Probe for one id fails | id treated as unavailable |
//! | Storage read fails / entry corrupt | logged, treated as a miss |
//! | Storage write fails | logged, result still returned |
//!
//! Concurrent calls are not coordinated; a second call that starts before the
//! first finishes may probe again. Probes are side-effect free.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashSet};

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::source::SkillSource;
use crate::storage::{StorageBackend, StorageError};

const FINGERPRINT_ALGO: &str = "fnv1a64";
const FNV64_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV64_PRIME: u64 = 0x100000001b3;

/// How the set of skills with a detail page is determined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AvailabilityPolicy {
    /// HEAD-probe `skill_data/<id>.json` for every id, cached with a TTL.
    #[default]
    Probe,
    /// Trust an authored allow-list; no probes, no persistence.
    Listed { ids: Vec<String> },
}

/// Persisted form: `{ "data": [id, ...], "timestamp": ms, "fingerprint": "..." }`.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    data: Vec<String>,
    timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fingerprint: Option<String>,
}

#[derive(Debug, Clone)]
struct Snapshot {
    ids: BTreeSet<String>,
    fetched_at: u64,
    fingerprint: String,
}

impl Snapshot {
    fn is_fresh(&self, now: u64, ttl_ms: u64, fingerprint: &str) -> bool {
        self.fingerprint == fingerprint && now.saturating_sub(self.fetched_at) < ttl_ms
    }
}

#[must_use]
fn fnv1a64_extend(mut hash: u64, bytes: &[u8]) -> u64 {
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV64_PRIME);
    }
    hash
}

/// Stable fingerprint of an id list; changes whenever the skill list does.
#[must_use]
pub fn ids_fingerprint(ids: &[&str]) -> String {
    let mut hash = FNV64_OFFSET_BASIS;
    let count = u64::try_from(ids.len()).unwrap_or(u64::MAX);
    hash = fnv1a64_extend(hash, &count.to_le_bytes());
    for id in ids {
        hash = fnv1a64_extend(hash, id.as_bytes());
        hash = fnv1a64_extend(hash, &[0]);
    }
    format!("{FINGERPRINT_ALGO}:{hash:016x}")
}

/// Distinct non-empty ids in first-seen order.
fn distinct_ids<'a>(ids: &[&'a str]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    ids.iter()
        .copied()
        .filter(|id| !id.trim().is_empty())
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Time-limited cache of the ids that have a detail record.
pub struct AvailabilityCache<B, C> {
    storage: B,
    clock: C,
    key: String,
    ttl_ms: u64,
    policy: AvailabilityPolicy,
    memo: RefCell<Option<Snapshot>>,
}

impl<B: StorageBackend, C: Clock> AvailabilityCache<B, C> {
    #[must_use]
    pub fn new(storage: B, clock: C, key: impl Into<String>, ttl_ms: u64) -> Self {
        Self {
            storage,
            clock,
            key: key.into(),
            ttl_ms,
            policy: AvailabilityPolicy::Probe,
            memo: RefCell::new(None),
        }
    }

    /// Builder: set the policy.
    #[must_use]
    pub fn with_policy(mut self, policy: AvailabilityPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn storage(&self) -> &B {
        &self.storage
    }

    /// Ids among `ids` known to have a detail record.
    ///
    /// `path_for` maps an id to the resource path to probe.
    pub async fn available_ids<S, F>(&self, source: &S, ids: &[&str], path_for: F) -> BTreeSet<String>
    where
        S: SkillSource,
        F: Fn(&str) -> String,
    {
        let wanted = distinct_ids(ids);

        if let AvailabilityPolicy::Listed { ids: listed } = &self.policy {
            let listed: HashSet<&str> = listed.iter().map(String::as_str).collect();
            return wanted
                .into_iter()
                .filter(|id| listed.contains(id))
                .map(str::to_owned)
                .collect();
        }

        let fingerprint = ids_fingerprint(&wanted);
        let now = self.clock.now_ms();

        if let Some(ids) = self.fresh_memo(now, &fingerprint) {
            debug!(count = ids.len(), "availability served from memory");
            return ids;
        }

        if let Some(snapshot) = self.read_persisted()
            && snapshot.is_fresh(now, self.ttl_ms, &fingerprint)
        {
            debug!(
                count = snapshot.ids.len(),
                age_ms = now.saturating_sub(snapshot.fetched_at),
                "availability served from storage"
            );
            let ids = snapshot.ids.clone();
            *self.memo.borrow_mut() = Some(snapshot);
            return ids;
        }

        let probes = wanted.iter().map(|&id| {
            let path = path_for(id);
            async move { (id, source.probe(&path).await) }
        });
        let results = join_all(probes).await;

        let mut available = BTreeSet::new();
        let mut failed = 0usize;
        for (id, result) in results {
            match result {
                Ok(()) => {
                    available.insert(id.to_owned());
                }
                Err(e) => {
                    failed += 1;
                    debug!(id, error = %e, "no detail record");
                }
            }
        }
        info!(
            probed = wanted.len(),
            available = available.len(),
            unavailable = failed,
            source = source.name(),
            "availability rebuilt"
        );

        let snapshot = Snapshot {
            ids: available.clone(),
            fetched_at: self.clock.now_ms(),
            fingerprint,
        };
        if !self.storage.is_available() {
            debug!(backend = self.storage.name(), "storage unavailable, availability kept in memory");
        } else if let Err(e) = self.write_persisted(&snapshot) {
            warn!(backend = self.storage.name(), error = %e, "failed to persist availability cache");
        }
        *self.memo.borrow_mut() = Some(snapshot);
        available
    }

    /// Drop the memoized and persisted set; the next call probes again.
    pub fn invalidate(&self) {
        self.memo.borrow_mut().take();
        if !self.storage.is_available() {
            return;
        }
        if let Err(e) = self.storage.remove(&self.key) {
            warn!(backend = self.storage.name(), error = %e, "failed to clear availability cache");
        }
    }

    fn fresh_memo(&self, now: u64, fingerprint: &str) -> Option<BTreeSet<String>> {
        self.memo
            .borrow()
            .as_ref()
            .filter(|s| s.is_fresh(now, self.ttl_ms, fingerprint))
            .map(|s| s.ids.clone())
    }

    fn read_persisted(&self) -> Option<Snapshot> {
        if !self.storage.is_available() {
            return None;
        }
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(backend = self.storage.name(), error = %e, "failed to read availability cache");
                return None;
            }
        };
        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                let e = StorageError::Corruption(e.to_string());
                warn!(key = %self.key, error = %e, "ignoring stored availability cache");
                return None;
            }
        };
        Some(Snapshot {
            ids: entry.data.into_iter().collect(),
            fetched_at: entry.timestamp,
            // Entries without a fingerprint never match and get rebuilt.
            fingerprint: entry.fingerprint.unwrap_or_default(),
        })
    }

    fn write_persisted(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let entry = CacheEntry {
            data: snapshot.ids.iter().cloned().collect(),
            timestamp: snapshot.fetched_at,
            fingerprint: Some(snapshot.fingerprint.clone()),
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.set(&self.key, &json)
    }
}
