//! "Lock potential values" toggle of the planning view.
//!
//! Locking freezes the potential hours per department as they were at the
//! time of the toggle, so later edits to targets do not move the plan.
//! State lives in two keys of an injected [`KeyValueStore`]:
//!
//! - `potential_locked`: JSON boolean
//! - `potential_locked_values`: JSON object, department → hours

use anyhow::Result;
use shared::PotentialLockStatus;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::KeyValueStore;

pub const LOCKED_KEY: &str = "potential_locked";
pub const SNAPSHOT_KEY: &str = "potential_locked_values";

#[derive(Clone)]
pub struct PotentialLockService {
    store: Arc<dyn KeyValueStore>,
}

impl PotentialLockService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Whether the lock is on. A missing or unreadable flag means unlocked
    pub async fn is_locked(&self) -> Result<bool> {
        let raw = self.store.get(LOCKED_KEY).await?;
        Ok(match raw {
            Some(raw) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable {} value '{}': {}", LOCKED_KEY, raw, e);
                false
            }),
            None => false,
        })
    }

    /// The stored snapshot, if any
    pub async fn snapshot(&self) -> Result<Option<BTreeMap<String, f64>>> {
        let Some(raw) = self.store.get(SNAPSHOT_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(values) => Ok(Some(values)),
            Err(e) => {
                warn!("Ignoring corrupt {} snapshot: {}", SNAPSHOT_KEY, e);
                Ok(None)
            }
        }
    }

    /// Values in effect: the snapshot while locked, `current` otherwise
    pub async fn effective_values(&self, current: BTreeMap<String, f64>) -> Result<BTreeMap<String, f64>> {
        if self.is_locked().await? {
            if let Some(snapshot) = self.snapshot().await? {
                return Ok(snapshot);
            }
            warn!("Potential values locked without a snapshot, using current values");
        }
        Ok(current)
    }

    /// Current lock state together with the values in effect
    pub async fn status(&self, current: BTreeMap<String, f64>) -> Result<PotentialLockStatus> {
        let locked = self.is_locked().await?;
        let values = self.effective_values(current).await?;
        Ok(PotentialLockStatus { locked, values })
    }

    /// Turn the lock on (snapshotting `current`) or off (dropping the snapshot)
    pub async fn set_locked(&self, locked: bool, current: BTreeMap<String, f64>) -> Result<PotentialLockStatus> {
        info!("Setting potential lock to {}", locked);

        if locked {
            // Re-locking keeps the values frozen by the first lock
            let already_locked = self.is_locked().await?;
            let values = match self.snapshot().await? {
                Some(existing) if already_locked => existing,
                _ => current,
            };
            self.store.set(SNAPSHOT_KEY, &serde_json::to_string(&values)?).await?;
            self.store.set(LOCKED_KEY, "true").await?;
            Ok(PotentialLockStatus { locked: true, values })
        } else {
            self.store.set(LOCKED_KEY, "false").await?;
            self.store.delete(SNAPSHOT_KEY).await?;
            Ok(PotentialLockStatus { locked: false, values: current })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryKeyValueStore;

    fn values(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn setup() -> (PotentialLockService, Arc<MemoryKeyValueStore>) {
        let store = Arc::new(MemoryKeyValueStore::new());
        (PotentialLockService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_unlocked_by_default() {
        let (service, _) = setup();
        let current = values(&[("Mécanique", 735.0)]);

        let status = service.status(current.clone()).await.unwrap();
        assert!(!status.locked);
        assert_eq!(status.values, current);
    }

    #[tokio::test]
    async fn test_lock_freezes_values() {
        let (service, store) = setup();

        service.set_locked(true, values(&[("Mécanique", 735.0)])).await.unwrap();
        assert_eq!(store.get(LOCKED_KEY).await.unwrap().as_deref(), Some("true"));

        let status = service.status(values(&[("Mécanique", 800.0)])).await.unwrap();
        assert!(status.locked);
        assert_eq!(status.values, values(&[("Mécanique", 735.0)]));
    }

    #[tokio::test]
    async fn test_relock_keeps_first_snapshot() {
        let (service, _) = setup();

        service.set_locked(true, values(&[("Carrosserie", 420.0)])).await.unwrap();
        let status = service.set_locked(true, values(&[("Carrosserie", 500.0)])).await.unwrap();
        assert_eq!(status.values, values(&[("Carrosserie", 420.0)]));
    }

    #[tokio::test]
    async fn test_unlock_drops_snapshot() {
        let (service, store) = setup();

        service.set_locked(true, values(&[("Mécanique", 735.0)])).await.unwrap();
        let status = service.set_locked(false, values(&[("Mécanique", 800.0)])).await.unwrap();

        assert!(!status.locked);
        assert_eq!(status.values, values(&[("Mécanique", 800.0)]));
        assert!(store.get(SNAPSHOT_KEY).await.unwrap().is_none());
        assert_eq!(store.get(LOCKED_KEY).await.unwrap().as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn test_corrupt_state_reads_as_unlocked_or_current() {
        let (service, store) = setup();
        let current = values(&[("Mécanique", 735.0)]);

        store.set(LOCKED_KEY, "yes please").await.unwrap();
        assert!(!service.is_locked().await.unwrap());

        store.set(LOCKED_KEY, "true").await.unwrap();
        store.set(SNAPSHOT_KEY, "{not json").await.unwrap();
        assert!(service.snapshot().await.unwrap().is_none());
        assert_eq!(service.effective_values(current.clone()).await.unwrap(), current);
    }

    #[tokio::test]
    async fn test_snapshot_round_trips_through_sqlite() {
        let store = Arc::new(crate::db::SqliteKeyValueStore::connect_test().await.unwrap());
        let service = PotentialLockService::new(store);

        service.set_locked(true, values(&[("Préparation VO", 180.0)])).await.unwrap();
        let snapshot = service.snapshot().await.unwrap().unwrap();
        assert_eq!(snapshot, values(&[("Préparation VO", 180.0)]));
    }
}
