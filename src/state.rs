use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::AdminError;
use crate::model::{Employee, PayrollEntry, YearMonth};
use crate::store::{RecordStoreClient, Snapshot};

/// Read-only mirror of the record store.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCache {
    pub employees: Vec<Employee>,
    pub payroll_entries: Vec<PayrollEntry>,
}

impl ClientCache {
    pub fn new(employees: Vec<Employee>, payroll_entries: Vec<PayrollEntry>) -> Self {
        Self {
            employees,
            payroll_entries,
        }
    }

    pub fn employee(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn entry(&self, id: &str) -> Option<&PayrollEntry> {
        self.payroll_entries.iter().find(|e| e.id == id)
    }

    pub fn entry_for(&self, employee_id: &str, month: YearMonth) -> Option<&PayrollEntry> {
        self.payroll_entries
            .iter()
            .find(|e| e.employee_id == employee_id && e.month == month)
    }

    /// Another entry for the same employee and month, ignoring `own_id`.
    pub fn conflicting_entry(
        &self,
        employee_id: &str,
        month: YearMonth,
        own_id: &str,
    ) -> Option<&PayrollEntry> {
        self.payroll_entries
            .iter()
            .find(|e| e.employee_id == employee_id && e.month == month && e.id != own_id)
    }

    pub fn employee_name(&self, id: &str) -> &str {
        self.employee(id).map(|e| e.name.as_str()).unwrap_or("Unknown")
    }
}

impl From<Snapshot> for ClientCache {
    fn from(s: Snapshot) -> Self {
        Self::new(s.employees, s.payroll_entries)
    }
}

/// Application state owned by the composition root.
pub struct AppState {
    pub store: RecordStoreClient,
    cache: RwLock<ClientCache>,
    /// Handed out when a load starts.
    issued: AtomicU64,
    /// Generation of the load currently in `cache`; only written under the write lock.
    applied: AtomicU64,
}

impl AppState {
    pub fn new(store: RecordStoreClient) -> Self {
        Self::with_cache(store, ClientCache::default())
    }

    pub fn with_cache(store: RecordStoreClient, cache: ClientCache) -> Self {
        Self {
            store,
            cache: RwLock::new(cache),
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    /// Readers never hold the lock across an await.
    pub fn cache(&self) -> RwLockReadGuard<'_, ClientCache> {
        self.cache.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> ClientCache {
        self.cache().clone()
    }

    /// Reloads both lists and swaps them in at once. On failure the previous
    /// contents stay in place. A load that started before one already applied
    /// is dropped, so a slow response never replaces a newer snapshot.
    pub async fn refresh(&self) -> Result<(), AdminError> {
        let generation = self.next_generation();
        let snapshot = self.store.load_snapshot().await?;
        let fresh = ClientCache::from(snapshot);
        let (employees, payroll_entries) = (fresh.employees.len(), fresh.payroll_entries.len());

        if self.apply(generation, fresh) {
            info!(generation, employees, payroll_entries, "Client cache refreshed");
        } else {
            debug!(generation, "Discarding snapshot older than the cached one");
        }
        Ok(())
    }

    fn next_generation(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn apply(&self, generation: u64, fresh: ClientCache) -> bool {
        let mut guard = self.cache.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        if generation <= self.applied.load(Ordering::SeqCst) {
            return false;
        }
        *guard = fresh;
        self.applied.store(generation, Ordering::SeqCst);
        true
    }

    /// Refresh after a successful mutation; a failed reload is logged, not returned.
    pub async fn refresh_after_mutation(&self) {
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Cache refresh after mutation failed, keeping last snapshot");
        }
    }
}
