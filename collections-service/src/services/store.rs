//! Ledger store: four keyed collections behind a transactional interface.
//!
//! The persisted layout is one JSON document holding all collections. The
//! store hides the whole-document rewrite behind `read`/`transact`: writers
//! mutate a copy under an exclusive lock and the copy is swapped in (and
//! persisted, when file-backed) only if the closure succeeds, so a failed
//! financial write leaves no partial state. The exclusive lock also makes
//! check-then-insert sequences (debt generation, duplicate-pending checks)
//! atomic with respect to concurrent requests.

use crate::models::{BillingMonth, CashBoxRequest, Client, Payment, Voucher};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// The whole ledger document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    pub clients: HashMap<Uuid, Client>,
    pub payments: HashMap<Uuid, Payment>,
    pub vouchers: HashMap<Uuid, Voucher>,
    pub cashbox_requests: HashMap<Uuid, CashBoxRequest>,
}

impl Ledger {
    /// The unique payment for (client, month), if any.
    pub fn payment_for(&self, client_id: Uuid, month: BillingMonth) -> Option<&Payment> {
        self.payments
            .values()
            .find(|p| p.client_id == client_id && p.month == month)
    }

    /// Whether any payment row exists for the given month key.
    pub fn month_generated(&self, month: BillingMonth) -> bool {
        self.payments.values().any(|p| p.month == month)
    }

    /// All payments of one client.
    pub fn client_payments(&self, client_id: Uuid) -> Vec<&Payment> {
        self.payments
            .values()
            .filter(|p| p.client_id == client_id)
            .collect()
    }
}

/// Shared, transactional handle to the ledger.
#[derive(Clone)]
pub struct LedgerStore {
    inner: Arc<RwLock<Ledger>>,
    path: Option<PathBuf>,
}

impl LedgerStore {
    /// Volatile store for tests and ephemeral deployments.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Ledger::default())),
            path: None,
        }
    }

    /// File-backed store; loads the existing document when present.
    pub fn open(path: PathBuf) -> Result<Self, AppError> {
        let ledger = if path.exists() {
            let bytes = std::fs::read(&path).map_err(|e| {
                AppError::StorageError(anyhow::anyhow!(
                    "failed to read ledger at {}: {}",
                    path.display(),
                    e
                ))
            })?;
            serde_json::from_slice(&bytes).map_err(|e| {
                AppError::StorageError(anyhow::anyhow!(
                    "ledger at {} is not valid JSON: {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            Ledger::default()
        };

        info!(path = %path.display(), "Ledger store opened");
        Ok(Self {
            inner: Arc::new(RwLock::new(ledger)),
            path: Some(path),
        })
    }

    /// Run a read-only closure against a snapshot of the ledger.
    pub async fn read<T>(&self, f: impl FnOnce(&Ledger) -> T) -> T {
        let guard = self.inner.read().await;
        f(&guard)
    }

    /// Run a read-modify-write closure as one transaction.
    ///
    /// The closure receives a working copy; on `Ok` the copy is persisted
    /// and committed, on `Err` it is discarded and the ledger is unchanged.
    pub async fn transact<T>(
        &self,
        f: impl FnOnce(&mut Ledger) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut guard = self.inner.write().await;
        let mut draft = guard.clone();
        let out = f(&mut draft)?;
        if let Some(path) = &self.path {
            persist(path, &draft)?;
        }
        *guard = draft;
        debug!("Ledger transaction committed");
        Ok(out)
    }
}

/// Write the document to a sibling temp file, then rename into place.
fn persist(path: &Path, ledger: &Ledger) -> Result<(), AppError> {
    let bytes = serde_json::to_vec_pretty(ledger)
        .map_err(|e| AppError::StorageError(anyhow::anyhow!("failed to encode ledger: {}", e)))?;

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, &bytes).map_err(|e| {
        AppError::StorageError(anyhow::anyhow!(
            "failed to write ledger at {}: {}",
            tmp.display(),
            e
        ))
    })?;
    std::fs::rename(&tmp, path).map_err(|e| {
        AppError::StorageError(anyhow::anyhow!(
            "failed to commit ledger at {}: {}",
            path.display(),
            e
        ))
    })
}
