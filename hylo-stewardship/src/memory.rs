// SPDX-License-Identifier: MIT OR Apache-2.0

use std::convert::Infallible;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, OwnedSemaphorePermit, Semaphore};
use tracing::warn;

use crate::assignments::memory::AssignmentTables;
use crate::catalog::memory::CatalogTables;
use crate::groups::memory::GroupTables;
use crate::ledger::memory::LedgerTables;
use crate::traits::Transaction;

/// In-memory store.
///
/// This does not persist data permamently, all changes are lost when the process ends. Use this
/// only in development or test contexts.
///
/// Transactions are serialized like in the SQLite store. Beginning a transaction takes a snapshot
/// of the whole state which is restored on rollback, or by the next `begin` when the permit was
/// dropped without finishing the transaction.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    snapshot: Arc<Mutex<Option<MemoryState>>>,
    semaphore: Arc<Semaphore>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct MemoryState {
    next_id: i64,
    pub(crate) catalog: CatalogTables,
    pub(crate) groups: GroupTables,
    pub(crate) ledger: LedgerTables,
    pub(crate) assignments: AssignmentTables,
}

impl MemoryState {
    /// Next row id, shared by all tables like an auto-incrementing primary key.
    pub(crate) fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::default(),
            snapshot: Arc::default(),
            semaphore: Arc::new(Semaphore::new(1)),
        }
    }

    pub(crate) async fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().await
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Transaction for MemoryStore {
    type Error = Infallible;

    type Permit = MemoryPermit;

    async fn begin(&self) -> Result<MemoryPermit, Infallible> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("if semaphore is closed then the whole struct is gone as well");

        let mut snapshot = self.snapshot.lock().await;
        let mut state = self.state.lock().await;

        // The previous holder was dropped before it could commit or roll back.
        if let Some(abandoned) = snapshot.take() {
            warn!("rolling back transaction of a cancelled operation");
            *state = abandoned;
        }
        snapshot.replace(state.clone());

        Ok(MemoryPermit(permit))
    }

    async fn rollback(&self, permit: MemoryPermit) -> Result<(), Infallible> {
        if let Some(state) = self.snapshot.lock().await.take() {
            *self.state.lock().await = state;
        }

        drop(permit);
        Ok(())
    }

    async fn commit(&self, permit: MemoryPermit) -> Result<(), Infallible> {
        self.snapshot.lock().await.take();

        drop(permit);
        Ok(())
    }
}

#[allow(unused)]
#[derive(Debug)]
pub struct MemoryPermit(OwnedSemaphorePermit);
