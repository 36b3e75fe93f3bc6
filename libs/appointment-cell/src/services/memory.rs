// libs/appointment-cell/src/services/memory.rs
use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{AppointmentFilters, AppointmentRow, Slot};
use crate::services::store::{AppointmentStore, StoreError};

#[derive(Default)]
struct MemoryState {
    rows: Vec<AppointmentRow>,
    slots: HashSet<Slot>,
}

/// Process-local appointment store.
///
/// The slot index and the rows share one lock, so the uniqueness check and
/// the write happen under a single write guard.
#[derive(Default)]
pub struct InMemoryAppointmentStore {
    state: RwLock<MemoryState>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn query(&self, filters: &AppointmentFilters) -> Result<Vec<AppointmentRow>, StoreError> {
        let state = self.state.read().await;

        let rows: Vec<AppointmentRow> = state.rows.iter()
            .filter(|row| filters.matches(row))
            .cloned()
            .collect();

        debug!("In-memory query matched {} of {} rows", rows.len(), state.rows.len());
        Ok(rows)
    }

    async fn insert(&self, row: &AppointmentRow) -> Result<AppointmentRow, StoreError> {
        let mut state = self.state.write().await;

        if state.rows.iter().any(|existing| existing.id == row.id) {
            return Err(StoreError::Backend(format!("duplicate appointment id {}", row.id)));
        }

        let slot = row.slot();
        if !state.slots.insert(slot.clone()) {
            warn!("Rejected insert for taken slot {}", slot);
            return Err(StoreError::SlotTaken(slot));
        }

        state.rows.push(row.clone());
        Ok(row.clone())
    }

    async fn update_status(&self, id: Uuid, status: &str) -> Result<AppointmentRow, StoreError> {
        let mut state = self.state.write().await;

        let row = state.rows.iter_mut()
            .find(|row| row.id == id)
            .ok_or(StoreError::NotFound(id))?;

        row.status = status.to_string();
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;

        let Some(position) = state.rows.iter().position(|row| row.id == id) else {
            return Ok(false);
        };

        let removed = state.rows.remove(position);
        state.slots.remove(&removed.slot());
        Ok(true)
    }
}
