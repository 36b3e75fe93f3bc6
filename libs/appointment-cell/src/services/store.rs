// libs/appointment-cell/src/services/store.rs
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use shared_database::supabase::DatabaseError;

use crate::models::{AppointmentError, AppointmentFilters, AppointmentRow, Slot};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Slot already taken: {0}")]
    SlotTaken(Slot),

    #[error("No appointment with id {0}")]
    NotFound(Uuid),

    #[error("Store backend failure: {0}")]
    Backend(String),

    #[error("Malformed appointment row: {0}")]
    Decode(String),
}

impl From<DatabaseError> for StoreError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::Decode(inner) => StoreError::Decode(inner.to_string()),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

impl From<StoreError> for AppointmentError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::SlotTaken(slot) => AppointmentError::SlotConflict(slot),
            StoreError::NotFound(id) => AppointmentError::NotFound(id),
            StoreError::Backend(msg) | StoreError::Decode(msg) => AppointmentError::StoreError(msg),
        }
    }
}

/// Durable storage of appointment rows.
///
/// Implementations own the slot invariant: `insert` must reject a row whose
/// (doctor_name, date, time) is already present, atomically with respect to
/// concurrent inserts.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Rows matching every present filter. Order is unspecified.
    async fn query(&self, filters: &AppointmentFilters) -> Result<Vec<AppointmentRow>, StoreError>;

    async fn insert(&self, row: &AppointmentRow) -> Result<AppointmentRow, StoreError>;

    /// Sets only the status column. `NotFound` when no row has `id`.
    async fn update_status(&self, id: Uuid, status: &str) -> Result<AppointmentRow, StoreError>;

    /// Whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
