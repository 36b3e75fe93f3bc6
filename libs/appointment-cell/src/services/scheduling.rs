// libs/appointment-cell/src/services/scheduling.rs
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{
    check_status, Appointment, AppointmentError, AppointmentFilters, CreateAppointmentInput,
    StatusUpdate,
};
use crate::services::store::AppointmentStore;

/// The four scheduling operations, on top of an injected store.
#[derive(Clone)]
pub struct SchedulingService {
    store: Arc<dyn AppointmentStore>,
}

impl SchedulingService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self { store }
    }

    pub async fn list_appointments(
        &self,
        filters: AppointmentFilters,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let filters = filters.normalized();
        if filters.is_empty() {
            debug!("Listing all appointments");
        } else {
            debug!("Listing appointments with filters {:?}", filters);
        }

        let rows = self.store.query(&filters).await?;

        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    /// Book a new appointment. A taken slot is reported as `SlotConflict`
    /// and is never retried here.
    pub async fn create_appointment(
        &self,
        input: CreateAppointmentInput,
    ) -> Result<Appointment, AppointmentError> {
        let new_appointment = input.validate()?;
        let row = new_appointment.into_row(Uuid::new_v4());

        let stored = self.store.insert(&row).await.map_err(|e| {
            warn!("Failed to book {}: {}", row.slot(), e);
            AppointmentError::from(e)
        })?;

        info!("Appointment {} booked for {} with {}", stored.id, stored.patient_name, stored.slot());
        Ok(stored.into())
    }

    /// Set the status of an existing appointment. Any text that fits the
    /// column is accepted.
    pub async fn update_status(
        &self,
        id: Uuid,
        new_status: String,
    ) -> Result<StatusUpdate, AppointmentError> {
        check_status(&new_status)?;
        let updated = self.store.update_status(id, &new_status).await?;

        info!("Appointment {} status set to {}", updated.id, updated.status);
        Ok(StatusUpdate {
            id: updated.id,
            status: updated.status,
        })
    }

    /// Remove an appointment. Returns `false` when nothing had that id.
    pub async fn delete_appointment(&self, id: Uuid) -> Result<bool, AppointmentError> {
        let removed = self.store.delete(id).await?;

        if removed {
            info!("Appointment {} deleted", id);
        } else {
            debug!("Delete of unknown appointment {} was a no-op", id);
        }
        Ok(removed)
    }
}
