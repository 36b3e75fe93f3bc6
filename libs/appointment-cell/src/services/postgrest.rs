// libs/appointment-cell/src/services/postgrest.rs
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{DatabaseError, SupabaseClient};

use crate::models::{AppointmentFilters, AppointmentRow};
use crate::schema;
use crate::services::store::{AppointmentStore, StoreError};

/// Appointment store backed by a PostgreSQL table exposed through PostgREST.
///
/// Slot uniqueness is enforced by the table's unique index; a violation comes
/// back as SQLSTATE 23505 and is reported as `SlotTaken`.
pub struct PostgrestAppointmentStore {
    supabase: Arc<SupabaseClient>,
    table_path: String,
}

impl PostgrestAppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(Arc::new(SupabaseClient::new(config)), &config.appointments_path())
    }

    pub fn with_client(supabase: Arc<SupabaseClient>, table_path: &str) -> Self {
        Self {
            supabase,
            table_path: table_path.to_string(),
        }
    }

    fn select_path(&self) -> String {
        format!("{}?select={}", self.table_path, schema::select_columns())
    }

    fn row_path(&self, id: Uuid) -> String {
        format!("{}&id=eq.{}", self.select_path(), id)
    }

    fn query_path(&self, filters: &AppointmentFilters) -> String {
        let mut path = self.select_path();

        let predicates = [
            ("date", &filters.date),
            ("status", &filters.status),
            ("doctor_name", &filters.doctor_name),
        ];
        for (column, value) in predicates {
            if let Some(value) = value {
                path.push_str(&format!("&{}=eq.{}", column, urlencoding::encode(value)));
            }
        }

        path
    }
}

#[async_trait]
impl AppointmentStore for PostgrestAppointmentStore {
    async fn query(&self, filters: &AppointmentFilters) -> Result<Vec<AppointmentRow>, StoreError> {
        let path = self.query_path(filters);
        debug!("Querying appointments: {}", path);

        let rows: Vec<AppointmentRow> = self.supabase.request(
            Method::GET,
            &path,
            None,
            None::<()>,
        ).await?;

        Ok(rows)
    }

    async fn insert(&self, row: &AppointmentRow) -> Result<AppointmentRow, StoreError> {
        let result: Result<Vec<AppointmentRow>, DatabaseError> = self.supabase.request_with_headers(
            Method::POST,
            &self.select_path(),
            None,
            Some(row),
            Some(SupabaseClient::return_representation()),
        ).await;

        let inserted = match result {
            Ok(rows) => rows,
            Err(e) if e.is_unique_violation() => {
                warn!("Slot {} already booked: {}", row.slot(), e);
                return Err(StoreError::SlotTaken(row.slot()));
            }
            Err(e) => return Err(e.into()),
        };

        let stored = inserted.into_iter().next()
            .ok_or_else(|| StoreError::Backend("insert returned no rows".to_string()))?;

        info!("Inserted appointment {} for {}", stored.id, stored.slot());
        Ok(stored)
    }

    async fn update_status(&self, id: Uuid, status: &str) -> Result<AppointmentRow, StoreError> {
        let updated: Vec<AppointmentRow> = self.supabase.request_with_headers(
            Method::PATCH,
            &self.row_path(id),
            None,
            Some(json!({ "status": status })),
            Some(SupabaseClient::return_representation()),
        ).await?;

        updated.into_iter().next().ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let deleted: Vec<AppointmentRow> = self.supabase.request_with_headers(
            Method::DELETE,
            &self.row_path(id),
            None,
            None::<()>,
            Some(SupabaseClient::return_representation()),
        ).await?;

        Ok(!deleted.is_empty())
    }
}
