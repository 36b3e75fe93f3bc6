use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::{AppConfig, StoreBackend, DEFAULT_APPOINTMENTS_TABLE, DEFAULT_BIND_ADDRESS};

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub appointments_table: String,
    pub store_backend: StoreBackend,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            appointments_table: DEFAULT_APPOINTMENTS_TABLE.to_string(),
            store_backend: StoreBackend::Postgrest,
        }
    }
}

impl TestConfig {
    /// Config pointed at a mock PostgREST server.
    pub fn with_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            appointments_table: self.appointments_table.clone(),
            store_backend: self.store_backend,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

pub struct MockPostgrestResponses;

impl MockPostgrestResponses {
    /// A row as the appointments table returns it.
    pub fn appointment_row(
        id: Uuid,
        patient_name: &str,
        doctor_name: &str,
        date: &str,
        time: &str,
        status: &str,
    ) -> Value {
        json!({
            "id": id,
            "patient_name": patient_name,
            "doctor_name": doctor_name,
            "date": date,
            "time": time,
            "duration": 30,
            "status": status,
            "mode": "in-person"
        })
    }

    pub fn unique_violation() -> Value {
        json!({
            "code": "23505",
            "details": "Key (doctor_name, date, \"time\")=(Dr X, 2024-01-01, 09:00) already exists.",
            "hint": null,
            "message": "duplicate key value violates unique constraint \"unique_slot_idx\""
        })
    }

    pub fn error_response(message: &str, code: &str) -> Value {
        json!({
            "code": code,
            "details": null,
            "hint": null,
            "message": message
        })
    }
}
