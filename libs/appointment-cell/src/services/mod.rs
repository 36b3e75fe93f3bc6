pub mod memory;
pub mod postgrest;
pub mod scheduling;
pub mod store;

use std::sync::Arc;

use tracing::info;

use shared_config::{AppConfig, StoreBackend};

pub use memory::InMemoryAppointmentStore;
pub use postgrest::PostgrestAppointmentStore;
pub use scheduling::SchedulingService;
pub use store::{AppointmentStore, StoreError};

/// Construct the store selected by `config.store_backend`.
pub fn build_store(config: &AppConfig) -> Arc<dyn AppointmentStore> {
    match config.store_backend {
        StoreBackend::Postgrest => {
            info!("Using PostgREST appointment store at {}", config.supabase_url);
            Arc::new(PostgrestAppointmentStore::new(config))
        }
        StoreBackend::Memory => {
            info!("Using in-memory appointment store");
            Arc::new(InMemoryAppointmentStore::new())
        }
    }
}
