use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_APPOINTMENTS_TABLE: &str = "appointments";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Which appointment store the API wires in at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL table behind a PostgREST endpoint.
    Postgrest,
    /// Process-local store, for development and tests.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgrest" | "postgres" | "supabase" => Ok(StoreBackend::Postgrest),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Postgrest => write!(f, "postgrest"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub appointments_table: String,
    pub store_backend: StoreBackend,
    pub bind_address: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let supabase_url = env::var("SUPABASE_URL")
            .unwrap_or_else(|_| {
                warn!("SUPABASE_URL not set, using empty value");
                String::new()
            });
        let supabase_service_key = env::var("SUPABASE_SERVICE_KEY")
            .unwrap_or_else(|_| {
                warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                String::new()
            });
        let appointments_table = env::var("APPOINTMENTS_TABLE")
            .unwrap_or_else(|_| DEFAULT_APPOINTMENTS_TABLE.to_string());
        let bind_address = env::var("API_BIND_ADDRESS")
            .unwrap_or_else(|_| {
                warn!("API_BIND_ADDRESS not set, using default {}", DEFAULT_BIND_ADDRESS);
                DEFAULT_BIND_ADDRESS.to_string()
            });

        let remote_configured = !supabase_url.is_empty() && !supabase_service_key.is_empty();
        let default_backend = if remote_configured {
            StoreBackend::Postgrest
        } else {
            StoreBackend::Memory
        };

        let store_backend = match env::var("APPOINTMENT_STORE") {
            Ok(raw) => raw.parse::<StoreBackend>().unwrap_or_else(|e: String| {
                warn!("{}, falling back to {}", e, default_backend);
                default_backend
            }),
            Err(_) => default_backend,
        };

        let config = Self {
            supabase_url,
            supabase_service_key,
            appointments_table,
            store_backend,
            bind_address,
        };

        if config.store_backend == StoreBackend::Postgrest && !config.is_configured() {
            warn!("PostgREST store selected but SUPABASE_URL / SUPABASE_SERVICE_KEY are missing");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_service_key.is_empty()
    }

    /// REST path of the appointments table, e.g. `/rest/v1/appointments`.
    pub fn appointments_path(&self) -> String {
        format!("/rest/v1/{}", self.appointments_table)
    }
}
