pub mod dispatcher;
pub mod handlers;
pub mod models;
pub mod router;
pub mod schema;
pub mod services;

pub use dispatcher::{DispatchRequest, Dispatcher, Operation};
pub use handlers::AppointmentState;
pub use models::*;
pub use router::appointment_routes;
pub use services::*;
