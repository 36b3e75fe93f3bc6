// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::dispatcher::{DispatchRequest, Dispatcher};
use crate::models::{
    parse_appointment_id, AppointmentFilters, CreateAppointmentInput, UpdateStatusRequest,
};
use crate::services::scheduling::SchedulingService;
use crate::services::store::AppointmentStore;

/// Shared state for appointment routes: the injected store, wrapped in the
/// scheduling service.
#[derive(Clone)]
pub struct AppointmentState {
    pub scheduling: SchedulingService,
}

impl AppointmentState {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self {
            scheduling: SchedulingService::new(store),
        }
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.scheduling.clone())
    }
}

// ==============================================================================
// DISPATCH
// ==============================================================================

/// Gateway entry point: run one named operation and return its result.
#[axum::debug_handler]
pub async fn dispatch_operation(
    State(state): State<Arc<AppointmentState>>,
    payload: Result<Json<DispatchRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(request) = payload?;
    let result = state.dispatcher().dispatch(request).await?;
    Ok(Json(result))
}

// ==============================================================================
// REST HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppointmentState>>,
    query: Result<Query<AppointmentFilters>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(filters) = query?;
    let appointments = state.scheduling.list_appointments(filters).await?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppointmentState>>,
    payload: Result<Json<CreateAppointmentInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(input) = payload?;
    let appointment = state.scheduling.create_appointment(input).await?;
    Ok((StatusCode::CREATED, Json(json!(appointment))))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppointmentState>>,
    Path(appointment_id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(request) = payload?;
    let id = parse_appointment_id(&appointment_id)?;
    let update = state.scheduling.update_status(id, request.status).await?;
    Ok(Json(json!(update)))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppointmentState>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_appointment_id(&appointment_id)?;
    let deleted = state.scheduling.delete_appointment(id).await?;
    Ok(Json(json!({ "id": id, "deleted": deleted })))
}
