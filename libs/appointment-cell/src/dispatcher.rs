// libs/appointment-cell/src/dispatcher.rs
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{
    parse_appointment_id, AppointmentError, AppointmentFilters, CreateAppointmentInput,
};
use crate::services::scheduling::SchedulingService;

pub const GET_APPOINTMENTS: &str = "getAppointments";
pub const CREATE_APPOINTMENT: &str = "createAppointment";
pub const UPDATE_APPOINTMENT_STATUS: &str = "updateAppointmentStatus";
pub const DELETE_APPOINTMENT: &str = "deleteAppointment";

/// Incoming dispatch envelope.
///
/// Accepts the direct `{operationName, arguments}` form and the resolver
/// event form `{info: {fieldName}, arguments}` sent by a GraphQL gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DispatchRequest {
    Direct {
        #[serde(rename = "operationName")]
        operation_name: String,
        #[serde(default)]
        arguments: Value,
    },
    ResolverEvent {
        info: ResolverInfo,
        #[serde(default)]
        arguments: Value,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolverInfo {
    #[serde(rename = "fieldName")]
    pub field_name: String,
}

impl DispatchRequest {
    pub fn operation_name(&self) -> &str {
        match self {
            DispatchRequest::Direct { operation_name, .. } => operation_name,
            DispatchRequest::ResolverEvent { info, .. } => &info.field_name,
        }
    }

    pub fn into_parts(self) -> (String, Value) {
        match self {
            DispatchRequest::Direct { operation_name, arguments } => (operation_name, arguments),
            DispatchRequest::ResolverEvent { info, arguments } => (info.field_name, arguments),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateArguments {
    input: CreateAppointmentInput,
}

#[derive(Debug, Deserialize)]
struct UpdateStatusArguments {
    id: String,
    new_status: String,
}

#[derive(Debug, Deserialize)]
struct DeleteArguments {
    id: String,
}

/// A parsed operation. Names are matched exactly; anything else is `Unknown`.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    GetAppointments(AppointmentFilters),
    CreateAppointment(CreateAppointmentInput),
    UpdateAppointmentStatus { id: Uuid, new_status: String },
    DeleteAppointment { id: Uuid },
    Unknown(String),
}

impl Operation {
    pub fn parse(name: &str, arguments: Value) -> Result<Self, AppointmentError> {
        let operation = match name {
            GET_APPOINTMENTS => Operation::GetAppointments(decode_arguments(name, arguments)?),
            CREATE_APPOINTMENT => {
                let args: CreateArguments = decode_arguments(name, arguments)?;
                Operation::CreateAppointment(args.input)
            }
            UPDATE_APPOINTMENT_STATUS => {
                let args: UpdateStatusArguments = decode_arguments(name, arguments)?;
                Operation::UpdateAppointmentStatus {
                    id: parse_appointment_id(&args.id)?,
                    new_status: args.new_status,
                }
            }
            DELETE_APPOINTMENT => {
                let args: DeleteArguments = decode_arguments(name, arguments)?;
                Operation::DeleteAppointment {
                    id: parse_appointment_id(&args.id)?,
                }
            }
            other => Operation::Unknown(other.to_string()),
        };

        Ok(operation)
    }
}

fn decode_arguments<T: DeserializeOwned>(operation: &str, arguments: Value) -> Result<T, AppointmentError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };

    serde_json::from_value(arguments).map_err(|e| {
        AppointmentError::ValidationError(format!("Invalid arguments for {}: {}", operation, e))
    })
}

/// Stateless router from a named operation to the scheduling service.
#[derive(Clone)]
pub struct Dispatcher {
    scheduling: SchedulingService,
}

impl Dispatcher {
    pub fn new(scheduling: SchedulingService) -> Self {
        Self { scheduling }
    }

    pub async fn dispatch(&self, request: DispatchRequest) -> Result<Value, AppointmentError> {
        debug!("Dispatching operation {}", request.operation_name());
        let (name, arguments) = request.into_parts();

        let operation = Operation::parse(&name, arguments)?;
        self.execute(operation).await
    }

    /// Run a parsed operation. `Unknown` yields an `{error}` payload rather
    /// than an `Err`.
    pub async fn execute(&self, operation: Operation) -> Result<Value, AppointmentError> {
        match operation {
            Operation::GetAppointments(filters) => {
                let appointments = self.scheduling.list_appointments(filters).await?;
                Ok(json!(appointments))
            }
            Operation::CreateAppointment(input) => {
                let appointment = self.scheduling.create_appointment(input).await?;
                Ok(json!(appointment))
            }
            Operation::UpdateAppointmentStatus { id, new_status } => {
                let update = self.scheduling.update_status(id, new_status).await?;
                Ok(json!(update))
            }
            Operation::DeleteAppointment { id } => {
                let removed = self.scheduling.delete_appointment(id).await?;
                Ok(json!(removed))
            }
            Operation::Unknown(name) => {
                warn!("Unknown operation requested: {}", name);
                Ok(json!({ "error": format!("Unknown operation: {}", name) }))
            }
        }
    }
}
