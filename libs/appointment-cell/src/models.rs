// libs/appointment-cell/src/models.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use std::fmt;

use shared_models::error::AppError;

use crate::schema::{STATUS_MAX_CHARS, TEXT_MAX_CHARS};

/// Status given to appointments created without one.
pub const DEFAULT_STATUS: &str = "Scheduled";

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// Public shape of an appointment, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient_name: String,
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    pub duration: i32,
    pub status: String,
    pub mode: String,
}

/// Persisted shape of an appointment, one column per field.
///
/// Decoding is strict: a missing, extra, or mistyped column is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppointmentRow {
    pub id: Uuid,
    pub patient_name: String,
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    pub duration: i32,
    pub status: String,
    pub mode: String,
}

impl AppointmentRow {
    pub fn slot(&self) -> Slot {
        Slot::new(&self.doctor_name, &self.date, &self.time)
    }
}

impl From<AppointmentRow> for Appointment {
    fn from(row: AppointmentRow) -> Self {
        Self {
            id: row.id,
            patient_name: row.patient_name,
            doctor_name: row.doctor_name,
            date: row.date,
            time: row.time,
            duration: row.duration,
            status: row.status,
            mode: row.mode,
        }
    }
}

/// The (doctor, date, time) triple that may be booked at most once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub doctor_name: String,
    pub date: String,
    pub time: String,
}

impl Slot {
    pub fn new(doctor_name: &str, date: &str, time: &str) -> Self {
        Self {
            doctor_name: doctor_name.to_string(),
            date: date.to_string(),
            time: time.to_string(),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {} at {}", self.doctor_name, self.date, self.time)
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Create input as the caller sends it. Every field is optional here so that
/// a missing one is reported by name instead of as a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentInput {
    pub patient_name: Option<String>,
    pub doctor_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration: Option<i64>,
    pub status: Option<String>,
    pub mode: Option<String>,
}

impl CreateAppointmentInput {
    /// Check required fields and column widths, and apply the status default.
    ///
    /// Only an absent or empty `status` gets `"Scheduled"`. Any other value,
    /// whitespace included, is stored verbatim as UpdateStatus would store it.
    pub fn validate(self) -> Result<NewAppointment, AppointmentError> {
        let patient_name = required_text("patientName", self.patient_name, TEXT_MAX_CHARS)?;
        let doctor_name = required_text("doctorName", self.doctor_name, TEXT_MAX_CHARS)?;
        let date = required_text("date", self.date, TEXT_MAX_CHARS)?;
        let time = required_text("time", self.time, TEXT_MAX_CHARS)?;

        let duration = match self.duration {
            None => return Err(missing("duration")),
            Some(minutes) if minutes <= 0 => {
                return Err(AppointmentError::ValidationError(
                    format!("duration must be a positive number of minutes, got {}", minutes)
                ));
            }
            Some(minutes) => i32::try_from(minutes).map_err(|_| {
                AppointmentError::ValidationError(format!("duration {} is out of range", minutes))
            })?,
        };

        let mode = required_text("mode", self.mode, STATUS_MAX_CHARS)?;

        let status = self.status
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());
        check_status(&status)?;

        Ok(NewAppointment {
            patient_name,
            doctor_name,
            date,
            time,
            duration,
            status,
            mode,
        })
    }
}

fn missing(field: &str) -> AppointmentError {
    AppointmentError::ValidationError(format!("{} is required", field))
}

fn required_text(field: &str, value: Option<String>, max_chars: usize) -> Result<String, AppointmentError> {
    match value {
        Some(v) if !v.trim().is_empty() => {
            check_length(field, &v, max_chars)?;
            Ok(v)
        }
        Some(_) => Err(AppointmentError::ValidationError(format!("{} must not be empty", field))),
        None => Err(missing(field)),
    }
}

fn check_length(field: &str, value: &str, max_chars: usize) -> Result<(), AppointmentError> {
    let chars = value.chars().count();
    if chars > max_chars {
        return Err(AppointmentError::ValidationError(
            format!("{} must be at most {} characters, got {}", field, max_chars, chars)
        ));
    }
    Ok(())
}

/// Reject a status that would not fit the `status` column.
pub fn check_status(status: &str) -> Result<(), AppointmentError> {
    check_length("status", status, STATUS_MAX_CHARS)
}

/// A validated appointment that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub patient_name: String,
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    pub duration: i32,
    pub status: String,
    pub mode: String,
}

impl NewAppointment {
    pub fn into_row(self, id: Uuid) -> AppointmentRow {
        AppointmentRow {
            id,
            patient_name: self.patient_name,
            doctor_name: self.doctor_name,
            date: self.date,
            time: self.time,
            duration: self.duration,
            status: self.status,
            mode: self.mode,
        }
    }
}

/// Exact-match filters for listing. Absent or empty filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentFilters {
    pub date: Option<String>,
    pub status: Option<String>,
    pub doctor_name: Option<String>,
}

impl AppointmentFilters {
    /// Drop filters whose value is an empty string.
    pub fn normalized(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            date: keep(self.date),
            status: keep(self.status),
            doctor_name: keep(self.doctor_name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.status.is_none() && self.doctor_name.is_none()
    }

    pub fn matches(&self, row: &AppointmentRow) -> bool {
        let eq = |filter: &Option<String>, value: &str| {
            filter.as_deref().map_or(true, |f| f == value)
        };

        eq(&self.date, &row.date)
            && eq(&self.status, &row.status)
            && eq(&self.doctor_name, &row.doctor_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub id: Uuid,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Parse a caller-supplied appointment id.
pub fn parse_appointment_id(raw: &str) -> Result<Uuid, AppointmentError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        AppointmentError::ValidationError(format!("'{}' is not a valid appointment id", raw))
    })
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Slot already booked: {0}")]
    SlotConflict(Slot),

    #[error("Appointment not found: {0}")]
    NotFound(Uuid),

    #[error("Store error: {0}")]
    StoreError(String),
}

impl From<AppointmentError> for AppError {
    fn from(e: AppointmentError) -> Self {
        match e {
            AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
            AppointmentError::SlotConflict(slot) => {
                AppError::Conflict(format!("Appointment slot already booked: {}", slot))
            }
            AppointmentError::NotFound(id) => {
                AppError::NotFound(format!("Appointment {} not found", id))
            }
            AppointmentError::StoreError(msg) => AppError::Database(msg),
        }
    }
}
