//! Persisted layout of the appointments table.
//!
//! The table and its unique slot index are created by an external bootstrap
//! step before the service starts. These definitions are the contract that
//! step must satisfy.

pub const APPOINTMENTS_TABLE: &str = "appointments";
pub const UNIQUE_SLOT_INDEX: &str = "unique_slot_idx";

/// `VARCHAR` width of `patient_name`, `doctor_name`, `date` and `time`.
pub const TEXT_MAX_CHARS: usize = 100;

/// `VARCHAR` width of `status` and `mode`.
pub const STATUS_MAX_CHARS: usize = 20;

/// Column order used for every `select`.
pub const COLUMNS: [&str; 8] = [
    "id",
    "patient_name",
    "doctor_name",
    "date",
    "time",
    "duration",
    "status",
    "mode",
];

/// Columns covered by the unique slot index.
pub const SLOT_COLUMNS: [&str; 3] = ["doctor_name", "date", "time"];

pub const APPOINTMENTS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS appointments (
  id UUID PRIMARY KEY,
  patient_name VARCHAR(100) NOT NULL,
  doctor_name VARCHAR(100) NOT NULL,
  date VARCHAR(100) NOT NULL,
  time VARCHAR(100) NOT NULL,
  duration INT NOT NULL,
  status VARCHAR(20) NOT NULL,
  mode VARCHAR(20) NOT NULL
);
"#;

pub const UNIQUE_SLOT_INDEX_SQL: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS unique_slot_idx
ON appointments(doctor_name, date, time);
"#;

/// `select` parameter value listing every column.
pub fn select_columns() -> String {
    COLUMNS.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ddl_declares_every_column() {
        for column in COLUMNS {
            assert!(
                APPOINTMENTS_TABLE_SQL.contains(&format!("\n  {} ", column)),
                "column {} missing from table DDL",
                column
            );
        }
        assert!(APPOINTMENTS_TABLE_SQL.contains("id UUID PRIMARY KEY"));
    }

    #[test]
    fn test_ddl_widths_match_validation_limits() {
        for column in ["patient_name", "doctor_name", "date", "time"] {
            assert!(APPOINTMENTS_TABLE_SQL.contains(&format!("{} VARCHAR({})", column, TEXT_MAX_CHARS)));
        }
        for column in ["status", "mode"] {
            assert!(APPOINTMENTS_TABLE_SQL.contains(&format!("{} VARCHAR({})", column, STATUS_MAX_CHARS)));
        }
    }

    #[test]
    fn test_unique_index_covers_slot() {
        assert!(UNIQUE_SLOT_INDEX_SQL.contains(UNIQUE_SLOT_INDEX));
        assert!(UNIQUE_SLOT_INDEX_SQL.contains(&format!(
            "{}({})",
            APPOINTMENTS_TABLE,
            SLOT_COLUMNS.join(", ")
        )));
    }

    #[test]
    fn test_select_columns() {
        assert_eq!(
            select_columns(),
            "id,patient_name,doctor_name,date,time,duration,status,mode"
        );
    }
}
