use std::collections::HashSet;
use std::sync::Arc;

use assert_matches::assert_matches;
use futures::future::join_all;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

use appointment_cell::models::{
    AppointmentError, AppointmentFilters, CreateAppointmentInput, DEFAULT_STATUS,
};
use appointment_cell::services::{InMemoryAppointmentStore, SchedulingService};

fn service() -> SchedulingService {
    SchedulingService::new(Arc::new(InMemoryAppointmentStore::new()))
}

fn input(patient: &str, doctor: &str, date: &str, time: &str) -> CreateAppointmentInput {
    CreateAppointmentInput {
        patient_name: Some(patient.to_string()),
        doctor_name: Some(doctor.to_string()),
        date: Some(date.to_string()),
        time: Some(time.to_string()),
        duration: Some(30),
        status: None,
        mode: Some("in-person".to_string()),
    }
}

fn filter_by_date(date: &str) -> AppointmentFilters {
    AppointmentFilters {
        date: Some(date.to_string()),
        ..AppointmentFilters::default()
    }
}

// =============================================================================
// END-TO-END SCENARIO
// =============================================================================

#[tokio::test]
async fn test_booking_lifecycle_scenario() {
    let service = service();

    let created = service
        .create_appointment(input("A", "Dr X", "2024-01-01", "09:00"))
        .await
        .expect("first booking should succeed");
    assert_eq!(created.status, DEFAULT_STATUS);
    assert_eq!(created.patient_name, "A");
    assert_eq!(created.duration, 30);

    let conflict = service
        .create_appointment(input("B", "Dr X", "2024-01-01", "09:00"))
        .await;
    assert_matches!(conflict, Err(AppointmentError::SlotConflict(slot)) => {
        assert_eq!(slot.doctor_name, "Dr X");
        assert_eq!(slot.time, "09:00");
    });

    let listed = service.list_appointments(filter_by_date("2024-01-01")).await.unwrap();
    assert_eq!(listed, vec![created.clone()]);

    let update = service.update_status(created.id, "Completed".to_string()).await.unwrap();
    assert_eq!(update.id, created.id);
    assert_eq!(update.status, "Completed");

    assert!(service.delete_appointment(created.id).await.unwrap());
    assert!(!service.delete_appointment(created.id).await.unwrap());
}

// =============================================================================
// SLOT INVARIANT
// =============================================================================

#[tokio::test]
async fn test_distinct_slots_all_succeed_with_unique_ids() {
    let service = service();
    let mut ids = HashSet::new();

    for doctor in ["Dr X", "Dr Y"] {
        for time in ["09:00", "09:30", "10:00"] {
            let appointment = service
                .create_appointment(input("A", doctor, "2024-01-01", time))
                .await
                .unwrap();
            assert!(ids.insert(appointment.id), "duplicate id {}", appointment.id);
        }
    }

    assert_eq!(ids.len(), 6);
    let all = service.list_appointments(AppointmentFilters::default()).await.unwrap();
    assert_eq!(all.len(), 6);
}

#[tokio::test]
async fn test_same_time_different_date_is_not_a_conflict() {
    let service = service();

    assert_ok!(service.create_appointment(input("A", "Dr X", "2024-01-01", "09:00")).await);
    assert_ok!(service.create_appointment(input("A", "Dr X", "2024-01-02", "09:00")).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bookings_for_one_slot_admit_exactly_one() {
    let service = service();

    let attempts = (0..16).map(|n| {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .create_appointment(input(&format!("Patient {}", n), "Dr X", "2024-01-01", "09:00"))
                .await
        })
    });

    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(AppointmentError::SlotConflict(_))))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 15);

    let stored = service.list_appointments(AppointmentFilters::default()).await.unwrap();
    assert_eq!(stored.len(), 1);
}

// =============================================================================
// VALIDATION
// =============================================================================

#[tokio::test]
async fn test_missing_required_field_is_validation_error() {
    let service = service();

    let mut missing_mode = input("A", "Dr X", "2024-01-01", "09:00");
    missing_mode.mode = None;
    assert_matches!(
        service.create_appointment(missing_mode).await,
        Err(AppointmentError::ValidationError(msg)) if msg == "mode is required"
    );

    let mut missing_duration = input("A", "Dr X", "2024-01-01", "09:00");
    missing_duration.duration = None;
    assert_matches!(
        service.create_appointment(missing_duration).await,
        Err(AppointmentError::ValidationError(_))
    );

    let blank_patient = input("   ", "Dr X", "2024-01-01", "09:00");
    assert_err!(service.create_appointment(blank_patient).await);

    let stored = service.list_appointments(AppointmentFilters::default()).await.unwrap();
    assert!(stored.is_empty(), "rejected input must not be stored");
}

#[tokio::test]
async fn test_supplied_status_is_kept() {
    let service = service();

    let mut with_status = input("A", "Dr X", "2024-01-01", "09:00");
    with_status.status = Some("Tentative".to_string());

    let created = service.create_appointment(with_status).await.unwrap();
    assert_eq!(created.status, "Tentative");
}

// =============================================================================
// LIST / UPDATE / DELETE
// =============================================================================

#[tokio::test]
async fn test_unfiltered_list_is_superset_of_filtered() {
    let service = service();
    service.create_appointment(input("A", "Dr X", "2024-01-01", "09:00")).await.unwrap();
    service.create_appointment(input("B", "Dr Y", "2024-01-01", "09:00")).await.unwrap();
    let c = service.create_appointment(input("C", "Dr X", "2024-01-02", "10:00")).await.unwrap();
    service.update_status(c.id, "Cancelled".to_string()).await.unwrap();

    let all = service.list_appointments(AppointmentFilters::default()).await.unwrap();

    let filter_sets = vec![
        filter_by_date("2024-01-01"),
        AppointmentFilters { doctor_name: Some("Dr X".to_string()), ..Default::default() },
        AppointmentFilters { status: Some("Cancelled".to_string()), ..Default::default() },
        AppointmentFilters {
            date: Some("2024-01-02".to_string()),
            doctor_name: Some("Dr X".to_string()),
            status: Some("Cancelled".to_string()),
        },
        filter_by_date("1999-12-31"),
    ];

    for filters in filter_sets {
        let subset = service.list_appointments(filters.clone()).await.unwrap();
        for appointment in &subset {
            assert!(all.contains(appointment), "{:?} not in unfiltered list", filters);
        }
    }

    let dr_x_day_one = service
        .list_appointments(AppointmentFilters {
            date: Some("2024-01-01".to_string()),
            doctor_name: Some("Dr X".to_string()),
            status: None,
        })
        .await
        .unwrap();
    assert_eq!(dr_x_day_one.len(), 1);
    assert_eq!(dr_x_day_one[0].patient_name, "A");
}

#[tokio::test]
async fn test_empty_filter_values_match_everything() {
    let service = service();
    service.create_appointment(input("A", "Dr X", "2024-01-01", "09:00")).await.unwrap();

    let listed = service.list_appointments(filter_by_date("")).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_update_status_changes_only_status() {
    let service = service();
    let created = service
        .create_appointment(input("A", "Dr X", "2024-01-01", "09:00"))
        .await
        .unwrap();

    service.update_status(created.id, "No-Show".to_string()).await.unwrap();

    let after = service.list_appointments(AppointmentFilters::default()).await.unwrap();
    assert_eq!(after.len(), 1);

    let mut expected = created.clone();
    expected.status = "No-Show".to_string();
    assert_eq!(after[0], expected);
}

#[tokio::test]
async fn test_update_status_on_unknown_id_is_not_found() {
    let service = service();
    let id = Uuid::new_v4();

    assert_matches!(
        service.update_status(id, "Completed".to_string()).await,
        Err(AppointmentError::NotFound(missing)) if missing == id
    );
}

#[tokio::test]
async fn test_oversized_values_are_rejected_before_storage() {
    let service = service();

    let mut oversized = input("A", "Dr X", "2024-01-01", "09:00");
    oversized.mode = Some("video-consultation-21".to_string());
    assert_matches!(
        service.create_appointment(oversized).await,
        Err(AppointmentError::ValidationError(_))
    );
    assert!(service.list_appointments(AppointmentFilters::default()).await.unwrap().is_empty());

    let created = service
        .create_appointment(input("A", "Dr X", "2024-01-01", "09:00"))
        .await
        .unwrap();
    assert_matches!(
        service.update_status(created.id, "Awaiting-Confirmation".to_string()).await,
        Err(AppointmentError::ValidationError(_))
    );

    let after = service.list_appointments(AppointmentFilters::default()).await.unwrap();
    assert_eq!(after[0].status, DEFAULT_STATUS);
}

#[tokio::test]
async fn test_delete_unknown_id_returns_false() {
    let service = service();
    assert!(!service.delete_appointment(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn test_deleted_slot_can_be_booked_again() {
    let service = service();
    let first = service
        .create_appointment(input("A", "Dr X", "2024-01-01", "09:00"))
        .await
        .unwrap();

    service.delete_appointment(first.id).await.unwrap();

    let second = service
        .create_appointment(input("B", "Dr X", "2024-01-01", "09:00"))
        .await
        .unwrap();
    assert_ne!(first.id, second.id);
}
