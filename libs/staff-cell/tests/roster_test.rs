use std::sync::Arc;

use assert_matches::assert_matches;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::{SchedulingError, StaffStatus};
use shared_storage::{MemoryStore, SchedulingStore};
use shared_utils::test_utils::test_staff;
use staff_cell::{CreateServiceRequest, CreateStaffRequest, RosterService};

fn setup() -> (Arc<dyn SchedulingStore>, RosterService, Uuid) {
    let store: Arc<dyn SchedulingStore> = Arc::new(MemoryStore::new(&AppConfig::default()));
    let roster = RosterService::new(store.clone());
    (store, roster, Uuid::new_v4())
}

fn staff_request(name: &str, service_type: &str, daily_capacity: i32) -> CreateStaffRequest {
    CreateStaffRequest {
        name: name.to_string(),
        service_type: service_type.to_string(),
        daily_capacity,
        status: None,
    }
}

fn service_request(name: &str, duration_minutes: i64, required_staff_type: &str) -> CreateServiceRequest {
    CreateServiceRequest {
        name: name.to_string(),
        duration_minutes,
        required_staff_type: required_staff_type.to_string(),
    }
}

#[tokio::test]
async fn new_staff_default_to_available() {
    let (_store, roster, account_id) = setup();

    let created = roster
        .create_staff(account_id, staff_request("  Maya ", "stylist", 2))
        .await
        .expect("staff creation");

    assert_eq!(created.name, "Maya", "names are stored trimmed");
    assert_eq!(created.status, StaffStatus::Available);
    assert_eq!(created.daily_capacity, 2);
}

#[tokio::test]
async fn short_names_and_types_are_rejected() {
    let (_store, roster, account_id) = setup();

    let err = roster
        .create_staff(account_id, staff_request("M", "stylist", 2))
        .await
        .expect_err("one-letter names must fail");
    assert_matches!(err, SchedulingError::InvalidRequest(msg) => {
        assert!(msg.contains("at least 2 characters"));
    });

    let err = roster
        .create_staff(account_id, staff_request("Maya", "x", 2))
        .await
        .expect_err("one-letter types must fail");
    assert_matches!(err, SchedulingError::InvalidRequest(_));
}

#[tokio::test]
async fn zero_capacity_is_rejected() {
    let (_store, roster, account_id) = setup();

    let err = roster
        .create_staff(account_id, staff_request("Maya", "stylist", 0))
        .await
        .expect_err("capacity below one must fail");
    assert_matches!(err, SchedulingError::InvalidRequest(msg) => {
        assert!(msg.contains("at least 1"));
    });
}

#[tokio::test]
async fn a_service_needs_an_available_provider() {
    let (_store, roster, account_id) = setup();

    let err = roster
        .create_service(account_id, service_request("Haircut", 30, "stylist"))
        .await
        .expect_err("no stylist exists yet");
    assert_matches!(err, SchedulingError::InvalidRequest(msg) => {
        assert_eq!(msg, "No available staff found for service type: stylist");
    });
}

#[tokio::test]
async fn providers_on_leave_do_not_count() {
    let (_store, roster, account_id) = setup();
    let staff = roster
        .create_staff(account_id, staff_request("Maya", "stylist", 2))
        .await
        .expect("staff creation");
    roster
        .set_staff_status(account_id, staff.id, StaffStatus::OnLeave)
        .await
        .expect("status change");

    let err = roster
        .create_service(account_id, service_request("Haircut", 30, "stylist"))
        .await
        .expect_err("the only stylist is on leave");
    assert_matches!(err, SchedulingError::InvalidRequest(msg) => {
        assert!(msg.contains("No available staff found"));
    });

    // once she is back the same request goes through
    roster
        .set_staff_status(account_id, staff.id, StaffStatus::Available)
        .await
        .expect("status change");
    roster
        .create_service(account_id, service_request("Haircut", 30, "stylist"))
        .await
        .expect("service creation");
}

#[tokio::test]
async fn retired_services_leave_listings_but_stay_resolvable() {
    let (store, roster, account_id) = setup();
    roster
        .create_staff(account_id, staff_request("Maya", "stylist", 2))
        .await
        .expect("staff creation");
    let service = roster
        .create_service(account_id, service_request("Haircut", 30, "stylist"))
        .await
        .expect("service creation");

    roster
        .delete_service(account_id, service.id)
        .await
        .expect("soft delete");

    let listed = roster.list_services(account_id).await.expect("listing");
    assert!(listed.is_empty(), "retired services disappear from listings");

    // existing appointments still resolve their duration through the row
    let stored = store
        .service_by_id(account_id, service.id)
        .await
        .expect("lookup")
        .expect("row survives the soft delete");
    assert!(stored.is_deleted);
}

#[tokio::test]
async fn staff_listings_are_scoped_and_name_ordered() {
    let (store, roster, account_id) = setup();
    roster
        .create_staff(account_id, staff_request("Zoe", "stylist", 1))
        .await
        .expect("staff creation");
    roster
        .create_staff(account_id, staff_request("Abe", "stylist", 1))
        .await
        .expect("staff creation");
    store
        .insert_staff(test_staff(Uuid::new_v4(), "Intruder", "stylist", 1))
        .await
        .expect("foreign staff insert");

    let listed = roster.list_staff(account_id).await.expect("listing");
    let names: Vec<&str> = listed.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Abe", "Zoe"]);
}

#[tokio::test]
async fn foreign_staff_cannot_be_updated() {
    let (store, roster, account_id) = setup();
    let foreign = store
        .insert_staff(test_staff(Uuid::new_v4(), "Maya", "stylist", 2))
        .await
        .expect("foreign staff insert");

    let err = roster
        .set_staff_status(account_id, foreign.id, StaffStatus::Blocked)
        .await
        .expect_err("other accounts' staff read as missing");
    assert_matches!(err, SchedulingError::NotFound(_));
}
