use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::{ActivityAction, NewActivityLog, StaffStatus};
use shared_storage::{MemoryStore, SchedulingStore};
use shared_utils::test_utils::{test_scheduled_appointment, test_service, test_staff};
use staff_cell::EligibilityService;

fn setup() -> (Arc<dyn SchedulingStore>, EligibilityService, Uuid) {
    let store: Arc<dyn SchedulingStore> = Arc::new(MemoryStore::new(&AppConfig::default()));
    let eligibility = EligibilityService::new(store.clone());
    (store, eligibility, Uuid::new_v4())
}

fn target_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 12).unwrap()
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 12, hour, minute, 0).unwrap()
}

fn seed_log(account_id: Uuid) -> NewActivityLog {
    NewActivityLog {
        account_id,
        staff_id: None,
        appointment_id: None,
        message: "seeded".to_string(),
        action: ActivityAction::Create,
    }
}

#[tokio::test]
async fn an_empty_roster_yields_no_candidates() {
    let (_store, eligibility, account_id) = setup();

    let candidates = eligibility
        .candidates(account_id, "stylist", target_day())
        .await
        .expect("an empty answer is not an error");
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn candidates_are_ordered_by_day_load_then_name() {
    let (store, eligibility, account_id) = setup();
    let service = store
        .insert_service(test_service(account_id, "Haircut", 30, "stylist"))
        .await
        .expect("service insert");
    let busy = store
        .insert_staff(test_staff(account_id, "Abe", "stylist", 3))
        .await
        .expect("staff insert");
    store
        .insert_staff(test_staff(account_id, "Zoe", "stylist", 3))
        .await
        .expect("staff insert");

    store
        .insert_appointment(
            test_scheduled_appointment(account_id, "Ana", service.id, busy.id, at(9, 0)),
            seed_log(account_id),
        )
        .await
        .expect("appointment insert");

    // Abe sorts first alphabetically but carries one booking today
    let candidates = eligibility
        .candidates(account_id, "stylist", target_day())
        .await
        .expect("candidate lookup");
    let names: Vec<&str> = candidates.iter().map(|c| c.staff.name.as_str()).collect();
    assert_eq!(names, vec!["Zoe", "Abe"]);
    assert_eq!(candidates[0].booked_on_target_day, 0);
    assert_eq!(candidates[1].booked_on_target_day, 1);
}

#[tokio::test]
async fn equal_loads_fall_back_to_name_order() {
    let (store, eligibility, account_id) = setup();
    store
        .insert_staff(test_staff(account_id, "Zoe", "stylist", 3))
        .await
        .expect("staff insert");
    store
        .insert_staff(test_staff(account_id, "Abe", "stylist", 3))
        .await
        .expect("staff insert");

    let candidates = eligibility
        .candidates(account_id, "stylist", target_day())
        .await
        .expect("candidate lookup");
    let names: Vec<&str> = candidates.iter().map(|c| c.staff.name.as_str()).collect();
    assert_eq!(names, vec!["Abe", "Zoe"]);
}

#[tokio::test]
async fn bookings_on_other_days_do_not_weigh_in() {
    let (store, eligibility, account_id) = setup();
    let service = store
        .insert_service(test_service(account_id, "Haircut", 30, "stylist"))
        .await
        .expect("service insert");
    let busy_yesterday = store
        .insert_staff(test_staff(account_id, "Abe", "stylist", 3))
        .await
        .expect("staff insert");

    let yesterday = Utc.with_ymd_and_hms(2025, 6, 11, 9, 0, 0).unwrap();
    store
        .insert_appointment(
            test_scheduled_appointment(account_id, "Ana", service.id, busy_yesterday.id, yesterday),
            seed_log(account_id),
        )
        .await
        .expect("appointment insert");

    let candidates = eligibility
        .candidates(account_id, "stylist", target_day())
        .await
        .expect("candidate lookup");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].booked_on_target_day, 0);
    assert_eq!(candidates[0].booked.len(), 1, "the slot itself is still carried");
}

#[tokio::test]
async fn unavailable_and_mismatched_staff_are_excluded() {
    let (store, eligibility, account_id) = setup();
    store
        .insert_staff(test_staff(account_id, "Maya", "stylist", 3))
        .await
        .expect("staff insert");
    let on_leave = store
        .insert_staff(test_staff(account_id, "Abe", "stylist", 3))
        .await
        .expect("staff insert");
    store
        .update_staff_status(account_id, on_leave.id, StaffStatus::OnLeave)
        .await
        .expect("status change");
    store
        .insert_staff(test_staff(account_id, "Cory", "colourist", 3))
        .await
        .expect("staff insert");
    store
        .insert_staff(test_staff(Uuid::new_v4(), "Foreign", "stylist", 3))
        .await
        .expect("foreign staff insert");

    let candidates = eligibility
        .candidates(account_id, "stylist", target_day())
        .await
        .expect("candidate lookup");
    let names: Vec<&str> = candidates.iter().map(|c| c.staff.name.as_str()).collect();
    assert_eq!(names, vec!["Maya"]);
}
