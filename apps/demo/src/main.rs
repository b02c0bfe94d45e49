// apps/demo/src/main.rs
//
// End-to-end walkthrough of the scheduling engine against the in-memory
// store: roster setup, load-balanced booking, queue overflow, promotion
// after a cancellation, a manual queue pull and the dashboard rollup.
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use appointment_cell::{
    AppointmentBookingService, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use dashboard_cell::DashboardService;
use queue_cell::{AssignFromQueueRequest, QueueAssignmentService};
use shared_config::AppConfig;
use shared_models::{AppointmentFilter, AppointmentStatus, StaffStatus};
use shared_storage::{MemoryStore, SchedulingStore};
use staff_cell::{CreateServiceRequest, CreateStaffRequest, RosterService};

fn walk_in(service_id: Uuid, customer: &str, start_time: DateTime<Utc>) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        customer_name: customer.to_string(),
        customer_phone: None,
        customer_email: None,
        service_id,
        start_time,
        staff_id: None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting bookline demo");

    // Load configuration
    let config = AppConfig::from_env();
    let store: Arc<dyn SchedulingStore> = Arc::new(MemoryStore::new(&config));

    let roster = RosterService::new(store.clone());
    let booking = AppointmentBookingService::new(store.clone(), &config);
    let queue = QueueAssignmentService::new(store.clone());
    let dashboard = DashboardService::new(store.clone());

    // Everything below belongs to one tenant.
    let account_id = Uuid::new_v4();

    // All bookings land on tomorrow so nothing reads as overdue.
    let day = (Utc::now() + Duration::days(1)).date_naive();
    let slot = |hour: u32, minute: u32| {
        Utc.from_utc_datetime(&day.and_hms_opt(hour, minute, 0).expect("valid demo time"))
    };

    // ===== Roster setup =====

    let maya = roster
        .create_staff(
            account_id,
            CreateStaffRequest {
                name: "Maya".to_string(),
                service_type: "stylist".to_string(),
                daily_capacity: 2,
                status: None,
            },
        )
        .await?;
    let alfie = roster
        .create_staff(
            account_id,
            CreateStaffRequest {
                name: "Alfie".to_string(),
                service_type: "stylist".to_string(),
                daily_capacity: 1,
                status: None,
            },
        )
        .await?;
    let zoe = roster
        .create_staff(
            account_id,
            CreateStaffRequest {
                name: "Zoe".to_string(),
                service_type: "colourist".to_string(),
                daily_capacity: 2,
                status: None,
            },
        )
        .await?;

    let haircut = roster
        .create_service(
            account_id,
            CreateServiceRequest {
                name: "Haircut".to_string(),
                duration_minutes: 30,
                required_staff_type: "stylist".to_string(),
            },
        )
        .await?;
    let full_colour = roster
        .create_service(
            account_id,
            CreateServiceRequest {
                name: "Full colour".to_string(),
                duration_minutes: 60,
                required_staff_type: "colourist".to_string(),
            },
        )
        .await?;

    info!(
        "Roster ready: {} (cap {}), {} (cap {}), {} (cap {})",
        maya.name, maya.daily_capacity, alfie.name, alfie.daily_capacity, zoe.name, zoe.daily_capacity
    );

    // Zoe goes on leave after her service exists, so colour bookings queue up.
    roster
        .set_staff_status(account_id, zoe.id, StaffStatus::OnLeave)
        .await?;

    // ===== Morning rush =====

    // Three walk-ins want 09:00. Capacity is 3 across Maya and Alfie but the
    // slot itself only fits two, so the third waits.
    let ana = booking
        .create_appointment(account_id, walk_in(haircut.id, "Ana", slot(9, 0)))
        .await?;
    let bo = booking
        .create_appointment(account_id, walk_in(haircut.id, "Bo", slot(9, 0)))
        .await?;
    let cleo = booking
        .create_appointment(account_id, walk_in(haircut.id, "Cleo", slot(9, 0)))
        .await?;

    // Maya still has room at 09:30; Alfie's day is already full.
    let dana = booking
        .create_appointment(account_id, walk_in(haircut.id, "Dana", slot(9, 30)))
        .await?;

    // No colourist on duty, so Fay queues.
    booking
        .create_appointment(account_id, walk_in(full_colour.id, "Fay", slot(10, 0)))
        .await?;

    let rush = booking
        .list_appointments(
            account_id,
            &AppointmentFilter {
                day: Some(day),
                ..Default::default()
            },
        )
        .await?;
    for view in &rush {
        info!(
            "{} at {} -> {} ({})",
            view.appointment.customer_name,
            view.appointment.start_time.format("%H:%M"),
            view.appointment.status,
            view.staff_name.as_deref().unwrap_or("unassigned"),
        );
    }

    println!("--- Waiting queue after the morning rush ---");
    let board = queue.waiting_list(account_id, None).await?;
    println!("{}", serde_json::to_string_pretty(&board)?);

    // ===== Cancellation frees a slot =====

    // Ana cancels; Cleo is next in line for a stylist and takes her place.
    booking.cancel_appointment(account_id, ana.id).await?;
    let promoted = store
        .appointment_by_id(account_id, cleo.id)
        .await?
        .expect("cleo exists");
    info!("After Ana cancelled, Cleo is {}", promoted.status);

    // ===== Manual pull from the queue =====

    // Zoe is back. The front desk assigns her the first eligible entry by
    // hand instead of waiting for a promotion pass.
    roster
        .set_staff_status(account_id, zoe.id, StaffStatus::Available)
        .await?;
    let assigned = queue
        .assign_to_staff(account_id, AssignFromQueueRequest { staff_id: zoe.id })
        .await?;
    info!(
        "Manually assigned {} to {}",
        assigned.appointment.customer_name, assigned.staff.name
    );

    // ===== Reschedule and completion =====

    // Dana pushes her cut back half an hour; her staff assignment is
    // re-validated against the new time.
    booking
        .update_appointment(
            account_id,
            dana.id,
            UpdateAppointmentRequest {
                start_time: Some(slot(10, 0)),
                ..Default::default()
            },
        )
        .await?;

    // Bo is done. Completion keeps the staff link for history and triggers
    // one more promotion check for Maya's type.
    booking
        .update_appointment(
            account_id,
            bo.id,
            UpdateAppointmentRequest {
                status: Some(AppointmentStatus::Completed),
                ..Default::default()
            },
        )
        .await?;

    // A final sweep finds nothing left to promote.
    let report = booking.promoter().promote(account_id, None, None).await?;
    info!(
        "Final promotion sweep: {} promoted, notes: {:?}",
        report.promoted_count, report.notes
    );

    // ===== Dashboard =====

    println!("--- Dashboard for {} ---", day);
    let summary = dashboard.summary(account_id, day).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    println!("--- Activity log (oldest first) ---");
    for entry in dashboard.activity_feed(account_id, 20).await?.iter().rev() {
        println!("[{}] {}", entry.action, entry.message);
    }

    Ok(())
}
