// Fixture builders shared by the cell test suites.
use chrono::{DateTime, Utc};
use uuid::Uuid;

use shared_models::{Appointment, AppointmentStatus, Service, Staff, StaffStatus};

pub fn test_staff(account_id: Uuid, name: &str, service_type: &str, daily_capacity: i32) -> Staff {
    Staff {
        id: Uuid::new_v4(),
        account_id,
        name: name.to_string(),
        service_type: service_type.to_string(),
        daily_capacity,
        status: StaffStatus::Available,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_service(
    account_id: Uuid,
    name: &str,
    duration_minutes: i64,
    required_staff_type: &str,
) -> Service {
    Service {
        id: Uuid::new_v4(),
        account_id,
        name: name.to_string(),
        duration_minutes,
        required_staff_type: required_staff_type.to_string(),
        is_deleted: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_waiting_appointment(
    account_id: Uuid,
    customer_name: &str,
    service_id: Uuid,
    start_time: DateTime<Utc>,
) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        account_id,
        customer_name: customer_name.to_string(),
        customer_phone: None,
        customer_email: None,
        service_id,
        staff_id: None,
        start_time,
        status: AppointmentStatus::Waiting,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_scheduled_appointment(
    account_id: Uuid,
    customer_name: &str,
    service_id: Uuid,
    staff_id: Uuid,
    start_time: DateTime<Utc>,
) -> Appointment {
    Appointment {
        staff_id: Some(staff_id),
        status: AppointmentStatus::Scheduled,
        ..test_waiting_appointment(account_id, customer_name, service_id, start_time)
    }
}
