use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Waiting,
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Waiting => write!(f, "waiting"),
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
        }
    }
}

/// A customer booking. `staff_id` is set exactly while the appointment is
/// Scheduled; a Waiting appointment holds no staff member. End times are
/// derived from the service duration and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub account_id: Uuid,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One committed (Scheduled) booking on a staff member's calendar, with its
/// duration already resolved through the service it was booked for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedSlot {
    pub appointment_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl BookedSlot {
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(self.duration_minutes)
    }
}

/// Filters for appointment listings. All criteria are conjunctive; `day`
/// selects the UTC calendar day of the start time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentFilter {
    pub day: Option<NaiveDate>,
    pub staff_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
    pub search_term: Option<String>,
}

/// Partial update applied to a stored appointment. `staff_id` is doubly
/// optional: `None` leaves the assignment alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct AppointmentPatch {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub service_id: Option<Uuid>,
    pub staff_id: Option<Option<Uuid>>,
    pub start_time: Option<DateTime<Utc>>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentPatch {
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none()
            && self.customer_phone.is_none()
            && self.customer_email.is_none()
            && self.service_id.is_none()
            && self.staff_id.is_none()
            && self.start_time.is_none()
            && self.status.is_none()
    }
}

/// The write half of a guarded commit: either a brand-new appointment row or
/// a patch against an existing one. An update names the status the caller
/// read; a row that moved on in the meantime must not be patched over.
#[derive(Debug, Clone)]
pub enum AppointmentWrite {
    Insert(Appointment),
    Update {
        appointment_id: Uuid,
        expected_status: AppointmentStatus,
        patch: AppointmentPatch,
    },
}
