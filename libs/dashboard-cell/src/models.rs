// libs/dashboard-cell/src/models.rs
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use shared_models::StaffStatus;

/// Whether a staff member can still take bookings on the summarized day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadLevel {
    Booked,
    Ok,
}

impl fmt::Display for LoadLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadLevel::Booked => write!(f, "BOOKED"),
            LoadLevel::Ok => write!(f, "OK"),
        }
    }
}

/// One staff member's committed load on the summarized day.
#[derive(Debug, Clone, Serialize)]
pub struct StaffLoad {
    pub staff_id: Uuid,
    pub name: String,
    pub service_type: String,
    pub status: StaffStatus,
    pub booked: usize,
    pub daily_capacity: i32,
    /// Rendered as `booked/capacity`, e.g. `2/4`.
    pub load: String,
    pub level: LoadLevel,
}

/// The day-at-a-glance numbers the front desk works from.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub date: NaiveDate,
    pub total_today: usize,
    pub completed: usize,
    /// Scheduled plus Waiting appointments of the day.
    pub pending: usize,
    /// Account-wide waiting-queue depth, not limited to the day.
    pub waiting_queue: usize,
    pub staff_load: Vec<StaffLoad>,
}
