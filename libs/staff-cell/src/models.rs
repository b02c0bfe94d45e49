use serde::{Deserialize, Serialize};

use shared_models::{BookedSlot, Staff, StaffStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStaffRequest {
    pub name: String,
    pub service_type: String,
    pub daily_capacity: i32,
    /// Defaults to Available when omitted.
    #[serde(default)]
    pub status: Option<StaffStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub duration_minutes: i64,
    pub required_staff_type: String,
}

/// Bounds enforced on roster payloads before anything touches the store.
#[derive(Debug, Clone)]
pub struct RosterValidationRules {
    pub min_name_len: usize,
    pub min_type_len: usize,
    pub min_daily_capacity: i32,
    pub min_duration_minutes: i64,
}

impl Default for RosterValidationRules {
    fn default() -> Self {
        Self {
            min_name_len: 2,
            min_type_len: 2,
            min_daily_capacity: 1,
            min_duration_minutes: 1,
        }
    }
}

/// An Available staff member considered for an assignment, annotated with
/// their committed bookings. `booked_on_target_day` pre-counts the slots on
/// the day being scheduled so candidates sort cheaply.
#[derive(Debug, Clone, Serialize)]
pub struct StaffCandidate {
    pub staff: Staff,
    pub booked: Vec<BookedSlot>,
    pub booked_on_target_day: usize,
}
