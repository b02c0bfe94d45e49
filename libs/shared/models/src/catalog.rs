use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable service offered by an account, e.g. "Haircut" or "Deep Tissue
/// Massage". The `required_staff_type` tag links it to the staff members who
/// can perform it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub duration_minutes: i64,
    pub required_staff_type: String,
    /// Soft-deleted services stay resolvable for the durations of historical
    /// bookings but are hidden from new appointment resolution.
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    pub fn matches_staff_type(&self, staff_type: &str) -> bool {
        self.required_staff_type == staff_type
    }
}
