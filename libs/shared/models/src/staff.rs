use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffStatus {
    Available,
    OnLeave,
    Blocked,
}

impl fmt::Display for StaffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaffStatus::Available => write!(f, "available"),
            StaffStatus::OnLeave => write!(f, "on_leave"),
            StaffStatus::Blocked => write!(f, "blocked"),
        }
    }
}

/// A staff member who performs services of exactly one type.
/// `daily_capacity` caps how many committed appointments they can hold on a
/// single calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub service_type: String,
    pub daily_capacity: i32,
    pub status: StaffStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Staff {
    pub fn is_available(&self) -> bool {
        self.status == StaffStatus::Available
    }
}
