use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What kind of scheduling transition a log entry records. Serialized in the
/// upper-case form the activity feed has always used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    Create,
    Queue,
    Update,
    Cancel,
    QueueToStaff,
    QueueToStaffManual,
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityAction::Create => write!(f, "CREATE"),
            ActivityAction::Queue => write!(f, "QUEUE"),
            ActivityAction::Update => write!(f, "UPDATE"),
            ActivityAction::Cancel => write!(f, "CANCEL"),
            ActivityAction::QueueToStaff => write!(f, "QUEUE_TO_STAFF"),
            ActivityAction::QueueToStaffManual => write!(f, "QUEUE_TO_STAFF_MANUAL"),
        }
    }
}

/// Append-only audit record. Exactly one entry is written per committed
/// appointment transition, in the same atomic unit as the transition itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: Uuid,
    pub account_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
    pub message: String,
    pub action: ActivityAction,
    pub created_at: DateTime<Utc>,
}

/// Payload for a log entry the store has not assigned an id or timestamp yet.
#[derive(Debug, Clone)]
pub struct NewActivityLog {
    pub account_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
    pub message: String,
    pub action: ActivityAction,
}

impl NewActivityLog {
    pub fn into_log(self) -> ActivityLog {
        ActivityLog {
            id: Uuid::new_v4(),
            account_id: self.account_id,
            staff_id: self.staff_id,
            appointment_id: self.appointment_id,
            message: self.message,
            action: self.action,
            created_at: Utc::now(),
        }
    }
}
