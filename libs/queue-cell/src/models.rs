// libs/queue-cell/src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::{Appointment, Staff};

/// Pulls the next suitable waiting appointment onto the named staff member's
/// calendar, regardless of the load-balancing order the automatic promoter
/// would have used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignFromQueueRequest {
    pub staff_id: Uuid,
}

/// A manual assignment that landed: the now-Scheduled appointment and the
/// staff member it went to.
#[derive(Debug, Clone)]
pub struct AssignedFromQueue {
    pub appointment: Appointment,
    pub staff: Staff,
}

/// One waiting appointment as shown on the queue board, with its position
/// and the service it is waiting for resolved.
#[derive(Debug, Clone, Serialize)]
pub struct QueueEntry {
    /// 1-based position in requested-start-time order.
    pub position: usize,
    pub appointment: Appointment,
    pub service_name: Option<String>,
    pub required_staff_type: Option<String>,
}
