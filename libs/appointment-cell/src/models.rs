// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::{Appointment, AppointmentStatus, Staff};

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    pub service_id: Uuid,
    pub start_time: DateTime<Utc>,
    /// Pins the booking to one staff member instead of letting the engine
    /// choose. Capacity and conflict failures then surface as errors rather
    /// than as queue placement.
    #[serde(default)]
    pub staff_id: Option<Uuid>,
}

/// Partial update of an existing appointment. Absent fields stay untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub service_id: Option<Uuid>,
    pub start_time: Option<DateTime<Utc>>,
    /// `Some(Some(id))` reassigns, `Some(None)` sends the appointment back to
    /// the waiting queue, `None` leaves the assignment alone.
    pub staff_id: Option<Option<Uuid>>,
    /// Only terminal statuses (completed, cancelled, no_show) may be forced
    /// here; waiting and scheduled are derived by the engine.
    pub status: Option<AppointmentStatus>,
}

impl UpdateAppointmentRequest {
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none()
            && self.customer_phone.is_none()
            && self.customer_email.is_none()
            && self.service_id.is_none()
            && self.start_time.is_none()
            && self.staff_id.is_none()
            && self.status.is_none()
    }
}

// ==============================================================================
// RESPONSE MODELS
// ==============================================================================

/// An appointment enriched with what callers otherwise join by hand: resolved
/// names, the derived end time and an overdue flag.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentView {
    pub appointment: Appointment,
    pub service_name: Option<String>,
    pub staff_name: Option<String>,
    pub duration_minutes: i64,
    pub end_time: DateTime<Utc>,
    pub is_overdue: bool,
}

/// A successful first-fit assignment: the committed appointment and the staff
/// member who took it.
#[derive(Debug, Clone)]
pub struct AssignmentOutcome {
    pub appointment: Appointment,
    pub staff: Staff,
}

/// Result of one queue promotion pass. `notes` carries one human-readable
/// line per examined entry, promoted or not.
#[derive(Debug, Clone, Serialize)]
pub struct PromotionReport {
    pub promoted_count: usize,
    pub notes: Vec<String>,
}
