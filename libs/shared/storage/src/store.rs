// libs/shared/storage/src/store.rs
use async_trait::async_trait;
use uuid::Uuid;

use shared_models::{
    ActivityLog, Appointment, AppointmentFilter, AppointmentPatch, AppointmentStatus,
    AppointmentWrite, BookedSlot, NewActivityLog, SchedulingError, Service, Staff, StaffStatus,
};

/// Pure predicate run inside `commit_scheduled` against a staff member's
/// freshly read day slots. It receives data only; rejecting aborts the commit
/// with the returned error and nothing written.
pub type SlotGuard = Box<dyn Fn(&[BookedSlot]) -> Result<(), SchedulingError> + Send + Sync>;

/// Persistence contract for the scheduling engine.
///
/// Every method is scoped to one account; rows belonging to other accounts
/// behave exactly as if they did not exist. Lookups that can legitimately
/// miss return `Ok(None)` so callers choose their own error wording, while
/// mutations of missing rows fail with `NotFound`.
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    // ===== Catalog =====

    async fn service_by_id(
        &self,
        account_id: Uuid,
        service_id: Uuid,
    ) -> Result<Option<Service>, SchedulingError>;

    /// Services of the account ordered by name. Soft-deleted rows are
    /// included only when `include_deleted` is set.
    async fn list_services(
        &self,
        account_id: Uuid,
        include_deleted: bool,
    ) -> Result<Vec<Service>, SchedulingError>;

    async fn insert_service(&self, service: Service) -> Result<Service, SchedulingError>;

    async fn mark_service_deleted(
        &self,
        account_id: Uuid,
        service_id: Uuid,
    ) -> Result<Service, SchedulingError>;

    // ===== Staff =====

    async fn staff_by_id(
        &self,
        account_id: Uuid,
        staff_id: Uuid,
    ) -> Result<Option<Staff>, SchedulingError>;

    /// All staff of the account ordered by name.
    async fn list_staff(&self, account_id: Uuid) -> Result<Vec<Staff>, SchedulingError>;

    /// Staff with `status == Available` whose `service_type` equals
    /// `service_type` exactly, ordered by name.
    async fn available_staff_by_type(
        &self,
        account_id: Uuid,
        service_type: &str,
    ) -> Result<Vec<Staff>, SchedulingError>;

    async fn insert_staff(&self, staff: Staff) -> Result<Staff, SchedulingError>;

    async fn update_staff_status(
        &self,
        account_id: Uuid,
        staff_id: Uuid,
        status: StaffStatus,
    ) -> Result<Staff, SchedulingError>;

    // ===== Appointments =====

    async fn appointment_by_id(
        &self,
        account_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<Option<Appointment>, SchedulingError>;

    /// Filtered listing. With a `day` filter the result is ordered by start
    /// time ascending, otherwise newest start first.
    async fn list_appointments(
        &self,
        account_id: Uuid,
        filter: &AppointmentFilter,
    ) -> Result<Vec<Appointment>, SchedulingError>;

    /// A staff member's committed (Scheduled) bookings with durations
    /// resolved through their services, ordered by start time. Bookings whose
    /// service cannot be resolved carry the configured fallback duration.
    async fn booked_slots(
        &self,
        account_id: Uuid,
        staff_id: Uuid,
    ) -> Result<Vec<BookedSlot>, SchedulingError>;

    /// Waiting appointments ordered by requested start time ascending,
    /// optionally restricted to services requiring `staff_type`, truncated to
    /// `limit` when given.
    async fn waiting_appointments(
        &self,
        account_id: Uuid,
        staff_type: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Appointment>, SchedulingError>;

    // ===== Activity =====

    /// Most recent log entries first.
    async fn recent_activity(
        &self,
        account_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ActivityLog>, SchedulingError>;

    // ===== Atomic writes =====

    /// Inserts the appointment and its log entry as one unit.
    async fn insert_appointment(
        &self,
        appointment: Appointment,
        log: NewActivityLog,
    ) -> Result<Appointment, SchedulingError>;

    /// Applies the patch and appends the log entry as one unit. Reserved for
    /// transitions that need no capacity guard (cancellation, unassignment,
    /// terminal overrides, field edits on unassigned appointments).
    ///
    /// The patch lands only while the row still holds `expected_status`, the
    /// status the caller based its decision on. A row that transitioned in
    /// the meantime rejects with `InvalidRequest` and nothing written, so a
    /// stale read can never drag an appointment back out of a terminal state.
    async fn update_appointment(
        &self,
        account_id: Uuid,
        appointment_id: Uuid,
        expected_status: AppointmentStatus,
        patch: AppointmentPatch,
        log: NewActivityLog,
    ) -> Result<Appointment, SchedulingError>;

    /// The race-free commit primitive. Under a scope covering at least
    /// `staff_id`'s appointments, re-reads that staff member's booked slots,
    /// runs `guard` over them, and only on success applies `write` plus the
    /// log row before releasing the scope. A guard rejection surfaces
    /// unchanged with nothing written. An update write additionally requires
    /// the target row to still hold its `expected_status`, same as
    /// [`update_appointment`](Self::update_appointment).
    async fn commit_scheduled(
        &self,
        account_id: Uuid,
        staff_id: Uuid,
        guard: SlotGuard,
        write: AppointmentWrite,
        log: NewActivityLog,
    ) -> Result<Appointment, SchedulingError>;
}
