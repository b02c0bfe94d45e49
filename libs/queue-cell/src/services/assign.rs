// libs/queue-cell/src/services/assign.rs
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use appointment_cell::ConflictChecker;
use shared_models::{
    ActivityAction, Appointment, AppointmentPatch, AppointmentStatus, AppointmentWrite,
    NewActivityLog, SchedulingError, Staff,
};
use shared_storage::SchedulingStore;

use crate::models::{AssignFromQueueRequest, AssignedFromQueue, QueueEntry};

/// How many queue entries a manual assignment scans before giving up.
const MANUAL_SCAN_LIMIT: usize = 5;

/// Staff-initiated queue pulls: "give me my next waiting customer".
///
/// Unlike the automatic promoter this targets one staff member, and a staff
/// member who cannot take anything is an error the caller sees. A full day
/// stops the scan immediately; a mere time collision moves on to the next
/// waiting entry.
pub struct QueueAssignmentService {
    store: Arc<dyn SchedulingStore>,
}

impl QueueAssignmentService {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self { store }
    }

    /// The waiting queue in promotion order, positions included, with each
    /// entry's service resolved for display.
    pub async fn waiting_list(
        &self,
        account_id: Uuid,
        staff_type: Option<&str>,
    ) -> Result<Vec<QueueEntry>, SchedulingError> {
        let waiting = self
            .store
            .waiting_appointments(account_id, staff_type, None)
            .await?;

        let mut entries = Vec::with_capacity(waiting.len());
        for (index, appointment) in waiting.into_iter().enumerate() {
            let service = self
                .store
                .service_by_id(account_id, appointment.service_id)
                .await?;
            entries.push(QueueEntry {
                position: index + 1,
                service_name: service.as_ref().map(|service| service.name.clone()),
                required_staff_type: service.map(|service| service.required_staff_type),
                appointment,
            });
        }
        Ok(entries)
    }

    /// Binds the earliest-requested waiting appointment the staff member can
    /// actually take. Scans at most `MANUAL_SCAN_LIMIT` entries of the
    /// matching service type in start-time order.
    pub async fn assign_to_staff(
        &self,
        account_id: Uuid,
        request: AssignFromQueueRequest,
    ) -> Result<AssignedFromQueue, SchedulingError> {
        let staff = self
            .store
            .staff_by_id(account_id, request.staff_id)
            .await?
            .ok_or_else(|| {
                SchedulingError::NotFound(
                    "Staff member not found or does not belong to you".to_string(),
                )
            })?;
        if !staff.is_available() {
            return Err(SchedulingError::InvalidRequest(format!(
                "{} is not available for bookings",
                staff.name
            )));
        }

        let eligible = self
            .store
            .waiting_appointments(account_id, Some(&staff.service_type), Some(MANUAL_SCAN_LIMIT))
            .await?;
        if eligible.is_empty() {
            let any_waiting = self
                .store
                .waiting_appointments(account_id, None, Some(1))
                .await?;
            let message = if any_waiting.is_empty() {
                "No waiting appointments found"
            } else {
                "No waiting appointments eligible for this staff type"
            };
            return Err(SchedulingError::NotFound(message.to_string()));
        }

        let slots = self.store.booked_slots(account_id, staff.id).await?;
        let mut last_conflict = None;
        for appointment in eligible {
            let service = match self
                .store
                .service_by_id(account_id, appointment.service_id)
                .await?
            {
                Some(service) => service,
                // dangling rows are the promoter's problem to report
                None => continue,
            };

            match ConflictChecker::check(
                &staff,
                &slots,
                appointment.start_time,
                service.duration_minutes,
                None,
            ) {
                Ok(()) => {
                    return self
                        .commit_manual_assignment(
                            account_id,
                            &staff,
                            appointment,
                            service.duration_minutes,
                        )
                        .await;
                }
                Err(err @ SchedulingError::CapacityExceeded { .. }) => {
                    // the day is full, later entries cannot help
                    return Err(err);
                }
                Err(err @ SchedulingError::SchedulingConflict { .. }) => {
                    debug!(
                        "Waiting appointment {} collides with {}'s calendar, trying next",
                        appointment.id, staff.name
                    );
                    last_conflict = Some(err);
                }
                Err(other) => return Err(other),
            }
        }

        Err(last_conflict.unwrap_or_else(|| {
            SchedulingError::NotFound(
                "No waiting appointments eligible for this staff type".to_string(),
            )
        }))
    }

    async fn commit_manual_assignment(
        &self,
        account_id: Uuid,
        staff: &Staff,
        appointment: Appointment,
        duration_minutes: i64,
    ) -> Result<AssignedFromQueue, SchedulingError> {
        let guard =
            ConflictChecker::guard(staff, appointment.start_time, duration_minutes, None);
        let patch = AppointmentPatch {
            staff_id: Some(Some(staff.id)),
            status: Some(AppointmentStatus::Scheduled),
            ..Default::default()
        };
        let log = NewActivityLog {
            account_id,
            staff_id: Some(staff.id),
            appointment_id: Some(appointment.id),
            message: format!(
                "Appointment for \"{}\" manually assigned from queue to {}",
                appointment.customer_name, staff.name
            ),
            action: ActivityAction::QueueToStaffManual,
        };

        let assigned = self
            .store
            .commit_scheduled(
                account_id,
                staff.id,
                guard,
                AppointmentWrite::Update {
                    appointment_id: appointment.id,
                    expected_status: AppointmentStatus::Waiting,
                    patch,
                },
                log,
            )
            .await?;
        info!(
            "Appointment {} manually assigned to {}",
            assigned.id, staff.name
        );
        Ok(AssignedFromQueue {
            appointment: assigned,
            staff: staff.clone(),
        })
    }
}
