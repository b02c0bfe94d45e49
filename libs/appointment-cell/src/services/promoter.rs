// libs/appointment-cell/src/services/promoter.rs
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::{
    ActivityAction, Appointment, AppointmentPatch, AppointmentStatus, AppointmentWrite,
    NewActivityLog, SchedulingError, Staff,
};
use shared_storage::SchedulingStore;
use shared_utils::utc_day;
use staff_cell::EligibilityService;

use crate::models::PromotionReport;
use crate::services::assignment::AssignmentService;

fn promoted_message(customer_name: &str, staff_name: &str) -> String {
    format!(
        "Appointment for \"{}\" (from queue) auto-assigned to {}",
        customer_name, staff_name
    )
}

/// Drains the waiting queue opportunistically whenever capacity frees up.
///
/// Entries are taken in requested-start-time order and promoted one at a
/// time, each in its own guarded commit. A pass that promotes nothing is a
/// success; an entry that cannot be promoted right now simply stays Waiting
/// for a later pass.
pub struct QueuePromoterService {
    store: Arc<dyn SchedulingStore>,
    eligibility: EligibilityService,
    assignment: AssignmentService,
    batch_limit: usize,
}

impl QueuePromoterService {
    pub fn new(store: Arc<dyn SchedulingStore>, config: &AppConfig) -> Self {
        Self {
            eligibility: EligibilityService::new(store.clone()),
            assignment: AssignmentService::new(store.clone()),
            batch_limit: config.promotion_batch_limit,
            store,
        }
    }

    /// One bounded promotion pass. `staff_type` narrows the pass to entries
    /// whose service requires that type (the usual case after one staff
    /// member's capacity freed up); `max_count` overrides the configured
    /// batch limit.
    ///
    /// Only the initial queue fetch can fail the call. Per-entry problems
    /// become notes and the scan moves on, so one stuck entry never starves
    /// the rest of the queue.
    #[instrument(skip(self))]
    pub async fn promote(
        &self,
        account_id: Uuid,
        staff_type: Option<&str>,
        max_count: Option<usize>,
    ) -> Result<PromotionReport, SchedulingError> {
        let limit = max_count.unwrap_or(self.batch_limit);
        let waiting = self
            .store
            .waiting_appointments(account_id, staff_type, Some(limit))
            .await?;

        if waiting.is_empty() {
            debug!("No waiting appointments to promote");
            return Ok(PromotionReport {
                promoted_count: 0,
                notes: vec!["No waiting appointments found".to_string()],
            });
        }

        let examined = waiting.len();
        let mut promoted_count = 0;
        let mut notes = Vec::new();

        for appointment in waiting {
            match self.promote_one(account_id, &appointment).await {
                Ok(Some(staff)) => {
                    promoted_count += 1;
                    notes.push(promoted_message(&appointment.customer_name, &staff.name));
                }
                Ok(None) => {
                    notes.push(format!(
                        "Could not assign queued appointment for \"{}\": no suitable staff available right now",
                        appointment.customer_name
                    ));
                }
                Err(err) => {
                    warn!("Skipping queued appointment {}: {}", appointment.id, err);
                    notes.push(format!(
                        "Could not process queued appointment for \"{}\": {}",
                        appointment.customer_name, err
                    ));
                }
            }
        }

        info!(
            "Promoted {} of {} waiting appointment(s)",
            promoted_count, examined
        );
        Ok(PromotionReport {
            promoted_count,
            notes,
        })
    }

    /// Eligibility, ordering and the guarded Waiting -> Scheduled commit for
    /// a single queue entry.
    async fn promote_one(
        &self,
        account_id: Uuid,
        appointment: &Appointment,
    ) -> Result<Option<Staff>, SchedulingError> {
        let service = self
            .store
            .service_by_id(account_id, appointment.service_id)
            .await?
            .ok_or_else(|| {
                SchedulingError::NotFound(format!(
                    "Service for queued appointment {} no longer exists",
                    appointment.id
                ))
            })?;

        let candidates = self
            .eligibility
            .candidates(
                account_id,
                &service.required_staff_type,
                utc_day(appointment.start_time),
            )
            .await?;

        let outcome = self
            .assignment
            .assign_first_fit(
                account_id,
                &candidates,
                appointment.start_time,
                service.duration_minutes,
                None,
                |candidate| AppointmentWrite::Update {
                    appointment_id: appointment.id,
                    // the queue read is stale by commit time; an entry
                    // cancelled since then must stay cancelled
                    expected_status: AppointmentStatus::Waiting,
                    patch: AppointmentPatch {
                        staff_id: Some(Some(candidate.staff.id)),
                        status: Some(AppointmentStatus::Scheduled),
                        ..Default::default()
                    },
                },
                |candidate| NewActivityLog {
                    account_id,
                    staff_id: Some(candidate.staff.id),
                    appointment_id: Some(appointment.id),
                    message: promoted_message(&appointment.customer_name, &candidate.staff.name),
                    action: ActivityAction::QueueToStaff,
                },
            )
            .await?;

        Ok(outcome.map(|o| o.staff))
    }
}
